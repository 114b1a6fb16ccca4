use crate::chrome::hover::{RowHover, DELETE_TRIGGER_CLASS};
use crate::chrome::{escape_html, Chrome, FOOTER_MOUNT, HEADER_MOUNT};
use crate::controller::ViewState;
use crate::model::Entity;

use super::{form_fields, View, ERROR_BANNER, LOADING_TEXT};

/// Everything around the view state that a page needs.
pub struct PageContext<'a> {
    pub chrome: &'a Chrome,
    /// Current page URL, used to mark the active menu link.
    pub location: Option<&'a str>,
    pub hover: &'a RowHover,
}

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

pub fn render_html<E: Entity>(state: &ViewState<E>, view: View, ctx: &PageContext<'_>) -> Vec<u8> {
    let data = match view {
        View::List => serde_json::to_string(&state.items),
        View::Form => serde_json::to_string(&state.form),
    }
    .unwrap_or_else(|_| "null".to_string());
    let data = json_for_script_tag(&data);

    let title = escape_html(&state.title);
    let header = ctx.chrome.render_header(ctx.location);
    let footer = ctx.chrome.render_footer();
    let body = if state.error {
        format!("<p class=\"error\">{}</p>", escape_html(ERROR_BANNER))
    } else if state.loading {
        format!("<p class=\"cargando\">{}</p>", escape_html(LOADING_TEXT))
    } else {
        match view {
            View::List => render_list(state, ctx.hover),
            View::Form => render_form(state),
        }
    };
    let site = escape_html(&ctx.chrome.site_name);

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title} | {site}</title>
  <link rel="stylesheet" href="css/estilos.css"/>
  <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css"/>
</head>
<body>
  <header id="{HEADER_MOUNT}">
{header}  </header>
  <main id="app">
    <h1>{title}</h1>
    {body}
  </main>
  <footer id="{FOOTER_MOUNT}">
{footer}  </footer>
  <script type="application/json" id="view-data">{data}</script>
</body>
</html>
"####
    );
    html.into_bytes()
}

fn render_list<E: Entity>(state: &ViewState<E>, hover: &RowHover) -> String {
    let mut out = String::new();
    out.push_str("<table>\n      <thead><tr>");
    for column in E::columns() {
        out.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    out.push_str("<th></th></tr></thead>\n      <tbody>\n");
    for (idx, item) in state.items.iter().enumerate() {
        match hover.row_class(idx) {
            Some(class) => out.push_str(&format!("        <tr class=\"{class}\">")),
            None => out.push_str("        <tr>"),
        }
        for cell in item.cells() {
            out.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        let id = item.id().map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "<td><button type=\"button\" class=\"{DELETE_TRIGGER_CLASS}\" data-id=\"{}\">Eliminar</button></td></tr>\n",
            escape_html(&id)
        ));
    }
    out.push_str("      </tbody>\n    </table>");
    out
}

fn render_form<E: Entity>(state: &ViewState<E>) -> String {
    let mut out = String::new();
    out.push_str("<form>\n");
    for (key, value) in form_fields(&state.form) {
        let root = key.split('.').next().unwrap_or_default();
        let readonly = if key == "id" || E::DESCRIPTOR.read_only_fields.contains(&root) {
            " readonly"
        } else {
            ""
        };
        let key = escape_html(&key);
        out.push_str(&format!(
            "      <label for=\"{key}\">{key}</label> <input id=\"{key}\" name=\"{key}\" value=\"{}\"{readonly}/>\n",
            escape_html(&value)
        ));
    }
    out.push_str("    </form>");
    out
}
