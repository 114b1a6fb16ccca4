use std::sync::{Mutex, PoisonError};

use crate::chrome::highlight::{current_link, CURRENT_CLASS};
use crate::chrome::hover::{HoverTarget, RowHover, DELETE_TRIGGER_CLASS, MARKED_ROW_CLASS};
use crate::chrome::{escape_html, Chrome, MENU};
use crate::controller::{Notice, Phase, Shell, ViewState};
use crate::model::{AvgRatings, Clinic, Entity, Product};
use crate::output::page::{render_html, PageContext};
use crate::output::{self, OutputFormat, View, ERROR_BANNER, LOADING_TEXT};


#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ShellEvent {
    Notice(Notice),
    Navigate(String),
    Reload,
}

/// Shell that only records what it was asked to do.
#[derive(Debug, Default)]
pub(crate) struct RecordingShell {
    events: Mutex<Vec<ShellEvent>>,
}

impl RecordingShell {
    pub fn events(&self) -> Vec<ShellEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: ShellEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl Shell for RecordingShell {
    fn notify(&self, notice: &Notice) {
        self.push(ShellEvent::Notice(notice.clone()));
    }

    fn navigate(&self, page: &str) {
        self.push(ShellEvent::Navigate(page.to_string()));
    }

    fn reload(&self) {
        self.push(ShellEvent::Reload);
    }
}

fn ready_state<E: Entity>(items: Vec<E>, form: E) -> ViewState<E> {
    ViewState {
        items,
        form,
        loading: false,
        error: false,
        title: E::DESCRIPTOR.default_title.to_string(),
        phase: Phase::Ready,
    }
}

fn sample_clinic(id: i64, name: &str) -> Clinic {
    Clinic {
        id: Some(id),
        name: name.to_string(),
        funding: "privado".to_string(),
        locality: "Palermo".to_string(),
        avg_ratings: AvgRatings {
            facility: Some(4.5),
            medical: None,
            service: Some(3.0),
        },
        ..Clinic::default()
    }
}

#[test]
fn header_marks_only_the_current_page() {
    let header = Chrome::default().render_header(Some("https://admin.example/ratings.html?id_clinica=3"));
    assert_eq!(header.matches(CURRENT_CLASS).count(), 1);
    assert!(header.contains(&format!(
        "href=\"ratings.html\" id=\"menu-princ-3\" class=\"menu-item {CURRENT_CLASS}\""
    )));
    assert!(header.contains("href=\"clinicas.html\" id=\"menu-princ-2\" class=\"menu-item\""));
}

#[test]
fn header_without_location_marks_nothing() {
    let header = Chrome::default().render_header(None);
    assert!(!header.contains(CURRENT_CLASS));
    for entry in MENU {
        assert!(header.contains(entry.href));
    }
    assert!(header.contains("Panel de control"));
}

#[test]
fn footer_carries_social_links_and_copyright() {
    let footer = Chrome::default().render_footer();
    assert!(footer.contains("https://www.linkedin.com"));
    assert!(footer.contains("Copyright © 2023 Venture Design"));
    assert!(footer.contains("redsoc"));
}

#[test]
fn highlight_picks_first_match_and_ignores_query() {
    let hrefs = ["clinicas.html", "ratings.html", "clinicas.html"];
    assert_eq!(
        current_link(&hrefs, "http://localhost/panel/clinicas.html?id=2"),
        Some(0)
    );
    assert_eq!(current_link(&hrefs, "http://localhost/panel/index.html"), None);
    assert_eq!(
        current_link(&["http://localhost/ratings.html"], "http://localhost/ratings.html"),
        Some(0)
    );
}

#[test]
fn hover_marks_row_only_from_delete_trigger() {
    let mut hover = RowHover::default();
    hover.pointer_over(HoverTarget {
        classes: &["btn"],
        row: Some(0),
    });
    assert_eq!(hover.row_class(0), None);

    let trigger = HoverTarget {
        classes: &["btn", DELETE_TRIGGER_CLASS],
        row: Some(2),
    };
    hover.pointer_over(trigger);
    assert_eq!(hover.row_class(2), Some(MARKED_ROW_CLASS));
    hover.pointer_out(trigger);
    assert_eq!(hover.row_class(2), None);

    hover.pointer_over(HoverTarget {
        classes: &[DELETE_TRIGGER_CLASS],
        row: None,
    });
    assert_eq!(hover.row_class(0), None);
}

#[test]
fn escape_html_neutralizes_markup() {
    assert_eq!(
        escape_html("<a href=\"x\">O'Higgins & Cía</a>"),
        "&lt;a href=&quot;x&quot;&gt;O&#39;Higgins &amp; Cía&lt;/a&gt;"
    );
}

#[test]
fn text_list_shows_rows_and_count() {
    let state = ready_state(
        vec![sample_clinic(1, "Hospital Italiano"), sample_clinic(2, "Sanatorio Güemes")],
        Clinic::default(),
    );
    let text = String::from_utf8(output::render_text(&state, View::List)).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Clinicas"));
    assert_eq!(lines.next(), Some("========"));
    assert!(text.contains("Hospital Italiano"));
    assert!(text.contains("4.5"));
    assert!(text.ends_with("(2 registros)\n"));
}

#[test]
fn text_view_prefers_error_banner_over_loading() {
    let mut state = ready_state(Vec::<Clinic>::new(), Clinic::default());
    state.loading = true;
    let text = String::from_utf8(output::render_text(&state, View::List)).unwrap();
    assert!(text.contains(LOADING_TEXT));

    state.error = true;
    let text = String::from_utf8(output::render_text(&state, View::List)).unwrap();
    assert!(text.contains(ERROR_BANNER));
    assert!(!text.contains(LOADING_TEXT));
}

#[test]
fn text_form_uses_dotted_paths() {
    let state = ready_state(Vec::new(), sample_clinic(7, "Hospital Alemán"));
    let text = String::from_utf8(output::render_text(&state, View::Form)).unwrap();
    assert!(text.contains("avg_ratings.promedio_inst"));
    assert!(text.contains("Hospital Alemán"));
}

#[test]
fn json_form_round_trips_the_record() {
    let product = Product {
        id: Some(4),
        name: "Gasa".to_string(),
        stock: 10,
        price: 2.5,
        ..Product::default()
    };
    let state = ready_state(Vec::new(), product.clone());
    let parsed: Product = serde_json::from_slice(&output::render_json(&state, View::Form)).unwrap();
    assert_eq!(parsed, product);
}

#[test]
fn html_page_has_mounts_hover_and_readonly_fields() {
    let chrome = Chrome::default();
    let mut hover = RowHover::default();
    hover.pointer_over(HoverTarget {
        classes: &[DELETE_TRIGGER_CLASS],
        row: Some(1),
    });
    let ctx = PageContext {
        chrome: &chrome,
        location: Some("http://localhost/clinicas.html"),
        hover: &hover,
    };

    let state = ready_state(
        vec![sample_clinic(1, "A"), sample_clinic(2, "</script>")],
        sample_clinic(9, "B"),
    );
    let page = String::from_utf8(render_html(&state, View::List, &ctx)).unwrap();
    assert!(page.contains("id=\"header-index\""));
    assert!(page.contains("id=\"footer-index\""));
    assert!(page.contains(&format!("<tr class=\"{MARKED_ROW_CLASS}\">")));
    assert_eq!(page.matches("<tr class=").count(), 1);
    assert!(page.contains("data-id=\"2\""));
    assert!(!page.contains("\"</script>\""));

    let page = String::from_utf8(render_html(&state, View::Form, &ctx)).unwrap();
    assert!(page.contains("name=\"avg_ratings.promedio_inst\" value=\"4.5\" readonly"));
    assert!(page.contains("name=\"id\" value=\"9\" readonly"));
    assert!(page.contains("name=\"nombre\" value=\"B\"/>"));
}

#[test]
fn output_format_parsing() {
    assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
    assert_eq!(OutputFormat::parse("yaml"), None);
    assert_eq!(
        output::infer_format_from_path("out/clinicas.HTML"),
        Some(OutputFormat::Html)
    );
    assert_eq!(output::infer_format_from_path("clinicas"), None);
}
