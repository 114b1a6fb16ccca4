pub mod page;

use serde_json::Value;

use crate::controller::ViewState;
use crate::model::Entity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Which part of the state a view shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    List,
    Form,
}

pub const ERROR_BANNER: &str = "Lo sentimos... No se pudieron cargar los datos.";
pub const LOADING_TEXT: &str = "Cargando...";

pub fn render_text<E: Entity>(state: &ViewState<E>, view: View) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(&state.title);
    out.push('\n');
    out.push_str(&"=".repeat(state.title.chars().count()));
    out.push('\n');

    if state.error {
        out.push_str(ERROR_BANNER);
        out.push('\n');
        return out.into_bytes();
    }
    if state.loading {
        out.push_str(LOADING_TEXT);
        out.push('\n');
        return out.into_bytes();
    }

    match view {
        View::List => {
            let rows: Vec<Vec<String>> = state.items.iter().map(|e| e.cells()).collect();
            out.push_str(&render_table(E::columns(), &rows));
            out.push_str(&format!("({} registros)\n", rows.len()));
        }
        View::Form => {
            for (key, value) in form_fields(&state.form) {
                out.push_str(&format!("{:<24} {}\n", key, value));
            }
        }
    }
    out.into_bytes()
}

pub fn render_json<E: Entity>(state: &ViewState<E>, view: View) -> Vec<u8> {
    let rendered = match view {
        View::List => serde_json::to_vec_pretty(&state.items),
        View::Form => serde_json::to_vec_pretty(&state.form),
    };
    let mut out = rendered.unwrap_or_else(|_| b"null".to_vec());
    out.push(b'\n');
    out
}

fn render_table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();

    let mut out = String::new();
    out.push_str(&table_line(&header, &widths));
    out.push_str(&table_line(&rule, &widths));
    for row in rows {
        out.push_str(&table_line(row, &widths));
    }
    out
}

fn table_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

/// Flattens the form into `(path, display value)` pairs; nested objects use
/// dotted paths, matching what form edits accept.
pub fn form_fields<E: Entity>(form: &E) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Ok(value) = serde_json::to_value(form) {
        flatten("", &value, &mut out);
    }
    out
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Null => out.push((prefix.to_string(), String::new())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
