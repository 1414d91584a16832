pub mod page;

use serde::Serialize;

use crate::record::Organization;
use crate::view::ViewModel;

pub use page::{render_page, PageOptions};

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

pub fn render(view: &ViewModel, format: OutputFormat, page: &PageOptions) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(view),
        OutputFormat::Json => render_json(view),
        OutputFormat::Html => render_html(view, page),
    }
}

/// One organization title per line, in display order.
pub fn render_text(view: &ViewModel) -> Vec<u8> {
    let mut out = String::new();
    for org in view.visible_records() {
        out.push_str(&org.title());
        out.push('\n');
    }
    out.into_bytes()
}

#[derive(Serialize)]
struct Export<'a> {
    total: usize,
    visible: usize,
    filters: &'a crate::filter::FilterState,
    records: Vec<&'a Organization>,
}

pub fn render_json(view: &ViewModel) -> Vec<u8> {
    let export = Export {
        total: view.directory().len(),
        visible: view.visible().len(),
        filters: view.applied_filters(),
        records: view.visible_records().collect(),
    };
    let mut out = serde_json::to_vec_pretty(&export).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn render_html(view: &ViewModel, page: &PageOptions) -> Vec<u8> {
    render_page(&view.frame(), page).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::loader::Directory;

    fn view(filters: FilterState) -> ViewModel {
        let directory = Directory::from_json(
            r#"[
                {"Name":"Wind Works","Abbreviation":"WW","Focus":["Energy"]},
                {"Name":"Archive Trust"},
                {"Name":"Quiet Group","Flagged for Review":true}
            ]"#,
        )
        .unwrap();
        ViewModel::with_filters(directory, filters)
    }

    #[test]
    fn parses_formats_and_extensions() {
        assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("htm"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/list.TXT"), Some(OutputFormat::Text));
        assert_eq!(infer_format_from_path("index.html"), Some(OutputFormat::Html));
        assert_eq!(infer_format_from_path("dump"), None);
    }

    #[test]
    fn text_lists_visible_titles() {
        let out = String::from_utf8(render_text(&view(FilterState::default()))).unwrap();
        assert_eq!(out, "Archive Trust\nWind Works (WW)\n");
    }

    #[test]
    fn json_carries_filters_and_records() {
        let filters = FilterState {
            focus: "Energy".to_string(),
            ..FilterState::default()
        };
        let out = render_json(&view(filters));
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["visible"], 1);
        assert_eq!(value["filters"]["focus"], "Energy");
        assert_eq!(value["records"][0]["Name"], "Wind Works");
    }

    #[test]
    fn html_is_a_full_page() {
        let out = render(
            &view(FilterState::default()),
            OutputFormat::Html,
            &PageOptions::default(),
        );
        let html = String::from_utf8(out).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Showing 2 of 3 organizations"));
    }
}
