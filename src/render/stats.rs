use itertools::Itertools;

use super::html_escape;
use crate::filter::{FilterKind, FilterState};

pub fn stats_text(visible: usize, total: usize) -> String {
    if visible == total {
        format!("Showing all {total} organizations")
    } else {
        format!("Showing {visible} of {total} organizations")
    }
}

/// One removable badge per active clause of `filters`.
pub fn render_badges(filters: &FilterState) -> String {
    filters
        .active_kinds()
        .into_iter()
        .map(|kind| {
            let (label, value) = match kind {
                FilterKind::Search => ("Search", filters.search.as_str()),
                FilterKind::Domain => ("Domain", filters.domain.as_str()),
                FilterKind::Region => ("Region", filters.region.as_str()),
                FilterKind::Focus => ("Focus", filters.focus.as_str()),
                FilterKind::Flagged => ("Show", "Flagged Records"),
            };
            render_badge(label, value, kind)
        })
        .join("")
}

fn render_badge(label: &str, value: &str, kind: FilterKind) -> String {
    format!(
        r#"<div class="filter-badge"><span class="filter-badge-label">{label}:</span><span class="filter-badge-value">{}</span><button class="filter-badge-remove" type="button" data-filter="{}" aria-label="Remove filter">&times;</button></div>"#,
        html_escape(value),
        kind.as_str()
    )
}
