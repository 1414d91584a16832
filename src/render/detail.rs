use itertools::Itertools;
use serde::Serialize;

use super::{actions, html_escape};
use crate::loader::Directory;
use crate::record::{fields, Organization};

/// Rendered contents of the detail overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub index: usize,
    /// Plain text; the binding sets it as text content.
    pub title: String,
    pub body: String,
    pub footer: String,
}

pub fn render_detail(directory: &Directory, index: usize) -> Option<DetailView> {
    let org = directory.get(index)?;
    Some(DetailView {
        index,
        title: org.title(),
        body: render_body(org),
        footer: render_footer(org),
    })
}

fn item(label: &str, value: &str) -> String {
    format!(
        r#"<div class="detail-item"><span class="detail-label">{label}</span><div class="detail-value">{value}</div></div>"#
    )
}

fn section(label: &str, value: &str) -> String {
    format!(
        r#"<div class="detail-section"><span class="detail-label">{label}</span><div class="detail-value">{value}</div></div>"#
    )
}

fn render_body(org: &Organization) -> String {
    let mut out = String::new();

    if org.is_flagged() {
        out.push_str(
            r#"<div class="detail-section"><span class="flagged-badge">&#9888;&#65039; Flagged for Review</span></div>"#,
        );
    }

    let mut grid = String::new();
    if let Some(domain) = org.display_domain() {
        grid.push_str(&item("Operational Domain", &html_escape(domain)));
    }
    if org.has_region() {
        let regions = if org.region_is_list() {
            org.regions().join(", ")
        } else {
            org.display(fields::REGION).unwrap_or_default()
        };
        grid.push_str(&item("Region", &html_escape(&regions)));
    }
    if let Some(country) = org.country() {
        grid.push_str(&item("Country", &html_escape(country)));
    }
    out.push_str(&format!(r#"<div class="detail-grid">{grid}</div>"#));

    if let Some(locations) = org.locations() {
        out.push_str(&section("Locations/Countries", &html_escape(&locations)));
    }

    let focus = org.focus();
    if !focus.is_empty() {
        let tags = focus
            .iter()
            .map(|f| format!(r#"<span class="detail-tag">{}</span>"#, html_escape(f)))
            .join("");
        out.push_str(&format!(
            r#"<div class="detail-section"><span class="detail-label">Focus Areas</span><div class="detail-tags">{tags}</div></div>"#
        ));
    }

    if let Some(overview) = org.overview() {
        out.push_str(r#"<div class="detail-divider"></div>"#);
        out.push_str(&section("Overview", &html_escape(overview)));
    }

    if let Some(activities) = org.key_activities() {
        out.push_str(&section("Key Activities", &html_escape(activities)));
    }

    if let Some(lines) = org.address_lines() {
        let address = lines.iter().map(|l| html_escape(l)).join("<br>");
        out.push_str(r#"<div class="detail-divider"></div>"#);
        out.push_str(&section("Address", &address));
    }

    if let Some((lat, lon)) = org.coordinates() {
        out.push_str(&section(
            "Coordinates",
            &format!(
                "Latitude: {}, Longitude: {}",
                html_escape(&lat),
                html_escape(&lon)
            ),
        ));
    }

    out
}

fn render_footer(org: &Organization) -> String {
    let website = org
        .website()
        .map(|url| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener" class="btn btn-primary">&#127760; Visit Website</a>"#,
                html_escape(url)
            )
        })
        .unwrap_or_default();
    format!(
        r#"{website}<button class="btn btn-secondary" type="button" data-action="{}">Close</button>"#,
        actions::CLOSE_DETAILS
    )
}
