use std::collections::BTreeSet;

use itertools::Itertools;

use super::{
    actions, exceeds_chars, html_escape, truncate_text, CARD_FOCUS_TAGS, OVERVIEW_EXCERPT_CHARS,
};
use crate::loader::Directory;
use crate::record::Organization;

pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Please check the console.";

/// Cards for the visible records, or the matching empty state.
pub fn render_cards(
    directory: &Directory,
    visible: &[usize],
    expanded: &BTreeSet<usize>,
    filters_active: bool,
) -> String {
    if visible.is_empty() {
        return render_empty_state(filters_active);
    }
    visible
        .iter()
        .filter_map(|&index| {
            directory
                .get(index)
                .map(|org| render_card(index, org, expanded.contains(&index)))
        })
        .join("")
}

pub fn render_empty_state(filters_active: bool) -> String {
    let message = if filters_active {
        "No organizations found matching your criteria.<br><br>Try adjusting your filters or search terms."
    } else {
        "No organizations available."
    };
    format!(r#"<div class="no-results">{message}</div>"#)
}

pub fn render_load_error() -> String {
    format!(r#"<div class="no-results">{}</div>"#, LOAD_ERROR_MESSAGE)
}

pub fn render_card(index: usize, org: &Organization, expanded: bool) -> String {
    format!(
        r#"<div class="card" data-index="{index}">
  <div class="card-header">
    <h3 class="card-title">{title}</h3>
    <div class="card-badges-section">{domain}{regions}</div>
  </div>
  <div class="card-body">{overview}</div>{focus}{flagged}
  <div class="card-footer">{website}<button class="btn btn-secondary" type="button" data-action="{show}" data-index="{index}">View Details</button></div>
</div>"#,
        title = html_escape(&org.title()),
        domain = render_domain_badge(org),
        regions = render_region_badges(org),
        overview = render_overview(index, org, expanded),
        focus = render_focus_tags(org),
        flagged = render_flag_notice(org),
        website = render_website_link(org),
        show = actions::SHOW_DETAILS,
    )
}

fn render_domain_badge(org: &Organization) -> String {
    let domain = org.display_domain().unwrap_or("General");
    format!(
        r#"<div class="badge-group"><div class="badge-label">Operational Domain</div><span class="card-domain">{}</span></div>"#,
        html_escape(domain)
    )
}

fn render_region_badges(org: &Organization) -> String {
    let country = org.country();
    if !org.has_region() && country.is_none() {
        return String::new();
    }
    let mut badges = org
        .regions()
        .into_iter()
        .filter(|r| !r.is_empty())
        .map(|r| format!(r#"<span class="card-region-badge">{}</span>"#, html_escape(r)))
        .join("");
    if let Some(country) = country {
        badges.push_str(&format!(
            r#"<span class="card-country-badge">{}</span>"#,
            html_escape(country)
        ));
    }
    format!(
        r#"<div class="badge-group"><div class="badge-label">Region / Country</div><div class="region-badges">{badges}</div></div>"#
    )
}

fn render_overview(index: usize, org: &Organization, expanded: bool) -> String {
    let Some(overview) = org.overview().filter(|o| !o.trim().is_empty()) else {
        return r#"<p class="card-overview card-overview-empty">No overview available</p>"#
            .to_string();
    };
    if !exceeds_chars(overview, OVERVIEW_EXCERPT_CHARS) {
        return format!(
            r#"<p class="card-overview" data-index="{index}">{}</p>"#,
            html_escape(overview)
        );
    }
    let (class, text, label) = if expanded {
        (" expanded", overview.to_string(), "Read less")
    } else {
        (
            "",
            truncate_text(overview, OVERVIEW_EXCERPT_CHARS),
            "Read more",
        )
    };
    format!(
        r#"<p class="card-overview{class}" data-index="{index}">{}</p><button class="btn-expand" type="button" data-action="{}" data-index="{index}">{label}</button>"#,
        html_escape(&text),
        actions::TOGGLE_OVERVIEW,
    )
}

fn render_focus_tags(org: &Organization) -> String {
    let focus = org.focus();
    if focus.is_empty() {
        return String::new();
    }
    let mut tags = focus
        .iter()
        .take(CARD_FOCUS_TAGS)
        .map(|f| format!(r#"<span class="focus-tag">{}</span>"#, html_escape(f)))
        .join("");
    if focus.len() > CARD_FOCUS_TAGS {
        tags.push_str(&format!(
            r#"<span class="focus-tag">+{} more</span>"#,
            focus.len() - CARD_FOCUS_TAGS
        ));
    }
    format!(
        r#"
  <div class="focus-section"><div class="focus-label">Organization Focus</div><div class="focus-tags">{tags}</div></div>"#
    )
}

fn render_flag_notice(org: &Organization) -> String {
    if !org.is_flagged() {
        return String::new();
    }
    let reason = org
        .flag_reason()
        .map(|r| format!(": {}", html_escape(r)))
        .unwrap_or_default();
    format!(
        r#"
  <div class="card-info-panel"><span class="info-icon">&#9888;&#65039;</span><span class="info-text">This record is flagged for review{reason}</span></div>"#
    )
}

fn render_website_link(org: &Organization) -> String {
    org.website()
        .map(|url| {
            format!(
                r#"<a href="{}" target="_blank" rel="noopener" class="btn btn-primary">Visit Website</a>"#,
                html_escape(url)
            )
        })
        .unwrap_or_default()
}
