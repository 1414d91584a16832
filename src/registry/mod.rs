use std::collections::BTreeSet;

use crate::filter::SelectControl;
use crate::loader::Directory;
use crate::render::html_escape;

/// Distinct values offered by the three selectors, derived from the full
/// dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterRegistry {
    domains: Vec<String>,
    regions: Vec<String>,
    focuses: Vec<String>,
}

impl FilterRegistry {
    pub fn from_directory(directory: &Directory) -> Self {
        let mut domains = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut focuses = BTreeSet::new();

        for (_, org) in directory.iter() {
            if let Some(domain) = org.operational_domain() {
                domains.insert(domain.to_string());
            }
            regions.extend(
                org.regions()
                    .into_iter()
                    .filter(|r| !r.is_empty())
                    .map(str::to_string),
            );
            focuses.extend(
                org.focus()
                    .into_iter()
                    .filter(|f| !f.is_empty())
                    .map(str::to_string),
            );
        }

        Self {
            domains: domains.into_iter().collect(),
            regions: regions.into_iter().collect(),
            focuses: focuses.into_iter().collect(),
        }
    }

    pub fn options(&self, control: SelectControl) -> &[String] {
        match control {
            SelectControl::Domain => &self.domains,
            SelectControl::Region => &self.regions,
            SelectControl::Focus => &self.focuses,
        }
    }

    /// `<option>` list for a selector, led by the empty "all" sentinel.
    pub fn render_options(&self, control: SelectControl, selected: &str) -> String {
        let mut out = format!(
            r#"<option value=""{}>{}</option>"#,
            selected_attr(selected.is_empty()),
            control.any_label()
        );
        for value in self.options(control) {
            out.push_str(&format!(
                r#"<option value="{escaped}"{}>{escaped}</option>"#,
                selected_attr(value == selected),
                escaped = html_escape(value)
            ));
        }
        out
    }
}

fn selected_attr(selected: bool) -> &'static str {
    if selected {
        " selected"
    } else {
        ""
    }
}
