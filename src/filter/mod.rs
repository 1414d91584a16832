use serde::{Deserialize, Serialize};

use crate::loader::Directory;
use crate::record::{fields, Organization};
use crate::render::ids;

/// One clause of the filter state; each clause can be cleared on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Search,
    Domain,
    Region,
    Focus,
    Flagged,
}

impl FilterKind {
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Search,
        FilterKind::Domain,
        FilterKind::Region,
        FilterKind::Focus,
        FilterKind::Flagged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Domain => "domain",
            Self::Region => "region",
            Self::Focus => "focus",
            Self::Flagged => "flagged",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "search" => Some(Self::Search),
            "domain" | "scope" => Some(Self::Domain),
            "region" => Some(Self::Region),
            "focus" => Some(Self::Focus),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }
}

/// The three categorical selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectControl {
    Domain,
    Region,
    Focus,
}

impl SelectControl {
    pub const ALL: [SelectControl; 3] = [Self::Domain, Self::Region, Self::Focus];

    pub fn kind(self) -> FilterKind {
        match self {
            Self::Domain => FilterKind::Domain,
            Self::Region => FilterKind::Region,
            Self::Focus => FilterKind::Focus,
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Self::Domain => ids::DOMAIN_FILTER,
            Self::Region => ids::REGION_FILTER,
            Self::Focus => ids::FOCUS_FILTER,
        }
    }

    /// Label of the empty "any value" option.
    pub fn any_label(self) -> &'static str {
        match self {
            Self::Domain => "All domains",
            Self::Region => "All regions",
            Self::Focus => "All focus areas",
        }
    }
}

/// Everything the user can filter by. Empty strings mean "any".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterState {
    pub search: String,
    pub domain: String,
    pub region: String,
    pub focus: String,
    pub show_flagged: bool,
}

impl FilterState {
    pub fn selection(&self, control: SelectControl) -> &str {
        match control {
            SelectControl::Domain => &self.domain,
            SelectControl::Region => &self.region,
            SelectControl::Focus => &self.focus,
        }
    }

    pub fn set_selection(&mut self, control: SelectControl, value: String) {
        match control {
            SelectControl::Domain => self.domain = value,
            SelectControl::Region => self.region = value,
            SelectControl::Focus => self.focus = value,
        }
    }

    pub fn is_active(&self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Search => !self.search.is_empty(),
            FilterKind::Domain => !self.domain.is_empty(),
            FilterKind::Region => !self.region.is_empty(),
            FilterKind::Focus => !self.focus.is_empty(),
            FilterKind::Flagged => self.show_flagged,
        }
    }

    pub fn active_kinds(&self) -> Vec<FilterKind> {
        FilterKind::ALL
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active_kinds().len()
    }

    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Search => self.search.clear(),
            FilterKind::Domain => self.domain.clear(),
            FilterKind::Region => self.region.clear(),
            FilterKind::Focus => self.focus.clear(),
            FilterKind::Flagged => self.show_flagged = false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, org: &Organization) -> bool {
        RecordFilter::new(self).matches(org)
    }

    /// Indices of the records passing every clause, in directory order.
    /// Always evaluated against the full directory.
    pub fn apply(&self, directory: &Directory) -> Vec<usize> {
        let filter = RecordFilter::new(self);
        directory
            .iter()
            .filter(|(_, org)| filter.matches(org))
            .map(|(index, _)| index)
            .collect()
    }
}

/// A `FilterState` prepared for matching many records.
#[derive(Clone, Debug)]
pub struct RecordFilter<'a> {
    search: String,
    domain: &'a str,
    region: &'a str,
    focus: &'a str,
    show_flagged: bool,
}

impl<'a> RecordFilter<'a> {
    pub fn new(state: &'a FilterState) -> Self {
        Self {
            search: state.search.to_lowercase(),
            domain: &state.domain,
            region: &state.region,
            focus: &state.focus,
            show_flagged: state.show_flagged,
        }
    }

    pub fn matches(&self, org: &Organization) -> bool {
        self.matches_search(org)
            && self.matches_domain(org)
            && self.matches_region(org)
            && self.matches_focus(org)
            && self.matches_flagged(org)
    }

    fn matches_search(&self, org: &Organization) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [fields::NAME, fields::OVERVIEW, fields::KEY_ACTIVITIES]
            .into_iter()
            .filter_map(|key| org.text(key))
            .any(|text| text.to_lowercase().contains(&self.search))
    }

    fn matches_domain(&self, org: &Organization) -> bool {
        self.domain.is_empty() || org.operational_domain() == Some(self.domain)
    }

    fn matches_region(&self, org: &Organization) -> bool {
        self.region.is_empty() || org.regions().contains(&self.region)
    }

    fn matches_focus(&self, org: &Organization) -> bool {
        self.focus.is_empty() || org.focus().contains(&self.focus)
    }

    fn matches_flagged(&self, org: &Organization) -> bool {
        self.show_flagged || !org.is_flagged()
    }
}
