//! Application state and its input/output ports.
//!
//! `ViewModel` holds everything the page script used to keep in globals and
//! DOM nodes. Drivers feed it `UiEvent`s, schedule the returned `Effect`, and
//! paint the `Frame` it renders. It never touches timers itself.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

use crate::filter::{FilterKind, FilterState, SelectControl};
use crate::loader::Directory;
use crate::record::Organization;
use crate::registry::FilterRegistry;
use crate::render::card::{render_cards, render_load_error};
use crate::render::detail::{render_detail, DetailView};
use crate::render::stats::{render_badges, stats_text};
use crate::render::{exceeds_chars, OVERVIEW_EXCERPT_CHARS};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const SETTLE_DELAY: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period after the last keystroke before a search recomputes.
    pub search_debounce: Duration,
    /// Time the loading indicator stays up before a recompute lands.
    pub settle_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_debounce: SEARCH_DEBOUNCE,
            settle_delay: SETTLE_DELAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    SearchInput(String),
    /// Escape pressed inside the search box.
    SearchEscape,
    ClearSearch,
    Select(SelectControl, String),
    ShowFlagged(bool),
    RemoveFilter(FilterKind),
    ResetFilters,
    ToggleFilterPanel,
    ToggleOverview(usize),
    ShowDetails(usize),
    CloseDetails,
    /// Click on the overlay outside the modal content.
    BackdropClicked,
    /// Escape pressed anywhere on the page.
    EscapePressed,
}

impl UiEvent {
    /// Clearing the search hands keyboard focus back to the search box.
    pub fn focuses_search(&self) -> bool {
        matches!(self, Self::SearchEscape | Self::ClearSearch)
    }
}

/// What the driver has to do after an event was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// Repaint.
    Render,
    /// Restart the search debounce timer, then repaint.
    DebounceSearch,
    /// Cancel any pending debounce, show the loading state and finish the
    /// recompute after the settle delay.
    Recompute,
}

/// Every rendered output of the view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub cards: String,
    pub stats: String,
    pub badges: String,
    pub domain_options: String,
    pub region_options: String,
    pub focus_options: String,
    pub search: String,
    pub show_flagged: bool,
    pub clear_search_visible: bool,
    pub loading: bool,
    pub filters_collapsed: bool,
    pub modal: Option<DetailView>,
    pub scroll_locked: bool,
}

impl Frame {
    /// Frame shown when the dataset could not be loaded.
    pub fn load_error() -> Self {
        Self {
            cards: render_load_error(),
            stats: String::new(),
            badges: String::new(),
            domain_options: String::new(),
            region_options: String::new(),
            focus_options: String::new(),
            search: String::new(),
            show_flagged: false,
            clear_search_visible: false,
            loading: false,
            filters_collapsed: false,
            modal: None,
            scroll_locked: false,
        }
    }

    pub fn options(&self, control: SelectControl) -> &str {
        match control {
            SelectControl::Domain => &self.domain_options,
            SelectControl::Region => &self.region_options,
            SelectControl::Focus => &self.focus_options,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewModel {
    directory: Directory,
    registry: FilterRegistry,
    /// Control values as the user last set them.
    filters: FilterState,
    /// Filter state that produced `visible`.
    applied: FilterState,
    visible: Vec<usize>,
    expanded: BTreeSet<usize>,
    detail: Option<usize>,
    loading: bool,
    filters_collapsed: bool,
}

impl ViewModel {
    pub fn new(directory: Directory) -> Self {
        Self::with_filters(directory, FilterState::default())
    }

    pub fn with_filters(directory: Directory, filters: FilterState) -> Self {
        let registry = FilterRegistry::from_directory(&directory);
        let visible = filters.apply(&directory);
        Self {
            directory,
            registry,
            applied: filters.clone(),
            filters,
            visible,
            expanded: BTreeSet::new(),
            detail: None,
            loading: false,
            filters_collapsed: false,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn applied_filters(&self) -> &FilterState {
        &self.applied
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &Organization> {
        self.visible.iter().filter_map(|&i| self.directory.get(i))
    }

    pub fn detail(&self) -> Option<usize> {
        self.detail
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn handle(&mut self, event: UiEvent) -> Effect {
        match event {
            UiEvent::SearchInput(text) => {
                self.filters.search = text;
                Effect::DebounceSearch
            }
            UiEvent::SearchEscape | UiEvent::ClearSearch => {
                self.filters.clear(FilterKind::Search);
                Effect::Recompute
            }
            UiEvent::Select(control, value) => {
                self.filters.set_selection(control, value);
                Effect::Recompute
            }
            UiEvent::ShowFlagged(on) => {
                self.filters.show_flagged = on;
                Effect::Recompute
            }
            UiEvent::RemoveFilter(kind) => {
                self.filters.clear(kind);
                Effect::Recompute
            }
            UiEvent::ResetFilters => {
                self.filters.reset();
                Effect::Recompute
            }
            UiEvent::ToggleFilterPanel => {
                self.filters_collapsed = !self.filters_collapsed;
                Effect::Render
            }
            UiEvent::ToggleOverview(index) => self.toggle_overview(index),
            UiEvent::ShowDetails(index) => {
                if index >= self.directory.len() {
                    return Effect::None;
                }
                self.detail = Some(index);
                Effect::Render
            }
            UiEvent::CloseDetails | UiEvent::BackdropClicked | UiEvent::EscapePressed => {
                match self.detail.take() {
                    Some(_) => Effect::Render,
                    None => Effect::None,
                }
            }
        }
    }

    fn toggle_overview(&mut self, index: usize) -> Effect {
        let togglable = self.visible.contains(&index)
            && self
                .directory
                .get(index)
                .and_then(Organization::overview)
                .is_some_and(|o| exceeds_chars(o, OVERVIEW_EXCERPT_CHARS));
        if !togglable {
            return Effect::None;
        }
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
        Effect::Render
    }

    pub fn begin_recompute(&mut self) {
        self.loading = true;
    }

    /// Re-filters the full directory with the current control values.
    /// Re-rendered cards start collapsed.
    pub fn finish_recompute(&mut self) {
        self.applied = self.filters.clone();
        self.visible = self.applied.apply(&self.directory);
        self.expanded.clear();
        self.loading = false;
        tracing::debug!(
            visible = self.visible.len(),
            total = self.directory.len(),
            active_filters = self.applied.active_count(),
            "recomputed visible set"
        );
    }

    /// Both halves of a recompute without the settle delay.
    pub fn recompute(&mut self) {
        self.begin_recompute();
        self.finish_recompute();
    }

    pub fn frame(&self) -> Frame {
        let modal = self
            .detail
            .and_then(|index| render_detail(&self.directory, index));
        Frame {
            cards: render_cards(
                &self.directory,
                &self.visible,
                &self.expanded,
                self.applied.active_count() > 0,
            ),
            stats: stats_text(self.visible.len(), self.directory.len()),
            badges: render_badges(&self.applied),
            domain_options: self
                .registry
                .render_options(SelectControl::Domain, &self.filters.domain),
            region_options: self
                .registry
                .render_options(SelectControl::Region, &self.filters.region),
            focus_options: self
                .registry
                .render_options(SelectControl::Focus, &self.filters.focus),
            search: self.filters.search.clone(),
            show_flagged: self.filters.show_flagged,
            clear_search_visible: !self.filters.search.is_empty(),
            loading: self.loading,
            filters_collapsed: self.filters_collapsed,
            scroll_locked: modal.is_some(),
            modal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewModel {
        let overview = "y".repeat(201);
        let raw = serde_json::json!([
            {"Name": "Gamma", "Operational Domain": "Policy", "Overview": overview},
            {"Name": "alpha", "Region": "US", "Flagged for Review": true},
            {"Name": "Beta", "Region": ["EU", "US"], "Focus": ["Energy"]}
        ])
        .to_string();
        ViewModel::new(Directory::from_json(&raw).unwrap())
    }

    #[test]
    fn search_input_waits_for_debounce() {
        let mut view = view();
        assert_eq!(
            view.handle(UiEvent::SearchInput("gam".to_string())),
            Effect::DebounceSearch
        );
        assert_eq!(view.visible(), &[1, 2]);
        assert!(view.frame().clear_search_visible);
        assert_eq!(view.frame().badges, "");

        view.recompute();
        assert_eq!(view.visible(), &[2]);
        assert!(view.frame().badges.contains("gam"));
    }

    #[test]
    fn clearing_search_refocuses_search_box() {
        assert!(UiEvent::ClearSearch.focuses_search());
        assert!(UiEvent::SearchEscape.focuses_search());
        assert!(!UiEvent::EscapePressed.focuses_search());
        assert!(!UiEvent::ResetFilters.focuses_search());

        let mut view = view();
        view.handle(UiEvent::SearchInput("gam".to_string()));
        assert_eq!(view.handle(UiEvent::ClearSearch), Effect::Recompute);
        assert!(!view.frame().clear_search_visible);
    }

    #[test]
    fn recompute_brackets_loading_state() {
        let mut view = view();
        assert_eq!(view.handle(UiEvent::ShowFlagged(true)), Effect::Recompute);
        view.begin_recompute();
        assert!(view.frame().loading);
        assert_eq!(view.visible().len(), 2);
        view.finish_recompute();
        assert!(!view.frame().loading);
        assert_eq!(view.visible(), &[0, 1, 2]);
    }

    #[test]
    fn overview_toggle_relabels_and_collapses_on_recompute() {
        let mut view = view();
        let gamma = 2;
        assert!(view.frame().cards.contains(">Read more</button>"));
        assert_eq!(view.handle(UiEvent::ToggleOverview(gamma)), Effect::Render);
        assert!(view.is_expanded(gamma));
        assert!(view.frame().cards.contains(">Read less</button>"));
        assert_eq!(view.handle(UiEvent::ToggleOverview(gamma)), Effect::Render);
        assert!(!view.is_expanded(gamma));

        view.handle(UiEvent::ToggleOverview(gamma));
        view.recompute();
        assert!(!view.is_expanded(gamma));
    }

    #[test]
    fn overview_toggle_ignores_hidden_and_short_cards() {
        let mut view = view();
        assert_eq!(view.handle(UiEvent::ToggleOverview(0)), Effect::None);
        assert_eq!(view.handle(UiEvent::ToggleOverview(1)), Effect::None);
        assert_eq!(view.handle(UiEvent::ToggleOverview(99)), Effect::None);
    }

    #[test]
    fn detail_modal_opens_and_closes() {
        let mut view = view();
        assert_eq!(view.handle(UiEvent::ShowDetails(9)), Effect::None);
        assert_eq!(view.handle(UiEvent::ShowDetails(0)), Effect::Render);
        let frame = view.frame();
        assert!(frame.scroll_locked);
        assert_eq!(frame.modal.as_ref().map(|m| m.title.as_str()), Some("alpha"));

        assert_eq!(view.handle(UiEvent::EscapePressed), Effect::Render);
        assert!(!view.frame().scroll_locked);
        assert_eq!(view.handle(UiEvent::BackdropClicked), Effect::None);

        view.handle(UiEvent::ShowDetails(2));
        assert_eq!(view.handle(UiEvent::CloseDetails), Effect::Render);
        assert!(view.frame().modal.is_none());
    }

    #[test]
    fn removing_a_badge_clears_only_that_filter() {
        let mut view = view();
        view.handle(UiEvent::Select(SelectControl::Region, "US".to_string()));
        view.handle(UiEvent::ShowFlagged(true));
        view.recompute();
        assert_eq!(view.visible(), &[0, 1]);

        assert_eq!(
            view.handle(UiEvent::RemoveFilter(FilterKind::Region)),
            Effect::Recompute
        );
        view.recompute();
        assert!(view.applied_filters().show_flagged);
        assert_eq!(view.applied_filters().region, "");
        assert_eq!(view.visible(), &[0, 1, 2]);
    }

    #[test]
    fn reset_restores_default_view() {
        let mut view = view();
        view.handle(UiEvent::SearchInput("zzz".to_string()));
        view.handle(UiEvent::Select(SelectControl::Domain, "Policy".to_string()));
        view.recompute();
        assert!(view.visible().is_empty());
        assert!(view.frame().cards.contains("matching your criteria"));

        view.handle(UiEvent::ResetFilters);
        view.recompute();
        assert_eq!(view.filters(), &FilterState::default());
        assert_eq!(view.visible(), &[1, 2]);
        assert_eq!(view.frame().stats, "Showing 2 of 3 organizations");
    }

    #[test]
    fn filter_panel_toggle_flips() {
        let mut view = view();
        view.handle(UiEvent::ToggleFilterPanel);
        assert!(view.frame().filters_collapsed);
        view.handle(UiEvent::ToggleFilterPanel);
        assert!(!view.frame().filters_collapsed);
    }
}
