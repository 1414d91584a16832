//! HTML fragments for the directory page.
//!
//! Every renderer is a pure function of the directory and view state and
//! returns markup for one region of the page.

pub mod card;
pub mod detail;
pub mod stats;

/// Overview excerpt length on cards, in characters.
pub const OVERVIEW_EXCERPT_CHARS: usize = 200;

/// Focus tags shown on a card before the overflow counter.
pub const CARD_FOCUS_TAGS: usize = 3;

/// Element ids shared by the page shell and the browser binding.
pub mod ids {
    pub const SEARCH_INPUT: &str = "searchInput";
    pub const CLEAR_SEARCH: &str = "clearSearch";
    pub const DOMAIN_FILTER: &str = "domainFilter";
    pub const REGION_FILTER: &str = "regionFilter";
    pub const FOCUS_FILTER: &str = "focusFilter";
    pub const FLAGGED_TOGGLE: &str = "flaggedToggle";
    pub const RESET_FILTERS: &str = "resetFilters";
    pub const TOGGLE_FILTERS: &str = "toggleFilters";
    pub const FILTERS: &str = "filters";
    pub const CARDS: &str = "cardsContainer";
    pub const RESULT_COUNT: &str = "resultCount";
    pub const ACTIVE_FILTERS: &str = "activeFilters";
    pub const LOADING: &str = "loadingIndicator";
    pub const MODAL: &str = "detailsModal";
    pub const MODAL_TITLE: &str = "modalTitle";
    pub const MODAL_BODY: &str = "modalBody";
    pub const MODAL_FOOTER: &str = "modalFooter";
}

/// `data-action` values carried by clickable card and modal controls.
pub mod actions {
    pub const TOGGLE_OVERVIEW: &str = "toggle-overview";
    pub const SHOW_DETAILS: &str = "show-details";
    pub const CLOSE_DETAILS: &str = "close-details";
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Cuts `text` to `max_chars` characters and appends `...` when anything
/// was removed. Counts chars, so combining sequences may still be split.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn exceeds_chars(text: &str, max_chars: usize) -> bool {
    text.chars().nth(max_chars).is_some()
}
