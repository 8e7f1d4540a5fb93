//! Decorative page behaviors
//!
//! Decision helpers for the one-shot DOM bindings in `web::decor`. None of
//! them share state with the busy-state coordinator.

use crate::config::DecorConfig;
use crate::constants::STAGGERED_CARDS;

/// Selector of cards that fade in on load
pub const CARD_SELECTOR: &str = ".quiz-card, .category-card, .stat-card";

/// Inline style of a choice label
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelStyle {
    pub background: &'static str,
    pub border_color: &'static str,
}

impl LabelStyle {
    /// Every label of a choice list before the selection is re-applied
    pub const RESET: LabelStyle = LabelStyle {
        background: "",
        border_color: "var(--border)",
    };

    /// Label of the checked choice
    pub const SELECTED: LabelStyle = LabelStyle {
        background: "var(--bg)",
        border_color: "var(--primary)",
    };
}

/// Classes for the card at `index` in document order
pub fn fade_in_classes(index: usize) -> Vec<String> {
    let mut classes = vec!["fade-in".to_string()];
    if index < STAGGERED_CARDS {
        classes.push(format!("fade-in-delay-{}", index + 1));
    }
    classes
}

/// Whether a nav link points at the current page
pub fn is_active_link(href: Option<&str>, current_path: &str) -> bool {
    href == Some(current_path)
}

/// New label of a form's submit button, if it should change
///
/// Forms driven by the busy overlay keep their label.
pub fn submit_button_label(has_loader_marker: bool, config: &DecorConfig) -> Option<&str> {
    if has_loader_marker {
        None
    } else {
        Some(config.submit_pending_label.as_str())
    }
}

/// Selector of an in-page anchor's target
///
/// A bare `#` has no target.
pub fn anchor_target(href: &str) -> Option<&str> {
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}
