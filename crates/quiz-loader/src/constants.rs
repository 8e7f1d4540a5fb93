//! Centralized constants for the page runtime
//!
//! Marker attribute names, selectors, and user-facing strings used as
//! defaults by [`crate::config`]. Pages with different markup override them
//! through `window.QuizPageConfig`.

// =============================================================================
// Busy-state overlay
// =============================================================================

/// Id of the single overlay element
pub const OVERLAY_ID: &str = "global-loader";

/// Selector of the overlay child holding the status text
pub const MESSAGE_SELECTOR: &str = ".loader-message";

/// Marker attribute opting a `<form>` into deferred submission.
/// Its value, when non-empty, is the overlay message.
pub const FORM_MARKER: &str = "data-global-loader";

/// Marker attribute opting a clickable element into the overlay.
/// Its value, when non-empty, is the overlay message.
pub const CLICK_MARKER: &str = "data-show-loader";

/// Attribute mirroring a form's latch onto its markup
pub const ARMED_MARKER: &str = "data-loader-armed";

/// Message used by triggers that carry no message of their own
pub const DEFAULT_MESSAGE: &str = "Working on it…";

/// Global name under which the JS API is exposed
pub const LOADER_GLOBAL: &str = "Loader";

/// Global holding an optional JSON-compatible runtime config object
pub const CONFIG_GLOBAL: &str = "QuizPageConfig";

// =============================================================================
// Theme
// =============================================================================

/// localStorage key of the persisted theme preference
pub const THEME_STORAGE_KEY: &str = "theme";

/// Id of the theme toggle button
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Attribute set on the root element when the dark theme is active
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Media query for the system dark-mode preference
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

// =============================================================================
// Decorations
// =============================================================================

/// Delay before flash messages start fading out
pub const FLASH_DISMISS_DELAY_MS: i32 = 5000;

/// Fade-out duration of a flash message before it is removed
pub const FLASH_FADE_MS: i32 = 500;

/// Submit button label while a plain form is submitting
pub const SUBMIT_PENDING_LABEL: &str = "Please wait...";

/// Prompt shown before a delete action proceeds
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this item?";

/// Hint attached to question explanations
pub const EXPLANATION_TITLE: &str = "Click to see explanation";

/// Number of cards that get a staggered fade-in delay
pub const STAGGERED_CARDS: usize = 3;
