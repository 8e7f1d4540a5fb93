//! Runtime configuration
//!
//! Every field has a default taken from [`crate::constants`], so a page only
//! needs to provide the values it changes. JSON keys are camelCase.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::LoaderError;

/// Complete configuration of the page runtime
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub loader: LoaderConfig,
    pub theme: ThemeConfig,
    pub decor: DecorConfig,
}

impl RuntimeConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, LoaderError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Markup contract of the busy-state coordinator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    pub overlay_id: String,
    pub message_selector: String,
    pub form_marker: String,
    pub click_marker: String,
    pub armed_marker: String,
    pub default_message: String,
}

impl LoaderConfig {
    /// Selector matching forms opted into deferred submission
    pub fn form_selector(&self) -> String {
        format!("form[{}]", self.form_marker)
    }

    /// Selector matching clickable elements opted into the overlay
    pub fn click_selector(&self) -> String {
        format!("[{}]", self.click_marker)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            overlay_id: constants::OVERLAY_ID.to_string(),
            message_selector: constants::MESSAGE_SELECTOR.to_string(),
            form_marker: constants::FORM_MARKER.to_string(),
            click_marker: constants::CLICK_MARKER.to_string(),
            armed_marker: constants::ARMED_MARKER.to_string(),
            default_message: constants::DEFAULT_MESSAGE.to_string(),
        }
    }
}

/// Theme persistence and toggle markup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeConfig {
    pub storage_key: String,
    pub toggle_id: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: constants::THEME_STORAGE_KEY.to_string(),
            toggle_id: constants::THEME_TOGGLE_ID.to_string(),
        }
    }
}

/// Timings and strings of the decorative behaviors
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecorConfig {
    pub flash_dismiss_delay_ms: i32,
    pub flash_fade_ms: i32,
    pub submit_pending_label: String,
    pub delete_prompt: String,
    pub explanation_title: String,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            flash_dismiss_delay_ms: constants::FLASH_DISMISS_DELAY_MS,
            flash_fade_ms: constants::FLASH_FADE_MS,
            submit_pending_label: constants::SUBMIT_PENDING_LABEL.to_string(),
            delete_prompt: constants::DELETE_PROMPT.to_string(),
            explanation_title: constants::EXPLANATION_TITLE.to_string(),
        }
    }
}
