//! Light/dark theme preference
//!
//! Pure decision logic; the DOM side lives in `web::theme`.

use crate::constants::THEME_ATTRIBUTE;

/// Page color theme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Pick the initial theme
    ///
    /// A non-empty saved preference wins over the system preference. Any
    /// saved value other than `"dark"` means light.
    pub fn resolve(saved: Option<&str>, prefers_dark: bool) -> Self {
        match saved.filter(|s| !s.is_empty()) {
            Some("dark") => Theme::Dark,
            Some(_) => Theme::Light,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }

    /// Theme currently applied, from the root's `data-theme` attribute
    pub fn from_root_attribute(value: Option<&str>) -> Self {
        if value == Some("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Value persisted in storage
    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Root attribute to set, `None` meaning "remove it"
    pub fn root_attribute(self) -> Option<(&'static str, &'static str)> {
        match self {
            Theme::Dark => Some((THEME_ATTRIBUTE, "dark")),
            Theme::Light => None,
        }
    }

    /// Toggle button label: offers the way back to light
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Light",
            Theme::Light => "Theme",
        }
    }

    /// CSS `display` of the (sun, moon) icons
    pub fn icon_display(self) -> (&'static str, &'static str) {
        match self {
            Theme::Dark => ("inline", "none"),
            Theme::Light => ("none", "inline"),
        }
    }
}
