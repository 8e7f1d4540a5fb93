//! Trigger descriptors and outcomes
//!
//! A trigger is a form or clickable element opted into the busy overlay by a
//! marker attribute. Descriptors are built from the element at event time so
//! the coordinator never touches the DOM directly.

use quiz_hal::TriggerId;

/// A form opted into deferred submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormTrigger {
    /// Identity used for the one-time latch
    pub id: TriggerId,
    /// Value of the form marker attribute
    pub message: Option<String>,
}

impl FormTrigger {
    pub fn new(id: TriggerId, message: Option<String>) -> Self {
        Self { id, message }
    }

    /// Marker value, or `default` when the marker is empty
    pub fn resolve_message<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(self.message.as_deref()).unwrap_or(default)
    }
}

/// A clickable element opted into the busy overlay
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickTrigger {
    /// Value of the click marker attribute
    pub message: Option<String>,
    /// Raw `href` attribute, if the element has one
    pub href: Option<String>,
}

impl ClickTrigger {
    pub fn new(message: Option<String>, href: Option<String>) -> Self {
        Self { message, href }
    }

    /// Marker value, or `default` when the marker is empty
    pub fn resolve_message<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(self.message.as_deref()).unwrap_or(default)
    }

    /// Navigation target; an empty attribute counts as no target
    pub fn href(&self) -> Option<&str> {
        non_empty(self.href.as_deref())
    }
}

/// What the submit listener must do with the native submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Cancel it: a native submission is scheduled after the next paint
    Deferred,
    /// Cancel it: the form's one native submission is already scheduled or sent
    Suppressed,
    /// Let it proceed (the coordinator's own re-issued submission)
    PassThrough,
}

impl SubmitOutcome {
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, SubmitOutcome::Deferred)
    }

    /// Whether the listener must call `preventDefault`
    #[inline]
    pub fn cancels_native(&self) -> bool {
        !matches!(self, SubmitOutcome::PassThrough)
    }
}

/// What the click listener must do with the default action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Cancel it: navigation is scheduled after the next paint
    Deferred,
    /// Let the click proceed (no `href`)
    PassThrough,
}

impl ClickOutcome {
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, ClickOutcome::Deferred)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
