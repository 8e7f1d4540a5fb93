//! Page runtime for the quiz web app
//!
//! This crate makes the app's server-rendered pages feel responsive:
//! - Busy overlay shown before slow navigations and form submissions
//! - Duplicate-submission guard for marked forms
//! - Theme persistence and toggling
//! - Small decorations (active nav, choice styling, flash dismissal, ...)
//!
//! ## Architecture
//!
//! - [`controller`]: The busy-state coordinator, generic over a `PageHost`
//! - [`schedule`]: Two-stage "after paint" deferral
//! - [`trigger`]: Trigger descriptors and listener outcomes
//! - [`theme`], [`decor`]: Pure logic of the independent page behaviors
//! - [`config`]: Runtime configuration with markup defaults
//! - `web` (feature `wasm`): Browser host, event bindings, JS exports
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use quiz_hal_mock::MockPage;
//! use quiz_loader::{BusyStateController, LoaderConfig};
//!
//! let page = Rc::new(MockPage::new());
//! let loader = BusyStateController::new(page.clone(), LoaderConfig::default());
//! loader.initialize();
//!
//! loader.show(Some("Generating questions…"));
//! assert!(loader.is_visible());
//! loader.hide();
//! assert!(!loader.is_visible());
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All coordination logic is testable without a browser
//! 2. **Injected Host**: DOM access and scheduling go through `PageHost`
//! 3. **Degrade, never block**: Missing markup turns operations into no-ops

pub mod config;
pub mod constants;
pub mod controller;
pub mod decor;
pub mod error;
pub mod schedule;
pub mod theme;
pub mod trigger;

pub use config::{DecorConfig, LoaderConfig, RuntimeConfig, ThemeConfig};
pub use controller::{BusyState, BusyStateController};
pub use error::LoaderError;
pub use theme::Theme;
pub use trigger::{ClickOutcome, ClickTrigger, FormTrigger, SubmitOutcome};

pub use quiz_hal::{HostError, PageHost, TriggerId};

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod web;
#[cfg(feature = "wasm")]
pub use web::*;
