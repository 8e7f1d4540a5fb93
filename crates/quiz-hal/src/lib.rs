//! Page Abstraction Layer for the quiz page runtime
//!
//! This crate defines the `PageHost` trait that lets the busy-state
//! coordinator run against different page backends by abstracting the few
//! DOM and scheduling operations it needs.
//!
//! # Host Implementations
//!
//! - **Browser**: `web_sys` document, `requestAnimationFrame` and `setTimeout(0)`
//!   (see `quiz-loader` with the `wasm` feature)
//! - **Mock**: in-memory page with explicit frame and task queues
//!   (see `quiz-hal-mock`)

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// A unit of deferred work handed to one of the host's scheduling primitives
pub type Task = Box<dyn FnOnce()>;

/// Page Abstraction Layer trait
///
/// Implementations own the single overlay node and the document-wide busy
/// marker. The overlay is the source of truth for the busy state; callers
/// read it back through [`PageHost::overlay`] instead of keeping a copy.
///
/// Every method except the scheduling pair must tolerate a missing overlay
/// by returning [`HostError::OverlayMissing`] without touching the document.
pub trait PageHost: 'static {
    // === Overlay ===

    /// Snapshot of the overlay, or `None` when the page has no overlay node
    fn overlay(&self) -> Option<OverlaySnapshot>;

    /// Toggle the overlay's visibility flag and its `aria-hidden` attribute
    ///
    /// # Returns
    /// * `Ok(())` - Flags written
    /// * `Err(HostError::OverlayMissing)` - No overlay node on the page
    fn set_overlay_visible(&self, visible: bool) -> Result<(), HostError>;

    /// Write the overlay's status text
    ///
    /// Overlays without a message child accept the call and ignore it.
    fn set_overlay_message(&self, message: &str) -> Result<(), HostError>;

    /// Set or clear the document-wide `aria-busy` marker
    fn set_document_busy(&self, busy: bool) -> Result<(), HostError>;

    // === Deferred actions ===

    /// Natively submit the form registered under `trigger`
    ///
    /// # Returns
    /// * `Ok(())` - Submission started
    /// * `Err(HostError::UnknownTrigger)` - No form registered under that id
    fn submit_form(&self, trigger: TriggerId) -> Result<(), HostError>;

    /// Navigate the page to `href`
    fn navigate(&self, href: &str) -> Result<(), HostError>;

    /// Reflect a set latch onto the trigger's markup
    ///
    /// Write-only mirror for styling hooks. The latch itself lives with the
    /// controller and is never read back from the page.
    fn mark_armed(&self, _trigger: TriggerId) {
        // Default: nothing to mirror
    }

    // === Scheduling ===

    /// Run `task` from the next rendering-frame callback
    ///
    /// On failure the task is handed back inside [`Rejected`] so the caller
    /// can still run it some other way.
    fn request_animation_frame(&self, task: Task) -> Result<(), Rejected>;

    /// Run `task` from a zero-delay timer (next task-queue turn)
    fn enqueue_task(&self, task: Task) -> Result<(), Rejected>;

    // === Debug ===

    /// Write a debug message to the host's console/log
    ///
    /// On WASM: Uses `console.log()`
    fn debug_write(&self, msg: &str);
}

/// Observable state of the overlay node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlaySnapshot {
    /// Overlay is shown (its `hidden` flag is clear)
    pub visible: bool,
    /// Value of the overlay's `aria-hidden` attribute
    pub aria_hidden: bool,
    /// Text of the message child, `None` when the overlay has no such child
    pub message: Option<String>,
    /// Document body carries `aria-busy="true"`
    pub document_busy: bool,
}

/// Stable identity of a trigger element for one page lifetime
///
/// Assigned at scan time in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub u32);

impl TriggerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger#{}", self.0)
    }
}

/// Host errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The page has no overlay node
    #[error("overlay element not found")]
    OverlayMissing,
    /// No element registered under the given trigger id
    #[error("unknown trigger: {0}")]
    UnknownTrigger(TriggerId),
    /// The scheduling primitive is not available on this host
    #[error("scheduling primitive unavailable")]
    SchedulingUnavailable,
    /// A DOM call threw
    #[error("DOM error: {0}")]
    Dom(String),
}

/// A scheduling request the host could not accept
///
/// Carries the task back to the caller together with the reason.
pub struct Rejected {
    pub error: HostError,
    pub task: Task,
}

impl Rejected {
    pub fn new(error: HostError, task: Task) -> Self {
        Self { error, task }
    }
}

impl fmt::Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
