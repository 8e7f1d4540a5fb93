//! Mock page host for testing the quiz page runtime
//!
//! This provides an in-memory implementation of the `PageHost` trait so the
//! busy-state coordinator can be tested without a browser. Rendering frames
//! and timer turns only advance when a test calls [`MockPage::run_frame`] or
//! [`MockPage::run_tasks`], which makes deferral ordering observable.
//!
//! Form submission follows the browser: every submission, user-initiated
//! ([`MockPage::dispatch_submit`]) or host-initiated (`submit_form`), fires the
//! page's submit listener first and only goes out natively when the listener
//! does not cancel it.

#![no_std]
extern crate alloc;

use alloc::collections::{BTreeSet, VecDeque};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use quiz_hal::{HostError, OverlaySnapshot, PageHost, Rejected, Task, TriggerId};

/// Listener for `submit` events; returns `true` to cancel the submission
pub type SubmitListener = Rc<dyn Fn(TriggerId) -> bool>;

/// Mock page for unit testing
///
/// Simulates the overlay node, the body busy marker, registered forms, and
/// the two scheduling queues (animation frames and zero-delay timers).
pub struct MockPage {
    /// Overlay node, `None` when the page has no overlay
    overlay: RefCell<Option<MockOverlay>>,
    /// `aria-busy` on the body
    document_busy: Cell<bool>,
    /// Number of DOM writes performed through the host
    mutations: Cell<usize>,
    /// Forms that can be natively submitted
    forms: RefCell<BTreeSet<TriggerId>>,
    /// Native submissions in the order they happened
    submissions: RefCell<Vec<TriggerId>>,
    /// Page-level `submit` listener
    submit_listener: RefCell<Option<SubmitListener>>,
    /// Forms whose latch was mirrored to markup
    armed_marks: RefCell<Vec<TriggerId>>,
    /// Navigations in the order they happened
    navigations: RefCell<Vec<String>>,
    /// Pending animation-frame callbacks
    frame_queue: RefCell<VecDeque<Task>>,
    /// Pending zero-delay timer callbacks
    task_queue: RefCell<VecDeque<Task>>,
    frames_available: Cell<bool>,
    timers_available: Cell<bool>,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
}

/// Simulated overlay node
struct MockOverlay {
    hidden: bool,
    aria_hidden: bool,
    /// Text of the `.loader-message` child, `None` without that child
    message: Option<String>,
}

impl MockPage {
    /// Create a page with a visible overlay and an empty message child
    ///
    /// The overlay starts visible to model stale markup left over from a
    /// previous navigation; initialization is expected to hide it.
    pub fn new() -> Self {
        Self::with_overlay(Some(MockOverlay {
            hidden: false,
            aria_hidden: false,
            message: Some(String::new()),
        }))
    }

    /// Create a page without any overlay node
    pub fn without_overlay() -> Self {
        Self::with_overlay(None)
    }

    /// Create a page whose overlay has no message child
    pub fn without_message_child() -> Self {
        Self::with_overlay(Some(MockOverlay {
            hidden: false,
            aria_hidden: false,
            message: None,
        }))
    }

    fn with_overlay(overlay: Option<MockOverlay>) -> Self {
        Self {
            overlay: RefCell::new(overlay),
            document_busy: Cell::new(false),
            mutations: Cell::new(0),
            forms: RefCell::new(BTreeSet::new()),
            submissions: RefCell::new(Vec::new()),
            submit_listener: RefCell::new(None),
            armed_marks: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            frame_queue: RefCell::new(VecDeque::new()),
            task_queue: RefCell::new(VecDeque::new()),
            frames_available: Cell::new(true),
            timers_available: Cell::new(true),
            debug_log: RefCell::new(Vec::new()),
        }
    }

    /// Register a form that can be natively submitted
    pub fn register_form(&self, trigger: TriggerId) {
        self.forms.borrow_mut().insert(trigger);
    }

    /// Install the `submit` listener, replacing any previous one
    pub fn on_submit<F>(&self, listener: F)
    where
        F: Fn(TriggerId) -> bool + 'static,
    {
        *self.submit_listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Fire a `submit` event as a user submission does
    ///
    /// Returns `true` when the listener let it through and the form was
    /// natively submitted.
    pub fn dispatch_submit(&self, trigger: TriggerId) -> bool {
        let listener = self.submit_listener.borrow().clone();
        if listener.is_some_and(|listener| listener(trigger)) {
            return false;
        }
        self.submissions.borrow_mut().push(trigger);
        self.debug_log
            .borrow_mut()
            .push(alloc::format!("[mock-page] Submitted {}", trigger));
        true
    }

    /// Make `request_animation_frame` reject (e.g. hidden tab without rAF)
    pub fn disable_frames(&self) {
        self.frames_available.set(false);
    }

    /// Make `enqueue_task` reject
    pub fn disable_timers(&self) {
        self.timers_available.set(false);
    }

    // === Scheduling control ===

    /// Run every frame callback queued before this call
    ///
    /// Callbacks queued while running wait for the next frame.
    pub fn run_frame(&self) -> usize {
        let batch: VecDeque<Task> = core::mem::take(&mut *self.frame_queue.borrow_mut());
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }

    /// Run every timer callback queued before this call
    pub fn run_tasks(&self) -> usize {
        let batch: VecDeque<Task> = core::mem::take(&mut *self.task_queue.borrow_mut());
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }

    /// Alternate frames and timer turns until both queues are empty
    pub fn flush(&self) {
        while self.pending_frames() > 0 || self.pending_tasks() > 0 {
            self.run_frame();
            self.run_tasks();
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_queue.borrow().len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.task_queue.borrow().len()
    }

    // === Inspection ===

    /// Native submissions so far
    pub fn submissions(&self) -> Vec<TriggerId> {
        self.submissions.borrow().clone()
    }

    /// Number of native submissions of one form
    pub fn submission_count(&self, trigger: TriggerId) -> usize {
        self.submissions
            .borrow()
            .iter()
            .filter(|t| **t == trigger)
            .count()
    }

    /// Navigations so far
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    /// Forms whose latch was mirrored to markup
    pub fn armed_marks(&self) -> Vec<TriggerId> {
        self.armed_marks.borrow().clone()
    }

    /// Number of DOM writes performed through the host
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log
            .borrow()
            .iter()
            .any(|msg| msg.contains(substr))
    }

    fn touch(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageHost for MockPage {
    fn overlay(&self) -> Option<OverlaySnapshot> {
        self.overlay.borrow().as_ref().map(|o| OverlaySnapshot {
            visible: !o.hidden,
            aria_hidden: o.aria_hidden,
            message: o.message.clone(),
            document_busy: self.document_busy.get(),
        })
    }

    fn set_overlay_visible(&self, visible: bool) -> Result<(), HostError> {
        let mut overlay = self.overlay.borrow_mut();
        let node = overlay.as_mut().ok_or(HostError::OverlayMissing)?;
        node.hidden = !visible;
        node.aria_hidden = !visible;
        self.touch();
        Ok(())
    }

    fn set_overlay_message(&self, message: &str) -> Result<(), HostError> {
        let mut overlay = self.overlay.borrow_mut();
        let node = overlay.as_mut().ok_or(HostError::OverlayMissing)?;
        if let Some(text) = node.message.as_mut() {
            *text = String::from(message);
            self.touch();
        }
        Ok(())
    }

    fn set_document_busy(&self, busy: bool) -> Result<(), HostError> {
        if self.overlay.borrow().is_none() {
            return Err(HostError::OverlayMissing);
        }
        self.document_busy.set(busy);
        self.touch();
        Ok(())
    }

    fn submit_form(&self, trigger: TriggerId) -> Result<(), HostError> {
        if !self.forms.borrow().contains(&trigger) {
            return Err(HostError::UnknownTrigger(trigger));
        }
        // requestSubmit(): the event fires, a cancelled one submits nothing
        self.dispatch_submit(trigger);
        Ok(())
    }

    fn navigate(&self, href: &str) -> Result<(), HostError> {
        self.navigations.borrow_mut().push(String::from(href));
        self.debug_log
            .borrow_mut()
            .push(alloc::format!("[mock-page] Navigated to {}", href));
        Ok(())
    }

    fn mark_armed(&self, trigger: TriggerId) {
        if self.overlay.borrow().is_none() {
            return;
        }
        self.armed_marks.borrow_mut().push(trigger);
        self.touch();
    }

    fn request_animation_frame(&self, task: Task) -> Result<(), Rejected> {
        if !self.frames_available.get() {
            return Err(Rejected::new(HostError::SchedulingUnavailable, task));
        }
        self.frame_queue.borrow_mut().push_back(task);
        Ok(())
    }

    fn enqueue_task(&self, task: Task) -> Result<(), Rejected> {
        if !self.timers_available.get() {
            return Err(Rejected::new(HostError::SchedulingUnavailable, task));
        }
        self.task_queue.borrow_mut().push_back(task);
        Ok(())
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(String::from(msg));
    }
}
