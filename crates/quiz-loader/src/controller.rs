//! Busy-state coordinator
//!
//! One [`BusyStateController`] is built per page and shared (by cheap clone)
//! with every binding. It reconciles three kinds of triggers against the
//! single overlay:
//!
//! - explicit calls: [`show`](BusyStateController::show),
//!   [`hide`](BusyStateController::hide), [`wrap`](BusyStateController::wrap)
//! - marked forms: [`on_form_submit`](BusyStateController::on_form_submit)
//! - marked clickables: [`on_click`](BusyStateController::on_click)
//!
//! plus the history-cache restore hook. The overlay node owned by the host
//! is the only record of `visible`/`message`; the controller itself only
//! keeps the per-form latches.
//!
//! A latched form lets exactly one `submit` event through: the one fired by
//! the coordinator's own re-issued submission. Submits that arrive while the
//! re-issue is pending, or after it went out, are cancelled.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use quiz_hal::{HostError, PageHost, TriggerId};
use serde::Serialize;

use crate::config::LoaderConfig;
use crate::schedule;
use crate::trigger::{ClickOutcome, ClickTrigger, FormTrigger, SubmitOutcome};

/// Busy state as currently displayed by the overlay
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BusyState {
    pub visible: bool,
    pub message: String,
}

/// Page-wide busy-state coordinator
pub struct BusyStateController<H: PageHost> {
    inner: Rc<Inner<H>>,
}

struct Inner<H> {
    host: Rc<H>,
    config: LoaderConfig,
    /// Forms whose first submission was already intercepted
    latches: RefCell<BTreeMap<TriggerId, Latch>>,
}

/// Progress of a latched form towards its one native submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Latch {
    /// Re-issue scheduled after the next paint
    Pending,
    /// Re-issue in progress; its `submit` event must pass
    Reissuing,
    /// Re-issue failed; the next submit goes out natively
    Released,
    /// The native submission went out
    Spent,
}

impl<H: PageHost> Clone for BusyStateController<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: PageHost> BusyStateController<H> {
    /// Create a controller over `host`
    pub fn new(host: Rc<H>, config: LoaderConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                config,
                latches: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Page-ready entry point: clear any overlay left visible by stale markup
    pub fn initialize(&self) {
        self.hide();
        if self.inner.host.overlay().is_none() {
            self.inner
                .host
                .debug_write("[loader] No overlay element; busy state disabled");
        }
    }

    // =========================================================================
    // Explicit API
    // =========================================================================

    /// Show the overlay
    ///
    /// The text is only replaced when `message` is non-empty; otherwise the
    /// previously shown text stays. No-op without an overlay.
    pub fn show(&self, message: Option<&str>) {
        let host = &self.inner.host;
        if host.overlay().is_none() {
            return;
        }
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.report("set overlay message", host.set_overlay_message(message));
        }
        self.report("show overlay", host.set_overlay_visible(true));
        self.report("mark document busy", host.set_document_busy(true));
    }

    /// Hide the overlay and clear the document busy marker
    ///
    /// Idempotent. No-op without an overlay.
    pub fn hide(&self) {
        let host = &self.inner.host;
        if host.overlay().is_none() {
            return;
        }
        self.report("hide overlay", host.set_overlay_visible(false));
        self.report("clear document busy", host.set_document_busy(false));
    }

    /// Keep the overlay up for the duration of `operation`
    ///
    /// `show` runs before this returns, i.e. before the operation is first
    /// polled. `hide` runs exactly once when the operation settles, or when
    /// the returned future is dropped early. The operation's output, errors
    /// included, is passed through untouched.
    pub fn wrap<F>(&self, operation: F, message: Option<&str>) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        self.show(message);
        let guard = HideOnDrop {
            controller: self.clone(),
        };
        async move {
            let output = operation.await;
            drop(guard);
            output
        }
    }

    /// Current busy state, read back from the overlay
    pub fn state(&self) -> BusyState {
        self.inner
            .host
            .overlay()
            .map(|overlay| BusyState {
                visible: overlay.visible,
                message: overlay.message.unwrap_or_default(),
            })
            .unwrap_or_default()
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    // =========================================================================
    // Automatic bindings
    // =========================================================================

    /// Handle a `submit` event of a marked form
    ///
    /// The first submission of a form is deferred until after the next paint;
    /// the re-issued submission passes through and any other is suppressed.
    pub fn on_form_submit(&self, trigger: &FormTrigger) -> SubmitOutcome {
        let message = trigger.resolve_message(&self.inner.config.default_message);
        self.show(Some(message));

        let id = trigger.id;
        let latch = self.inner.latches.borrow().get(&id).copied();
        match latch {
            None => {}
            Some(Latch::Reissuing) => return SubmitOutcome::PassThrough,
            Some(Latch::Released) => {
                self.set_latch(id, Latch::Spent);
                return SubmitOutcome::PassThrough;
            }
            Some(Latch::Pending) | Some(Latch::Spent) => return SubmitOutcome::Suppressed,
        }

        self.set_latch(id, Latch::Pending);
        let host = self.inner.host.clone();
        host.mark_armed(id);

        let controller = self.clone();
        schedule::after_paint(&host, Box::new(move || controller.reissue(id)));
        SubmitOutcome::Deferred
    }

    /// Handle a `click` event of a marked element
    ///
    /// Links navigate after the next paint; elements without an `href` only
    /// show the overlay.
    pub fn on_click(&self, trigger: &ClickTrigger) -> ClickOutcome {
        let message = trigger.resolve_message(&self.inner.config.default_message);
        self.show(Some(message));

        let Some(href) = trigger.href() else {
            return ClickOutcome::PassThrough;
        };

        let host = self.inner.host.clone();
        let nav_host = host.clone();
        let href = href.to_string();
        schedule::after_paint(
            &host,
            Box::new(move || {
                if let Err(e) = nav_host.navigate(&href) {
                    nav_host.debug_write(&format!(
                        "[loader] Deferred navigation to {} failed: {}",
                        href, e
                    ));
                }
            }),
        );
        ClickOutcome::Deferred
    }

    /// Handle `pageshow`: a page restored from the history cache starts idle
    pub fn on_page_restore(&self) {
        self.hide();
    }

    /// Whether a form's first submission was already intercepted
    pub fn is_armed(&self, id: TriggerId) -> bool {
        self.inner.latches.borrow().contains_key(&id)
    }

    /// Submit a latched form; the host fires its `submit` event synchronously
    fn reissue(&self, id: TriggerId) {
        self.set_latch(id, Latch::Reissuing);
        let result = self.inner.host.submit_form(id);
        match result {
            Ok(()) => self.set_latch(id, Latch::Spent),
            Err(e) => {
                self.set_latch(id, Latch::Released);
                self.inner
                    .host
                    .debug_write(&format!("[loader] Deferred submit of {} failed: {}", id, e));
            }
        }
    }

    fn set_latch(&self, id: TriggerId, latch: Latch) {
        self.inner.latches.borrow_mut().insert(id, latch);
    }

    fn report(&self, what: &str, result: Result<(), HostError>) {
        if let Err(e) = result {
            self.inner
                .host
                .debug_write(&format!("[loader] Failed to {}: {}", what, e));
        }
    }
}

/// Hides the overlay when a wrapped operation is done with it
struct HideOnDrop<H: PageHost> {
    controller: BusyStateController<H>,
}

impl<H: PageHost> Drop for HideOnDrop<H> {
    fn drop(&mut self) {
        self.controller.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_hal_mock::MockPage;

    fn setup() -> (Rc<MockPage>, BusyStateController<MockPage>) {
        let page = Rc::new(MockPage::new());
        let controller = BusyStateController::new(page.clone(), LoaderConfig::default());
        controller.initialize();
        (page, controller)
    }

    #[test]
    fn test_initialize_hides_stale_overlay() {
        let page = Rc::new(MockPage::new());
        assert!(page.overlay().unwrap().visible);

        let controller = BusyStateController::new(page.clone(), LoaderConfig::default());
        controller.initialize();

        let overlay = page.overlay().unwrap();
        assert!(!overlay.visible);
        assert!(overlay.aria_hidden);
        assert!(!overlay.document_busy);
    }

    #[test]
    fn test_show_sets_visibility_and_aria() {
        let (page, controller) = setup();
        controller.show(Some("Generating quiz"));

        let overlay = page.overlay().unwrap();
        assert!(overlay.visible);
        assert!(!overlay.aria_hidden);
        assert!(overlay.document_busy);
        assert_eq!(overlay.message.as_deref(), Some("Generating quiz"));
    }

    #[test]
    fn test_show_without_message_keeps_previous_text() {
        let (_page, controller) = setup();
        controller.show(Some("First"));
        controller.hide();
        controller.show(None);
        assert_eq!(controller.state().message, "First");

        controller.show(Some(""));
        assert_eq!(controller.state().message, "First");
    }

    #[test]
    fn test_hide_is_idempotent() {
        let (page, controller) = setup();
        controller.show(Some("x"));
        controller.hide();
        let once = page.overlay();
        controller.hide();
        assert_eq!(page.overlay(), once);
        assert!(!controller.is_visible());
    }

    #[test]
    fn test_last_call_wins() {
        let (_page, controller) = setup();
        controller.show(Some("a"));
        controller.hide();
        controller.show(Some("b"));
        assert_eq!(
            controller.state(),
            BusyState {
                visible: true,
                message: "b".to_string()
            }
        );
    }

    #[test]
    fn test_overlay_without_message_child() {
        let page = Rc::new(MockPage::without_message_child());
        let controller = BusyStateController::new(page.clone(), LoaderConfig::default());
        controller.initialize();

        controller.show(Some("ignored"));
        let state = controller.state();
        assert!(state.visible);
        assert_eq!(state.message, "");
    }

    #[test]
    fn test_state_without_overlay_is_idle() {
        let page = Rc::new(MockPage::without_overlay());
        let controller = BusyStateController::new(page.clone(), LoaderConfig::default());
        controller.initialize();
        controller.show(Some("x"));

        assert_eq!(controller.state(), BusyState::default());
        assert_eq!(page.mutation_count(), 0);
        assert!(page.has_log_containing("No overlay element"));
    }

    #[test]
    fn test_form_latch_is_set_once() {
        let (page, controller) = setup();
        let trigger = FormTrigger::new(TriggerId(4), None);
        page.register_form(trigger.id);

        assert!(!controller.is_armed(trigger.id));
        assert_eq!(controller.on_form_submit(&trigger), SubmitOutcome::Deferred);
        assert!(controller.is_armed(trigger.id));
        assert_eq!(controller.on_form_submit(&trigger), SubmitOutcome::Suppressed);
        assert_eq!(page.armed_marks(), vec![trigger.id]);
    }

    #[test]
    fn test_reissued_submit_event_passes_through() {
        let (page, controller) = setup();
        let trigger = FormTrigger::new(TriggerId(5), None);
        page.register_form(trigger.id);

        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let seen = outcomes.clone();
        let listener = controller.clone();
        page.on_submit(move |id| {
            let outcome = listener.on_form_submit(&FormTrigger::new(id, None));
            seen.borrow_mut().push(outcome);
            outcome.cancels_native()
        });

        assert!(!page.dispatch_submit(trigger.id));
        page.flush();

        assert_eq!(*outcomes.borrow(), vec![SubmitOutcome::Deferred, SubmitOutcome::PassThrough]);
        assert_eq!(page.submission_count(trigger.id), 1);
        assert!(controller.is_armed(trigger.id));
    }

    #[test]
    fn test_form_uses_default_message() {
        let (page, controller) = setup();
        let trigger = FormTrigger::new(TriggerId(0), Some(String::new()));
        page.register_form(trigger.id);

        controller.on_form_submit(&trigger);
        assert_eq!(controller.state().message, "Working on it…");
    }

    #[test]
    fn test_button_click_passes_through() {
        let (page, controller) = setup();
        let trigger = ClickTrigger::new(Some("Loading results".to_string()), None);

        assert_eq!(controller.on_click(&trigger), ClickOutcome::PassThrough);
        assert!(controller.is_visible());
        assert_eq!(controller.state().message, "Loading results");
        assert_eq!(page.pending_frames(), 0);
    }

    #[test]
    fn test_failed_deferred_submit_is_logged() {
        let (page, controller) = setup();
        // Form never registered with the host
        let trigger = FormTrigger::new(TriggerId(8), None);

        controller.on_form_submit(&trigger);
        page.flush();
        assert!(page.submissions().is_empty());
        assert!(page.has_log_containing("Deferred submit of trigger#8 failed"));
    }

    #[test]
    fn test_page_restore_hides() {
        let (_page, controller) = setup();
        controller.show(Some("x"));
        controller.on_page_restore();
        assert!(!controller.is_visible());
    }
}
