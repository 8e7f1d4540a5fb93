//! Integration tests for the busy-state coordinator
//!
//! These tests drive the coordinator against `MockPage` and verify:
//! - Explicit show/hide/wrap semantics
//! - Deferred form submission and its one-time latch
//! - Deferred link navigation
//! - History-cache restore
//! - Graceful degradation without an overlay

use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::FutureExt;
use quiz_hal::{PageHost, TriggerId};
use quiz_hal_mock::MockPage;
use quiz_loader::{
    BusyStateController, ClickOutcome, ClickTrigger, FormTrigger, LoaderConfig, SubmitOutcome,
};

fn setup() -> (Rc<MockPage>, BusyStateController<MockPage>) {
    let page = Rc::new(MockPage::new());
    let controller = BusyStateController::new(page.clone(), LoaderConfig::default());
    controller.initialize();
    (page, controller)
}

/// Register `id` and route the page's submit events through the controller,
/// cancelling them the way the browser listener does
fn bind_form(page: &MockPage, controller: &BusyStateController<MockPage>, id: TriggerId) {
    page.register_form(id);
    let controller = controller.clone();
    page.on_submit(move |id| {
        controller.on_form_submit(&FormTrigger::new(id, None)).cancels_native()
    });
}

// =============================================================================
// Explicit API
// =============================================================================

#[test]
fn test_last_show_or_hide_determines_visibility() {
    // Every show/hide sequence up to length 6
    for len in 1..=6u32 {
        for bits in 0..(1u32 << len) {
            let (_page, controller) = setup();
            let mut last_was_show = false;
            for step in 0..len {
                last_was_show = bits & (1 << step) != 0;
                if last_was_show {
                    controller.show(Some("step"));
                } else {
                    controller.hide();
                }
            }
            assert_eq!(
                controller.is_visible(),
                last_was_show,
                "sequence {:b} of length {}",
                bits,
                len
            );
        }
    }
}

#[test]
fn test_hide_twice_equals_hide_once() {
    let (page, controller) = setup();
    controller.show(Some("Saving"));

    controller.hide();
    let once = (page.overlay(), controller.state());
    controller.hide();
    let twice = (page.overlay(), controller.state());

    assert_eq!(once, twice);
}

// =============================================================================
// wrap
// =============================================================================

#[test]
fn test_wrap_success_shows_until_settled() {
    let (page, controller) = setup();
    let (tx, rx) = oneshot::channel::<u32>();

    let mut wrapped = Box::pin(controller.wrap(rx, Some("Generating quiz")));
    assert!(controller.is_visible());
    assert_eq!(controller.state().message, "Generating quiz");

    // Still pending: overlay stays up
    assert!(wrapped.as_mut().now_or_never().is_none());
    assert!(controller.is_visible());
    assert!(page.overlay().unwrap().document_busy);

    tx.send(42).unwrap();
    let output = block_on(wrapped);

    assert_eq!(output, Ok(42));
    assert!(!controller.is_visible());
    assert!(!page.overlay().unwrap().document_busy);
}

#[test]
fn test_wrap_failure_is_passed_through() {
    let (_page, controller) = setup();

    let wrapped = controller.wrap(async { Err::<u32, &str>("quota exceeded") }, None);
    assert!(controller.is_visible());

    let output = block_on(wrapped);
    assert_eq!(output, Err("quota exceeded"));
    assert!(!controller.is_visible());
}

#[test]
fn test_wrap_hides_exactly_once() {
    let (page, controller) = setup();

    let wrapped = controller.wrap(async { 1 }, Some("x"));
    let before = page.mutation_count();
    block_on(wrapped);

    // One hide: overlay flag + busy marker
    assert_eq!(page.mutation_count(), before + 2);
}

#[test]
fn test_wrap_dropped_before_completion_hides() {
    let (_page, controller) = setup();
    let (_tx, rx) = oneshot::channel::<()>();

    let wrapped = controller.wrap(rx, Some("Uploading"));
    assert!(controller.is_visible());
    drop(wrapped);

    assert!(!controller.is_visible());
}

#[test]
fn test_wrap_without_message_keeps_previous_text() {
    let (_page, controller) = setup();
    controller.show(Some("Loading leaderboard"));
    controller.hide();

    let wrapped = controller.wrap(async {}, None);
    assert_eq!(controller.state().message, "Loading leaderboard");
    block_on(wrapped);
}

// =============================================================================
// Marked forms
// =============================================================================

#[test]
fn test_first_submit_deferred_until_after_paint() {
    let (page, controller) = setup();
    let form = FormTrigger::new(TriggerId(0), Some("Grading your answers…".to_string()));
    page.register_form(form.id);

    assert_eq!(controller.on_form_submit(&form), SubmitOutcome::Deferred);
    assert!(controller.is_visible());
    assert_eq!(controller.state().message, "Grading your answers…");
    assert!(page.submissions().is_empty());

    page.run_frame();
    assert!(page.submissions().is_empty());

    page.run_tasks();
    assert_eq!(page.submissions(), vec![form.id]);
}

#[test]
fn test_coordinator_submission_is_the_only_native_one() {
    let (page, controller) = setup();
    let form = TriggerId(1);
    bind_form(&page, &controller, form);

    // User submit is cancelled and re-issued after paint
    assert!(!page.dispatch_submit(form));
    assert_eq!(page.submission_count(form), 0);
    page.run_frame();
    assert_eq!(page.submission_count(form), 0);
    page.run_tasks();
    assert_eq!(page.submission_count(form), 1);

    // Later submits while the page unloads go nowhere
    assert!(!page.dispatch_submit(form));
    page.flush();
    assert_eq!(page.submission_count(form), 1);
}

#[test]
fn test_double_click_submit_submits_once() {
    let (page, controller) = setup();
    let form = TriggerId(2);
    bind_form(&page, &controller, form);

    assert!(!page.dispatch_submit(form));
    assert!(!page.dispatch_submit(form));
    assert_eq!(page.pending_frames(), 1);
    page.flush();

    assert_eq!(page.submission_count(form), 1);
    assert_eq!(page.armed_marks(), vec![form]);
}

#[test]
fn test_second_submit_before_paint_is_suppressed() {
    let (page, controller) = setup();
    let form = FormTrigger::new(TriggerId(3), Some("Grading…".to_string()));
    page.register_form(form.id);

    assert_eq!(controller.on_form_submit(&form), SubmitOutcome::Deferred);
    assert_eq!(controller.on_form_submit(&form), SubmitOutcome::Suppressed);
    assert!(controller.is_visible());
}

#[test]
fn test_failed_reissue_lets_next_submit_through() {
    let (page, controller) = setup();
    // Listener bound, but the host never registered the form
    let form = TriggerId(9);
    let listener = controller.clone();
    page.on_submit(move |id| {
        listener.on_form_submit(&FormTrigger::new(id, None)).cancels_native()
    });

    assert!(!page.dispatch_submit(form));
    page.flush();
    assert!(page.has_log_containing("Deferred submit of trigger#9 failed"));

    assert!(page.dispatch_submit(form));
    assert!(!page.dispatch_submit(form));
    assert_eq!(page.submission_count(form), 1);
}

#[test]
fn test_latches_are_per_form() {
    let (page, controller) = setup();
    let quiz = FormTrigger::new(TriggerId(0), None);
    let generate = FormTrigger::new(TriggerId(1), None);
    page.register_form(quiz.id);
    page.register_form(generate.id);

    assert!(controller.on_form_submit(&quiz).is_deferred());
    assert!(controller.on_form_submit(&generate).is_deferred());
    page.flush();

    assert_eq!(page.submissions(), vec![quiz.id, generate.id]);
}

#[test]
fn test_fresh_page_yields_unarmed_forms() {
    let (page, controller) = setup();
    let form = FormTrigger::new(TriggerId(0), None);
    page.register_form(form.id);
    controller.on_form_submit(&form);
    assert!(controller.is_armed(form.id));

    let (_next_page, next_controller) = setup();
    assert!(!next_controller.is_armed(form.id));
}

// =============================================================================
// Marked clickables
// =============================================================================

#[test]
fn test_link_navigates_only_after_paint() {
    let (page, controller) = setup();
    let link = ClickTrigger::new(
        Some("Starting quiz…".to_string()),
        Some("/quiz/5/start/".to_string()),
    );

    assert_eq!(controller.on_click(&link), ClickOutcome::Deferred);
    assert!(page.navigations().is_empty());
    assert!(controller.is_visible());
    assert_eq!(controller.state().message, "Starting quiz…");

    page.run_frame();
    assert!(page.navigations().is_empty());

    page.run_tasks();
    assert_eq!(page.navigations(), vec!["/quiz/5/start/".to_string()]);
}

#[test]
fn test_link_without_message_uses_default() {
    let (page, controller) = setup();
    let link = ClickTrigger::new(Some(String::new()), Some("/dashboard/".to_string()));

    controller.on_click(&link);
    assert_eq!(controller.state().message, "Working on it…");
    page.flush();
    assert_eq!(page.navigations().len(), 1);
}

#[test]
fn test_button_without_href_proceeds() {
    let (page, controller) = setup();
    let button = ClickTrigger::new(None, None);

    assert_eq!(controller.on_click(&button), ClickOutcome::PassThrough);
    assert!(controller.is_visible());
    page.flush();
    assert!(page.navigations().is_empty());
}

// =============================================================================
// History-cache restore
// =============================================================================

#[test]
fn test_restore_always_hides() {
    let (_page, controller) = setup();

    controller.show(Some("Loading"));
    controller.on_page_restore();
    assert!(!controller.is_visible());

    controller.on_page_restore();
    assert!(!controller.is_visible());
}

#[test]
fn test_restore_does_not_cancel_pending_navigation() {
    let (page, controller) = setup();
    let link = ClickTrigger::new(None, Some("/results/".to_string()));

    controller.on_click(&link);
    controller.on_page_restore();
    assert!(!controller.is_visible());

    page.flush();
    assert_eq!(page.navigations(), vec!["/results/".to_string()]);
}

// =============================================================================
// Missing overlay
// =============================================================================

#[test]
fn test_every_operation_is_noop_without_overlay() {
    let page = Rc::new(MockPage::without_overlay());
    let controller = BusyStateController::new(page.clone(), LoaderConfig::default());

    controller.initialize();
    controller.show(Some("x"));
    controller.hide();
    controller.on_page_restore();
    let output = block_on(controller.wrap(async { Ok::<_, ()>("done") }, Some("x")));

    assert_eq!(output, Ok("done"));
    assert!(page.overlay().is_none());
    assert!(!controller.is_visible());
    assert_eq!(page.mutation_count(), 0);
}

#[test]
fn test_triggers_still_defer_without_overlay() {
    let page = Rc::new(MockPage::without_overlay());
    let controller = BusyStateController::new(page.clone(), LoaderConfig::default());
    controller.initialize();

    let form = FormTrigger::new(TriggerId(0), None);
    page.register_form(form.id);
    let link = ClickTrigger::new(None, Some("/quiz/".to_string()));

    assert!(controller.on_form_submit(&form).is_deferred());
    assert!(controller.on_click(&link).is_deferred());
    page.flush();

    assert_eq!(page.submission_count(form.id), 1);
    assert_eq!(page.navigations(), vec!["/quiz/".to_string()]);
    assert_eq!(page.mutation_count(), 0);
}
