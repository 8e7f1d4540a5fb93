//! Two-stage "after paint" scheduling
//!
//! A DOM write made right before a navigation is not guaranteed to be
//! painted. Deferred actions therefore wait for one rendering-frame callback
//! and then one zero-delay timer turn before they run:
//!
//! ```text
//! trigger ──► show() ──► frame callback ──► timer turn ──► action
//! ```
//!
//! When a stage is unavailable the remaining stages still run, so the action
//! fires exactly once in every case.

use std::rc::Rc;

use quiz_hal::{PageHost, Task};

/// Run `action` after the next paint
pub fn after_paint<H: PageHost>(host: &Rc<H>, action: Task) {
    let stage_host = host.clone();
    let frame_stage: Task = Box::new(move || enqueue_or_run(&*stage_host, action));

    if let Err(rejected) = host.request_animation_frame(frame_stage) {
        host.debug_write(&format!(
            "[loader] Frame callback unavailable ({}), falling back to timer",
            rejected.error
        ));
        (rejected.task)();
    }
}

/// Second stage: queue the action behind a zero-delay timer
fn enqueue_or_run<H: PageHost>(host: &H, action: Task) {
    if let Err(rejected) = host.enqueue_task(action) {
        host.debug_write(&format!(
            "[loader] Timer unavailable ({}), running deferred action inline",
            rejected.error
        ));
        (rejected.task)();
    }
}
