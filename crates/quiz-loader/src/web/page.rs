//! Browser implementation of `PageHost`
//!
//! The overlay and its message child are looked up once, when the page is
//! attached. Forms are registered by the bindings under the `TriggerId` they
//! were scanned with.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use quiz_hal::{HostError, OverlaySnapshot, PageHost, Rejected, Task, TriggerId};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, Window};

use super::dom_error;
use crate::config::LoaderConfig;

/// The current browser page
pub struct WebPage {
    window: Window,
    document: Document,
    overlay: Option<HtmlElement>,
    message: Option<Element>,
    forms: RefCell<BTreeMap<TriggerId, HtmlFormElement>>,
    armed_marker: String,
}

impl WebPage {
    pub fn attach(window: Window, document: Document, config: &LoaderConfig) -> Self {
        let overlay = document
            .get_element_by_id(&config.overlay_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let message = overlay
            .as_ref()
            .and_then(|el| el.query_selector(&config.message_selector).ok().flatten());

        Self {
            window,
            document,
            overlay,
            message,
            forms: RefCell::new(BTreeMap::new()),
            armed_marker: config.armed_marker.clone(),
        }
    }

    /// Make a scanned form submittable through `submit_form`
    pub fn register_form(&self, id: TriggerId, form: HtmlFormElement) {
        self.forms.borrow_mut().insert(id, form);
    }

    fn overlay_node(&self) -> Result<&HtmlElement, HostError> {
        self.overlay.as_ref().ok_or(HostError::OverlayMissing)
    }

    /// Hand `task` to a JS scheduling call, recovering it if the call throws
    ///
    /// The JS callback is released to the browser only once scheduled; on a
    /// throw it is dropped here.
    fn schedule_with<S>(&self, task: Task, schedule: S) -> Result<(), Rejected>
    where
        S: FnOnce(&js_sys::Function) -> Result<i32, JsValue>,
    {
        let slot: Rc<RefCell<Option<Task>>> = Rc::new(RefCell::new(Some(task)));
        let pending = slot.clone();
        let callback: Closure<dyn FnMut()> = Closure::once(move || {
            let task = pending.borrow_mut().take();
            if let Some(task) = task {
                task();
            }
        });

        let scheduled = schedule(callback.as_ref().unchecked_ref());
        match scheduled {
            Ok(_) => {
                // Freed after its single call
                drop(callback.into_js_value());
                Ok(())
            }
            Err(e) => {
                drop(callback);
                let task = slot.borrow_mut().take();
                match task {
                    Some(task) => Err(Rejected::new(dom_error(e), task)),
                    None => Ok(()),
                }
            }
        }
    }
}

impl PageHost for WebPage {
    fn overlay(&self) -> Option<OverlaySnapshot> {
        let overlay = self.overlay.as_ref()?;
        let document_busy = self
            .document
            .body()
            .and_then(|body| body.get_attribute("aria-busy"))
            .is_some_and(|v| v == "true");

        Some(OverlaySnapshot {
            visible: !overlay.hidden(),
            aria_hidden: overlay.get_attribute("aria-hidden").as_deref() == Some("true"),
            message: self
                .message
                .as_ref()
                .map(|el| el.text_content().unwrap_or_default()),
            document_busy,
        })
    }

    fn set_overlay_visible(&self, visible: bool) -> Result<(), HostError> {
        let overlay = self.overlay_node()?;
        overlay.set_hidden(!visible);
        overlay
            .set_attribute("aria-hidden", if visible { "false" } else { "true" })
            .map_err(dom_error)
    }

    fn set_overlay_message(&self, message: &str) -> Result<(), HostError> {
        self.overlay_node()?;
        if let Some(el) = &self.message {
            el.set_text_content(Some(message));
        }
        Ok(())
    }

    fn set_document_busy(&self, busy: bool) -> Result<(), HostError> {
        self.overlay_node()?;
        // A document without a body (frameset, early parse) has nothing to mark
        let Some(body) = self.document.body() else {
            return Ok(());
        };
        if busy {
            body.set_attribute("aria-busy", "true").map_err(dom_error)
        } else {
            body.remove_attribute("aria-busy").map_err(dom_error)
        }
    }

    fn submit_form(&self, trigger: TriggerId) -> Result<(), HostError> {
        let forms = self.forms.borrow();
        let form = forms
            .get(&trigger)
            .cloned()
            .ok_or(HostError::UnknownTrigger(trigger))?;
        drop(forms);
        // requestSubmit() fires `submit` synchronously, so the listener sees
        // the re-issue; form.submit() is the fallback where it is missing
        form.request_submit().or_else(|_| form.submit()).map_err(dom_error)
    }

    fn navigate(&self, href: &str) -> Result<(), HostError> {
        self.window.location().set_href(href).map_err(dom_error)
    }

    fn mark_armed(&self, trigger: TriggerId) {
        // Without an overlay the document stays untouched
        if self.overlay.is_none() {
            return;
        }
        let form = self.forms.borrow().get(&trigger).cloned();
        if let Some(form) = form {
            if let Err(e) = form.set_attribute(&self.armed_marker, "1") {
                self.debug_write(&format!("[web-page] Failed to mark {}: {:?}", trigger, e));
            }
        }
    }

    fn request_animation_frame(&self, task: Task) -> Result<(), Rejected> {
        self.schedule_with(task, |callback| self.window.request_animation_frame(callback))
    }

    fn enqueue_task(&self, task: Task) -> Result<(), Rejected> {
        self.schedule_with(task, |callback| {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback, 0)
        })
    }

    fn debug_write(&self, msg: &str) {
        web_sys::console::log_1(&msg.into());
    }
}
