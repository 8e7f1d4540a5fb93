//! WASM exports for the page runtime
//!
//! Boots the runtime on page-ready, installs the DOM bindings, and exposes
//! the coordinator to page scripts as `window.Loader`.

mod bindings;
mod decor;
mod page;
mod theme;

use std::cell::RefCell;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Document, Event, EventTarget, Window};

use crate::config::RuntimeConfig;
use crate::constants::{CONFIG_GLOBAL, LOADER_GLOBAL};
use crate::controller::BusyStateController;
use crate::error::LoaderError;
use quiz_hal::HostError;

pub use bindings::install as install_bindings;
pub use page::WebPage;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

thread_local! {
    /// Page-lifetime event listeners
    static LISTENERS: RefCell<Vec<Closure<dyn FnMut(Event)>>> = const { RefCell::new(Vec::new()) };
}

/// Busy overlay API for page scripts (`window.Loader`)
#[wasm_bindgen]
pub struct Loader {
    controller: BusyStateController<WebPage>,
}

#[wasm_bindgen]
impl Loader {
    /// Show the overlay, replacing its text when `message` is non-empty
    #[wasm_bindgen]
    pub fn show(&self, message: Option<String>) {
        self.controller.show(message.as_deref());
    }

    /// Hide the overlay
    #[wasm_bindgen]
    pub fn hide(&self) {
        self.controller.hide();
    }

    /// Show the overlay until `operation` (a promise or plain value) settles
    ///
    /// The returned promise settles exactly like `operation`.
    #[wasm_bindgen]
    pub fn wrap(&self, operation: JsValue, message: Option<String>) -> Promise {
        let pending = JsFuture::from(Promise::resolve(&operation));
        future_to_promise(self.controller.wrap(pending, message.as_deref()))
    }

    #[wasm_bindgen(js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.controller.is_visible()
    }

    /// Get the busy state as JSON
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.controller.state()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Entry point: run the page runtime once the document is ready
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if let Err(e) = boot() {
        log(&format!("[quiz-page] Boot failed: {}", e));
    }
}

fn boot() -> Result<(), LoaderError> {
    let window = web_sys::window().ok_or(LoaderError::NoWindow)?;
    let document = window.document().ok_or(LoaderError::NoDocument)?;

    if document.ready_state() == "loading" {
        let ready = Closure::once_into_js(move || {
            if let Err(e) = init_page() {
                log(&format!("[quiz-page] Init failed: {}", e));
            }
        });
        document
            .add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())
            .map_err(dom_error)?;
        Ok(())
    } else {
        init_page()
    }
}

fn init_page() -> Result<(), LoaderError> {
    let window = web_sys::window().ok_or(LoaderError::NoWindow)?;
    let document = window.document().ok_or(LoaderError::NoDocument)?;
    let config = read_page_config(&window);

    let page = WebPage::attach(window.clone(), document.clone(), &config.loader);
    let controller = BusyStateController::new(std::rc::Rc::new(page), config.loader.clone());
    controller.initialize();

    bindings::install(&controller, &window, &document)?;

    let api = Loader {
        controller: controller.clone(),
    };
    js_sys::Reflect::set(&window, &LOADER_GLOBAL.into(), &JsValue::from(api)).map_err(dom_error)?;

    // Collaborator failures are logged, never fatal
    if let Err(e) = theme::install(&window, &document, &config.theme) {
        log(&format!("[theme] Setup failed: {}", e));
    }
    if let Err(e) = decor::install(&window, &document, &config) {
        log(&format!("[decor] Setup failed: {}", e));
    }
    Ok(())
}

/// Read `window.QuizPageConfig`, falling back to defaults
fn read_page_config(window: &Window) -> RuntimeConfig {
    let raw = match js_sys::Reflect::get(window, &CONFIG_GLOBAL.into()) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return RuntimeConfig::default(),
    };

    let json = js_sys::JSON::stringify(&raw).ok().and_then(|s| s.as_string());
    match json.as_deref().map(RuntimeConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            log(&format!("[quiz-page] Ignoring {}: {}", CONFIG_GLOBAL, e));
            RuntimeConfig::default()
        }
        None => RuntimeConfig::default(),
    }
}

/// Attach a listener that lives as long as the page
pub(crate) fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), LoaderError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(dom_error)?;
    LISTENERS.with(|slot| slot.borrow_mut().push(callback));
    Ok(())
}

/// Run `task` once after `delay_ms`
pub(crate) fn set_timeout<F>(window: &Window, delay_ms: i32, task: F) -> Result<(), LoaderError>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(task);
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
        .map_err(dom_error)?;
    Ok(())
}

pub(crate) fn dom_error(e: JsValue) -> HostError {
    HostError::Dom(format!("{:?}", e))
}

/// `document.querySelectorAll` collected into typed elements
pub(crate) fn query_all<T: JsCast>(root: &Document, selector: &str) -> Result<Vec<T>, LoaderError> {
    let nodes = root.query_selector_all(selector).map_err(dom_error)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect())
}
