//! Automatic busy-state bindings
//!
//! The document is scanned once; elements added later are not bound. Marker
//! values and `href`s are read when the event fires.

use quiz_hal::{PageHost, TriggerId};
use web_sys::{Document, Element, Event, HtmlFormElement, Window};

use super::{listen, query_all, WebPage};
use crate::controller::BusyStateController;
use crate::error::LoaderError;
use crate::trigger::{ClickTrigger, FormTrigger};

/// Bind marked forms, marked clickables, and the history-cache restore hook
pub fn install(
    controller: &BusyStateController<WebPage>,
    window: &Window,
    document: &Document,
) -> Result<(), LoaderError> {
    let config = controller.config();

    let forms: Vec<HtmlFormElement> = query_all(document, &config.form_selector())?;
    let form_count = forms.len();
    for (index, form) in forms.into_iter().enumerate() {
        let id = TriggerId::new(index as u32);
        controller.host().register_form(id, form.clone());

        let controller = controller.clone();
        let marker = config.form_marker.clone();
        let element = form.clone();
        listen(&form, "submit", move |event: Event| {
            let trigger = FormTrigger::new(id, element.get_attribute(&marker));
            if controller.on_form_submit(&trigger).cancels_native() {
                event.prevent_default();
            }
        })?;
    }

    let clickables: Vec<Element> = query_all(document, &config.click_selector())?;
    let click_count = clickables.len();
    for element in clickables {
        let controller = controller.clone();
        let marker = config.click_marker.clone();
        let target = element.clone();
        listen(&element, "click", move |event: Event| {
            let trigger = ClickTrigger::new(
                target.get_attribute(&marker),
                target.get_attribute("href"),
            );
            if controller.on_click(&trigger).is_deferred() {
                event.prevent_default();
            }
        })?;
    }

    let restore = controller.clone();
    listen(window, "pageshow", move |_event: Event| restore.on_page_restore())?;

    controller.host().debug_write(&format!(
        "[loader] Bound {} form(s) and {} clickable(s)",
        form_count, click_count
    ));
    Ok(())
}
