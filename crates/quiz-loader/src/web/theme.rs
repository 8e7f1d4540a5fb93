//! Theme toggle binding

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Window};

use super::{dom_error, listen, log};
use crate::config::ThemeConfig;
use crate::constants::{PREFERS_DARK_QUERY, THEME_ATTRIBUTE};
use crate::error::LoaderError;
use crate::theme::Theme;

pub(crate) fn install(
    window: &Window,
    document: &Document,
    config: &ThemeConfig,
) -> Result<(), LoaderError> {
    let root = document.document_element().ok_or(LoaderError::NoDocument)?;

    let saved = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(&config.storage_key).ok().flatten());
    let prefers_dark = window
        .match_media(PREFERS_DARK_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());

    let theme = Theme::resolve(saved.as_deref(), prefers_dark);
    apply(&root, theme)?;

    let Some(toggle) = document.get_element_by_id(&config.toggle_id) else {
        return Ok(());
    };
    render_toggle(&toggle, theme);

    let window = window.clone();
    let storage_key = config.storage_key.clone();
    let target = toggle.clone();
    listen(&toggle, "click", move |_event: Event| {
        let current = root.get_attribute(THEME_ATTRIBUTE);
        let next = Theme::from_root_attribute(current.as_deref()).toggled();
        if let Err(e) = apply(&root, next) {
            log(&format!("[theme] Failed to apply {:?}: {}", next, e));
        }
        persist(&window, &storage_key, next);
        render_toggle(&target, next);
    })
}

fn apply(root: &Element, theme: Theme) -> Result<(), LoaderError> {
    match theme.root_attribute() {
        Some((name, value)) => root.set_attribute(name, value).map_err(dom_error)?,
        None => root.remove_attribute(THEME_ATTRIBUTE).map_err(dom_error)?,
    }
    Ok(())
}

fn persist(window: &Window, key: &str, theme: Theme) {
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .map(|storage| storage.set_item(key, theme.storage_value()));
    match stored {
        Some(Ok(())) => {}
        Some(Err(e)) => log(&format!("[theme] Could not persist preference: {:?}", e)),
        None => log("[theme] localStorage unavailable; preference not persisted"),
    }
}

fn render_toggle(toggle: &Element, theme: Theme) {
    let pressed = if theme.is_dark() { "true" } else { "false" };
    let _ = toggle.set_attribute("aria-pressed", pressed);
    let _ = toggle.set_attribute("data-active", pressed);

    let icon = |selector: &str| {
        toggle
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    };
    if let (Some(sun), Some(moon)) = (icon(".icon-sun"), icon(".icon-moon")) {
        let (sun_display, moon_display) = theme.icon_display();
        let _ = sun.style().set_property("display", sun_display);
        let _ = moon.style().set_property("display", moon_display);
    }
    if let Ok(Some(label)) = toggle.query_selector(".label") {
        label.set_text_content(Some(theme.toggle_label()));
    }
}
