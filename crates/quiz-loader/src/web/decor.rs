//! Decorative one-shot bindings

use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    ScrollBehavior, ScrollIntoViewOptions, Window,
};

use super::{dom_error, listen, log, query_all, set_timeout};
use crate::config::RuntimeConfig;
use crate::decor::{self, LabelStyle, CARD_SELECTOR};
use crate::error::LoaderError;

pub(crate) fn install(
    window: &Window,
    document: &Document,
    config: &RuntimeConfig,
) -> Result<(), LoaderError> {
    fade_in(document)?;
    highlight_nav(window, document)?;
    style_choices(document)?;
    dismiss_flash(window, document, config)?;
    disable_submit_buttons(document, config)?;
    lift_cards(document)?;
    hint_explanations(document, config)?;
    smooth_scroll(document)?;
    confirm_deletes(window, document, config)?;
    Ok(())
}

fn fade_in(document: &Document) -> Result<(), LoaderError> {
    if let Some(main) = document.query_selector("main").map_err(dom_error)? {
        let _ = main.class_list().add_1("fade-in");
    }
    let cards: Vec<Element> = query_all(document, CARD_SELECTOR)?;
    for (index, card) in cards.iter().enumerate() {
        for class in decor::fade_in_classes(index) {
            let _ = card.class_list().add_1(&class);
        }
    }
    Ok(())
}

fn highlight_nav(window: &Window, document: &Document) -> Result<(), LoaderError> {
    let path = window.location().pathname().map_err(dom_error)?;
    let links: Vec<Element> = query_all(document, "nav a")?;
    for link in links {
        if decor::is_active_link(link.get_attribute("href").as_deref(), &path) {
            let _ = link.class_list().add_1("active");
        }
    }
    Ok(())
}

fn style_choices(document: &Document) -> Result<(), LoaderError> {
    let radios: Vec<HtmlInputElement> = query_all(document, ".choice-list input[type=\"radio\"]")?;
    for radio in radios {
        let target = radio.clone();
        listen(&radio, "change", move |_event: Event| {
            if let Ok(Some(list)) = target.closest(".choice-list") {
                if let Ok(labels) = list.query_selector_all("label") {
                    for i in 0..labels.length() {
                        let label = labels
                            .item(i)
                            .and_then(|n| n.dyn_into::<HtmlElement>().ok());
                        if let Some(label) = label {
                            apply_label_style(&label, LabelStyle::RESET);
                        }
                    }
                }
            }
            let label = target
                .closest("label")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let Some(label) = label {
                if target.checked() {
                    apply_label_style(&label, LabelStyle::SELECTED);
                }
            }
        })?;
    }
    Ok(())
}

fn apply_label_style(label: &HtmlElement, style: LabelStyle) {
    let css = label.style();
    let _ = css.set_property("background", style.background);
    let _ = css.set_property("border-color", style.border_color);
}

fn dismiss_flash(
    window: &Window,
    document: &Document,
    config: &RuntimeConfig,
) -> Result<(), LoaderError> {
    let Some(messages) = document.query_selector(".messages").map_err(dom_error)? else {
        return Ok(());
    };
    let fade_ms = config.decor.flash_fade_ms;
    let timer_window = window.clone();
    set_timeout(window, config.decor.flash_dismiss_delay_ms, move || {
        let Ok(items) = messages.query_selector_all("li") else {
            return;
        };
        for i in 0..items.length() {
            let Some(item) = items.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            let css = item.style();
            let _ = css.set_property("opacity", "0");
            let transition = format!("opacity {}s ease-out", fade_ms as f64 / 1000.0);
            let _ = css.set_property("transition", &transition);
            if let Err(e) = set_timeout(&timer_window, fade_ms, move || item.remove()) {
                log(&format!("[decor] Flash removal not scheduled: {}", e));
            }
        }
    })
}

fn disable_submit_buttons(document: &Document, config: &RuntimeConfig) -> Result<(), LoaderError> {
    let forms: Vec<HtmlFormElement> = query_all(document, "form")?;
    for form in forms {
        let target = form.clone();
        let marker = config.loader.form_marker.clone();
        let decor_config = config.decor.clone();
        listen(&form, "submit", move |_event: Event| {
            let button = target
                .query_selector("button[type=\"submit\"]")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
            let Some(button) = button else {
                return;
            };
            button.set_disabled(true);
            let marked = target.has_attribute(&marker);
            if let Some(label) = decor::submit_button_label(marked, &decor_config) {
                button.set_text_content(Some(label));
            }
        })?;
    }
    Ok(())
}

fn lift_cards(document: &Document) -> Result<(), LoaderError> {
    let cards: Vec<HtmlElement> = query_all(document, ".quiz-card")?;
    for card in cards {
        let raised = card.clone();
        listen(&card, "mouseenter", move |_event: Event| {
            let _ = raised.style().set_property("transform", "translateY(-4px)");
        })?;
        let lowered = card.clone();
        listen(&card, "mouseleave", move |_event: Event| {
            let _ = lowered.style().set_property("transform", "translateY(0)");
        })?;
    }
    Ok(())
}

fn hint_explanations(document: &Document, config: &RuntimeConfig) -> Result<(), LoaderError> {
    let explanations: Vec<HtmlElement> = query_all(document, ".explanation")?;
    for explanation in explanations {
        let _ = explanation.style().set_property("cursor", "help");
        explanation.set_title(&config.decor.explanation_title);
    }
    Ok(())
}

fn smooth_scroll(document: &Document) -> Result<(), LoaderError> {
    let anchors: Vec<Element> = query_all(document, "a[href^=\"#\"]")?;
    for anchor in anchors {
        let source = anchor.clone();
        let doc = document.clone();
        listen(&anchor, "click", move |event: Event| {
            event.prevent_default();
            let href = source.get_attribute("href").unwrap_or_default();
            let Some(selector) = decor::anchor_target(&href) else {
                return;
            };
            if let Ok(Some(target)) = doc.query_selector(selector) {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                target.scroll_into_view_with_scroll_into_view_options(&options);
            }
        })?;
    }
    Ok(())
}

fn confirm_deletes(
    window: &Window,
    document: &Document,
    config: &RuntimeConfig,
) -> Result<(), LoaderError> {
    let buttons: Vec<Element> = query_all(document, ".delete-btn")?;
    for button in buttons {
        let window = window.clone();
        let prompt = config.decor.delete_prompt.clone();
        listen(&button, "click", move |event: Event| {
            if !window.confirm_with_message(&prompt).unwrap_or(false) {
                event.prevent_default();
            }
        })?;
    }
    Ok(())
}
