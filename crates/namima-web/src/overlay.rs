use web_sys as web;

const OVERLAY_ID: &str = "start-overlay";
const MESSAGE_ID: &str = "start-message";

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    document
        .get_element_by_id(OVERLAY_ID)
        .and_then(|el| el.get_attribute("style"))
        .map(|s| s.contains("display:none"))
        .unwrap_or(false)
}

/// Bring the overlay back with a message; the next click on it retries.
pub fn show_retry(document: &web::Document, message: &str) {
    if let Some(el) = document.get_element_by_id(MESSAGE_ID) {
        el.set_text_content(Some(message));
    }
    show(document);
}
