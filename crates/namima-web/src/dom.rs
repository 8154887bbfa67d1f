use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Calls `handler` with the slider's integer value on every `input` event.
pub fn add_slider_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(i32) + 'static,
) {
    let Some(input) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        log::warn!("[dom] missing slider #{}", element_id);
        return;
    };
    let target = input.clone();
    let closure = Closure::wrap(Box::new(move || match target.value().parse::<i32>() {
        Ok(raw) => handler(raw),
        Err(_) => log::debug!("[dom] non-numeric slider value {:?}", target.value()),
    }) as Box<dyn FnMut()>);
    let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Resize the canvas backing store to CSS size times device pixel ratio.
/// Returns the new size in device pixels.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
    (canvas.width(), canvas.height())
}

/// Phones and tablets get the lighter particle load.
pub fn is_mobile() -> bool {
    web::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .map(|ua| is_mobile_agent(&ua))
        .unwrap_or(false)
}

fn is_mobile_agent(ua: &str) -> bool {
    ["iPhone", "iPad", "iPod", "Android"]
        .iter()
        .any(|needle| ua.contains(needle))
}
