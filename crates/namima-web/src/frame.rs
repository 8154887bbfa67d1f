use crate::overlay;
use crate::render;
use crate::WebEngine;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Transport ticks run on a timer, independent of display rate.
const TRANSPORT_INTERVAL_MS: i32 = 25;

pub struct FrameContext {
    pub engine: Rc<RefCell<WebEngine>>,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub ctx2d: web::CanvasRenderingContext2d,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let mut engine = self.engine.borrow_mut();
        let stats = engine.render_tick();
        if let Some(e) = stats.energy {
            log::trace!("[frame] energy {:.3}, {} sources", e, stats.sources);
        }
        if let Some(err) = engine.take_error() {
            log::warn!("[frame] {}", err);
            overlay::show_retry(&self.document, "Audio could not start. Tap to try again.");
        }
        render::draw(&self.ctx2d, &self.canvas, &engine.backdrop(), engine.particles());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_transport_loop(engine: Rc<RefCell<WebEngine>>) {
    let Some(w) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move || {
        let played = engine.borrow_mut().transport_tick();
        if played > 0 {
            log::trace!("[transport] {} voices", played);
        }
    }) as Box<dyn FnMut()>);
    let _ = w.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        TRANSPORT_INTERVAL_MS,
    );
    closure.forget();
}
