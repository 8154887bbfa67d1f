//! DOM wiring: start/stop controls, sliders, canvas taps, resize, keys.

use crate::dom;
use crate::input;
use crate::overlay;
use crate::WebEngine;
use namima_core::{Command, EngineState, Knob};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const RETRY_MESSAGE: &str = "Audio could not start. Tap to try again.";

/// Unlock audio inside a user gesture, then ask the engine to start.
///
/// The context is created once and reused on later starts. A context that
/// will not resume is still attached, so the engine reports the failure and
/// the overlay offers a retry.
pub fn request_start(engine: Rc<RefCell<WebEngine>>, document: web::Document) {
    let existing = engine.borrow().graph().backend().context().cloned();
    let ctx = match existing {
        Some(ctx) => ctx,
        None => match web::AudioContext::new() {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("[gesture] AudioContext error: {:?}", e);
                overlay::show_retry(&document, RETRY_MESSAGE);
                return;
            }
        },
    };
    spawn_local(async move {
        match ctx.resume() {
            Ok(promise) => {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[gesture] resume rejected: {:?}", e);
                }
            }
            Err(e) => log::warn!("[gesture] resume failed: {:?}", e),
        }
        overlay::hide(&document);
        let mut eng = engine.borrow_mut();
        eng.backend_mut().attach(ctx);
        eng.push(Command::Start);
    });
}

fn toggle_transport(engine: &Rc<RefCell<WebEngine>>, document: &web::Document) {
    let running = engine.borrow().state() == EngineState::Running;
    if running {
        engine.borrow_mut().push(Command::Stop);
    } else {
        request_start(engine.clone(), document.clone());
    }
}

pub fn wire_controls(engine: &Rc<RefCell<WebEngine>>, document: &web::Document) {
    {
        let engine = engine.clone();
        let doc = document.clone();
        dom::add_click_listener(document, "start-overlay", move || {
            if !overlay::is_hidden(&doc) {
                request_start(engine.clone(), doc.clone());
            }
        });
    }
    {
        let engine = engine.clone();
        let doc = document.clone();
        dom::add_click_listener(document, "start-btn", move || {
            request_start(engine.clone(), doc.clone());
        });
    }
    {
        let engine = engine.clone();
        dom::add_click_listener(document, "stop-btn", move || {
            engine.borrow_mut().push(Command::Stop);
        });
    }
    for knob in Knob::ALL {
        let engine = engine.clone();
        dom::add_slider_listener(document, knob.name(), move |raw| {
            engine.borrow_mut().push(Command::slider(knob, raw));
        });
    }
}

pub fn wire_canvas(engine: &Rc<RefCell<WebEngine>>, canvas: &web::HtmlCanvasElement) {
    let engine = engine.clone();
    let target = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let p = input::pointer_canvas_px(&ev, &target);
        engine.borrow_mut().push(Command::Tap {
            x: p.x,
            y: p.y,
            intensity: None,
        });
    }) as Box<dyn FnMut(_)>);
    let _ = canvas
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn wire_resize(engine: &Rc<RefCell<WebEngine>>, canvas: &web::HtmlCanvasElement) {
    let Some(window) = web::window() else {
        return;
    };
    let engine = engine.clone();
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        let (w, h) = dom::sync_canvas_backing_size(&canvas);
        engine.borrow_mut().push(Command::Resize {
            width: w as f32,
            height: h as f32,
        });
    }) as Box<dyn FnMut()>);
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Space toggles the transport.
pub fn wire_keyboard(engine: &Rc<RefCell<WebEngine>>, document: &web::Document) {
    let engine = engine.clone();
    let doc = document.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.key() == " " {
            ev.prevent_default();
            toggle_transport(&engine, &doc);
        }
    }) as Box<dyn FnMut(_)>);
    let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
