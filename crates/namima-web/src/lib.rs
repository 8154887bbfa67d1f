#![cfg(target_arch = "wasm32")]
//! Browser front-end: Canvas2D particles over WebAudio, driven by
//! [`namima_core::Engine`].

mod audio;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;

pub use audio::WebAudioBackend;

use namima_core::{Engine, EngineConfig, InstantClock};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type WebEngine = Engine<InstantClock, WebAudioBackend>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("namima-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let ctx2d = render::context_2d(&canvas)?;

    let (width, height) = dom::sync_canvas_backing_size(&canvas);
    let mobile = dom::is_mobile();
    let config = if mobile {
        EngineConfig::mobile()
    } else {
        EngineConfig::default()
    };
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let config = config.with_size(width as f32, height as f32).with_seed(seed);
    log::info!(
        "[init] {}x{} canvas, {} particles{}",
        width,
        height,
        config.particles.count,
        if mobile { " (mobile)" } else { "" }
    );

    let engine = Rc::new(RefCell::new(Engine::new(
        config,
        InstantClock::new(),
        WebAudioBackend::new(),
    )?));

    events::wire_controls(&engine, &document);
    events::wire_canvas(&engine, &canvas);
    events::wire_resize(&engine, &canvas);
    events::wire_keyboard(&engine, &document);

    frame::start_transport_loop(engine.clone());
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        engine,
        document,
        canvas,
        ctx2d,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
