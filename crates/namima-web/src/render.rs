//! Canvas2D drawing of the backdrop and the particle swarm.

use namima_core::{Backdrop, ParticleSystem};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// HSB saturation of every dot, 0..1.
const PARTICLE_SATURATION: f32 = 0.55;
const OUTER_LIGHTNESS: f32 = 6.0;

pub fn context_2d(
    canvas: &web::HtmlCanvasElement,
) -> anyhow::Result<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("get_context failed: {:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("not a 2d context: {:?}", e))
}

/// HSB (hue in degrees, saturation and value in 0..1) to CSS `hsl()` terms.
fn hsv_to_hsl(s: f32, v: f32) -> (f32, f32) {
    let l = v * (1.0 - s / 2.0);
    let sl = if l <= 0.0 || l >= 1.0 {
        0.0
    } else {
        (v - l) / l.min(1.0 - l)
    };
    (sl, l)
}

#[allow(deprecated)]
fn draw_backdrop(ctx: &web::CanvasRenderingContext2d, backdrop: &Backdrop, w: f64, h: f64) {
    let (cx, cy) = (w * 0.5, h * 0.5);
    let r = (w * w + h * h).sqrt() * 0.5;
    match ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, r) {
        Ok(g) => {
            let _ = g.add_color_stop(
                0.0,
                &format!("hsl({:.0}, 45%, {:.0}%)", backdrop.inner_hue, backdrop.inner_lightness),
            );
            let _ = g.add_color_stop(
                1.0,
                &format!("hsl({:.0}, 50%, {:.0}%)", backdrop.outer_hue, OUTER_LIGHTNESS),
            );
            ctx.set_fill_style(&JsValue::from(g));
        }
        Err(_) => ctx.set_fill_style(&JsValue::from_str("#05070c")),
    }
    ctx.fill_rect(0.0, 0.0, w, h);
}

#[allow(deprecated)]
pub fn draw(
    ctx: &web::CanvasRenderingContext2d,
    canvas: &web::HtmlCanvasElement,
    backdrop: &Backdrop,
    swarm: &ParticleSystem,
) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    draw_backdrop(ctx, backdrop, w, h);

    for p in swarm.particles() {
        let (s, l) = hsv_to_hsl(PARTICLE_SATURATION, p.brightness() / 255.0);
        let alpha = (p.alpha() / 255.0).clamp(0.0, 1.0);
        ctx.set_fill_style(&JsValue::from_str(&format!(
            "hsla({:.0}, {:.0}%, {:.0}%, {:.3})",
            p.hue,
            s * 100.0,
            l * 100.0,
            alpha
        )));
        ctx.begin_path();
        let _ = ctx.arc(
            p.pos.x as f64,
            p.pos.y as f64,
            (p.radius() * 0.5).max(0.5) as f64,
            0.0,
            TAU,
        );
        ctx.fill();
    }
}
