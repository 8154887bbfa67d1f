//! Scalar ripple field: a linear superposition of decaying travelling waves.
//!
//! Each live source contributes `A · sin(φ)` with
//! `A = strength · e^(−d·dist_decay) · e^(−dt/time_decay)` and
//! `φ = d·wave_freq − dt·time_freq`, where `d` is the distance to the source
//! in pixels and `dt` the seconds since it was created.
//!
//! The gradient is the analytic derivative of exactly that value, chain-ruled
//! through `d`. It includes the distance-decay term of the envelope as well as
//! the phase term, so a central finite difference of [`FieldSampler::value`]
//! converges to [`FieldSample::gradient`].

use crate::constants::{DIST_DECAY, GRADIENT_MIN_DISTANCE, TIME_DECAY, TIME_FREQ, WAVE_FREQ};
use crate::sources::Source;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Radians per pixel.
    pub wave_freq: f32,
    /// Radians per second.
    pub time_freq: f32,
    /// Amplitude falloff per pixel.
    pub dist_decay: f32,
    /// Amplitude time constant in seconds.
    pub time_decay: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            wave_freq: WAVE_FREQ,
            time_freq: TIME_FREQ,
            dist_decay: DIST_DECAY,
            time_decay: TIME_DECAY,
        }
    }
}

impl FieldConfig {
    /// Wave envelope of a single source at distance `d` and age `dt`.
    #[inline]
    pub fn envelope(&self, strength: f32, d: f32, dt: f32) -> f32 {
        strength * (-d * self.dist_decay).exp() * (-dt / self.time_decay).exp()
    }

    #[inline]
    pub fn phase(&self, d: f32, dt: f32) -> f32 {
        d * self.wave_freq - dt * self.time_freq
    }
}

/// Field value and its spatial gradient at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSample {
    pub value: f32,
    pub gradient: Vec2,
}

/// Stateless evaluator of the ripple field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSampler {
    config: FieldConfig,
}

impl FieldSampler {
    pub fn new(config: FieldConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Value and gradient at `pos` and field time `now`. Sources created after
    /// `now` are ignored.
    pub fn sample<'s>(
        &self,
        pos: Vec2,
        now: f64,
        sources: impl IntoIterator<Item = &'s Source>,
    ) -> FieldSample {
        let cfg = &self.config;
        let mut out = FieldSample::default();
        for src in sources {
            let dt = src.elapsed(now);
            if dt < 0.0 {
                continue;
            }
            let delta = pos - src.pos;
            let d = delta.length();
            let amp = cfg.envelope(src.strength, d, dt);
            let (s, c) = cfg.phase(d, dt).sin_cos();
            out.value += amp * s;
            if d > GRADIENT_MIN_DISTANCE {
                // d/dd [A sin φ] = A (k cos φ − dist_decay sin φ)
                let dv_dd = amp * (cfg.wave_freq * c - cfg.dist_decay * s);
                out.gradient += delta * (dv_dd / d);
            }
        }
        out
    }

    /// Field value only.
    pub fn value<'s>(
        &self,
        pos: Vec2,
        now: f64,
        sources: impl IntoIterator<Item = &'s Source>,
    ) -> f32 {
        let cfg = &self.config;
        sources
            .into_iter()
            .filter_map(|src| {
                let dt = src.elapsed(now);
                (dt >= 0.0).then(|| {
                    let d = (pos - src.pos).length();
                    cfg.envelope(src.strength, d, dt) * cfg.phase(d, dt).sin()
                })
            })
            .sum()
    }
}
