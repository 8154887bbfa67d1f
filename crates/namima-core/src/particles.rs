//! Particle swarm pushed around by the ripple field.
//!
//! Particles are created once and only mutated afterwards. Each tick samples
//! the field gradient at the particle, applies a force rotated 90° from it
//! (swirl rather than attraction), integrates with friction and wraps the
//! position toroidally. Drawing is left to the front-end; this module only
//! exposes the numbers a renderer needs.

use crate::constants::*;
use crate::error::{EngineError, EngineResult};
use crate::field::FieldSampler;
use crate::params::ParameterState;
use crate::sources::SourceRegistry;
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees.
    pub hue: f32,
    /// Base dot diameter in pixels.
    pub width: f32,
    /// Opacity factor in `[0, 1]`.
    pub glow: f32,
    /// `|field value|` where the particle stood at the start of the last tick.
    pub intensity: f32,
}

impl Particle {
    /// HSB brightness on a 0..255 scale.
    #[inline]
    pub fn brightness(&self) -> f32 {
        BRIGHTNESS_BASE + BRIGHTNESS_SPAN * (self.intensity * BRIGHTNESS_GAIN).min(1.0)
    }

    /// Dot diameter in pixels.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.width + self.intensity * RADIUS_GAIN
    }

    /// Alpha on a 0..255 scale.
    #[inline]
    pub fn alpha(&self) -> f32 {
        ALPHA_SCALE * self.glow
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleConfig {
    pub count: usize,
    pub force_scale: f32,
    pub friction: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT_DESKTOP,
            force_scale: FORCE_SCALE,
            friction: FRICTION,
        }
    }
}

impl ParticleConfig {
    pub fn mobile() -> Self {
        Self {
            count: PARTICLE_COUNT_MOBILE,
            ..Self::default()
        }
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    bounds: Vec2,
    force_scale: f32,
    friction: f32,
}

impl ParticleSystem {
    /// Scatter `config.count` particles uniformly over a `width × height` field.
    pub fn new(
        config: &ParticleConfig,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
    ) -> EngineResult<Self> {
        let bounds = validate_bounds(width, height)?;
        let particles = (0..config.count)
            .map(|_| Particle {
                pos: Vec2::new(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y)),
                vel: Vec2::new(
                    rng.gen_range(-PARTICLE_INIT_SPEED..PARTICLE_INIT_SPEED),
                    rng.gen_range(-PARTICLE_INIT_SPEED..PARTICLE_INIT_SPEED),
                ),
                hue: rng.gen_range(PARTICLE_HUE_MIN..PARTICLE_HUE_MAX),
                width: rng.gen_range(PARTICLE_WIDTH_MIN..PARTICLE_WIDTH_MAX),
                glow: rng.gen_range(PARTICLE_GLOW_MIN..PARTICLE_GLOW_MAX),
                intensity: 0.0,
            })
            .collect();
        Ok(Self {
            particles,
            bounds,
            force_scale: config.force_scale,
            friction: config.friction,
        })
    }

    /// Advance every particle by one step of `dt` seconds at field time `now`.
    pub fn tick(&mut self, dt: f32, sampler: &FieldSampler, sources: &SourceRegistry, now: f64) {
        for p in &mut self.particles {
            let sample = sampler.sample(p.pos, now, sources.all());
            p.intensity = sample.value.abs();
            let force = Vec2::new(-sample.gradient.y, sample.gradient.x) * self.force_scale;
            let vel = (p.vel + force * dt) * self.friction;
            let pos = p.pos + vel;
            if pos.is_finite() {
                p.vel = vel;
                p.pos = Vec2::new(wrap(pos.x, self.bounds.x), wrap(pos.y, self.bounds.y));
            } else {
                p.vel = Vec2::ZERO;
            }
        }
    }

    /// Rebound the field, wrapping particles into the new extent.
    pub fn resize(&mut self, width: f32, height: f32) -> EngineResult<()> {
        let bounds = validate_bounds(width, height)?;
        self.bounds = bounds;
        for p in &mut self.particles {
            p.pos = Vec2::new(wrap(p.pos.x, bounds.x), wrap(p.pos.y, bounds.y));
        }
        Ok(())
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }
}

fn validate_bounds(width: f32, height: f32) -> EngineResult<Vec2> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(Vec2::new(width, height))
    } else {
        Err(EngineError::InvalidBounds { width, height })
    }
}

/// Wrap `v` into `[0, max)`.
#[inline]
pub fn wrap(v: f32, max: f32) -> f32 {
    let r = v.rem_euclid(max);
    // rem_euclid can round up to `max` for tiny negative inputs
    if r >= max {
        0.0
    } else {
        r
    }
}

/// Backdrop colours derived from the controls, for the renderer's background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backdrop {
    pub inner_hue: f32,
    pub inner_lightness: f32,
    pub outer_hue: f32,
}

impl Backdrop {
    pub fn from_params(params: &ParameterState) -> Self {
        let inner_hue = 210.0 + (params.space() - 0.5) * 60.0;
        Self {
            inner_hue,
            inner_lightness: 25.0 + params.warm() * 15.0,
            outer_hue: inner_hue + params.chaos() * 40.0,
        }
    }
}
