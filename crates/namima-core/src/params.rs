//! The four performer-facing controls.
//!
//! Values are always kept inside `[0, 1]`. Out-of-range or non-finite input is
//! clamped on write rather than rejected; NaN maps to 0.

/// One of the four continuous controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Knob {
    Warm,
    Space,
    Chaos,
    Density,
}

impl Knob {
    pub const ALL: [Knob; 4] = [Knob::Warm, Knob::Space, Knob::Chaos, Knob::Density];

    pub fn name(self) -> &'static str {
        match self {
            Knob::Warm => "warm",
            Knob::Space => "space",
            Knob::Chaos => "chaos",
            Knob::Density => "density",
        }
    }
}

/// Normalized control values. Mutated only through explicit control changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterState {
    warm: f32,
    space: f32,
    chaos: f32,
    density: f32,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            warm: 0.6,
            space: 0.7,
            chaos: 0.3,
            density: 0.5,
        }
    }
}

impl ParameterState {
    pub fn new(warm: f32, space: f32, chaos: f32, density: f32) -> Self {
        Self {
            warm: clamp_unit(warm),
            space: clamp_unit(space),
            chaos: clamp_unit(chaos),
            density: clamp_unit(density),
        }
    }

    #[inline]
    pub fn warm(&self) -> f32 {
        self.warm
    }

    #[inline]
    pub fn space(&self) -> f32 {
        self.space
    }

    #[inline]
    pub fn chaos(&self) -> f32 {
        self.chaos
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn get(&self, knob: Knob) -> f32 {
        match knob {
            Knob::Warm => self.warm,
            Knob::Space => self.space,
            Knob::Chaos => self.chaos,
            Knob::Density => self.density,
        }
    }

    /// Store `value` clamped to `[0, 1]` and return what was stored.
    pub fn set(&mut self, knob: Knob, value: f32) -> f32 {
        let v = clamp_unit(value);
        if v != value {
            log::debug!("[params] {} input {} clamped to {}", knob.name(), value, v);
        }
        match knob {
            Knob::Warm => self.warm = v,
            Knob::Space => self.space = v,
            Knob::Chaos => self.chaos = v,
            Knob::Density => self.density = v,
        }
        v
    }
}

/// Map an integer slider position in 0..=100 onto `[0, 1]`, clamping outliers.
pub fn normalize_slider(raw: i32) -> f32 {
    raw.clamp(0, 100) as f32 / 100.0
}

#[inline]
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
