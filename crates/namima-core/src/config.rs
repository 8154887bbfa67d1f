use crate::constants::{ENERGY_NORM, MAX_SOURCES, SOURCE_EXPIRY_SEC};
use crate::field::FieldConfig;
use crate::particles::ParticleConfig;
use crate::transport::TransportConfig;

/// Everything an [`Engine`](crate::Engine) needs to know up front.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub field: FieldConfig,
    pub particles: ParticleConfig,
    pub max_sources: usize,
    pub source_expiry_sec: f64,
    pub energy_norm: f32,
    pub transport: TransportConfig,
    /// Base seed for the scheduler; particle and tap RNGs derive from it.
    pub seed: u64,
    /// Field extent in pixels.
    pub field_size: (f32, f32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            particles: ParticleConfig::default(),
            max_sources: MAX_SOURCES,
            source_expiry_sec: SOURCE_EXPIRY_SEC,
            energy_norm: ENERGY_NORM,
            transport: TransportConfig::default(),
            seed: 42,
            field_size: (1280.0, 720.0),
        }
    }
}

impl EngineConfig {
    /// Lighter particle load for phones and tablets.
    pub fn mobile() -> Self {
        Self {
            particles: ParticleConfig::mobile(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.field_size = (width, height);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
