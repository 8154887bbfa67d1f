//! Scalar "energy" summarizing ripple activity, fed back into the audio graph.

use crate::constants::{ENERGY_EPSILON, ENERGY_NORM, TIME_DECAY};
use crate::sources::SourceRegistry;

pub struct EnergyFeedback {
    norm: f32,
    time_decay: f32,
    last_published: Option<f32>,
}

impl Default for EnergyFeedback {
    fn default() -> Self {
        Self::new(ENERGY_NORM, TIME_DECAY)
    }
}

impl EnergyFeedback {
    pub fn new(norm: f32, time_decay: f32) -> Self {
        Self {
            norm: norm.max(f32::EPSILON),
            time_decay,
            last_published: None,
        }
    }

    /// `clamp(Σ strength · e^(−dt/time_decay), 0, norm) / norm`, in `[0, 1]`.
    pub fn energy(&self, sources: &SourceRegistry, now: f64) -> f32 {
        let sum: f32 = sources
            .all()
            .filter_map(|s| {
                let dt = s.elapsed(now);
                (dt >= 0.0).then(|| s.strength * (-dt / self.time_decay).exp())
            })
            .sum();
        sum.clamp(0.0, self.norm) / self.norm
    }

    /// Current energy if it moved by at least `ENERGY_EPSILON` since the last
    /// value returned here.
    pub fn poll(&mut self, sources: &SourceRegistry, now: f64) -> Option<f32> {
        let e = self.energy(sources, now);
        match self.last_published {
            Some(prev) if (e - prev).abs() < ENERGY_EPSILON => None,
            _ => {
                self.last_published = Some(e);
                Some(e)
            }
        }
    }

    /// Last value handed out by [`poll`](Self::poll).
    pub fn last(&self) -> f32 {
        self.last_published.unwrap_or(0.0)
    }
}
