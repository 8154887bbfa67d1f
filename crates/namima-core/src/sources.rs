//! Ripple sources injected by taps, and the bounded registry that owns them.

use crate::constants::{MAX_SOURCES, SOURCE_EXPIRY_SEC};
use crate::params::clamp_unit;
use glam::Vec2;
use std::collections::VecDeque;

/// A decaying emitter of field disturbance. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Source {
    pub pos: Vec2,
    /// Field time at creation, in seconds.
    pub t0: f64,
    /// In `[0, 1]`.
    pub strength: f32,
}

impl Source {
    /// Seconds since creation; negative if `now` precedes `t0`.
    #[inline]
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.t0) as f32
    }
}

/// Time-ordered ring of live sources (oldest first), capped at `capacity`.
///
/// Times are supplied by the caller so the registry follows whatever clock
/// drives the field; the engine feeds it field time, which stops while the
/// engine is stopped.
#[derive(Clone, Debug)]
pub struct SourceRegistry {
    sources: VecDeque<Source>,
    capacity: usize,
    expiry_sec: f64,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new(MAX_SOURCES, SOURCE_EXPIRY_SEC)
    }
}

impl SourceRegistry {
    pub fn new(capacity: usize, expiry_sec: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            sources: VecDeque::with_capacity(capacity + 1),
            capacity,
            expiry_sec,
        }
    }

    /// Append a source stamped `now`. Strength is clamped to `[0, 1]`.
    /// Returns the source evicted to stay within capacity, if any.
    pub fn add(&mut self, pos: Vec2, strength: f32, now: f64) -> Option<Source> {
        self.sources.push_back(Source {
            pos,
            t0: now,
            strength: clamp_unit(strength),
        });
        if self.sources.len() > self.capacity {
            self.sources.pop_front()
        } else {
            None
        }
    }

    /// Drop every source with `now - t0 >= expiry`. Returns how many were removed.
    pub fn prune(&mut self, now: f64) -> usize {
        let before = self.sources.len();
        let expiry = self.expiry_sec;
        self.sources.retain(|s| now - s.t0 < expiry);
        before - self.sources.len()
    }

    /// Live sources, oldest to newest.
    pub fn all(&self) -> impl Iterator<Item = &Source> + '_ {
        self.sources.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    #[inline]
    pub fn expiry_sec(&self) -> f64 {
        self.expiry_sec
    }

    pub fn newest(&self) -> Option<&Source> {
        self.sources.back()
    }
}
