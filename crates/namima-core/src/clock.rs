//! Time sources for the engine.
//!
//! Everything in the core reads time in seconds as `f64`. Front-ends use
//! [`InstantClock`]; tests drive a [`ManualClock`] they can share with the
//! engine and advance by hand.

use instant::Instant;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic time in seconds since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall-clock time measured from construction. Works on wasm through `instant`.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock. Clones share the same time value.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_sec: f64) -> Self {
        let clock = Self::default();
        clock.set(start_sec);
        clock
    }

    pub fn set(&self, t: f64) {
        self.bits.store(t.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, dt: f64) {
        self.set(self.now() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
