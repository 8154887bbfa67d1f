//! The seam between the platform-free graph model and a host audio facility.
//!
//! A backend realizes the declared [`Topology`] with real nodes, applies
//! parameter ramps and plays voice triggers. Times passed in are on the
//! engine clock; `now` lets the backend translate them to its own timeline.

use crate::error::{EngineError, EngineResult};
use crate::graph::{ParamAddress, Topology};
use crate::music::VoiceEvent;
use crate::ramp::Ramp;

pub trait AudioBackend {
    /// Allocate generator/effect nodes and wire the static topology.
    /// Called once per successful graph start.
    fn build(&mut self, topology: &Topology) -> EngineResult<()>;

    /// Apply a smoothed change to one addressed parameter. The ramp may have
    /// started before `now`; the backend continues it from its value at `now`.
    fn ramp(&mut self, addr: ParamAddress, ramp: &Ramp, now: f64);

    /// Play a fire-and-forget voice. Failure drops the voice.
    fn trigger(&mut self, voice: &VoiceEvent, now: f64) -> EngineResult<()>;

    /// Silence anything handed over earlier whose start time is still ahead of `now`.
    fn cancel_scheduled(&mut self, now: f64);
}

/// Backend that records every call. Used by tests and the headless runner.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub builds: usize,
    pub ramps: Vec<(ParamAddress, Ramp)>,
    pub triggers: Vec<VoiceEvent>,
    pub cancels: Vec<f64>,
    /// When set, `build` reports the output as unavailable.
    pub fail_build: bool,
    /// When set, every trigger fails with `NodeUnavailable`.
    pub fail_triggers: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent ramp issued for `addr`.
    pub fn last_ramp(&self, addr: ParamAddress) -> Option<&Ramp> {
        self.ramps
            .iter()
            .rev()
            .find(|(a, _)| *a == addr)
            .map(|(_, r)| r)
    }
}

impl AudioBackend for RecordingBackend {
    fn build(&mut self, _topology: &Topology) -> EngineResult<()> {
        if self.fail_build {
            return Err(EngineError::AudioUnavailable(
                "output not permitted before a user gesture".into(),
            ));
        }
        self.builds += 1;
        Ok(())
    }

    fn ramp(&mut self, addr: ParamAddress, ramp: &Ramp, _now: f64) {
        self.ramps.push((addr, *ramp));
    }

    fn trigger(&mut self, voice: &VoiceEvent, _now: f64) -> EngineResult<()> {
        if self.fail_triggers {
            return Err(EngineError::NodeUnavailable(format!("{:?}", voice.kind)));
        }
        self.triggers.push(voice.clone());
        Ok(())
    }

    fn cancel_scheduled(&mut self, now: f64) {
        self.cancels.push(now);
    }
}
