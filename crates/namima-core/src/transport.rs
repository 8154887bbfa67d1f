//! Musical transport: tempo, bar grid and swing in engine-clock seconds.

use crate::constants::{BEATS_PER_BAR, DEFAULT_BPM, DEFAULT_SWING, TRANSPORT_LEAD_IN_SEC};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportConfig {
    pub bpm: f32,
    pub beats_per_bar: u32,
    /// Fraction of half a sixteenth by which odd sixteenths are delayed.
    pub swing: f32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            beats_per_bar: BEATS_PER_BAR,
            swing: DEFAULT_SWING,
        }
    }
}

/// Musical note lengths the scheduler speaks in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteValue {
    /// Whole bars ("1m", "2m", "4m").
    Bars(u32),
    Eighth,
    Sixteenth,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Anchor {
    time: f64,
    bar: f64,
}

/// Tempo clock mapping bars to engine-clock seconds.
///
/// While running, bar position is linear in time from an anchor point. Tempo
/// changes re-anchor at the current position so the bar count never jumps.
#[derive(Clone, Debug)]
pub struct Transport {
    config: TransportConfig,
    anchor: Option<Anchor>,
}

impl Transport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config: TransportConfig {
                bpm: config.bpm.max(1.0),
                beats_per_bar: config.beats_per_bar.max(1),
                swing: config.swing.clamp(0.0, 1.0),
            },
            anchor: None,
        }
    }

    /// Start at bar 0, a short lead-in after `now`.
    pub fn start(&mut self, now: f64) {
        self.anchor = Some(Anchor {
            time: now + TRANSPORT_LEAD_IN_SEC,
            bar: 0.0,
        });
    }

    pub fn stop(&mut self) {
        self.anchor = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    #[inline]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    #[inline]
    pub fn bpm(&self) -> f32 {
        self.config.bpm
    }

    #[inline]
    pub fn beat_sec(&self) -> f64 {
        60.0 / self.config.bpm as f64
    }

    #[inline]
    pub fn bar_sec(&self) -> f64 {
        self.beat_sec() * self.config.beats_per_bar as f64
    }

    #[inline]
    pub fn eighth_sec(&self) -> f64 {
        self.beat_sec() / 2.0
    }

    #[inline]
    pub fn sixteenth_sec(&self) -> f64 {
        self.beat_sec() / 4.0
    }

    pub fn set_bpm(&mut self, bpm: f32, now: f64) {
        let bpm = bpm.max(1.0);
        if let Some(bar) = self.bars_at(now) {
            self.anchor = Some(Anchor { time: now, bar });
        }
        self.config.bpm = bpm;
    }

    pub fn duration(&self, value: NoteValue) -> f64 {
        match value {
            NoteValue::Bars(n) => self.bar_sec() * n as f64,
            NoteValue::Eighth => self.eighth_sec(),
            NoteValue::Sixteenth => self.sixteenth_sec(),
        }
    }

    /// Offset of the `n`th sixteenth from a bar line, with swing applied to odd ones.
    pub fn swung_sixteenth(&self, n: u32) -> f64 {
        let step = self.sixteenth_sec();
        let straight = step * n as f64;
        if n % 2 == 1 {
            straight + self.config.swing as f64 * 0.5 * step
        } else {
            straight
        }
    }

    /// Bar position at `t`; negative during the lead-in. `None` when stopped.
    pub fn bars_at(&self, t: f64) -> Option<f64> {
        let a = self.anchor?;
        Some(a.bar + (t - a.time) / self.bar_sec())
    }

    /// Clock time at which `bar` begins. `None` when stopped.
    pub fn time_of_bar(&self, bar: f64) -> Option<f64> {
        let a = self.anchor?;
        Some(a.time + (bar - a.bar) * self.bar_sec())
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}
