//! Bar-synchronized probabilistic pattern generator.
//!
//! Three repeating timers (pad, bass, percussion) fire on the transport's bar
//! grid. A firing draws from one seeded RNG and produces [`VoiceEvent`]s that
//! wait in a pending queue until they are close enough to their start time to
//! be handed to the backend. Stopping clears the queue.

use crate::constants::*;
use crate::music::{transpose, VoiceEvent, VoiceKind, BASS_NOTES, KICK_NOTE, PAD_CHORDS};
use crate::params::ParameterState;
use crate::transport::{NoteValue, Transport, TransportConfig};
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Pad,
    Bass,
    Perc,
}

/// A repeating firing every `every_bars`, first at `offset_bars`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    pub layer: Layer,
    pub every_bars: u32,
    pub offset_bars: u32,
    next_bar: u64,
}

impl Timer {
    pub const fn new(layer: Layer, every_bars: u32, offset_bars: u32) -> Self {
        Self {
            layer,
            every_bars,
            offset_bars,
            next_bar: offset_bars as u64,
        }
    }

    #[inline]
    pub fn next_bar(&self) -> u64 {
        self.next_bar
    }

    fn reset(&mut self) {
        self.next_bar = self.offset_bars as u64;
    }

    fn advance(&mut self) {
        self.next_bar += self.every_bars.max(1) as u64;
    }
}

pub struct GenerativeScheduler {
    transport: Transport,
    timers: [Timer; 3],
    rng: StdRng,
    pending: Vec<VoiceEvent>,
}

impl GenerativeScheduler {
    pub fn new(config: TransportConfig, seed: u64) -> Self {
        Self {
            transport: Transport::new(config),
            timers: [
                Timer::new(Layer::Pad, PAD_EVERY_BARS, 0),
                Timer::new(Layer::Bass, BASS_EVERY_BARS, BASS_OFFSET_BARS),
                Timer::new(Layer::Perc, PERC_EVERY_BARS, PERC_OFFSET_BARS),
            ],
            rng: StdRng::seed_from_u64(seed),
            pending: Vec::new(),
        }
    }

    /// Restart the transport at bar 0 with every timer rewound.
    pub fn start(&mut self, now: f64) {
        self.transport.start(now);
        for t in &mut self.timers {
            t.reset();
        }
        self.pending.clear();
        log::info!("[scheduler] transport started at {:.0} bpm", self.transport.bpm());
    }

    /// Halt the transport. Returns how many queued events were discarded.
    pub fn stop(&mut self) -> usize {
        self.transport.stop();
        let dropped = self.pending.len();
        self.pending.clear();
        log::info!("[scheduler] transport stopped, {} pending dropped", dropped);
        dropped
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    #[inline]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    #[inline]
    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    #[inline]
    pub fn pending(&self) -> &[VoiceEvent] {
        &self.pending
    }

    /// Fire every timer whose bar falls in the lookahead window and move due
    /// events into `out`, ordered by start time. A bar already behind `now`
    /// is skipped rather than played late.
    pub fn tick(&mut self, now: f64, params: &ParameterState, out: &mut Vec<VoiceEvent>) {
        if !self.transport.is_running() {
            return;
        }
        let horizon = now + SCHEDULE_LOOKAHEAD_SEC;
        for i in 0..self.timers.len() {
            loop {
                let timer = self.timers[i];
                let Some(at) = self.transport.time_of_bar(timer.next_bar as f64) else {
                    break;
                };
                if at >= horizon {
                    break;
                }
                if at < now {
                    log::debug!(
                        "[scheduler] missed {:?} at bar {}, dropping",
                        timer.layer,
                        timer.next_bar
                    );
                } else {
                    log::trace!("[scheduler] {:?} fires for bar {}", timer.layer, timer.next_bar);
                    self.fire(timer.layer, at, now, params);
                }
                self.timers[i].advance();
            }
        }

        let dispatch = now + DISPATCH_AHEAD_SEC;
        let (mut due, later): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|e| e.start_sec < dispatch);
        self.pending = later;
        due.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));
        out.extend(due);
    }

    fn fire(&mut self, layer: Layer, at: f64, now: f64, params: &ParameterState) {
        match layer {
            Layer::Pad => self.fire_pad(at, params),
            Layer::Bass => self.fire_bass(at, now, params),
            Layer::Perc => self.fire_perc(at, params),
        }
    }

    fn chance(&mut self, p: f32) -> bool {
        self.rng.gen::<f32>() < p
    }

    fn fire_pad(&mut self, at: f64, params: &ParameterState) {
        let chord = PAD_CHORDS[self.rng.gen_range(0..PAD_CHORDS.len())];
        let vel = PAD_VELOCITY_BASE + params.warm() * PAD_VELOCITY_SPAN;
        let bar = self.transport.duration(NoteValue::Bars(1));
        self.pending.push(VoiceEvent::new(
            VoiceKind::Pad,
            &chord,
            vel,
            at,
            self.transport.duration(NoteValue::Bars(2)) as f32,
        ));
        if self.chance(PAD_ECHO_PROB_BASE + params.space() * PAD_ECHO_PROB_SPAN) {
            let echo = transpose(&chord, PAD_ECHO_TRANSPOSE);
            self.pending.push(VoiceEvent::new(
                VoiceKind::SpacePad,
                &echo,
                vel * PAD_ECHO_VELOCITY,
                at + bar,
                bar as f32,
            ));
        }
    }

    fn fire_bass(&mut self, at: f64, now: f64, params: &ParameterState) {
        let note = BASS_NOTES[self.rng.gen_range(0..BASS_NOTES.len())];
        let jitter = self.rng.gen_range(-BASS_JITTER_SEC..BASS_JITTER_SEC);
        let vel = BASS_VELOCITY_BASE + params.density() * BASS_VELOCITY_SPAN;
        let eighth = self.transport.eighth_sec() as f32;
        let sixteenth = self.transport.sixteenth_sec() as f32;
        let start = (at + jitter).max(now);
        self.pending
            .push(VoiceEvent::new(VoiceKind::Bass, &[note], vel, start, eighth));
        if self.chance(BASS_GHOST_PROB_BASE + params.chaos() * BASS_GHOST_PROB_SPAN) {
            self.pending.push(VoiceEvent::new(
                VoiceKind::Bass,
                &[note],
                vel * BASS_GHOST_VELOCITY,
                start + self.transport.swung_sixteenth(1),
                sixteenth,
            ));
        }
    }

    fn fire_perc(&mut self, at: f64, params: &ParameterState) {
        let density = params.density();
        let chaos = params.chaos();
        let eighth = self.transport.eighth_sec();
        let sixteenth = self.transport.sixteenth_sec() as f32;
        if self.chance(KICK_PROB) {
            self.pending.push(VoiceEvent::new(
                VoiceKind::Kick,
                &[KICK_NOTE],
                KICK_VELOCITY_BASE + density * KICK_VELOCITY_SPAN,
                at,
                eighth as f32,
            ));
        }
        if self.chance(HAT_PROB_BASE + density * HAT_PROB_SPAN) {
            self.pending.push(VoiceEvent::new(
                VoiceKind::Hat,
                &[],
                HAT_VELOCITY_BASE + density * HAT_VELOCITY_SPAN,
                at + eighth,
                sixteenth,
            ));
        }
        if self.chance(chaos * BURST_PROB_SPAN) {
            self.pending.push(VoiceEvent::new(
                VoiceKind::NoiseBurst,
                &[],
                BURST_VELOCITY,
                at,
                BURST_DURATION_BASE + chaos * BURST_DURATION_SPAN,
            ));
        }
    }
}
