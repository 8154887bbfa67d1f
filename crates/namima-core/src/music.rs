//! Note tables, voice events and the tap-to-pitch mapping.

use crate::constants::*;
use crate::graph::Bus;
use smallvec::{smallvec, SmallVec};

/// Basic oscillator shape used by synths in the front-ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// What kind of voice a trigger asks the backend to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoiceKind {
    /// Sustained chord on the warm layer.
    Pad,
    /// Echo chord on the space layer's synth.
    SpacePad,
    Bass,
    Kick,
    Hat,
    /// Short filtered noise burst on the chaos layer.
    NoiseBurst,
    /// Plucked tap note.
    Pluck,
    /// Soft pad answering taps, also used for the intro chord.
    TouchPad,
}

impl VoiceKind {
    /// Bus a voice of this kind is routed to.
    pub fn layer(self) -> Bus {
        match self {
            VoiceKind::Pad => Bus::Warm,
            VoiceKind::SpacePad | VoiceKind::Hat => Bus::Space,
            VoiceKind::NoiseBurst => Bus::Chaos,
            VoiceKind::Bass | VoiceKind::Kick => Bus::Bass,
            VoiceKind::Pluck | VoiceKind::TouchPad => Bus::Touch,
        }
    }
}

/// A fire-and-forget voice trigger handed to the audio backend.
///
/// Fields:
/// - `kind`: which voice to play; its bus is `kind.layer()`
/// - `notes`: MIDI note numbers (empty for unpitched voices)
/// - `velocity`: normalized loudness 0..1
/// - `start_sec`: absolute start time on the engine clock
/// - `duration_sec`: nominal length before release
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceEvent {
    pub kind: VoiceKind,
    pub notes: SmallVec<[i32; 4]>,
    pub velocity: f32,
    pub start_sec: f64,
    pub duration_sec: f32,
}

impl VoiceEvent {
    pub fn new(
        kind: VoiceKind,
        notes: &[i32],
        velocity: f32,
        start_sec: f64,
        duration_sec: f32,
    ) -> Self {
        Self {
            kind,
            notes: SmallVec::from_slice(notes),
            velocity: velocity.clamp(0.0, 1.0),
            start_sec,
            duration_sec,
        }
    }

    #[inline]
    pub fn layer(&self) -> Bus {
        self.kind.layer()
    }

    pub fn frequencies(&self) -> impl Iterator<Item = f32> + '_ {
        self.notes.iter().map(|&m| midi_to_hz(m as f32))
    }
}

// Note tables (MIDI, C4 = 60)

/// Pad voicings: Cm9-ish, Fm9-ish, Dm7(9), Bbmaj7(9).
pub const PAD_CHORDS: [[i32; 4]; 4] = [
    [60, 67, 70, 74], // C4 G4 Bb4 D5
    [65, 72, 75, 79], // F4 C5 Eb5 G5
    [62, 69, 72, 76], // D4 A4 C5 E5
    [58, 65, 69, 72], // Bb3 F4 A4 C5
];

pub const BASS_NOTES: [i32; 4] = [36, 31, 33, 29]; // C2 G1 A1 F1
pub const KICK_NOTE: i32 = 24; // C1
pub const INTRO_CHORD: [i32; 3] = [48, 55, 56]; // C3 G3 Ab3

/// Minor-ish pentatonic pitch classes used for taps: C D Eb G Ab.
pub const TAP_SCALE: [i32; 5] = [0, 2, 3, 7, 8];

/// Quantize a normalized horizontal position onto the tap scale.
///
/// Octave is `3 + floor(x·3)` and degree `floor(x·5) mod 5`, with `x` clamped
/// to `[0, 1)` so the result stays within octaves 3..=5.
pub fn note_from_x(x_norm: f32) -> i32 {
    let x = if x_norm.is_nan() {
        0.0
    } else {
        x_norm.clamp(0.0, 1.0 - f32::EPSILON)
    };
    let octave = 3 + (x * 3.0).floor() as i32;
    let idx = ((x * TAP_SCALE.len() as f32).floor() as usize) % TAP_SCALE.len();
    12 * (octave + 1) + TAP_SCALE[idx]
}

/// Shift every note of a chord by `semitones`.
pub fn transpose(notes: &[i32], semitones: i32) -> SmallVec<[i32; 4]> {
    notes.iter().map(|n| n + semitones).collect()
}

/// Voices answering a tap at normalized `x_norm` with `intensity` in `[0, 1]`.
///
/// Always a pluck; a two-note sparkle pad as well when `sparkle` is set.
pub fn tap_voices(
    x_norm: f32,
    intensity: f32,
    now: f64,
    sparkle: bool,
) -> SmallVec<[VoiceEvent; 2]> {
    let intensity = crate::params::clamp_unit(intensity);
    let note = note_from_x(x_norm);
    let vel = (TAP_VELOCITY_BASE + intensity * TAP_VELOCITY_SPAN).min(TAP_VELOCITY_MAX);
    let mut out: SmallVec<[VoiceEvent; 2]> = smallvec![VoiceEvent::new(
        VoiceKind::Pluck,
        &[note],
        vel * TAP_PLUCK_VELOCITY,
        now,
        TAP_PLUCK_DURATION_BASE + intensity * TAP_PLUCK_DURATION_SPAN,
    )];
    if sparkle {
        let second = note_from_x((x_norm.clamp(0.0, 1.0) + TAP_SPARKLE_OFFSET) % 1.0);
        out.push(VoiceEvent::new(
            VoiceKind::TouchPad,
            &[note, second],
            vel * TAP_SPARKLE_VELOCITY,
            now + TAP_SPARKLE_DELAY_SEC,
            TAP_SPARKLE_DURATION_SEC,
        ));
    }
    out
}

/// Convert a MIDI note number to Hertz (A4=440 Hz).
///
/// Monotonic and exhibits octave symmetry: +12 semitones doubles the frequency.
pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}
