//! Declared audio topology and the parameter model that drives it.
//!
//! The graph is static: a master bus (gain → compressor → limiter → output)
//! fed by one bus per layer. Each bus holds one or more chains of generators
//! followed by effects. Parameters are addressed by `(bus, node, param)` and
//! every write is clamped into the parameter's declared range and applied as
//! a ramp, never as a jump.

use crate::backend::AudioBackend;
use crate::constants::*;
use crate::error::EngineResult;
use crate::music::{tap_voices, VoiceEvent, VoiceKind, Waveform};
use crate::params::{clamp_unit, ParameterState};
use crate::ramp::{Ramp, SafeRange};
use fnv::FnvHashMap;
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bus {
    Master,
    Warm,
    Space,
    Chaos,
    Bass,
    /// Tap responses; the chain energy feedback drives.
    Touch,
}

impl Bus {
    pub const LAYERS: [Bus; 5] = [Bus::Warm, Bus::Space, Bus::Chaos, Bus::Bass, Bus::Touch];

    pub fn name(self) -> &'static str {
        match self {
            Bus::Master => "master",
            Bus::Warm => "warm",
            Bus::Space => "space",
            Bus::Chaos => "chaos",
            Bus::Bass => "bass",
            Bus::Touch => "touch",
        }
    }
}

/// Node within a bus. Unique per bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    /// Bus output level.
    Level,
    Filter,
    NoiseFilter,
    NoiseGain,
    Reverb,
    Chorus,
    Delay,
    Crusher,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Gain,
    Cutoff,
    Q,
    Wet,
    Feedback,
    Depth,
    Bits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamAddress {
    pub bus: Bus,
    pub node: Node,
    pub param: Param,
}

impl ParamAddress {
    pub const fn new(bus: Bus, node: Node, param: Param) -> Self {
        Self { bus, node, param }
    }
}

pub const MASTER_GAIN: ParamAddress = ParamAddress::new(Bus::Master, Node::Level, Param::Gain);
pub const WARM_NOISE_GAIN: ParamAddress =
    ParamAddress::new(Bus::Warm, Node::NoiseGain, Param::Gain);
pub const WARM_CUTOFF: ParamAddress = ParamAddress::new(Bus::Warm, Node::Filter, Param::Cutoff);
pub const WARM_REVERB_WET: ParamAddress = ParamAddress::new(Bus::Warm, Node::Reverb, Param::Wet);
pub const SPACE_DELAY_FEEDBACK: ParamAddress =
    ParamAddress::new(Bus::Space, Node::Delay, Param::Feedback);
pub const SPACE_REVERB_WET: ParamAddress = ParamAddress::new(Bus::Space, Node::Reverb, Param::Wet);
pub const CHAOS_BITS: ParamAddress = ParamAddress::new(Bus::Chaos, Node::Crusher, Param::Bits);
pub const CHAOS_GAIN: ParamAddress = ParamAddress::new(Bus::Chaos, Node::NoiseGain, Param::Gain);
pub const TOUCH_CUTOFF: ParamAddress = ParamAddress::new(Bus::Touch, Node::Filter, Param::Cutoff);
pub const TOUCH_REVERB_WET: ParamAddress = ParamAddress::new(Bus::Touch, Node::Reverb, Param::Wet);

const GAIN_RANGE: SafeRange = SafeRange::new(0.0, 1.5);
const CUTOFF_RANGE: SafeRange = SafeRange::new(20.0, 20_000.0);
const Q_RANGE: SafeRange = SafeRange::new(0.0001, 30.0);
const WET_RANGE: SafeRange = SafeRange::new(0.0, 1.0);
const FEEDBACK_RANGE: SafeRange = SafeRange::new(0.0, 0.95);
const BITS_RANGE: SafeRange = SafeRange::new(1.0, 16.0);

// ---------------- Topology declaration ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoiseColor {
    White,
    Pink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Bandpass,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

/// Slow pitch wander applied to a synth's detune.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drift {
    pub rate_hz: f32,
    pub depth_cents: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Generator {
    /// Pitched voices created per trigger.
    Tonal {
        voice: VoiceKind,
        waveform: Waveform,
        envelope: Envelope,
        drift: Option<Drift>,
    },
    /// Unpitched or self-enveloped one-shots created per trigger.
    Percussive { voice: VoiceKind },
    /// Continuously running noise bed.
    Noise { color: NoiseColor },
}

impl Generator {
    pub fn voice(&self) -> Option<VoiceKind> {
        match *self {
            Generator::Tonal { voice, .. } | Generator::Percussive { voice } => Some(voice),
            Generator::Noise { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    Filter { kind: FilterKind, cutoff_hz: f32, q: f32 },
    Reverb { decay_sec: f32, pre_delay_sec: f32, wet: f32 },
    Chorus { rate_hz: f32, delay_ms: f32, depth: f32 },
    FeedbackDelay { delay_sec: f32, feedback: f32, wet: f32 },
    Crusher { bits: f32 },
    Gain { level: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectDecl {
    pub node: Node,
    pub effect: Effect,
}

impl EffectDecl {
    pub const fn new(node: Node, effect: Effect) -> Self {
        Self { node, effect }
    }

    /// Addressable parameters of this node with their ranges and initial values.
    fn params(&self) -> SmallVec<[(Param, SafeRange, f32); 2]> {
        match self.effect {
            Effect::Filter { cutoff_hz, q, .. } => {
                smallvec![(Param::Cutoff, CUTOFF_RANGE, cutoff_hz), (Param::Q, Q_RANGE, q)]
            }
            Effect::Reverb { wet, .. } => smallvec![(Param::Wet, WET_RANGE, wet)],
            Effect::Chorus { depth, .. } => smallvec![(Param::Depth, WET_RANGE, depth)],
            Effect::FeedbackDelay { feedback, wet, .. } => smallvec![
                (Param::Feedback, FEEDBACK_RANGE, feedback),
                (Param::Wet, WET_RANGE, wet)
            ],
            Effect::Crusher { bits } => smallvec![(Param::Bits, BITS_RANGE, bits)],
            Effect::Gain { level } => smallvec![(Param::Gain, GAIN_RANGE, level)],
        }
    }
}

/// Generators feeding a serial effect chain that ends at the bus level node.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainDecl {
    pub generators: SmallVec<[Generator; 2]>,
    pub effects: SmallVec<[EffectDecl; 3]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BusDecl {
    pub bus: Bus,
    pub level: f32,
    pub chains: SmallVec<[ChainDecl; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compressor {
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_sec: f32,
    pub release_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MasterDecl {
    pub level: f32,
    pub compressor: Compressor,
    pub limiter_db: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    pub master: MasterDecl,
    pub buses: Vec<BusDecl>,
}

impl Topology {
    /// The instrument's fixed graph. `bpm` sets the tempo-synced delay time.
    pub fn standard(bpm: f32) -> Self {
        let eighth_sec = 60.0 / bpm.max(1.0) / 2.0;
        let warm = BusDecl {
            bus: Bus::Warm,
            level: 0.6,
            chains: smallvec![
                ChainDecl {
                    generators: smallvec![Generator::Tonal {
                        voice: VoiceKind::Pad,
                        waveform: Waveform::Triangle,
                        envelope: Envelope { attack: 1.2, decay: 0.6, sustain: 0.8, release: 4.5 },
                        drift: Some(Drift { rate_hz: 0.12, depth_cents: 8.0 }),
                    }],
                    effects: smallvec![
                        EffectDecl::new(
                            Node::Filter,
                            Effect::Filter { kind: FilterKind::Lowpass, cutoff_hz: 1500.0, q: 1.0 }
                        ),
                        EffectDecl::new(
                            Node::Reverb,
                            Effect::Reverb { decay_sec: 5.0, pre_delay_sec: 0.15, wet: 0.5 }
                        ),
                    ],
                },
                ChainDecl {
                    generators: smallvec![Generator::Noise { color: NoiseColor::Pink }],
                    effects: smallvec![
                        EffectDecl::new(
                            Node::NoiseFilter,
                            Effect::Filter { kind: FilterKind::Lowpass, cutoff_hz: 800.0, q: 1.0 }
                        ),
                        EffectDecl::new(Node::NoiseGain, Effect::Gain { level: 0.12 }),
                    ],
                },
            ],
        };
        let space = BusDecl {
            bus: Bus::Space,
            level: 0.8,
            chains: smallvec![
                ChainDecl {
                    generators: smallvec![Generator::Tonal {
                        voice: VoiceKind::SpacePad,
                        waveform: Waveform::Sine,
                        envelope: Envelope { attack: 2.0, decay: 1.0, sustain: 0.8, release: 6.0 },
                        drift: None,
                    }],
                    effects: smallvec![
                        EffectDecl::new(
                            Node::Chorus,
                            Effect::Chorus { rate_hz: 0.15, delay_ms: 4.0, depth: 0.5 }
                        ),
                        EffectDecl::new(
                            Node::Delay,
                            Effect::FeedbackDelay {
                                delay_sec: eighth_sec,
                                feedback: 0.35,
                                wet: 0.5,
                            },
                        ),
                        EffectDecl::new(
                            Node::Reverb,
                            Effect::Reverb { decay_sec: 8.0, pre_delay_sec: 0.25, wet: 0.7 }
                        ),
                    ],
                },
                ChainDecl {
                    generators: smallvec![Generator::Percussive { voice: VoiceKind::Hat }],
                    effects: SmallVec::new(),
                },
            ],
        };
        let chaos = BusDecl {
            bus: Bus::Chaos,
            level: 0.6,
            chains: smallvec![ChainDecl {
                generators: smallvec![
                    Generator::Noise { color: NoiseColor::White },
                    Generator::Percussive { voice: VoiceKind::NoiseBurst },
                ],
                effects: smallvec![
                    EffectDecl::new(Node::Crusher, Effect::Crusher { bits: 4.0 }),
                    EffectDecl::new(
                        Node::Filter,
                        Effect::Filter { kind: FilterKind::Bandpass, cutoff_hz: 1200.0, q: 1.0 }
                    ),
                    EffectDecl::new(Node::NoiseGain, Effect::Gain { level: 0.05 }),
                ],
            }],
        };
        let bass = BusDecl {
            bus: Bus::Bass,
            level: 0.9,
            chains: smallvec![
                ChainDecl {
                    generators: smallvec![Generator::Tonal {
                        voice: VoiceKind::Bass,
                        waveform: Waveform::Saw,
                        envelope: Envelope { attack: 0.02, decay: 0.3, sustain: 0.5, release: 0.8 },
                        drift: None,
                    }],
                    effects: smallvec![EffectDecl::new(
                        Node::Filter,
                        Effect::Filter { kind: FilterKind::Lowpass, cutoff_hz: 120.0, q: 1.0 }
                    )],
                },
                ChainDecl {
                    generators: smallvec![Generator::Percussive { voice: VoiceKind::Kick }],
                    effects: SmallVec::new(),
                },
            ],
        };
        let touch = BusDecl {
            bus: Bus::Touch,
            level: 0.9,
            chains: smallvec![ChainDecl {
                generators: smallvec![
                    Generator::Percussive { voice: VoiceKind::Pluck },
                    Generator::Tonal {
                        voice: VoiceKind::TouchPad,
                        waveform: Waveform::Sine,
                        envelope: Envelope { attack: 0.6, decay: 0.2, sustain: 0.7, release: 2.6 },
                        drift: None,
                    },
                ],
                effects: smallvec![
                    EffectDecl::new(
                        Node::Filter,
                        Effect::Filter { kind: FilterKind::Lowpass, cutoff_hz: 900.0, q: 0.6 }
                    ),
                    EffectDecl::new(
                        Node::Reverb,
                        Effect::Reverb { decay_sec: 3.0, pre_delay_sec: 0.0, wet: 0.22 }
                    ),
                ],
            }],
        };
        Self {
            master: MasterDecl {
                level: 0.9,
                compressor: Compressor {
                    threshold_db: -18.0,
                    ratio: 3.0,
                    attack_sec: 0.01,
                    release_sec: 0.15,
                },
                limiter_db: -0.5,
            },
            buses: vec![warm, space, chaos, bass, touch],
        }
    }

    pub fn bus(&self, bus: Bus) -> Option<&BusDecl> {
        self.buses.iter().find(|b| b.bus == bus)
    }

    /// Bus and chain index that plays voices of `kind`.
    pub fn chain_for(&self, kind: VoiceKind) -> Option<(Bus, usize)> {
        self.buses.iter().find_map(|b| {
            b.chains
                .iter()
                .position(|c| c.generators.iter().any(|g| g.voice() == Some(kind)))
                .map(|i| (b.bus, i))
        })
    }

    /// Every addressable parameter with its declared range and initial value.
    pub fn params(&self) -> Vec<(ParamAddress, SafeRange, f32)> {
        let mut out = vec![(MASTER_GAIN, GAIN_RANGE, self.master.level)];
        for b in &self.buses {
            out.push((ParamAddress::new(b.bus, Node::Level, Param::Gain), GAIN_RANGE, b.level));
            for chain in &b.chains {
                for fx in &chain.effects {
                    for (param, range, initial) in fx.params() {
                        out.push((ParamAddress::new(b.bus, fx.node, param), range, initial));
                    }
                }
            }
        }
        out
    }
}

// ---------------- Parameter model ----------------

#[derive(Clone, Copy, Debug)]
struct ParamSlot {
    range: SafeRange,
    ramp: Ramp,
}

/// Live model of the audio graph: parameter ramps, start gating and tap
/// response. Owns the backend that realizes it.
pub struct AudioGraph<B: AudioBackend> {
    backend: B,
    topology: Topology,
    params: FnvHashMap<ParamAddress, ParamSlot>,
    started: bool,
    master_base: f32,
    energy_factor: f32,
    last_tap: Option<f64>,
}

impl<B: AudioBackend> AudioGraph<B> {
    pub fn new(topology: Topology, backend: B) -> Self {
        let params = topology
            .params()
            .into_iter()
            .map(|(addr, range, initial)| {
                let v = range.clamp(initial);
                (addr, ParamSlot { range, ramp: Ramp::hold(v, 0.0) })
            })
            .collect();
        let master_base = topology.master.level;
        Self {
            backend,
            topology,
            params,
            started: false,
            master_base,
            energy_factor: 1.0,
            last_tap: None,
        }
    }

    /// Build the backend graph once. Returns `Ok(true)` on the call that
    /// actually started it and `Ok(false)` if it was already running. On error
    /// nothing is marked started, so a later call may retry.
    pub fn start(&mut self, now: f64) -> EngineResult<bool> {
        if self.started {
            return Ok(false);
        }
        self.backend.build(&self.topology)?;
        // Bring the fresh nodes in line with anything set before start
        for (addr, slot) in &self.params {
            self.backend.ramp(*addr, &slot.ramp, now);
        }
        self.started = true;
        log::info!(
            "[graph] started: {} buses, {} parameters",
            self.topology.buses.len(),
            self.params.len()
        );
        Ok(true)
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Map the four controls onto their node parameters.
    pub fn apply_parameters(&mut self, p: &ParameterState, now: f64) {
        let warm = p.warm();
        let space = p.space();
        let chaos = p.chaos();
        self.ramp_param(
            WARM_NOISE_GAIN,
            WARM_NOISE_BASE + WARM_NOISE_SPAN * warm,
            RAMP_WARM_NOISE_SEC,
            now,
        );
        self.ramp_param(
            WARM_CUTOFF,
            WARM_CUTOFF_BASE + WARM_CUTOFF_SPAN * warm,
            RAMP_WARM_CUTOFF_SEC,
            now,
        );
        self.ramp_param(
            WARM_REVERB_WET,
            WARM_REVERB_BASE + WARM_REVERB_SPAN * space,
            RAMP_SPACE_SEC,
            now,
        );
        self.ramp_param(
            SPACE_DELAY_FEEDBACK,
            SPACE_FEEDBACK_BASE + SPACE_FEEDBACK_SPAN * space,
            RAMP_SPACE_SEC,
            now,
        );
        self.ramp_param(
            SPACE_REVERB_WET,
            SPACE_REVERB_BASE + SPACE_REVERB_SPAN * space,
            RAMP_SPACE_SEC,
            now,
        );
        self.ramp_param(
            CHAOS_BITS,
            CHAOS_BITS_BASE + (CHAOS_BITS_SPAN * chaos).floor(),
            RAMP_CHAOS_SEC,
            now,
        );
        self.ramp_param(CHAOS_GAIN, CHAOS_GAIN_BASE + CHAOS_GAIN_SPAN * chaos, RAMP_CHAOS_SEC, now);
        self.master_base = MASTER_LEVEL_BASE + MASTER_LEVEL_SPAN * p.density();
        self.ramp_master(RAMP_DENSITY_SEC, now);
    }

    /// Drive the touch chain and master level from field energy in `[0, 1]`.
    pub fn set_energy(&mut self, energy: f32, now: f64) {
        let e = clamp_unit(energy);
        self.ramp_param(
            TOUCH_CUTOFF,
            ENERGY_CUTOFF_BASE + ENERGY_CUTOFF_SPAN * e,
            RAMP_ENERGY_CUTOFF_SEC,
            now,
        );
        self.ramp_param(
            TOUCH_REVERB_WET,
            ENERGY_REVERB_BASE + ENERGY_REVERB_SPAN * e,
            RAMP_ENERGY_SEC,
            now,
        );
        self.energy_factor = ENERGY_GAIN_BASE + ENERGY_GAIN_SPAN * e;
        self.ramp_master(RAMP_ENERGY_SEC, now);
    }

    /// Answer a tap with a pluck, plus a sparkle pad after a pause. Returns
    /// the voices handed to the backend; nothing sounds before start.
    pub fn on_tap(&mut self, x_norm: f32, intensity: f32, now: f64) -> SmallVec<[VoiceEvent; 2]> {
        if !self.started {
            return SmallVec::new();
        }
        let sparkle = self
            .last_tap
            .map_or(true, |prev| now - prev > TAP_SPARKLE_GAP_SEC);
        self.last_tap = Some(now);
        let voices = tap_voices(x_norm, intensity, now, sparkle);
        for v in &voices {
            self.trigger(v, now);
        }
        voices
    }

    /// Hand one voice to the backend. A failed trigger is dropped.
    pub fn trigger(&mut self, voice: &VoiceEvent, now: f64) -> bool {
        if !self.started {
            return false;
        }
        match self.backend.trigger(voice, now) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("[graph] dropped {:?} voice: {}", voice.kind, e);
                false
            }
        }
    }

    pub fn cancel_scheduled(&mut self, now: f64) {
        if self.started {
            self.backend.cancel_scheduled(now);
        }
    }

    /// Ramp target currently set for `addr`.
    pub fn target(&self, addr: ParamAddress) -> Option<f32> {
        self.params.get(&addr).map(|s| s.ramp.to)
    }

    /// Interpolated value of `addr` at time `t`.
    pub fn value_at(&self, addr: ParamAddress, t: f64) -> Option<f32> {
        self.params.get(&addr).map(|s| s.ramp.value_at(t))
    }

    pub fn ramp(&self, addr: ParamAddress) -> Option<Ramp> {
        self.params.get(&addr).map(|s| s.ramp)
    }

    pub fn range(&self, addr: ParamAddress) -> Option<SafeRange> {
        self.params.get(&addr).map(|s| s.range)
    }

    pub fn addresses(&self) -> impl Iterator<Item = ParamAddress> + '_ {
        self.params.keys().copied()
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn ramp_master(&mut self, duration: f64, now: f64) {
        let level = self.master_base * self.energy_factor;
        self.ramp_param(MASTER_GAIN, level, duration, now);
    }

    fn ramp_param(&mut self, addr: ParamAddress, target: f32, duration: f64, now: f64) {
        let Some(slot) = self.params.get_mut(&addr) else {
            log::warn!("[graph] no parameter at {:?}", addr);
            return;
        };
        let to = slot.range.clamp(target);
        let from = slot.ramp.value_at(now);
        slot.ramp = Ramp::linear(from, to, now, duration);
        if self.started {
            self.backend.ramp(addr, &slot.ramp, now);
        }
    }
}
