//! Coordinator owning every subsystem.
//!
//! Front-ends push [`Command`]s and call two ticks: [`Engine::render_tick`] at
//! display rate and [`Engine::transport_tick`] at a steady ~25 ms. Both drain
//! the command queue first, so a control change is visible to whichever tick
//! runs next.

use crate::backend::AudioBackend;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::constants::*;
use crate::energy::EnergyFeedback;
use crate::error::{EngineError, EngineResult};
use crate::field::FieldSampler;
use crate::graph::{AudioGraph, Topology};
use crate::music::{VoiceEvent, VoiceKind, INTRO_CHORD};
use crate::params::{normalize_slider, Knob, ParameterState};
use crate::particles::{Backdrop, ParticleSystem};
use crate::scheduler::GenerativeScheduler;
use crate::sources::SourceRegistry;
use glam::Vec2;
use rand::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Pointer-down at field pixel `(x, y)`. A missing intensity is randomized.
    Tap { x: f32, y: f32, intensity: Option<f32> },
    SetParameter { knob: Knob, value: f32 },
    Start,
    Stop,
    Resize { width: f32, height: f32 },
}

impl Command {
    /// Control change from a 0..100 slider.
    pub fn slider(knob: Knob, raw: i32) -> Self {
        Command::SetParameter {
            knob,
            value: normalize_slider(raw),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Field animates, audio not started yet.
    Idle,
    Running,
    /// Transport halted, field frozen.
    Stopped,
}

/// What a render tick did, for the front-end's drawing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Seconds the field advanced (0 while frozen).
    pub dt: f32,
    pub sources: usize,
    /// Energy handed to the audio graph this tick, if it changed.
    pub energy: Option<f32>,
}

pub struct Engine<C: Clock, B: AudioBackend> {
    clock: C,
    state: EngineState,
    params: ParameterState,
    sources: SourceRegistry,
    sampler: FieldSampler,
    particles: ParticleSystem,
    energy: EnergyFeedback,
    graph: AudioGraph<B>,
    scheduler: GenerativeScheduler,
    commands: VecDeque<Command>,
    tap_rng: StdRng,
    field_time: f64,
    last_render: Option<f64>,
    intro_played: bool,
    last_error: Option<EngineError>,
    voices: Vec<VoiceEvent>,
}

/// Pointer coordinates outside the field land on its edge.
fn clamp_coord(v: f32, max: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, max)
    } else {
        0.0
    }
}

fn derive_seed(seed: u64, i: u64) -> u64 {
    seed ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

impl<C: Clock, B: AudioBackend> Engine<C, B> {
    pub fn new(config: EngineConfig, clock: C, backend: B) -> EngineResult<Self> {
        let (width, height) = config.field_size;
        let mut particle_rng = StdRng::seed_from_u64(derive_seed(config.seed, 1));
        let particles = ParticleSystem::new(&config.particles, width, height, &mut particle_rng)?;
        let graph = AudioGraph::new(Topology::standard(config.transport.bpm), backend);
        log::info!(
            "[engine] {} particles on {}x{}, seed {}",
            particles.len(),
            width,
            height,
            config.seed
        );
        Ok(Self {
            clock,
            state: EngineState::Idle,
            params: ParameterState::default(),
            sources: SourceRegistry::new(config.max_sources, config.source_expiry_sec),
            sampler: FieldSampler::new(config.field),
            particles,
            energy: EnergyFeedback::new(config.energy_norm, config.field.time_decay),
            graph,
            scheduler: GenerativeScheduler::new(config.transport, config.seed),
            commands: VecDeque::new(),
            tap_rng: StdRng::seed_from_u64(derive_seed(config.seed, 2)),
            field_time: 0.0,
            last_render: None,
            intro_played: false,
            last_error: None,
            voices: Vec::new(),
        })
    }

    /// Queue a command for the next tick.
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Display-rate step: commands, field time, particles, energy feedback.
    pub fn render_tick(&mut self) -> RenderStats {
        let now = self.clock.now();
        self.drain_commands(now);

        let dt = match self.last_render {
            Some(prev) => ((now - prev) as f32).clamp(0.0, MAX_RENDER_DT_SEC),
            None => 0.0,
        };
        self.last_render = Some(now);

        let mut stats = RenderStats::default();
        if self.state != EngineState::Stopped {
            self.field_time += dt as f64;
            self.sources.prune(self.field_time);
            self.particles
                .tick(dt, &self.sampler, &self.sources, self.field_time);
            stats.dt = dt;
        }
        if self.graph.is_started() {
            stats.energy = self.energy.poll(&self.sources, self.field_time);
            if let Some(e) = stats.energy {
                self.graph.set_energy(e, now);
            }
        }
        stats.sources = self.sources.len();
        stats
    }

    /// Transport-rate step: commands, then due scheduler events to the backend.
    /// Returns how many voices were triggered.
    pub fn transport_tick(&mut self) -> usize {
        let now = self.clock.now();
        self.drain_commands(now);
        if self.state != EngineState::Running {
            return 0;
        }
        self.scheduler.tick(now, &self.params, &mut self.voices);
        let mut played = 0;
        for v in self.voices.drain(..) {
            if self.graph.trigger(&v, now) {
                played += 1;
            }
        }
        played
    }

    fn drain_commands(&mut self, now: f64) {
        while let Some(cmd) = self.commands.pop_front() {
            self.apply(cmd, now);
        }
    }

    fn apply(&mut self, cmd: Command, now: f64) {
        match cmd {
            Command::Tap { x, y, intensity } => self.tap(x, y, intensity, now),
            Command::SetParameter { knob, value } => {
                self.params.set(knob, value);
                self.graph.apply_parameters(&self.params, now);
            }
            Command::Start => self.start(now),
            Command::Stop => self.stop(now),
            Command::Resize { width, height } => {
                if let Err(e) = self.particles.resize(width, height) {
                    log::warn!("[engine] resize ignored: {}", e);
                }
            }
        }
    }

    fn tap(&mut self, x: f32, y: f32, intensity: Option<f32>, now: f64) {
        let intensity = intensity
            .unwrap_or_else(|| TAP_STRENGTH_BASE + TAP_STRENGTH_SPAN * self.tap_rng.gen::<f32>());
        let bounds = self.particles.bounds();
        let pos = Vec2::new(clamp_coord(x, bounds.x), clamp_coord(y, bounds.y));
        self.sources.add(pos, intensity, self.field_time);
        let x_norm = pos.x / bounds.x;
        let voices = self.graph.on_tap(x_norm, intensity, now);
        log::debug!(
            "[input] tap at ({:.0}, {:.0}) intensity {:.2}, {} voices",
            pos.x,
            pos.y,
            intensity,
            voices.len()
        );
    }

    fn start(&mut self, now: f64) {
        if self.state == EngineState::Running {
            log::debug!("[engine] start ignored, already running");
            return;
        }
        match self.graph.start(now) {
            Ok(first_build) => {
                if first_build {
                    self.graph.apply_parameters(&self.params, now);
                }
                if !self.intro_played {
                    self.intro_played = true;
                    let intro = VoiceEvent::new(
                        VoiceKind::TouchPad,
                        &INTRO_CHORD,
                        INTRO_VELOCITY,
                        now,
                        INTRO_DURATION_SEC,
                    );
                    self.graph.trigger(&intro, now);
                    let centre = self.particles.bounds() * 0.5;
                    self.sources
                        .add(centre, CENTER_RIPPLE_STRENGTH, self.field_time);
                }
                self.scheduler.start(now);
                self.last_error = None;
                log::info!("[engine] {:?} -> Running", self.state);
                self.state = EngineState::Running;
            }
            Err(e) => {
                log::warn!("[engine] start failed: {}", e);
                self.last_error = Some(e);
            }
        }
    }

    fn stop(&mut self, now: f64) {
        if self.state != EngineState::Running {
            log::debug!("[engine] stop ignored in {:?}", self.state);
            return;
        }
        self.scheduler.stop();
        self.graph.cancel_scheduled(now);
        self.state = EngineState::Stopped;
        log::info!("[engine] Running -> Stopped");
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn params(&self) -> &ParameterState {
        &self.params
    }

    #[inline]
    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    #[inline]
    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    #[inline]
    pub fn sampler(&self) -> &FieldSampler {
        &self.sampler
    }

    #[inline]
    pub fn graph(&self) -> &AudioGraph<B> {
        &self.graph
    }

    /// Front-ends hand platform handles (an unlocked audio context) to the
    /// backend through this before pushing [`Command::Start`].
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        self.graph.backend_mut()
    }

    #[inline]
    pub fn scheduler(&self) -> &GenerativeScheduler {
        &self.scheduler
    }

    /// Seconds the field has advanced; stands still while stopped.
    #[inline]
    pub fn field_time(&self) -> f64 {
        self.field_time
    }

    /// Field energy last handed to the audio graph.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.energy.last()
    }

    pub fn field_value_at(&self, pos: Vec2) -> f32 {
        self.sampler.value(pos, self.field_time, self.sources.all())
    }

    pub fn backdrop(&self) -> Backdrop {
        Backdrop::from_params(&self.params)
    }

    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Take the pending error, if any, so a front-end shows it once.
    pub fn take_error(&mut self) -> Option<EngineError> {
        self.last_error.take()
    }
}
