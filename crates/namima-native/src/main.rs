//! Headless runner: the engine on a render thread and a transport thread,
//! with a logging backend standing in for an audio device. Random taps and
//! knob moves exercise the whole loop.
//!
//! Usage: `namima-native [seconds] [seed]`

use anyhow::Context;
use namima_core::{
    AudioBackend, Command, Engine, EngineConfig, EngineResult, InstantClock, Knob, ParamAddress,
    Ramp, Topology, VoiceEvent, VoiceKind,
};
use rand::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

const RENDER_INTERVAL: Duration = Duration::from_millis(16);
const TRANSPORT_INTERVAL: Duration = Duration::from_millis(25);
const STATS_EVERY_FRAMES: u32 = 60;

/// Logs what a real device would be asked to do.
#[derive(Debug, Default)]
struct ConsoleBackend {
    ramps: usize,
    cancels: usize,
    triggers: HashMap<VoiceKind, usize>,
}

impl AudioBackend for ConsoleBackend {
    fn build(&mut self, topology: &Topology) -> EngineResult<()> {
        for bus in &topology.buses {
            log::info!(
                "[audio] bus {:<6} level {:.2}, {} chain(s)",
                bus.bus.name(),
                bus.level,
                bus.chains.len()
            );
        }
        Ok(())
    }

    fn ramp(&mut self, addr: ParamAddress, ramp: &Ramp, now: f64) {
        self.ramps += 1;
        log::debug!(
            "[audio] {:?}.{:?}.{:?} {:.3} -> {:.3} by {:.2}s",
            addr.bus,
            addr.node,
            addr.param,
            ramp.value_at(now),
            ramp.to,
            ramp.end() - now
        );
    }

    fn trigger(&mut self, voice: &VoiceEvent, now: f64) -> EngineResult<()> {
        *self.triggers.entry(voice.kind).or_default() += 1;
        log::info!(
            "[audio] {:?} {:?} vel {:.2} in {:+.3}s for {:.2}s",
            voice.kind,
            voice.notes.as_slice(),
            voice.velocity,
            voice.start_sec - now,
            voice.duration_sec
        );
        Ok(())
    }

    fn cancel_scheduled(&mut self, _now: f64) {
        self.cancels += 1;
        log::info!("[audio] cancel scheduled");
    }
}

type Shared = Arc<Mutex<Engine<InstantClock, ConsoleBackend>>>;

fn lock(engine: &Shared) -> MutexGuard<'_, Engine<InstantClock, ConsoleBackend>> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Options {
    duration: Duration,
    seed: u64,
}

impl Options {
    fn from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let duration = match args.next() {
            Some(s) => s
                .parse::<f64>()
                .with_context(|| format!("duration must be seconds, got {s:?}"))?,
            None => 20.0,
        };
        let seed = match args.next() {
            Some(s) => s
                .parse::<u64>()
                .with_context(|| format!("seed must be an integer, got {s:?}"))?,
            None => EngineConfig::default().seed,
        };
        anyhow::ensure!(duration > 0.0, "duration must be positive");
        let duration = Duration::try_from_secs_f64(duration)
            .with_context(|| format!("duration {duration} is out of range"))?;
        Ok(Self { duration, seed })
    }
}

fn spawn_render(
    engine: Shared,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("render".into())
        .spawn(move || {
            let mut frames = 0u32;
            while !shutdown.load(Ordering::Relaxed) {
                let mut eng = lock(&engine);
                let stats = eng.render_tick();
                if let Some(err) = eng.take_error() {
                    log::error!("[render] {}", err);
                }
                frames += 1;
                if frames % STATS_EVERY_FRAMES == 0 {
                    let swarm = eng.particles();
                    let mean = swarm.particles().iter().map(|p| p.intensity).sum::<f32>()
                        / swarm.len().max(1) as f32;
                    log::info!(
                        "[render] {:?}, {} sources, energy {:.3}, mean intensity {:.3}",
                        eng.state(),
                        stats.sources,
                        eng.energy(),
                        mean
                    );
                }
                drop(eng);
                thread::sleep(RENDER_INTERVAL);
            }
        })?;
    Ok(handle)
}

fn spawn_transport(
    engine: Shared,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("transport".into())
        .spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                lock(&engine).transport_tick();
                thread::sleep(TRANSPORT_INTERVAL);
            }
        })?;
    Ok(handle)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Options::from_args(std::env::args().skip(1))?;
    let config = EngineConfig::default().with_seed(opts.seed);
    let (width, height) = config.field_size;
    let engine: Shared = Arc::new(Mutex::new(Engine::new(
        config,
        InstantClock::new(),
        ConsoleBackend::default(),
    )?));
    let shutdown = Arc::new(AtomicBool::new(false));

    lock(&engine).push(Command::Start);
    let render = spawn_render(Arc::clone(&engine), Arc::clone(&shutdown))?;
    let transport = spawn_transport(Arc::clone(&engine), Arc::clone(&shutdown))?;

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let began = Instant::now();
    while began.elapsed() < opts.duration {
        thread::sleep(Duration::from_secs_f64(rng.gen_range(0.8..2.5)));
        let mut eng = lock(&engine);
        eng.push(Command::Tap {
            x: rng.gen_range(0.0..width),
            y: rng.gen_range(0.0..height),
            intensity: None,
        });
        if rng.gen::<f32>() < 0.3 {
            let knob = Knob::ALL[rng.gen_range(0..Knob::ALL.len())];
            let raw = rng.gen_range(0..=100);
            log::info!("[input] {} -> {}", knob.name(), raw);
            eng.push(Command::slider(knob, raw));
        }
    }

    lock(&engine).push(Command::Stop);
    thread::sleep(Duration::from_millis(100));
    shutdown.store(true, Ordering::Relaxed);
    render
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))?;
    transport
        .join()
        .map_err(|_| anyhow::anyhow!("transport thread panicked"))?;

    let eng = lock(&engine);
    let backend = eng.graph().backend();
    log::info!(
        "done: {} ramps, {} cancels, triggers {:?}",
        backend.ramps,
        backend.cancels,
        backend.triggers
    );
    Ok(())
}
