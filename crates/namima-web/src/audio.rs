//! WebAudio realization of the declared topology.
//!
//! Every addressed parameter maps onto one or more `AudioParam`s through an
//! affine `offset + scale · v`, so a single address can drive e.g. a wet gain
//! and its complementary dry gain. Bit depth has no `AudioParam`; its ramps
//! rebuild the crusher's shaping curve at the target depth.

use fnv::FnvHashMap;
use namima_core::{
    midi_to_hz, AudioBackend, Bus, Compressor, Drift, Effect, EffectDecl, EngineError,
    EngineResult, Envelope, FilterKind, Generator, NoiseColor, Node, Param, ParamAddress, Ramp,
    Topology, VoiceEvent, VoiceKind, Waveform,
};
use wasm_bindgen::JsValue;
use web_sys as web;

const NOISE_BUFFER_SEC: f32 = 2.0;
const CRUSHER_CURVE_LEN: usize = 4096;
const HAT_BASE_HZ: f32 = 40.0;
const HAT_RATIOS: [f32; 6] = [2.0, 3.0, 4.16, 5.43, 6.79, 8.21];
const HAT_HIGHPASS_HZ: f32 = 7000.0;
const KICK_PITCH_DROP: f32 = 6.0;
const KICK_PITCH_DECAY_SEC: f64 = 0.05;
const SILENT: f32 = 0.001;

fn js_err(label: &str, e: JsValue) -> EngineError {
    EngineError::NodeUnavailable(format!("{label}: {e:?}"))
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> EngineResult<web::GainNode> {
    let g = web::GainNode::new(ctx).map_err(|e| js_err(label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

#[inline]
fn connect(from: &web::AudioNode, to: &web::AudioNode) {
    _ = from.connect_with_audio_node(to);
}

fn oscillator_type(w: Waveform) -> web::OscillatorType {
    match w {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

struct ParamHandle {
    param: web::AudioParam,
    scale: f32,
    offset: f32,
}

enum Synth {
    Tonal {
        waveform: Waveform,
        envelope: Envelope,
        drift: Option<web::GainNode>,
    },
    Percussive,
}

struct Route {
    input: web::GainNode,
    synth: Synth,
}

/// Effect stage spliced into a chain.
struct Stage {
    input: web::AudioNode,
    output: web::AudioNode,
}

impl Stage {
    fn single(node: web::AudioNode) -> Self {
        Self {
            input: node.clone(),
            output: node,
        }
    }
}

struct Scheduled {
    node: web::AudioScheduledSourceNode,
    start: f64,
    end: f64,
}

#[derive(Default)]
struct WebGraph {
    params: FnvHashMap<ParamAddress, Vec<ParamHandle>>,
    crushers: FnvHashMap<ParamAddress, web::WaveShaperNode>,
    voices: FnvHashMap<VoiceKind, Route>,
    white: Option<web::AudioBuffer>,
    // Held so looping beds and LFOs stay referenced for the session
    running: Vec<web::AudioScheduledSourceNode>,
}

impl WebGraph {
    fn bind(&mut self, addr: ParamAddress, param: web::AudioParam, scale: f32, offset: f32) {
        self.params
            .entry(addr)
            .or_default()
            .push(ParamHandle { param, scale, offset });
    }

    fn lfo(
        &mut self,
        ctx: &web::AudioContext,
        rate_hz: f32,
        depth: f32,
    ) -> EngineResult<web::GainNode> {
        let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("lfo", e))?;
        osc.set_type(web::OscillatorType::Sine);
        osc.frequency().set_value(rate_hz);
        let amount = create_gain(ctx, depth, "lfo depth")?;
        connect(&osc, &amount);
        _ = osc.start();
        self.running.push(osc.into());
        Ok(amount)
    }

    fn build_effect(
        &mut self,
        ctx: &web::AudioContext,
        bus: Bus,
        fx: &EffectDecl,
    ) -> EngineResult<Stage> {
        let addr = |param| ParamAddress::new(bus, fx.node, param);
        match fx.effect {
            Effect::Filter { kind, cutoff_hz, q } => {
                let f = web::BiquadFilterNode::new(ctx).map_err(|e| js_err("filter", e))?;
                f.set_type(match kind {
                    FilterKind::Lowpass => web::BiquadFilterType::Lowpass,
                    FilterKind::Bandpass => web::BiquadFilterType::Bandpass,
                });
                f.frequency().set_value(cutoff_hz);
                f.q().set_value(q);
                self.bind(addr(Param::Cutoff), f.frequency(), 1.0, 0.0);
                self.bind(addr(Param::Q), f.q(), 1.0, 0.0);
                Ok(Stage::single(f.into()))
            }
            Effect::Reverb { decay_sec, pre_delay_sec, wet } => {
                let input = create_gain(ctx, 1.0, "reverb in")?;
                let output = create_gain(ctx, 1.0, "reverb out")?;
                let conv = web::ConvolverNode::new(ctx).map_err(|e| js_err("convolver", e))?;
                conv.set_normalize(true);
                let ir = impulse_response(ctx, decay_sec, pre_delay_sec)?;
                conv.set_buffer(Some(&ir));
                let dry = create_gain(ctx, 1.0 - wet, "reverb dry")?;
                let wet_gain = create_gain(ctx, wet, "reverb wet")?;
                connect(&input, &dry);
                connect(&dry, &output);
                connect(&input, &conv);
                connect(&conv, &wet_gain);
                connect(&wet_gain, &output);
                self.bind(addr(Param::Wet), wet_gain.gain(), 1.0, 0.0);
                self.bind(addr(Param::Wet), dry.gain(), -1.0, 1.0);
                Ok(Stage {
                    input: input.into(),
                    output: output.into(),
                })
            }
            Effect::Chorus { rate_hz, delay_ms, depth } => {
                let delay_sec = delay_ms / 1000.0;
                let input = create_gain(ctx, 1.0, "chorus in")?;
                let output = create_gain(ctx, 1.0, "chorus out")?;
                let delay = ctx
                    .create_delay_with_max_delay_time(0.1)
                    .map_err(|e| js_err("chorus delay", e))?;
                delay.delay_time().set_value(delay_sec);
                let wet = create_gain(ctx, 0.5, "chorus wet")?;
                // Modulation swings the delay by up to half its base time
                let swing = delay_sec * 0.5;
                let amount = self.lfo(ctx, rate_hz, depth * swing)?;
                _ = amount.connect_with_audio_param(&delay.delay_time());
                connect(&input, &output);
                connect(&input, &delay);
                connect(&delay, &wet);
                connect(&wet, &output);
                self.bind(addr(Param::Depth), amount.gain(), swing, 0.0);
                Ok(Stage {
                    input: input.into(),
                    output: output.into(),
                })
            }
            Effect::FeedbackDelay { delay_sec, feedback, wet } => {
                let input = create_gain(ctx, 1.0, "delay in")?;
                let output = create_gain(ctx, 1.0, "delay out")?;
                let delay = ctx
                    .create_delay_with_max_delay_time(3.0)
                    .map_err(|e| js_err("delay", e))?;
                delay.delay_time().set_value(delay_sec);
                let fb = create_gain(ctx, feedback, "delay feedback")?;
                let wet_gain = create_gain(ctx, wet, "delay wet")?;
                connect(&input, &output);
                connect(&input, &delay);
                connect(&delay, &fb);
                connect(&fb, &delay);
                connect(&delay, &wet_gain);
                connect(&wet_gain, &output);
                self.bind(addr(Param::Feedback), fb.gain(), 1.0, 0.0);
                self.bind(addr(Param::Wet), wet_gain.gain(), 1.0, 0.0);
                Ok(Stage {
                    input: input.into(),
                    output: output.into(),
                })
            }
            Effect::Crusher { bits } => {
                let shaper = web::WaveShaperNode::new(ctx).map_err(|e| js_err("crusher", e))?;
                set_crusher_bits(&shaper, bits);
                self.crushers.insert(addr(Param::Bits), shaper.clone());
                Ok(Stage::single(shaper.into()))
            }
            Effect::Gain { level } => {
                let g = create_gain(ctx, level, "fx gain")?;
                self.bind(addr(Param::Gain), g.gain(), 1.0, 0.0);
                Ok(Stage::single(g.into()))
            }
        }
    }

    fn build(ctx: &web::AudioContext, topo: &Topology) -> EngineResult<Self> {
        let mut graph = WebGraph::default();

        let master = create_gain(ctx, topo.master.level, "master")?;
        let comp = compressor(ctx, &topo.master.compressor, 6.0)?;
        let limiter = compressor(
            ctx,
            &Compressor {
                threshold_db: topo.master.limiter_db,
                ratio: 20.0,
                attack_sec: 0.001,
                release_sec: 0.05,
            },
            0.0,
        )?;
        connect(&master, &comp);
        connect(&comp, &limiter);
        connect(&limiter, &ctx.destination());
        graph.bind(
            ParamAddress::new(Bus::Master, Node::Level, Param::Gain),
            master.gain(),
            1.0,
            0.0,
        );

        let white = noise_buffer(ctx, NoiseColor::White)?;
        let pink = noise_buffer(ctx, NoiseColor::Pink)?;

        for decl in &topo.buses {
            let level = create_gain(ctx, decl.level, decl.bus.name())?;
            connect(&level, &master);
            graph.bind(
                ParamAddress::new(decl.bus, Node::Level, Param::Gain),
                level.gain(),
                1.0,
                0.0,
            );
            for chain in &decl.chains {
                let input = create_gain(ctx, 1.0, "chain in")?;
                let mut tail: web::AudioNode = input.clone().into();
                for fx in &chain.effects {
                    let stage = graph.build_effect(ctx, decl.bus, fx)?;
                    connect(&tail, &stage.input);
                    tail = stage.output;
                }
                connect(&tail, &level);

                for generator in &chain.generators {
                    match *generator {
                        Generator::Noise { color } => {
                            let src = web::AudioBufferSourceNode::new(ctx)
                                .map_err(|e| js_err("noise bed", e))?;
                            let buf = match color {
                                NoiseColor::White => &white,
                                NoiseColor::Pink => &pink,
                            };
                            src.set_buffer(Some(buf));
                            src.set_loop(true);
                            connect(&src, &input);
                            _ = src.start();
                            graph.running.push(src.into());
                        }
                        Generator::Tonal {
                            voice,
                            waveform,
                            envelope,
                            drift,
                        } => {
                            let drift = match drift {
                                Some(Drift { rate_hz, depth_cents }) => {
                                    Some(graph.lfo(ctx, rate_hz, depth_cents)?)
                                }
                                None => None,
                            };
                            graph.voices.insert(
                                voice,
                                Route {
                                    input: input.clone(),
                                    synth: Synth::Tonal {
                                        waveform,
                                        envelope,
                                        drift,
                                    },
                                },
                            );
                        }
                        Generator::Percussive { voice } => {
                            graph.voices.insert(
                                voice,
                                Route {
                                    input: input.clone(),
                                    synth: Synth::Percussive,
                                },
                            );
                        }
                    }
                }
            }
        }
        graph.white = Some(white);
        Ok(graph)
    }
}

fn compressor(
    ctx: &web::AudioContext,
    c: &Compressor,
    knee_db: f32,
) -> EngineResult<web::DynamicsCompressorNode> {
    let node = web::DynamicsCompressorNode::new(ctx).map_err(|e| js_err("compressor", e))?;
    node.threshold().set_value(c.threshold_db);
    node.ratio().set_value(c.ratio);
    node.attack().set_value(c.attack_sec);
    node.release().set_value(c.release_sec);
    node.knee().set_value(knee_db);
    Ok(node)
}

fn xorshift(state: &mut u32) -> f32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    (x as f32 / u32::MAX as f32) * 2.0 - 1.0
}

fn noise_buffer(ctx: &web::AudioContext, color: NoiseColor) -> EngineResult<web::AudioBuffer> {
    let sr = ctx.sample_rate();
    let len = (sr * NOISE_BUFFER_SEC) as u32;
    let buf = ctx
        .create_buffer(1, len, sr)
        .map_err(|e| js_err("noise buffer", e))?;
    let mut seed: u32 = 0x2545_F491;
    let mut samples = vec![0.0_f32; len as usize];
    match color {
        NoiseColor::White => {
            for s in samples.iter_mut() {
                *s = xorshift(&mut seed);
            }
        }
        NoiseColor::Pink => {
            // Paul Kellet's economy pink filter
            let (mut b0, mut b1, mut b2) = (0.0_f32, 0.0_f32, 0.0_f32);
            for s in samples.iter_mut() {
                let w = xorshift(&mut seed);
                b0 = 0.99765 * b0 + w * 0.0990460;
                b1 = 0.96300 * b1 + w * 0.2965164;
                b2 = 0.57000 * b2 + w * 1.0526913;
                *s = (b0 + b1 + b2 + w * 0.1848) * 0.2;
            }
        }
    }
    _ = buf.copy_to_channel(&mut samples, 0);
    Ok(buf)
}

/// Stereo decaying noise tail with a silent pre-delay.
fn impulse_response(
    ctx: &web::AudioContext,
    decay_sec: f32,
    pre_delay_sec: f32,
) -> EngineResult<web::AudioBuffer> {
    let sr = ctx.sample_rate();
    let len = (sr * (decay_sec + pre_delay_sec)).max(1.0) as u32;
    let pre = (sr * pre_delay_sec) as usize;
    let ir = ctx
        .create_buffer(2, len, sr)
        .map_err(|e| js_err("impulse response", e))?;
    let tau = (decay_sec / 4.0).max(0.05);
    for ch in 0..2 {
        let mut seed: u32 = if ch == 0 { 0x1234_ABCD } else { 0x7890_FEDC };
        let mut buf = vec![0.0_f32; len as usize];
        for (i, v) in buf.iter_mut().enumerate().skip(pre) {
            let t = (i - pre) as f32 / sr;
            let dark = (1.0 - t / decay_sec).max(0.0);
            *v = xorshift(&mut seed) * (-t / tau).exp() * (0.6 + 0.4 * dark);
        }
        _ = ir.copy_to_channel(&mut buf, ch);
    }
    Ok(ir)
}

/// Shape the crusher to quantize onto `2^bits` levels.
fn set_crusher_bits(shaper: &web::WaveShaperNode, bits: f32) {
    let levels = 2.0_f32.powf(bits.round().clamp(1.0, 16.0));
    let step = 2.0 / levels;
    let mut curve: Vec<f32> = (0..CRUSHER_CURVE_LEN)
        .map(|i| {
            let x = (i as f32 / (CRUSHER_CURVE_LEN - 1) as f32) * 2.0 - 1.0;
            ((x / step).round() * step).clamp(-1.0, 1.0)
        })
        .collect();
    #[allow(deprecated)]
    shaper.set_curve(Some(curve.as_mut_slice()));
}

/// Attack-decay-sustain-release on `gain`, holding sustain until `t0 + hold`.
fn apply_envelope(gain: &web::AudioParam, env: &Envelope, peak: f32, t0: f64, hold: f64) -> f64 {
    let a = env.attack as f64;
    let d = env.decay as f64;
    let hold = hold.max(a + d);
    let sustain = peak * env.sustain;
    _ = gain.set_value_at_time(0.0, t0);
    _ = gain.linear_ramp_to_value_at_time(peak, t0 + a);
    _ = gain.linear_ramp_to_value_at_time(sustain, t0 + a + d);
    _ = gain.set_value_at_time(sustain, t0 + hold);
    let end = t0 + hold + env.release as f64;
    _ = gain.linear_ramp_to_value_at_time(0.0, end);
    end
}

/// Short attack then exponential fall to silence at `end`.
fn apply_hit(gain: &web::AudioParam, peak: f32, t0: f64, end: f64) {
    _ = gain.set_value_at_time(0.0, t0);
    _ = gain.linear_ramp_to_value_at_time(peak.max(SILENT), t0 + 0.005);
    _ = gain.exponential_ramp_to_value_at_time(SILENT, end);
}

fn play_tonal(
    ctx: &web::AudioContext,
    out: &web::GainNode,
    voice: &VoiceEvent,
    waveform: Waveform,
    envelope: &Envelope,
    drift: Option<&web::GainNode>,
    t0: f64,
) -> EngineResult<Vec<Scheduled>> {
    let peak = voice.velocity / (voice.notes.len().max(1) as f32).sqrt();
    let amp = create_gain(ctx, 0.0, "voice env")?;
    let end = apply_envelope(&amp.gain(), envelope, peak, t0, voice.duration_sec as f64);
    connect(&amp, out);
    let mut played = Vec::with_capacity(voice.notes.len());
    for &note in &voice.notes {
        let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("oscillator", e))?;
        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(midi_to_hz(note as f32));
        if let Some(lfo) = drift {
            _ = lfo.connect_with_audio_param(&osc.detune());
        }
        connect(&osc, &amp);
        _ = osc.start_with_when(t0);
        _ = osc.stop_with_when(end + 0.05);
        played.push(Scheduled {
            node: osc.into(),
            start: t0,
            end: end + 0.05,
        });
    }
    Ok(played)
}

fn play_percussive(
    ctx: &web::AudioContext,
    out: &web::GainNode,
    white: Option<&web::AudioBuffer>,
    voice: &VoiceEvent,
    t0: f64,
) -> EngineResult<Vec<Scheduled>> {
    let dur = (voice.duration_sec as f64).max(0.01);
    let amp = create_gain(ctx, 0.0, "hit env")?;
    connect(&amp, out);
    let mut played = Vec::new();
    match voice.kind {
        VoiceKind::Kick => {
            let hz = voice.notes.first().map_or(32.7, |&n| midi_to_hz(n as f32));
            let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("kick", e))?;
            osc.set_type(web::OscillatorType::Sine);
            _ = osc.frequency().set_value_at_time(hz * KICK_PITCH_DROP, t0);
            _ = osc
                .frequency()
                .exponential_ramp_to_value_at_time(hz, t0 + KICK_PITCH_DECAY_SEC);
            let end = t0 + dur + 0.25;
            apply_hit(&amp.gain(), voice.velocity, t0, end);
            connect(&osc, &amp);
            _ = osc.start_with_when(t0);
            _ = osc.stop_with_when(end);
            played.push(Scheduled { node: osc.into(), start: t0, end });
        }
        VoiceKind::Hat => {
            let hp = web::BiquadFilterNode::new(ctx).map_err(|e| js_err("hat filter", e))?;
            hp.set_type(web::BiquadFilterType::Highpass);
            hp.frequency().set_value(HAT_HIGHPASS_HZ);
            connect(&hp, &amp);
            let end = t0 + dur + 0.05;
            apply_hit(&amp.gain(), voice.velocity * 0.3, t0, end);
            for ratio in HAT_RATIOS {
                let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("hat", e))?;
                osc.set_type(web::OscillatorType::Square);
                osc.frequency().set_value(HAT_BASE_HZ * ratio);
                connect(&osc, &hp);
                _ = osc.start_with_when(t0);
                _ = osc.stop_with_when(end);
                played.push(Scheduled { node: osc.into(), start: t0, end });
            }
        }
        VoiceKind::NoiseBurst => {
            let buf = white.ok_or_else(|| EngineError::NodeUnavailable("noise buffer".into()))?;
            let src = web::AudioBufferSourceNode::new(ctx).map_err(|e| js_err("burst", e))?;
            src.set_buffer(Some(buf));
            let end = t0 + dur;
            apply_hit(&amp.gain(), voice.velocity, t0, end);
            connect(&src, &amp);
            _ = src.start_with_when(t0);
            _ = src.stop_with_when(end);
            played.push(Scheduled { node: src.into(), start: t0, end });
        }
        _ => {
            // Plucked string stand-in: bright triangle with a fast decay
            for &note in &voice.notes {
                let osc = web::OscillatorNode::new(ctx).map_err(|e| js_err("pluck", e))?;
                osc.set_type(web::OscillatorType::Triangle);
                osc.frequency().set_value(midi_to_hz(note as f32));
                connect(&osc, &amp);
                let end = t0 + dur * 2.0;
                _ = osc.start_with_when(t0);
                _ = osc.stop_with_when(end);
                played.push(Scheduled { node: osc.into(), start: t0, end });
            }
            let end = t0 + dur * 2.0;
            apply_hit(&amp.gain(), voice.velocity, t0, end);
        }
    }
    Ok(played)
}

/// [`AudioBackend`] over a browser `AudioContext`. The context is created on
/// a user gesture and attached before the engine is told to start.
#[derive(Default)]
pub struct WebAudioBackend {
    ctx: Option<web::AudioContext>,
    graph: Option<WebGraph>,
    scheduled: Vec<Scheduled>,
}

impl WebAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, ctx: web::AudioContext) {
        self.ctx = Some(ctx);
    }

    pub fn context(&self) -> Option<&web::AudioContext> {
        self.ctx.as_ref()
    }

    /// Engine-clock time `t` on the context timeline, never in the past.
    fn ctx_time(ctx: &web::AudioContext, t: f64, now: f64) -> f64 {
        ctx.current_time() + (t - now).max(0.0)
    }
}

impl AudioBackend for WebAudioBackend {
    fn build(&mut self, topology: &Topology) -> EngineResult<()> {
        let ctx = self.ctx.as_ref().ok_or_else(|| {
            EngineError::AudioUnavailable("no audio context yet; start from a tap or click".into())
        })?;
        if ctx.state() != web::AudioContextState::Running {
            return Err(EngineError::AudioUnavailable(format!(
                "audio context is {:?}",
                ctx.state()
            )));
        }
        let graph = WebGraph::build(ctx, topology)?;
        log::info!(
            "[audio] graph built: {} parameters, {} voice routes, {} Hz",
            graph.params.len(),
            graph.voices.len(),
            ctx.sample_rate()
        );
        self.graph = Some(graph);
        Ok(())
    }

    fn ramp(&mut self, addr: ParamAddress, ramp: &Ramp, now: f64) {
        let (Some(ctx), Some(graph)) = (self.ctx.as_ref(), self.graph.as_ref()) else {
            return;
        };
        if let Some(shaper) = graph.crushers.get(&addr) {
            set_crusher_bits(shaper, ramp.to);
            return;
        }
        let Some(handles) = graph.params.get(&addr) else {
            log::debug!("[audio] no node for {:?}", addr);
            return;
        };
        let t = ctx.current_time();
        let from = ramp.value_at(now);
        let end = t + (ramp.end() - now).max(0.0);
        for h in handles {
            _ = h.param.cancel_scheduled_values(t);
            _ = h.param.set_value_at_time(h.offset + h.scale * from, t);
            if !ramp.is_settled(now) {
                _ = h
                    .param
                    .linear_ramp_to_value_at_time(h.offset + h.scale * ramp.to, end);
            }
        }
    }

    fn trigger(&mut self, voice: &VoiceEvent, now: f64) -> EngineResult<()> {
        let ctx = self
            .ctx
            .as_ref()
            .ok_or_else(|| EngineError::AudioUnavailable("no audio context".into()))?;
        let ctx_now = ctx.current_time();
        self.scheduled.retain(|s| s.end > ctx_now);
        let graph = self
            .graph
            .as_ref()
            .ok_or_else(|| EngineError::AudioUnavailable("graph not built".into()))?;
        let route = graph
            .voices
            .get(&voice.kind)
            .ok_or_else(|| EngineError::NodeUnavailable(format!("no route for {:?}", voice.kind)))?;
        let t0 = Self::ctx_time(ctx, voice.start_sec, now);
        let played = match &route.synth {
            Synth::Tonal {
                waveform,
                envelope,
                drift,
            } => play_tonal(
                ctx,
                &route.input,
                voice,
                *waveform,
                envelope,
                drift.as_ref(),
                t0,
            )?,
            Synth::Percussive => {
                play_percussive(ctx, &route.input, graph.white.as_ref(), voice, t0)?
            }
        };
        self.scheduled.extend(played);
        Ok(())
    }

    fn cancel_scheduled(&mut self, _now: f64) {
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };
        let t = ctx.current_time();
        let before = self.scheduled.len();
        self.scheduled.retain(|s| {
            if s.start > t {
                _ = s.node.stop();
                false
            } else {
                true
            }
        });
        log::debug!("[audio] cancelled {} scheduled sources", before - self.scheduled.len());
    }
}
