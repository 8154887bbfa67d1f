use glam::Vec2;
use namima_core::*;

type TestEngine = Engine<ManualClock, RecordingBackend>;

fn engine() -> (TestEngine, ManualClock) {
    let clock = ManualClock::new(0.0);
    let mut config = EngineConfig::default().with_size(400.0, 300.0).with_seed(3);
    config.particles.count = 40;
    let engine = Engine::new(config, clock.clone(), RecordingBackend::new()).unwrap();
    (engine, clock)
}

fn intro_count(e: &TestEngine) -> usize {
    e.graph()
        .backend()
        .triggers
        .iter()
        .filter(|v| v.kind == VoiceKind::TouchPad && v.notes.as_slice() == &INTRO_CHORD[..])
        .count()
}

fn run_render(e: &mut TestEngine, clock: &ManualClock, seconds: f64) {
    let frames = (seconds * 60.0).round() as usize;
    for _ in 0..frames {
        clock.advance(1.0 / 60.0);
        e.render_tick();
    }
}

#[test]
fn idle_taps_ripple_without_sound() {
    let (mut e, _clock) = engine();
    e.push(Command::Tap { x: 100.0, y: 50.0, intensity: Some(0.7) });
    e.render_tick();
    assert_eq!(e.state(), EngineState::Idle);
    assert_eq!(e.sources().len(), 1);
    assert!(e.graph().backend().triggers.is_empty());
}

#[test]
fn taps_outside_the_field_land_on_its_edge() {
    let (mut e, _clock) = engine();
    e.push(Command::Tap { x: -5000.0, y: 9000.0, intensity: Some(0.5) });
    e.render_tick();
    assert_eq!(e.sources().newest().unwrap().pos, Vec2::new(0.0, 300.0));
    e.push(Command::Tap { x: f32::NAN, y: 120.0, intensity: Some(0.5) });
    e.render_tick();
    assert_eq!(e.sources().newest().unwrap().pos, Vec2::new(0.0, 120.0));
}

#[test]
fn first_start_plays_intro_and_seeds_centre_ripple() {
    let (mut e, _clock) = engine();
    e.push(Command::Start);
    e.render_tick();
    assert_eq!(e.state(), EngineState::Running);
    assert_eq!(e.graph().backend().builds, 1);
    assert_eq!(intro_count(&e), 1);
    let centre = e.sources().newest().unwrap();
    assert_eq!(centre.pos, Vec2::new(200.0, 150.0));
    assert!((centre.strength - 0.55).abs() < 1e-6);
}

#[test]
fn start_while_running_is_a_no_op() {
    let (mut e, _clock) = engine();
    e.push(Command::Start);
    e.push(Command::Start);
    e.render_tick();
    assert_eq!(e.graph().backend().builds, 1);
    assert_eq!(intro_count(&e), 1);
    assert_eq!(e.sources().len(), 1);
}

#[test]
fn failed_start_keeps_state_and_reports() {
    let (mut e, _clock) = engine();
    e.backend_mut().fail_build = true;
    e.push(Command::Start);
    e.render_tick();
    assert_eq!(e.state(), EngineState::Idle);
    assert!(matches!(e.take_error(), Some(EngineError::AudioUnavailable(_))));
    assert!(e.take_error().is_none(), "error is reported once");
    assert!(e.sources().is_empty(), "no centre ripple without audio");

    e.backend_mut().fail_build = false;
    e.push(Command::Start);
    e.render_tick();
    assert_eq!(e.state(), EngineState::Running);
    assert_eq!(intro_count(&e), 1);
}

#[test]
fn stop_freezes_field_and_particles() {
    let (mut e, clock) = engine();
    e.push(Command::Start);
    e.render_tick();
    run_render(&mut e, &clock, 1.0);
    e.push(Command::Stop);
    e.render_tick();
    assert_eq!(e.state(), EngineState::Stopped);
    assert_eq!(e.graph().backend().cancels.len(), 1);

    let frozen_time = e.field_time();
    let frozen: Vec<Vec2> = e.particles().particles().iter().map(|p| p.pos).collect();
    let sources = e.sources().len();
    run_render(&mut e, &clock, 10.0);
    assert_eq!(e.field_time(), frozen_time);
    let after: Vec<Vec2> = e.particles().particles().iter().map(|p| p.pos).collect();
    assert_eq!(frozen, after, "particles must not move while stopped");
    assert_eq!(e.sources().len(), sources, "sources are not pruned while frozen");
}

#[test]
fn no_voice_fires_after_stop() {
    let (mut e, clock) = engine();
    e.push(Command::Start);
    e.transport_tick();
    for _ in 0..400 {
        clock.advance(0.025);
        e.transport_tick();
    }
    let played = e.graph().backend().triggers.len();
    assert!(played > 1, "transport produced nothing in 10 s");
    e.push(Command::Stop);
    for _ in 0..400 {
        clock.advance(0.025);
        assert_eq!(e.transport_tick(), 0);
    }
    assert_eq!(e.graph().backend().triggers.len(), played);
    assert!(e.scheduler().pending().is_empty());
}

#[test]
fn resume_restarts_transport_without_rebuilding() {
    let (mut e, clock) = engine();
    e.push(Command::Start);
    e.render_tick();
    clock.advance(5.0);
    e.push(Command::Stop);
    e.render_tick();
    clock.advance(5.0);
    e.push(Command::Start);
    e.render_tick();
    assert_eq!(e.state(), EngineState::Running);
    assert_eq!(e.graph().backend().builds, 1);
    assert_eq!(intro_count(&e), 1, "intro only on first start");
    let bar0 = e.scheduler().transport().time_of_bar(0.0).unwrap();
    assert!((bar0 - 10.05).abs() < 1e-9);
}

#[test]
fn registry_retains_five_most_recent_taps() {
    let (mut e, _clock) = engine();
    for i in 0..6 {
        e.push(Command::Tap { x: 10.0 * i as f32, y: 10.0, intensity: Some(0.5) });
    }
    e.render_tick();
    let xs: Vec<f32> = e.sources().all().map(|s| s.pos.x).collect();
    assert_eq!(xs, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
}

#[test]
fn taps_sound_once_running() {
    let (mut e, _clock) = engine();
    e.push(Command::Start);
    e.push(Command::Tap { x: 0.0, y: 0.0, intensity: None });
    e.render_tick();
    let triggers = &e.graph().backend().triggers;
    let pluck = triggers.iter().find(|v| v.kind == VoiceKind::Pluck).unwrap();
    assert_eq!(pluck.notes.as_slice(), &[48][..], "left edge maps to C3");
    let tap = e.sources().newest().unwrap();
    assert!(tap.strength >= 0.55 && tap.strength <= 1.0, "random tap strength {}", tap.strength);
}

#[test]
fn slider_updates_params_and_graph_targets() {
    let (mut e, _clock) = engine();
    e.push(Command::slider(Knob::Warm, 100));
    e.push(Command::slider(Knob::Chaos, 250));
    e.push(Command::slider(Knob::Space, -5));
    e.render_tick();
    assert_eq!(e.params().warm(), 1.0);
    assert_eq!(e.params().chaos(), 1.0);
    assert_eq!(e.params().space(), 0.0);
    assert_eq!(e.graph().target(WARM_CUTOFF), Some(2000.0));
    e.push(Command::SetParameter { knob: Knob::Density, value: f32::NAN });
    e.transport_tick();
    assert_eq!(e.params().density(), 0.0, "parameter writes are seen by the transport tick too");
}

#[test]
fn energy_feedback_reaches_backend() {
    let (mut e, clock) = engine();
    e.push(Command::Start);
    let stats = e.render_tick();
    assert!(stats.energy.is_some());
    assert!(e.graph().backend().last_ramp(TOUCH_CUTOFF).is_some());
    assert!((e.energy() - 0.25).abs() < 1e-3, "centre ripple alone gives 0.55 / 2.2");
    run_render(&mut e, &clock, 2.0);
    assert!(e.energy() < 0.25, "energy decays with the ripple");
}

#[test]
fn render_step_is_clamped_after_a_stall() {
    let (mut e, clock) = engine();
    e.render_tick();
    clock.advance(5.0);
    let stats = e.render_tick();
    assert!((stats.dt - 0.1).abs() < 1e-6);
    assert!((e.field_time() - 0.1).abs() < 1e-6);
}

#[test]
fn resize_rebounds_particles() {
    let (mut e, _clock) = engine();
    e.push(Command::Resize { width: 120.0, height: 90.0 });
    e.push(Command::Resize { width: -1.0, height: 90.0 });
    e.render_tick();
    assert_eq!(e.particles().bounds(), Vec2::new(120.0, 90.0));
    assert_eq!(e.particles().len(), 40);
    assert!(e
        .particles()
        .particles()
        .iter()
        .all(|p| p.pos.x < 120.0 && p.pos.y < 90.0));
}

#[test]
fn field_keeps_animating_while_idle() {
    let (mut e, clock) = engine();
    e.push(Command::Tap { x: 200.0, y: 150.0, intensity: Some(1.0) });
    e.render_tick();
    run_render(&mut e, &clock, 0.5);
    assert!(e.field_time() > 0.4);
    assert!(e.field_value_at(Vec2::new(230.0, 150.0)).abs() > 0.0);
}
