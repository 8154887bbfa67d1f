use namima_core::*;
use std::collections::HashSet;

const ALL_VOICES: [VoiceKind; 8] = [
    VoiceKind::Pad,
    VoiceKind::SpacePad,
    VoiceKind::Bass,
    VoiceKind::Kick,
    VoiceKind::Hat,
    VoiceKind::NoiseBurst,
    VoiceKind::Pluck,
    VoiceKind::TouchPad,
];

fn graph() -> AudioGraph<RecordingBackend> {
    AudioGraph::new(Topology::standard(82.0), RecordingBackend::new())
}

fn started() -> AudioGraph<RecordingBackend> {
    let mut g = graph();
    g.start(0.0).unwrap();
    g
}

#[test]
fn start_is_idempotent() {
    let mut g = graph();
    assert_eq!(g.start(0.0), Ok(true));
    assert_eq!(g.start(1.0), Ok(false));
    assert_eq!(g.backend().builds, 1, "second start must not rebuild the graph");
}

#[test]
fn failed_start_can_be_retried() {
    let mut g = graph();
    g.backend_mut().fail_build = true;
    assert!(matches!(g.start(0.0), Err(EngineError::AudioUnavailable(_))));
    assert!(!g.is_started());
    g.backend_mut().fail_build = false;
    assert_eq!(g.start(2.0), Ok(true));
    assert!(g.is_started());
}

#[test]
fn ramps_are_held_back_until_start_then_synced() {
    let mut g = graph();
    g.apply_parameters(&ParameterState::default(), 0.0);
    assert!(g.backend().ramps.is_empty());
    g.start(1.0).unwrap();
    let addrs: HashSet<ParamAddress> = g.backend().ramps.iter().map(|(a, _)| *a).collect();
    assert_eq!(addrs.len(), g.addresses().count(), "every parameter is pushed on start");
    let cutoff = g.backend().last_ramp(WARM_CUTOFF).unwrap();
    assert!((cutoff.to - (1200.0 + 800.0 * 0.6)).abs() < 1e-3);
}

#[test]
fn warm_sweep_moves_targets_along_mapping() {
    let mut g = started();
    g.apply_parameters(&ParameterState::new(1.0, 0.0, 0.0, 0.0), 0.0);
    assert_eq!(g.target(WARM_CUTOFF), Some(2000.0));
    assert!((g.target(WARM_NOISE_GAIN).unwrap() - 0.30).abs() < 1e-6);
    assert!((g.target(WARM_REVERB_WET).unwrap() - 0.3).abs() < 1e-6);
    assert!((g.target(SPACE_REVERB_WET).unwrap() - 0.4).abs() < 1e-6);

    g.apply_parameters(&ParameterState::new(0.0, 0.0, 0.0, 0.0), 1.0);
    assert_eq!(g.target(WARM_CUTOFF), Some(1200.0));
    let ramp = g.ramp(WARM_CUTOFF).unwrap();
    assert_eq!(ramp.from, 2000.0, "new ramp starts from the settled value");
    assert!((ramp.duration - constants::RAMP_WARM_CUTOFF_SEC).abs() < 1e-9);

    let mut prev = f32::MAX;
    for i in 0..=10 {
        let t = 1.0 + ramp.duration * i as f64 / 10.0;
        let v = g.value_at(WARM_CUTOFF, t).unwrap();
        assert!(v <= prev, "cutoff rose during a downward ramp at t={t}");
        prev = v;
    }
    assert_eq!(g.value_at(WARM_CUTOFF, 1.0 + ramp.duration), Some(1200.0));
    assert_eq!(
        g.backend().last_ramp(WARM_CUTOFF).map(|r| r.to),
        Some(1200.0),
        "ramp reaches the backend once started"
    );
}

#[test]
fn ramp_restarts_from_current_value_midway() {
    let mut g = started();
    g.apply_parameters(&ParameterState::new(1.0, 0.0, 0.0, 0.0), 0.0);
    g.apply_parameters(&ParameterState::new(0.0, 0.0, 0.0, 0.0), 10.0);
    g.apply_parameters(&ParameterState::new(1.0, 0.0, 0.0, 0.0), 10.25);
    let r = g.ramp(WARM_CUTOFF).unwrap();
    assert!((r.from - 1600.0).abs() < 1.0, "no jump when retargeting mid-ramp, from={}", r.from);
}

#[test]
fn chaos_sets_whole_bit_depths() {
    let mut g = started();
    g.apply_parameters(&ParameterState::new(0.0, 0.0, 0.3, 0.0), 0.0);
    assert_eq!(g.target(CHAOS_BITS), Some(3.0));
    g.apply_parameters(&ParameterState::new(0.0, 0.0, 1.0, 0.0), 1.0);
    assert_eq!(g.target(CHAOS_BITS), Some(6.0));
}

#[test]
fn master_gain_combines_density_and_energy() {
    let mut g = started();
    g.apply_parameters(&ParameterState::new(0.0, 0.0, 0.0, 1.0), 0.0);
    assert!((g.target(MASTER_GAIN).unwrap() - 0.9).abs() < 1e-6);
    g.set_energy(0.0, 1.0);
    assert!((g.target(MASTER_GAIN).unwrap() - 0.675).abs() < 1e-6);
    g.apply_parameters(&ParameterState::new(0.0, 0.0, 0.0, 0.0), 2.0);
    assert!((g.target(MASTER_GAIN).unwrap() - 0.525).abs() < 1e-6);
}

#[test]
fn energy_drives_touch_chain_with_short_ramps() {
    let mut g = started();
    g.set_energy(1.0, 0.0);
    assert_eq!(g.target(TOUCH_CUTOFF), Some(3200.0));
    assert!((g.target(TOUCH_REVERB_WET).unwrap() - 0.56).abs() < 1e-6);
    let r = g.ramp(TOUCH_CUTOFF).unwrap();
    assert!(r.duration >= 0.08 && r.duration <= 0.15);
    g.set_energy(7.0, 1.0);
    assert_eq!(g.target(TOUCH_CUTOFF), Some(3200.0), "energy above 1 is clamped");
}

#[test]
fn targets_stay_within_declared_ranges() {
    let mut g = started();
    for (i, v) in [-3.0_f32, 0.0, 0.5, 1.0, 9.0, f32::NAN].into_iter().enumerate() {
        g.apply_parameters(&ParameterState::new(v, v, v, v), i as f64);
        g.set_energy(v, i as f64 + 0.5);
        for addr in g.addresses().collect::<Vec<_>>() {
            let range = g.range(addr).unwrap();
            let target = g.target(addr).unwrap();
            assert!(range.contains(target), "{addr:?} target {target} outside {range:?}");
        }
    }
}

#[test]
fn taps_are_silent_before_start() {
    let mut g = graph();
    assert!(g.on_tap(0.5, 0.8, 0.0).is_empty());
    assert!(g.backend().triggers.is_empty());
}

#[test]
fn sparkle_only_after_a_pause() {
    let mut g = started();
    assert_eq!(g.on_tap(0.2, 0.5, 1.0).len(), 2, "first tap sparkles");
    assert_eq!(g.on_tap(0.2, 0.5, 1.1).len(), 1, "quick follow-up is a pluck only");
    assert_eq!(g.on_tap(0.2, 0.5, 1.5).len(), 2);
    assert_eq!(g.backend().triggers.len(), 5);
}

#[test]
fn failed_trigger_is_dropped() {
    let mut g = started();
    g.backend_mut().fail_triggers = true;
    let v = VoiceEvent::new(VoiceKind::Kick, &[24], 0.9, 0.0, 0.2);
    assert!(!g.trigger(&v, 0.0));
    assert!(g.backend().triggers.is_empty());
}

#[test]
fn cancel_is_forwarded_only_once_started() {
    let mut g = graph();
    g.cancel_scheduled(0.0);
    assert!(g.backend().cancels.is_empty());
    g.start(0.0).unwrap();
    g.cancel_scheduled(1.0);
    assert_eq!(g.backend().cancels, vec![1.0]);
}

#[test]
fn every_voice_has_a_chain_on_its_layer() {
    let topo = Topology::standard(82.0);
    for kind in ALL_VOICES {
        let (bus, _) = topo
            .chain_for(kind)
            .unwrap_or_else(|| panic!("no chain plays {kind:?}"));
        assert_eq!(bus, kind.layer(), "{kind:?} routed to the wrong bus");
    }
}

#[test]
fn topology_addresses_are_unique_and_cover_mapping() {
    let topo = Topology::standard(82.0);
    let params = topo.params();
    let unique: HashSet<ParamAddress> = params.iter().map(|(a, _, _)| *a).collect();
    assert_eq!(unique.len(), params.len(), "duplicate parameter address");
    for addr in [
        MASTER_GAIN,
        WARM_NOISE_GAIN,
        WARM_CUTOFF,
        WARM_REVERB_WET,
        SPACE_DELAY_FEEDBACK,
        SPACE_REVERB_WET,
        CHAOS_BITS,
        CHAOS_GAIN,
        TOUCH_CUTOFF,
        TOUCH_REVERB_WET,
    ] {
        assert!(unique.contains(&addr), "{addr:?} not declared");
    }
    for b in Bus::LAYERS {
        assert!(topo.bus(b).is_some(), "missing {} bus", b.name());
    }
}

#[test]
fn delay_time_follows_tempo() {
    let topo = Topology::standard(120.0);
    let space = topo.bus(Bus::Space).unwrap();
    let delay = space.chains[0]
        .effects
        .iter()
        .find_map(|fx| match fx.effect {
            Effect::FeedbackDelay { delay_sec, .. } => Some(delay_sec),
            _ => None,
        })
        .unwrap();
    assert!((delay - 0.25).abs() < 1e-6);
}
