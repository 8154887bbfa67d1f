use namima_core::*;

#[test]
fn durations_at_default_tempo() {
    let t = Transport::default();
    assert!((t.beat_sec() - 60.0 / 82.0).abs() < 1e-12);
    assert!((t.bar_sec() - 4.0 * 60.0 / 82.0).abs() < 1e-12);
    assert!((t.duration(NoteValue::Bars(2)) - 2.0 * t.bar_sec()).abs() < 1e-12);
    assert!((t.duration(NoteValue::Eighth) - 2.0 * t.duration(NoteValue::Sixteenth)).abs() < 1e-12);
}

#[test]
fn stopped_transport_has_no_position() {
    let t = Transport::default();
    assert!(!t.is_running());
    assert_eq!(t.bars_at(1.0), None);
    assert_eq!(t.time_of_bar(0.0), None);
}

#[test]
fn start_applies_lead_in() {
    let mut t = Transport::default();
    t.start(3.0);
    assert!((t.time_of_bar(0.0).unwrap() - 3.05).abs() < 1e-12);
    assert!(t.bars_at(3.0).unwrap() < 0.0);
    t.stop();
    assert!(!t.is_running());
}

#[test]
fn swing_delays_odd_sixteenths_only() {
    let t = Transport::default();
    let step = t.sixteenth_sec();
    assert_eq!(t.swung_sixteenth(0), 0.0);
    assert!((t.swung_sixteenth(2) - 2.0 * step).abs() < 1e-12);
    let expected = step + 0.12_f32 as f64 * 0.5 * step;
    assert!((t.swung_sixteenth(1) - expected).abs() < 1e-12);
}

#[test]
fn bars_and_times_are_inverse() {
    let mut t = Transport::new(TransportConfig {
        bpm: 100.0,
        ..TransportConfig::default()
    });
    t.start(0.0);
    for bar in [0.0, 1.0, 3.5, 17.0] {
        let at = t.time_of_bar(bar).unwrap();
        assert!((t.bars_at(at).unwrap() - bar).abs() < 1e-9);
    }
}
