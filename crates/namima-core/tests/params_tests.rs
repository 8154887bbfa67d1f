use namima_core::*;

#[test]
fn defaults_match_initial_sliders() {
    let p = ParameterState::default();
    assert_eq!((p.warm(), p.space(), p.chaos(), p.density()), (0.6, 0.7, 0.3, 0.5));
}

#[test]
fn writes_are_clamped_into_unit_range() {
    let mut p = ParameterState::default();
    assert_eq!(p.set(Knob::Warm, 1.4), 1.0);
    assert_eq!(p.set(Knob::Space, -0.2), 0.0);
    assert_eq!(p.set(Knob::Chaos, f32::NAN), 0.0);
    assert_eq!(p.set(Knob::Density, f32::INFINITY), 1.0);
    for k in Knob::ALL {
        assert!((0.0..=1.0).contains(&p.get(k)));
    }
}

#[test]
fn sliders_normalize_integer_positions() {
    assert_eq!(normalize_slider(0), 0.0);
    assert_eq!(normalize_slider(50), 0.5);
    assert_eq!(normalize_slider(100), 1.0);
    assert_eq!(normalize_slider(140), 1.0);
    assert_eq!(normalize_slider(-1), 0.0);
}
