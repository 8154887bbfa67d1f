use glam::Vec2;
use namima_core::*;

fn one_source(pos: Vec2, strength: f32) -> SourceRegistry {
    let mut reg = SourceRegistry::default();
    reg.add(pos, strength, 0.0);
    reg
}

#[test]
fn value_at_fresh_source_is_zero() {
    let centre = Vec2::new(640.0, 360.0);
    let reg = one_source(centre, 0.55);
    let sampler = FieldSampler::default();
    let s = sampler.sample(centre, 0.0, reg.all());
    assert!(s.value.abs() < 1e-6, "sin(0) at the source must vanish, got {}", s.value);
    assert_eq!(s.gradient, Vec2::ZERO, "gradient is undefined at the source and left at zero");
}

#[test]
fn value_is_bounded_by_strength() {
    let reg = one_source(Vec2::ZERO, 0.55);
    let sampler = FieldSampler::default();
    for d in [1.0_f32, 10.0, 31.4, 100.0, 400.0] {
        let v = sampler.value(Vec2::new(d, 0.0), 0.0, reg.all());
        assert!(v.abs() <= 0.55 + 1e-6, "|v| = {} exceeds strength at d = {}", v.abs(), d);
    }
}

#[test]
fn envelope_decays_with_distance_and_time() {
    let cfg = FieldConfig::default();
    let mut prev = cfg.envelope(1.0, 0.0, 0.0);
    for i in 1..50 {
        let a = cfg.envelope(1.0, i as f32 * 20.0, 0.0);
        assert!(a <= prev, "envelope grew with distance at step {i}");
        prev = a;
    }
    let mut prev = cfg.envelope(1.0, 50.0, 0.0);
    for i in 1..50 {
        let a = cfg.envelope(1.0, 50.0, i as f32 * 0.1);
        assert!(a <= prev, "envelope grew with time at step {i}");
        prev = a;
    }
}

#[test]
fn sources_from_the_future_are_ignored() {
    let mut reg = SourceRegistry::default();
    reg.add(Vec2::ZERO, 1.0, 5.0);
    let sampler = FieldSampler::default();
    let s = sampler.sample(Vec2::new(30.0, 0.0), 1.0, reg.all());
    assert_eq!(s.value, 0.0);
    assert_eq!(s.gradient, Vec2::ZERO);
}

#[test]
fn contributions_superpose_linearly() {
    let a = Vec2::new(100.0, 100.0);
    let b = Vec2::new(300.0, 200.0);
    let p = Vec2::new(180.0, 140.0);
    let sampler = FieldSampler::default();
    let ra = one_source(a, 0.7);
    let rb = one_source(b, 0.4);
    let mut both = SourceRegistry::default();
    both.add(a, 0.7, 0.0);
    both.add(b, 0.4, 0.0);
    let t = 0.8;
    let sum = sampler.sample(p, t, ra.all()).value + sampler.sample(p, t, rb.all()).value;
    let joint = sampler.sample(p, t, both.all()).value;
    assert!((sum - joint).abs() < 1e-5);
}

#[test]
fn gradient_matches_central_difference() {
    let mut reg = SourceRegistry::default();
    reg.add(Vec2::new(200.0, 150.0), 0.9, 0.0);
    reg.add(Vec2::new(420.0, 260.0), 0.6, 0.4);
    let sampler = FieldSampler::default();
    let h = 0.05_f32;
    for &(x, y, t) in &[(250.0_f32, 170.0_f32, 0.6_f64), (330.0, 210.0, 1.2), (180.0, 300.0, 2.0)] {
        let p = Vec2::new(x, y);
        let g = sampler.sample(p, t, reg.all()).gradient;
        let dx = (sampler.value(p + Vec2::X * h, t, reg.all())
            - sampler.value(p - Vec2::X * h, t, reg.all()))
            / (2.0 * h);
        let dy = (sampler.value(p + Vec2::Y * h, t, reg.all())
            - sampler.value(p - Vec2::Y * h, t, reg.all()))
            / (2.0 * h);
        assert!((g.x - dx).abs() < 2e-3, "d/dx mismatch at {p}: {} vs {}", g.x, dx);
        assert!((g.y - dy).abs() < 2e-3, "d/dy mismatch at {p}: {} vs {}", g.y, dy);
    }
}

#[test]
fn sample_and_value_agree() {
    let reg = one_source(Vec2::new(50.0, 50.0), 0.8);
    let sampler = FieldSampler::default();
    let p = Vec2::new(90.0, 20.0);
    let a = sampler.sample(p, 0.3, reg.all()).value;
    let b = sampler.value(p, 0.3, reg.all());
    assert!((a - b).abs() < 1e-7);
}
