use glam::Vec2;
use namima_core::*;

#[test]
fn registry_keeps_five_most_recent() {
    let mut reg = SourceRegistry::default();
    for i in 0..6 {
        reg.add(Vec2::new(i as f32, 0.0), 0.5, i as f64 * 0.1);
    }
    assert_eq!(reg.len(), 5, "registry must stay at capacity");
    let xs: Vec<f32> = reg.all().map(|s| s.pos.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0, 5.0], "oldest source should be evicted first");
}

#[test]
fn add_returns_evicted_source() {
    let mut reg = SourceRegistry::new(2, 6.5);
    assert!(reg.add(Vec2::ZERO, 0.5, 0.0).is_none());
    assert!(reg.add(Vec2::ONE, 0.5, 0.1).is_none());
    let evicted = reg.add(Vec2::X, 0.5, 0.2).unwrap();
    assert_eq!(evicted.pos, Vec2::ZERO);
}

#[test]
fn size_never_exceeds_capacity_over_many_adds() {
    let mut reg = SourceRegistry::default();
    for i in 0..100 {
        reg.add(Vec2::splat(i as f32), 1.0, i as f64);
        assert!(reg.len() <= constants::MAX_SOURCES);
    }
}

#[test]
fn prune_removes_expired_sources() {
    let mut reg = SourceRegistry::default();
    reg.add(Vec2::ZERO, 0.5, 0.0);
    reg.add(Vec2::ONE, 0.5, 3.0);
    assert_eq!(reg.prune(6.4), 0);
    assert_eq!(reg.prune(6.5), 1, "source at exactly the expiry horizon is removed");
    assert!(reg.all().all(|s| 6.5 - s.t0 < reg.expiry_sec()));
    assert_eq!(reg.prune(100.0), 1);
    assert!(reg.is_empty());
}

#[test]
fn strength_is_clamped_not_rejected() {
    let mut reg = SourceRegistry::default();
    reg.add(Vec2::ZERO, 3.0, 0.0);
    reg.add(Vec2::ZERO, -1.0, 0.0);
    reg.add(Vec2::ZERO, f32::NAN, 0.0);
    let s: Vec<f32> = reg.all().map(|s| s.strength).collect();
    assert_eq!(s, vec![1.0, 0.0, 0.0]);
}

#[test]
fn newest_is_last_added() {
    let mut reg = SourceRegistry::default();
    reg.add(Vec2::ZERO, 0.2, 0.0);
    reg.add(Vec2::ONE, 0.9, 1.0);
    assert_eq!(reg.newest().map(|s| s.strength), Some(0.9));
}
