// Relationships between tuning constants that the rest of the crate relies on.

use namima_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn energy_ramps_are_short_but_audible() {
    assert!(RAMP_ENERGY_CUTOFF_SEC >= 0.08 && RAMP_ENERGY_CUTOFF_SEC <= 0.15);
    assert!(RAMP_ENERGY_SEC >= 0.08 && RAMP_ENERGY_SEC <= 0.15);
    assert!(MIN_RAMP_SEC > 0.0 && MIN_RAMP_SEC < RAMP_ENERGY_CUTOFF_SEC);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn dispatch_window_covers_tick_interval() {
    // The transport tick runs every ~25 ms; both windows must be wider.
    assert!(SCHEDULE_LOOKAHEAD_SEC > 0.025);
    assert!(DISPATCH_AHEAD_SEC > 0.025);
    assert!(TRANSPORT_LEAD_IN_SEC < SCHEDULE_LOOKAHEAD_SEC);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn probabilities_stay_below_one() {
    assert!(PAD_ECHO_PROB_BASE + PAD_ECHO_PROB_SPAN <= 1.0);
    assert!(BASS_GHOST_PROB_BASE + BASS_GHOST_PROB_SPAN <= 1.0);
    assert!(HAT_PROB_BASE + HAT_PROB_SPAN <= 1.0);
    assert!(BURST_PROB_SPAN <= 1.0);
    assert!(KICK_PROB <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn tap_velocity_cap_is_reachable() {
    assert!(TAP_VELOCITY_BASE < TAP_VELOCITY_MAX);
    assert!(TAP_VELOCITY_BASE + TAP_VELOCITY_SPAN > TAP_VELOCITY_MAX - 1e-6);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn mobile_swarm_is_lighter() {
    assert!(PARTICLE_COUNT_MOBILE < PARTICLE_COUNT_DESKTOP);
    assert!(FRICTION > 0.0 && FRICTION < 1.0);
    assert!(MAX_SOURCES >= 1);
}
