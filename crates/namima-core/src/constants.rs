// Shared field/audio tuning constants used by the engine and both front-ends.

// Ripple sources
pub const MAX_SOURCES: usize = 5; // oldest evicted beyond this
pub const SOURCE_EXPIRY_SEC: f64 = 6.5; // field time after which a source is pruned
pub const CENTER_RIPPLE_STRENGTH: f32 = 0.55; // ripple seeded at the field centre on first start

// Field wave shape (pixel units)
pub const WAVE_FREQ: f32 = 0.05; // radians per pixel
pub const TIME_FREQ: f32 = 2.2; // radians per second
pub const DIST_DECAY: f32 = 0.0026; // amplitude falloff per pixel
pub const TIME_DECAY: f32 = 1.1; // amplitude time constant (seconds)
pub const GRADIENT_MIN_DISTANCE: f32 = 1e-6; // direction undefined at the source itself

// Particles
pub const PARTICLE_COUNT_DESKTOP: usize = 900;
pub const PARTICLE_COUNT_MOBILE: usize = 260;
pub const FORCE_SCALE: f32 = 18.0;
pub const FRICTION: f32 = 0.93; // velocity multiplier per tick
pub const PARTICLE_INIT_SPEED: f32 = 0.2;
pub const PARTICLE_HUE_MIN: f32 = 170.0;
pub const PARTICLE_HUE_MAX: f32 = 290.0;
pub const PARTICLE_WIDTH_MIN: f32 = 0.8;
pub const PARTICLE_WIDTH_MAX: f32 = 2.0;
pub const PARTICLE_GLOW_MIN: f32 = 0.35;
pub const PARTICLE_GLOW_MAX: f32 = 0.85;
pub const MAX_RENDER_DT_SEC: f32 = 0.1; // clamp after a stalled frame

// Renderer mapping of field intensity
pub const BRIGHTNESS_BASE: f32 = 40.0;
pub const BRIGHTNESS_SPAN: f32 = 140.0;
pub const BRIGHTNESS_GAIN: f32 = 1.6;
pub const RADIUS_GAIN: f32 = 2.0;
pub const ALPHA_SCALE: f32 = 170.0;

// Energy feedback
pub const ENERGY_NORM: f32 = 2.2; // summed decayed strength that maps to energy 1.0
pub const ENERGY_EPSILON: f32 = 1e-3; // smaller changes are not re-ramped

// Ramp durations (seconds)
pub const MIN_RAMP_SEC: f64 = 0.005;
pub const RAMP_WARM_NOISE_SEC: f64 = 0.2;
pub const RAMP_WARM_CUTOFF_SEC: f64 = 0.5;
pub const RAMP_SPACE_SEC: f64 = 0.3;
pub const RAMP_CHAOS_SEC: f64 = 0.3;
pub const RAMP_DENSITY_SEC: f64 = 0.4;
pub const RAMP_ENERGY_CUTOFF_SEC: f64 = 0.08;
pub const RAMP_ENERGY_SEC: f64 = 0.12;

// Control mapping (value = base + span * knob)
pub const WARM_NOISE_BASE: f32 = 0.05;
pub const WARM_NOISE_SPAN: f32 = 0.25;
pub const WARM_CUTOFF_BASE: f32 = 1200.0;
pub const WARM_CUTOFF_SPAN: f32 = 800.0;
pub const WARM_REVERB_BASE: f32 = 0.3;
pub const WARM_REVERB_SPAN: f32 = 0.4;
pub const SPACE_FEEDBACK_BASE: f32 = 0.1;
pub const SPACE_FEEDBACK_SPAN: f32 = 0.3;
pub const SPACE_REVERB_BASE: f32 = 0.4;
pub const SPACE_REVERB_SPAN: f32 = 0.5;
pub const CHAOS_BITS_BASE: f32 = 2.0;
pub const CHAOS_BITS_SPAN: f32 = 4.0;
pub const CHAOS_GAIN_BASE: f32 = 0.01;
pub const CHAOS_GAIN_SPAN: f32 = 0.18;
pub const MASTER_LEVEL_BASE: f32 = 0.7;
pub const MASTER_LEVEL_SPAN: f32 = 0.2;

// Energy mapping
pub const ENERGY_CUTOFF_BASE: f32 = 600.0;
pub const ENERGY_CUTOFF_SPAN: f32 = 2600.0;
pub const ENERGY_REVERB_BASE: f32 = 0.18;
pub const ENERGY_REVERB_SPAN: f32 = 0.38;
pub const ENERGY_GAIN_BASE: f32 = 0.75;
pub const ENERGY_GAIN_SPAN: f32 = 0.25;

// Tap response
pub const TAP_STRENGTH_BASE: f32 = 0.55; // random tap strength is base + span * U(0,1)
pub const TAP_STRENGTH_SPAN: f32 = 0.45;
pub const TAP_VELOCITY_BASE: f32 = 0.25;
pub const TAP_VELOCITY_SPAN: f32 = 0.65;
pub const TAP_VELOCITY_MAX: f32 = 0.9;
pub const TAP_PLUCK_VELOCITY: f32 = 0.8;
pub const TAP_PLUCK_DURATION_BASE: f32 = 0.25;
pub const TAP_PLUCK_DURATION_SPAN: f32 = 0.25;
pub const TAP_SPARKLE_GAP_SEC: f64 = 0.18; // sparkle only after a pause this long
pub const TAP_SPARKLE_OFFSET: f32 = 0.17; // second sparkle note, in normalized x
pub const TAP_SPARKLE_DELAY_SEC: f64 = 0.02;
pub const TAP_SPARKLE_DURATION_SEC: f32 = 1.8;
pub const TAP_SPARKLE_VELOCITY: f32 = 0.18;

// Intro chord played once the graph first starts
pub const INTRO_DURATION_SEC: f32 = 6.0;
pub const INTRO_VELOCITY: f32 = 0.08;

// Transport
pub const DEFAULT_BPM: f32 = 82.0;
pub const BEATS_PER_BAR: u32 = 4;
pub const DEFAULT_SWING: f32 = 0.12;
pub const TRANSPORT_LEAD_IN_SEC: f64 = 0.05;
pub const SCHEDULE_LOOKAHEAD_SEC: f64 = 0.1; // timers fire this far ahead of their bar
pub const DISPATCH_AHEAD_SEC: f64 = 0.1; // queued voices are handed over this early
pub const BASS_JITTER_SEC: f64 = 0.05;

// Generative pattern probabilities (p = base + span * knob)
pub const PAD_ECHO_PROB_BASE: f32 = 0.4;
pub const PAD_ECHO_PROB_SPAN: f32 = 0.4;
pub const PAD_VELOCITY_BASE: f32 = 0.5;
pub const PAD_VELOCITY_SPAN: f32 = 0.4;
pub const PAD_ECHO_VELOCITY: f32 = 0.7;
pub const PAD_ECHO_TRANSPOSE: i32 = 7;
pub const BASS_GHOST_PROB_BASE: f32 = 0.3;
pub const BASS_GHOST_PROB_SPAN: f32 = 0.3;
pub const BASS_VELOCITY_BASE: f32 = 0.45;
pub const BASS_VELOCITY_SPAN: f32 = 0.35;
pub const BASS_GHOST_VELOCITY: f32 = 0.6;
pub const KICK_PROB: f32 = 0.85;
pub const KICK_VELOCITY_BASE: f32 = 0.8;
pub const KICK_VELOCITY_SPAN: f32 = 0.2;
pub const HAT_PROB_BASE: f32 = 0.35;
pub const HAT_PROB_SPAN: f32 = 0.25;
pub const HAT_VELOCITY_BASE: f32 = 0.3;
pub const HAT_VELOCITY_SPAN: f32 = 0.3;
pub const BURST_PROB_SPAN: f32 = 0.7;
pub const BURST_DURATION_BASE: f32 = 0.05;
pub const BURST_DURATION_SPAN: f32 = 0.15;
pub const BURST_VELOCITY: f32 = 0.9;

// Timer grid (bars)
pub const PAD_EVERY_BARS: u32 = 4;
pub const BASS_EVERY_BARS: u32 = 2;
pub const BASS_OFFSET_BARS: u32 = 1;
pub const PERC_EVERY_BARS: u32 = 1;
pub const PERC_OFFSET_BARS: u32 = 2;
