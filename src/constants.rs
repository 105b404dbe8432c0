//! Centralised simulation constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::SimConfig::default`] reads every value from this file;
//! `assets/simulation.toml` may override any subset at startup.
//!
//! ## Tuning guidance
//!
//! Radii are given at the reference viewport size and are rescaled with the
//! viewport (see [`crate::attractor::Attractor::rescale`]).  Velocities are in
//! units per tick; the engine advances one tick per rendered frame.

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Reference viewport width.  All attractor radii below are tuned for it.
pub const REFERENCE_WIDTH: f32 = 800.0;

/// Reference viewport height.
pub const REFERENCE_HEIGHT: f32 = 600.0;

// ── Attractor ─────────────────────────────────────────────────────────────────

/// Radius of the drawn black core at base mass (reference scale).
pub const ATTRACTOR_DRAW_RADIUS: f32 = 4.0;

/// Innermost threshold (reference scale).
pub const CORE_RADIUS: f32 = 8.0;

/// Erosion intensifies inside `2 × EVENT_HORIZON_RADIUS`.
pub const EVENT_HORIZON_RADIUS: f32 = 60.0;

/// Beyond this distance the force law is inactive.
pub const GRAVITY_RANGE_RADIUS: f32 = 400.0;

/// Attractor mass with nothing captured.
pub const BASE_MASS: f32 = 1000.0;

/// Mass added per captured particle.
pub const MASS_PER_CAPTURE: f32 = 100.0;

/// Fixed multiplier applied to `mass / distance²`.
///
/// At 0.1 with the base mass, a body 100 u away gains 0.01 u/tick² inward.
pub const GRAVITY_DAMPING: f32 = 0.1;

/// Distances at or below this are skipped by the force law.
pub const MIN_GRAVITY_DIST: f32 = 0.1;

/// Growth rate of the drawn core with `ln(mass / base_mass)`.
pub const DISPLAY_RADIUS_GROWTH: f32 = 0.3;

// ── Erosion ───────────────────────────────────────────────────────────────────

/// Scale applied to `gravity_range / distance` before clamping to 1.
pub const EROSION_DISTANCE_FACTOR: f32 = 0.3;

/// Baseline emission probability at full distance strength.
pub const EROSION_BASE_CHANCE: f32 = 0.02;

/// Extra emission probability at the centre of the intensive zone.
pub const EROSION_INTENSIVE_CHANCE: f32 = 0.4;

/// Health lost per tick at the centre of the intensive zone.
pub const EROSION_HEALTH_LOSS: f32 = 3.0;

/// Emitted particle count per unit of `intensive_zone × size_multiplier`.
pub const EROSION_PARTICLE_SCALE: f32 = 5.0;

/// Size lost per particle emitted by erosion.
pub const EROSION_SIZE_PER_PARTICLE: f32 = 0.5;

/// Body size that maps to a size multiplier of 1.
pub const EROSION_SIZE_REFERENCE: f32 = 15.0;

// ── Asteroids ─────────────────────────────────────────────────────────────────

/// Bodies at or below this size are destroyed; erosion never shrinks below it.
pub const MIN_BODY_SIZE: f32 = 5.0;

/// Smallest size of a freshly spawned body.
pub const BODY_SIZE_MIN: f32 = 10.0;

/// Upper (exclusive) size of a freshly spawned body.
pub const BODY_SIZE_MAX: f32 = 25.0;

/// Health of every new body, including split children.
pub const BODY_MAX_HEALTH: f32 = 100.0;

/// Distance outside the viewport edge where new bodies appear.
pub const SPAWN_INSET: f32 = 30.0;

/// Inward spawn speed range (u/tick).
pub const SPAWN_SPEED_MIN: f32 = 1.0;
pub const SPAWN_SPEED_MAX: f32 = 3.0;

/// Lateral spawn speed is drawn from `±SPAWN_LATERAL_SPEED`.
pub const SPAWN_LATERAL_SPEED: f32 = 1.0;

/// Bodies further than this outside the viewport are culled without debris.
pub const BODY_CULL_MARGIN: f32 = 200.0;

/// Fixed debris count on destruction is `floor(size / 2) + DESTROY_PARTICLE_BASE`.
pub const DESTROY_PARTICLE_BASE: usize = 5;

/// Default automatic spawn rate (bodies per second).
pub const SPAWN_RATE: f32 = 0.2;

// ── Collisions ────────────────────────────────────────────────────────────────

/// Bodies larger than this split in two on collision; smaller ones shatter.
pub const SPLIT_SIZE_THRESHOLD: f32 = 8.0;

/// Child size as a fraction of the parent.
pub const SPLIT_SIZE_RATIO: f32 = 0.7;

/// Child position offset range (±, per axis).
pub const SPLIT_POSITION_JITTER: f32 = 5.0;

/// Child velocity jitter range (±, per axis).
pub const SPLIT_VELOCITY_JITTER: f32 = 2.0;

/// Particles produced when a small body shatters.
pub const SHATTER_PARTICLE_COUNT: usize = 8;

// ── Particles ─────────────────────────────────────────────────────────────────

/// Emission position jitter (±, per axis).
pub const PARTICLE_POSITION_JITTER: f32 = 10.0;

/// Emission velocity jitter (±, per axis).
pub const PARTICLE_VELOCITY_JITTER: f32 = 4.0;

/// Particle size range before the source-size cap is applied.
pub const PARTICLE_SIZE_MIN: f32 = 1.0;
pub const PARTICLE_SIZE_MAX: f32 = 4.0;

/// Particle size never exceeds this fraction of its source body.
pub const PARTICLE_SOURCE_SIZE_RATIO: f32 = 0.1;

/// Per-tick velocity multiplier for collision/destruction debris.
pub const FRAGMENT_FRICTION: f32 = 0.999;

/// Per-tick velocity multiplier for erosion dust.
pub const DUST_FRICTION: f32 = 0.998;

/// Per-axis speed clamp (u/tick).
pub const MAX_PARTICLE_SPEED: f32 = 20.0;

/// Particles this far outside the viewport are recentred near the attractor.
pub const PARTICLE_RECENTER_MARGIN: f32 = 500.0;

/// Recentred particles land within `±PARTICLE_RECENTER_SPREAD / 2` of the attractor.
pub const PARTICLE_RECENTER_SPREAD: f32 = 200.0;

/// NaN recovery offset range around the attractor (±half, per axis).
pub const NAN_RESET_SPREAD: f32 = 100.0;

/// NaN recovery velocity range (±half, per axis).
pub const NAN_RESET_VELOCITY: f32 = 4.0;

// ── Capture / orbit shell ─────────────────────────────────────────────────────

/// Distance at which a particle is captured and re-seeded onto the shell.
/// Not rescaled with the viewport.
pub const CAPTURE_RADIUS: f32 = 40.0;

/// Shell radius is `CAPTURE_RADIUS + U[0, ORBIT_BAND_WIDTH)`.
pub const ORBIT_BAND_WIDTH: f32 = 80.0;

/// Tangential speed range on re-seed (u/tick).
pub const ORBIT_SPEED_MIN: f32 = 2.0;
pub const ORBIT_SPEED_MAX: f32 = 6.0;

/// Total spread of the angle jitter around the pure tangent (radians).
pub const ORBIT_ANGLE_JITTER: f32 = std::f32::consts::PI / 3.0;

// ── Population caps ───────────────────────────────────────────────────────────

/// Live bodies beyond this are silently dropped at creation.
pub const MAX_BODIES: usize = 512;

/// Live particles beyond this are silently dropped at creation.
pub const MAX_PARTICLES: usize = 8192;

// ── Viewer ────────────────────────────────────────────────────────────────────

/// Spawn-rate change per Up/Down key press.
pub const SPAWN_RATE_STEP: f32 = 0.1;

/// Font size of the stats overlay.
pub const STATS_FONT_SIZE: f32 = 16.0;
