//! Runtime simulation configuration loaded from `assets/simulation.toml`.
//!
//! [`SimConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_sim_config`] reads
//! `assets/simulation.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<SimConfig>` to any system parameter list and read values
//! with `config.base_mass`, `config.capture_radius`, etc.  The engine itself
//! takes a `SimConfig` by value when a [`crate::simulation::Simulation`] is
//! built, so later edits to the resource do not affect a running engine.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SimConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_bounds, validate_friction, validate_non_negative, validate_positive,
    validate_radius_ordering, SimError, SimResult,
};
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the optional override file.
pub const CONFIG_PATH: &str = "assets/simulation.toml";

/// How many colliding pairs [`crate::collision::CollisionResolver`] resolves per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Resolve only the first overlapping pair in index order; the rest wait
    /// for later ticks.
    #[default]
    FirstPair,
    /// Resolve every disjoint overlapping pair found in one scan.
    AllPairs,
}

/// Runtime-tunable simulation configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/simulation.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // ── Viewport ──────────────────────────────────────────────────────────────
    pub width: f32,
    pub height: f32,
    pub reference_width: f32,
    pub reference_height: f32,

    // ── Attractor ─────────────────────────────────────────────────────────────
    pub attractor_draw_radius: f32,
    pub core_radius: f32,
    pub event_horizon_radius: f32,
    pub gravity_range_radius: f32,
    pub base_mass: f32,
    pub mass_per_capture: f32,
    pub gravity_damping: f32,
    pub min_gravity_dist: f32,

    // ── Erosion ───────────────────────────────────────────────────────────────
    pub erosion_distance_factor: f32,
    pub erosion_base_chance: f32,
    pub erosion_intensive_chance: f32,
    pub erosion_health_loss: f32,
    pub erosion_particle_scale: f32,
    pub erosion_size_per_particle: f32,
    pub erosion_size_reference: f32,

    // ── Asteroids ─────────────────────────────────────────────────────────────
    pub min_body_size: f32,
    pub body_size_min: f32,
    pub body_size_max: f32,
    pub body_max_health: f32,
    pub spawn_inset: f32,
    pub spawn_speed_min: f32,
    pub spawn_speed_max: f32,
    pub spawn_lateral_speed: f32,
    pub body_cull_margin: f32,
    pub spawn_rate: f32,

    // ── Collisions ────────────────────────────────────────────────────────────
    pub collision_mode: CollisionMode,
    pub split_size_threshold: f32,
    pub split_size_ratio: f32,
    pub split_position_jitter: f32,
    pub split_velocity_jitter: f32,
    pub shatter_particle_count: usize,

    // ── Particles ─────────────────────────────────────────────────────────────
    pub particle_position_jitter: f32,
    pub particle_velocity_jitter: f32,
    pub particle_size_min: f32,
    pub particle_size_max: f32,
    pub particle_source_size_ratio: f32,
    pub fragment_friction: f32,
    pub dust_friction: f32,
    pub max_particle_speed: f32,
    pub particle_recenter_margin: f32,
    pub particle_recenter_spread: f32,
    pub nan_reset_spread: f32,
    pub nan_reset_velocity: f32,

    // ── Capture ───────────────────────────────────────────────────────────────
    pub capture_radius: f32,
    pub orbit_band_width: f32,
    pub orbit_speed_min: f32,
    pub orbit_speed_max: f32,
    pub orbit_angle_jitter: f32,

    // ── Population ────────────────────────────────────────────────────────────
    pub max_bodies: usize,
    pub max_particles: usize,

    /// Fixed RNG seed for reproducible runs; `None` seeds from entropy.
    pub seed: Option<u64>,

    // ── Viewer ────────────────────────────────────────────────────────────────
    pub spawn_rate_step: f32,
    pub stats_font_size: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Viewport
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
            reference_width: REFERENCE_WIDTH,
            reference_height: REFERENCE_HEIGHT,
            // Attractor
            attractor_draw_radius: ATTRACTOR_DRAW_RADIUS,
            core_radius: CORE_RADIUS,
            event_horizon_radius: EVENT_HORIZON_RADIUS,
            gravity_range_radius: GRAVITY_RANGE_RADIUS,
            base_mass: BASE_MASS,
            mass_per_capture: MASS_PER_CAPTURE,
            gravity_damping: GRAVITY_DAMPING,
            min_gravity_dist: MIN_GRAVITY_DIST,
            // Erosion
            erosion_distance_factor: EROSION_DISTANCE_FACTOR,
            erosion_base_chance: EROSION_BASE_CHANCE,
            erosion_intensive_chance: EROSION_INTENSIVE_CHANCE,
            erosion_health_loss: EROSION_HEALTH_LOSS,
            erosion_particle_scale: EROSION_PARTICLE_SCALE,
            erosion_size_per_particle: EROSION_SIZE_PER_PARTICLE,
            erosion_size_reference: EROSION_SIZE_REFERENCE,
            // Asteroids
            min_body_size: MIN_BODY_SIZE,
            body_size_min: BODY_SIZE_MIN,
            body_size_max: BODY_SIZE_MAX,
            body_max_health: BODY_MAX_HEALTH,
            spawn_inset: SPAWN_INSET,
            spawn_speed_min: SPAWN_SPEED_MIN,
            spawn_speed_max: SPAWN_SPEED_MAX,
            spawn_lateral_speed: SPAWN_LATERAL_SPEED,
            body_cull_margin: BODY_CULL_MARGIN,
            spawn_rate: SPAWN_RATE,
            // Collisions
            collision_mode: CollisionMode::default(),
            split_size_threshold: SPLIT_SIZE_THRESHOLD,
            split_size_ratio: SPLIT_SIZE_RATIO,
            split_position_jitter: SPLIT_POSITION_JITTER,
            split_velocity_jitter: SPLIT_VELOCITY_JITTER,
            shatter_particle_count: SHATTER_PARTICLE_COUNT,
            // Particles
            particle_position_jitter: PARTICLE_POSITION_JITTER,
            particle_velocity_jitter: PARTICLE_VELOCITY_JITTER,
            particle_size_min: PARTICLE_SIZE_MIN,
            particle_size_max: PARTICLE_SIZE_MAX,
            particle_source_size_ratio: PARTICLE_SOURCE_SIZE_RATIO,
            fragment_friction: FRAGMENT_FRICTION,
            dust_friction: DUST_FRICTION,
            max_particle_speed: MAX_PARTICLE_SPEED,
            particle_recenter_margin: PARTICLE_RECENTER_MARGIN,
            particle_recenter_spread: PARTICLE_RECENTER_SPREAD,
            nan_reset_spread: NAN_RESET_SPREAD,
            nan_reset_velocity: NAN_RESET_VELOCITY,
            // Capture
            capture_radius: CAPTURE_RADIUS,
            orbit_band_width: ORBIT_BAND_WIDTH,
            orbit_speed_min: ORBIT_SPEED_MIN,
            orbit_speed_max: ORBIT_SPEED_MAX,
            orbit_angle_jitter: ORBIT_ANGLE_JITTER,
            // Population
            max_bodies: MAX_BODIES,
            max_particles: MAX_PARTICLES,
            seed: None,
            // Viewer
            spawn_rate_step: SPAWN_RATE_STEP,
            stats_font_size: STATS_FONT_SIZE,
        }
    }
}

impl SimConfig {
    /// Read and validate a config file.  Keys missing from the file keep
    /// their compiled defaults.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|err| match err {
            SimError::ConfigParse { source, .. } => SimError::ConfigParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        let config: SimConfig = toml::from_str(contents).map_err(|source| SimError::ConfigParse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> SimResult<()> {
        validate_bounds(self.width, self.height)?;
        validate_bounds(self.reference_width, self.reference_height)?;
        validate_radius_ordering(
            self.core_radius,
            self.event_horizon_radius,
            self.gravity_range_radius,
        )?;
        validate_positive("base_mass", self.base_mass)?;
        validate_non_negative("mass_per_capture", self.mass_per_capture)?;
        validate_positive("gravity_damping", self.gravity_damping)?;
        validate_positive("min_gravity_dist", self.min_gravity_dist)?;
        validate_positive("erosion_size_reference", self.erosion_size_reference)?;
        validate_positive("min_body_size", self.min_body_size)?;
        validate_positive("body_max_health", self.body_max_health)?;
        validate_non_negative("spawn_rate", self.spawn_rate)?;
        validate_positive("capture_radius", self.capture_radius)?;
        validate_non_negative("orbit_band_width", self.orbit_band_width)?;
        validate_positive("max_particle_speed", self.max_particle_speed)?;
        validate_friction("fragment_friction", self.fragment_friction)?;
        validate_friction("dust_friction", self.dust_friction)?;
        validate_range("body_size", self.body_size_min, self.body_size_max)?;
        validate_range("spawn_speed", self.spawn_speed_min, self.spawn_speed_max)?;
        validate_range("particle_size", self.particle_size_min, self.particle_size_max)?;
        validate_range("orbit_speed", self.orbit_speed_min, self.orbit_speed_max)?;
        // Symmetric `-x..=x` sampling widths.
        for (name, width) in [
            ("spawn_lateral_speed", self.spawn_lateral_speed),
            ("split_position_jitter", self.split_position_jitter),
            ("split_velocity_jitter", self.split_velocity_jitter),
            ("particle_position_jitter", self.particle_position_jitter),
            ("particle_velocity_jitter", self.particle_velocity_jitter),
            ("orbit_angle_jitter", self.orbit_angle_jitter),
            ("nan_reset_spread", self.nan_reset_spread),
            ("nan_reset_velocity", self.nan_reset_velocity),
            ("particle_recenter_spread", self.particle_recenter_spread),
        ] {
            validate_non_negative(name, width)?;
        }
        if self.max_bodies == 0 {
            return Err(SimError::UnsafeConstant {
                name: "max_bodies",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.max_particles == 0 {
            return Err(SimError::UnsafeConstant {
                name: "max_particles",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        Ok(())
    }
}

/// A sampling range must be non-empty for `gen_range`.
fn validate_range(name: &'static str, min: f32, max: f32) -> SimResult<()> {
    validate_non_negative(name, min)?;
    if max > min {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value: max,
            safe_range: "(min, ∞)",
        })
    }
}

/// Startup system: attempt to load `assets/simulation.toml` and overwrite the
/// `SimConfig` resource with any values present in the file.
///
/// A missing file is silently ignored (defaults are already in place from
/// `insert_resource`).  Parse and validation errors are logged but do not
/// abort the simulation.
pub fn load_sim_config(mut config: ResMut<SimConfig>) {
    if !Path::new(CONFIG_PATH).exists() {
        info!("No {CONFIG_PATH} found; using compiled defaults");
        return;
    }
    match SimConfig::load(CONFIG_PATH) {
        Ok(loaded) => {
            *config = loaded;
            info!("Loaded simulation config from {CONFIG_PATH}");
        }
        Err(err) => warn!("{err}; using defaults"),
    }
}
