//! Tick orchestration for the black hole engine, and the Bevy plugin that
//! drives it once per frame.
//!
//! ## Tick order
//!
//! | # | Phase                | Work                                                      |
//! |---|----------------------|-----------------------------------------------------------|
//! | 1 | Bodies               | Gravity, erosion (sheds dust), Euler step                 |
//! | 2 | Particles            | Gravity, Euler step, friction, speed clamp                |
//! | 3 | Collisions           | [`CollisionResolver::resolve`] (one pair by default)       |
//! | 4 | Body culling         | Sanitize; depleted → debris; exited → silent removal      |
//! | 5 | Capture              | Sanitize/recentre particles; capture + orbit re-seed      |
//! | 6 | Attractor            | Mass recomputed from the capture counter                  |
//!
//! The order is fixed.  The engine never yields mid-tick; pause, reset and
//! spawn requests are applied between ticks by the plugin's systems.
//!
//! ## Plugin systems
//!
//! | System                    | Schedule | Purpose                                        |
//! |---------------------------|----------|------------------------------------------------|
//! | `init_simulation_system`  | Startup  | Build [`SimulationState`] from [`SimConfig`]    |
//! | `apply_controls_system`   | Update   | Reset, bounds change, manual spawn             |
//! | `simulation_tick_system`  | Update   | One tick + automatic spawn unless paused       |
//! | `publish_stats_system`    | Update   | Copy engine counters into [`SimulationStats`]  |

use crate::asteroid::{Asteroid, Fate};
use crate::attractor::Attractor;
use crate::collision::CollisionResolver;
use crate::config::SimConfig;
use crate::constants::{DESTROY_PARTICLE_BASE, DISPLAY_RADIUS_GROWTH};
use crate::error::{validate_bounds, SimResult};
use crate::gravity::{GravityField, HasKinematics};
use crate::particles::{emit_into, sanitize, Capture, FreeParticle, ParticleKind, Recovery};
use crate::store::EntityStore;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Stats ─────────────────────────────────────────────────────────────────────

/// Live counts and running totals since the last reset.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SimulationStats {
    pub live_bodies: usize,
    pub live_particles: usize,
    pub captured: u64,
    pub gravity_level: u64,
    pub ticks: u64,
    pub spawned_total: u64,
    pub split_total: u64,
    pub shattered_total: u64,
    /// Bodies depleted by erosion.
    pub destroyed_total: u64,
    /// Bodies that left the playfield.
    pub culled_total: u64,
    pub particles_emitted_total: u64,
    pub nan_recoveries_total: u64,
    pub recentered_total: u64,
    /// Spawn and emission requests dropped at a store's capacity.
    pub dropped_total: u64,
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Read-only view of the attractor for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractorView {
    pub position: Vec2,
    /// Drawn core radius; grows with mass.
    pub display_radius: f32,
    pub event_horizon_radius: f32,
    pub gravity_range_radius: f32,
    pub capture_radius: f32,
    pub mass: f32,
    pub gravity_level: u64,
    pub captured_count: u64,
}

/// Everything a renderer or stats panel needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SimulationSnapshot<'a> {
    pub attractor: AttractorView,
    pub bodies: &'a [Asteroid],
    pub particles: &'a [FreeParticle],
    pub bounds: Vec2,
}

// ── Spawn clock ───────────────────────────────────────────────────────────────

/// Converts a spawn rate in bodies per second into discrete spawn events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnClock {
    since_last: f32,
}

impl SpawnClock {
    /// Advance by `dt` seconds.  Returns `true` when a body is due; the clock
    /// then restarts from zero.  A rate of zero never fires.
    pub fn advance(&mut self, dt: f32, rate: f32) -> bool {
        if rate <= 0.0 || !rate.is_finite() {
            return false;
        }
        self.since_last += dt;
        if self.since_last >= 1.0 / rate {
            self.since_last = 0.0;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self) {
        self.since_last = 0.0;
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The whole simulation: both entity stores, the attractor, and the RNG.
///
/// All state is owned here and only mutated between or inside [`tick`](Self::tick).
pub struct Simulation {
    config: SimConfig,
    bounds: Vec2,
    attractor: Attractor,
    field: GravityField,
    resolver: CollisionResolver,
    bodies: EntityStore<Asteroid>,
    particles: EntityStore<FreeParticle>,
    spawn_clock: SpawnClock,
    stats: SimulationStats,
    rng: StdRng,
}

impl Simulation {
    /// Validate `config` and build an empty simulation.  The RNG is seeded
    /// from `config.seed` when set, otherwise from entropy.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Like [`new`](Self::new) with an explicit seed, overriding `config.seed`.
    pub fn with_seed(mut config: SimConfig, seed: u64) -> SimResult<Self> {
        config.seed = Some(seed);
        Self::new(config)
    }

    /// Build without validating.  `config` must already have passed
    /// [`SimConfig::validate`].
    pub fn from_validated(config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut simulation = Self {
            bounds: Vec2::new(config.width, config.height),
            attractor: Attractor::from_config(&config),
            field: GravityField::from_config(&config),
            resolver: CollisionResolver::new(config.collision_mode),
            bodies: EntityStore::new(config.max_bodies),
            particles: EntityStore::new(config.max_particles),
            spawn_clock: SpawnClock::default(),
            stats: SimulationStats::default(),
            rng,
            config,
        };
        simulation.refresh_live_stats();
        simulation
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn attractor(&self) -> &Attractor {
        &self.attractor
    }

    pub fn bodies(&self) -> &EntityStore<Asteroid> {
        &self.bodies
    }

    pub fn particles(&self) -> &EntityStore<FreeParticle> {
        &self.particles
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn snapshot(&self) -> SimulationSnapshot<'_> {
        SimulationSnapshot {
            attractor: AttractorView {
                position: self.attractor.position,
                display_radius: self.attractor.display_radius(DISPLAY_RADIUS_GROWTH),
                event_horizon_radius: self.attractor.event_horizon_radius,
                gravity_range_radius: self.attractor.gravity_range_radius,
                capture_radius: self.config.capture_radius,
                mass: self.attractor.mass,
                gravity_level: self.attractor.gravity_level(),
                captured_count: self.attractor.captured_count,
            },
            bodies: self.bodies.as_slice(),
            particles: self.particles.as_slice(),
            bounds: self.bounds,
        }
    }

    // ── Controls ──────────────────────────────────────────────────────────────

    /// Resize the playfield.  Recentres and rescales the attractor.
    pub fn set_bounds(&mut self, bounds: Vec2) -> SimResult<()> {
        validate_bounds(bounds.x, bounds.y)?;
        self.bounds = bounds;
        self.attractor.rescale(&self.config, bounds);
        Ok(())
    }

    /// Clear both stores and restore the attractor to base mass.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.particles.clear();
        self.attractor.reset();
        self.spawn_clock.restart();
        self.stats = SimulationStats::default();
        self.refresh_live_stats();
        info!("Simulation reset");
    }

    /// Spawn one body at a random edge.  Returns `false` when dropped at the
    /// body cap.
    pub fn spawn_body(&mut self) -> bool {
        let body = Asteroid::spawn_at_boundary(self.bounds, &self.config, &mut self.rng);
        self.insert_body(body).is_some()
    }

    /// Place a body directly.  `None` when dropped at the body cap.
    pub fn insert_body(&mut self, body: Asteroid) -> Option<usize> {
        let index = self.bodies.insert(body);
        match index {
            Some(_) => self.stats.spawned_total += 1,
            None => {
                self.stats.dropped_total += 1;
                debug!("Body cap of {} reached; spawn dropped", self.bodies.capacity());
            }
        }
        self.stats.live_bodies = self.bodies.live_len();
        index
    }

    /// Place a particle directly.  `None` when dropped at the particle cap.
    pub fn insert_particle(&mut self, particle: FreeParticle) -> Option<usize> {
        let index = self.particles.insert(particle);
        if index.is_none() {
            self.stats.dropped_total += 1;
        }
        self.stats.live_particles = self.particles.live_len();
        index
    }

    /// Advance the spawn clock by `dt` seconds at `rate` bodies per second and
    /// spawn a body when one is due.
    pub fn advance_spawn_clock(&mut self, dt: f32, rate: f32) -> bool {
        if self.spawn_clock.advance(dt, rate) {
            self.spawn_body()
        } else {
            false
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// One fixed logical step.  Never fails; numeric trouble is repaired in place.
    pub fn tick(&mut self) {
        self.stats.ticks += 1;
        self.step_bodies();
        self.step_particles();
        self.resolve_collisions();
        self.cull_bodies();
        self.capture_particles();
        self.attractor.recompute_mass();
        self.refresh_live_stats();
    }

    fn step_bodies(&mut self) {
        for i in 0..self.bodies.len() {
            let Some(body) = self.bodies.get_mut(i) else {
                continue;
            };
            if let Some(distance) = self.field.apply(&self.attractor, body) {
                let erosion = self.field.erode(&self.attractor, body, distance, &mut self.rng);
                if erosion.emitted > 0 {
                    let emission = emit_into(
                        &mut self.particles,
                        erosion.emitted,
                        body.position,
                        body.size,
                        body.color,
                        ParticleKind::Dust,
                        &self.config,
                        &mut self.rng,
                    );
                    self.stats.particles_emitted_total += emission.created as u64;
                    self.stats.dropped_total += emission.dropped as u64;
                }
            }
            body.integrate();
        }
    }

    fn step_particles(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.advance(&self.field, &self.attractor, &self.config);
        }
    }

    fn resolve_collisions(&mut self) {
        let report = self
            .resolver
            .resolve(&mut self.bodies, &mut self.particles, &self.config, &mut self.rng);
        self.stats.split_total += report.split as u64;
        self.stats.shattered_total += report.shattered as u64;
        self.stats.particles_emitted_total += report.particles_created as u64;
        self.stats.dropped_total += report.dropped as u64;
    }

    fn cull_bodies(&mut self) {
        for i in 0..self.bodies.len() {
            let Some(body) = self.bodies.get_mut(i) else {
                continue;
            };
            let fixed = sanitize(
                body.position,
                body.velocity,
                self.attractor.position,
                self.bounds,
                None,
                &self.config,
                &mut self.rng,
            );
            if fixed.recovery != Recovery::None {
                debug!("Recovered non-finite body state at index {i}");
                self.stats.nan_recoveries_total += 1;
            }
            body.position = fixed.position;
            body.velocity = fixed.velocity;

            match body.fate(self.bounds, &self.config) {
                Fate::Alive => {}
                Fate::Depleted => {
                    let emission = emit_into(
                        &mut self.particles,
                        body.debris_count(DESTROY_PARTICLE_BASE),
                        body.position,
                        body.size,
                        body.color,
                        ParticleKind::Fragment,
                        &self.config,
                        &mut self.rng,
                    );
                    self.stats.particles_emitted_total += emission.created as u64;
                    self.stats.dropped_total += emission.dropped as u64;
                    self.stats.destroyed_total += 1;
                    self.bodies.mark_removed(i);
                }
                Fate::Exited => {
                    self.stats.culled_total += 1;
                    self.bodies.mark_removed(i);
                }
            }
        }
        self.bodies.compact();
    }

    fn capture_particles(&mut self) {
        let margin = Some(self.config.particle_recenter_margin);
        for particle in self.particles.iter_mut() {
            let fixed = sanitize(
                particle.position,
                particle.velocity,
                self.attractor.position,
                self.bounds,
                margin,
                &self.config,
                &mut self.rng,
            );
            match fixed.recovery {
                Recovery::None => {}
                Recovery::NonFinite => {
                    debug!("Recovered non-finite particle state");
                    self.stats.nan_recoveries_total += 1;
                }
                Recovery::Recentered => self.stats.recentered_total += 1,
            }
            particle.position = fixed.position;
            particle.velocity = fixed.velocity;

            if particle.try_capture(&self.attractor, &self.config, &mut self.rng) == Capture::First {
                self.attractor.record_capture();
            }
        }
    }

    fn refresh_live_stats(&mut self) {
        self.stats.live_bodies = self.bodies.live_len();
        self.stats.live_particles = self.particles.live_len();
        self.stats.captured = self.attractor.captured_count;
        self.stats.gravity_level = self.attractor.gravity_level();
    }
}

// ── Bevy resources ────────────────────────────────────────────────────────────

/// The running engine, owned by the ECS world.
#[derive(Resource)]
pub struct SimulationState(pub Simulation);

/// Inputs supplied by the UI between ticks.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationControls {
    /// Bodies per second; 0 disables automatic spawning.
    pub spawn_rate: f32,
    /// Skips the whole tick while set; state is left untouched.
    pub paused: bool,
    /// Playfield size; a change recentres and rescales the attractor.
    pub bounds: Vec2,
    /// One-shot: spawn a body before the next tick.
    pub spawn_now: bool,
    /// One-shot: clear everything before the next tick.
    pub reset: bool,
}

impl SimulationControls {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            spawn_rate: config.spawn_rate,
            paused: false,
            bounds: Vec2::new(config.width, config.height),
            spawn_now: false,
            reset: false,
        }
    }
}

impl Default for SimulationControls {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SimConfig>() {
            app.insert_resource(SimConfig::default());
        }
        app.init_resource::<SimulationStats>()
            .add_systems(Startup, init_simulation_system)
            .add_systems(
                Update,
                (
                    apply_controls_system,
                    simulation_tick_system,
                    publish_stats_system,
                )
                    .chain(),
            );
    }
}

/// Startup system: build the engine from the (possibly file-loaded) config.
/// An invalid config is logged and replaced by compiled defaults.
pub fn init_simulation_system(mut commands: Commands, loaded: Res<SimConfig>) {
    let config = match loaded.validate() {
        Ok(()) => SimConfig::clone(&loaded),
        Err(err) => {
            error!("{err}; falling back to compiled defaults");
            SimConfig::default()
        }
    };
    commands.insert_resource(SimulationControls::from_config(&config));
    commands.insert_resource(SimulationState(Simulation::from_validated(config)));
    info!("Simulation initialised");
}

/// Apply one-shot requests and bounds changes.  Runs even while paused.
pub fn apply_controls_system(
    mut controls: ResMut<SimulationControls>,
    mut state: ResMut<SimulationState>,
) {
    let simulation = &mut state.0;

    if controls.reset {
        controls.reset = false;
        simulation.reset();
    }

    if controls.bounds != simulation.bounds() {
        if let Err(err) = simulation.set_bounds(controls.bounds) {
            warn!("{err}; keeping previous bounds");
            controls.bounds = simulation.bounds();
        }
    }

    if controls.spawn_now {
        controls.spawn_now = false;
        simulation.spawn_body();
    }
}

/// Advance one tick per frame and run the spawn clock, unless paused.
pub fn simulation_tick_system(
    time: Res<Time>,
    controls: Res<SimulationControls>,
    mut state: ResMut<SimulationState>,
) {
    if controls.paused {
        return;
    }
    let simulation = &mut state.0;
    simulation.tick();
    simulation.advance_spawn_clock(time.delta_secs(), controls.spawn_rate);
}

/// Mirror engine counters into the [`SimulationStats`] resource.
pub fn publish_stats_system(state: Res<SimulationState>, mut stats: ResMut<SimulationStats>) {
    if *stats != *state.0.stats() {
        *stats = state.0.stats().clone();
    }
}
