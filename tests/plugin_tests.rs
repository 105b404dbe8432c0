//! Headless tests for [`SimulationPlugin`].
//!
//! These tests use [`MinimalPlugins`] (no window, no rendering) so they run
//! fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Startup builds the engine and control resources from `SimConfig`.
//! 2. A paused frame leaves engine state untouched.
//! 3. `spawn_now` spawns exactly one body, even while paused.
//! 4. `reset` clears both stores and restores base mass.
//! 5. Stats are published into the `SimulationStats` resource every frame.
//! 6. An invalid config falls back to compiled defaults.
//! 7. A bounds change recentres the attractor; degenerate bounds are refused.

use bevy::prelude::*;
use blackhole::asteroid::{Asteroid, AsteroidColor};
use blackhole::config::SimConfig;
use blackhole::simulation::{
    SimulationControls, SimulationPlugin, SimulationState, SimulationStats,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a headless app with a seeded config and automatic spawning disabled,
/// and run the first frame so Startup has inserted every resource.
fn headless_app() -> App {
    let config = SimConfig {
        seed: Some(1234),
        spawn_rate: 0.0,
        ..Default::default()
    };
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);
    app.update();
    app
}

fn controls(app: &mut App) -> Mut<'_, SimulationControls> {
    app.world_mut().resource_mut::<SimulationControls>()
}

fn state(app: &App) -> &SimulationState {
    app.world().resource::<SimulationState>()
}

fn drifting_body() -> Asteroid {
    let mut body = Asteroid::new(
        Vec2::new(150.0, 150.0),
        Vec2::ZERO,
        15.0,
        100.0,
        AsteroidColor::Slate,
    );
    body.velocity = Vec2::new(1.0, 0.5);
    body
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn startup_inserts_engine_and_controls() {
    let app = headless_app();
    let controls = app.world().resource::<SimulationControls>();
    assert_eq!(controls.bounds, Vec2::new(800.0, 600.0));
    assert_eq!(controls.spawn_rate, 0.0);
    assert!(!controls.paused);
    assert_eq!(state(&app).0.attractor().position, Vec2::new(400.0, 300.0));
}

#[test]
fn paused_frame_leaves_state_untouched() {
    let mut app = headless_app();
    app.world_mut()
        .resource_mut::<SimulationState>()
        .0
        .insert_body(drifting_body());
    controls(&mut app).paused = true;

    let before_body = state(&app).0.bodies().get(0).cloned();
    let before_ticks = state(&app).0.stats().ticks;
    app.update();
    app.update();

    assert_eq!(state(&app).0.bodies().get(0).cloned(), before_body);
    assert_eq!(state(&app).0.stats().ticks, before_ticks);

    controls(&mut app).paused = false;
    app.update();
    assert_eq!(state(&app).0.stats().ticks, before_ticks + 1);
    assert_ne!(state(&app).0.bodies().get(0).cloned(), before_body);
}

#[test]
fn spawn_now_spawns_one_body_even_while_paused() {
    let mut app = headless_app();
    {
        let mut controls = controls(&mut app);
        controls.paused = true;
        controls.spawn_now = true;
    }
    app.update();

    assert_eq!(state(&app).0.bodies().len(), 1);
    assert!(!app.world().resource::<SimulationControls>().spawn_now);

    app.update();
    assert_eq!(state(&app).0.bodies().len(), 1, "spawn_now is one-shot");
}

#[test]
fn reset_clears_everything() {
    let mut app = headless_app();
    {
        let mut engine = app.world_mut().resource_mut::<SimulationState>();
        for _ in 0..3 {
            engine.0.spawn_body();
        }
    }
    app.update();
    assert!(!state(&app).0.bodies().is_empty());

    controls(&mut app).reset = true;
    app.update();

    let sim = &state(&app).0;
    assert!(sim.bodies().is_empty());
    assert!(sim.particles().is_empty());
    assert_eq!(sim.attractor().mass, sim.attractor().base_mass);
    assert_eq!(sim.attractor().captured_count, 0);
    assert!(!app.world().resource::<SimulationControls>().reset);
}

#[test]
fn stats_resource_follows_engine() {
    let mut app = headless_app();
    controls(&mut app).spawn_now = true;
    app.update();

    let stats = app.world().resource::<SimulationStats>();
    assert_eq!(stats.live_bodies, 1);
    assert_eq!(stats.spawned_total, 1);
    assert_eq!(stats.gravity_level, 1);
    assert_eq!(*stats, *state(&app).0.stats());
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let config = SimConfig {
        event_horizon_radius: 900.0,
        ..Default::default()
    };
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(config)
        .add_plugins(SimulationPlugin);
    app.update();

    let attractor = state(&app).0.attractor();
    assert_eq!(attractor.event_horizon_radius, 60.0);
}

#[test]
fn bounds_change_recentres_attractor() {
    let mut app = headless_app();
    controls(&mut app).bounds = Vec2::new(1600.0, 1200.0);
    app.update();
    let attractor = state(&app).0.attractor();
    assert_eq!(attractor.position, Vec2::new(800.0, 600.0));
    assert_eq!(attractor.gravity_range_radius, 800.0);

    controls(&mut app).bounds = Vec2::new(-5.0, 100.0);
    app.update();
    assert_eq!(state(&app).0.bounds(), Vec2::new(1600.0, 1200.0));
    assert_eq!(
        app.world().resource::<SimulationControls>().bounds,
        Vec2::new(1600.0, 1200.0)
    );
}
