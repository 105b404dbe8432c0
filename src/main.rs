use bevy::prelude::*;
use bevy::window::WindowResolution;

use blackhole::config::{self, SimConfig};
use blackhole::constants::{REFERENCE_HEIGHT, REFERENCE_WIDTH};
use blackhole::{graphics, rendering, simulation};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Black Hole".into(),
            resolution: WindowResolution::new(REFERENCE_WIDTH as u32, REFERENCE_HEIGHT as u32),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Insert SimConfig with compiled defaults; load_sim_config will overwrite
    // it from assets/simulation.toml (if present) in the Startup schedule.
    .insert_resource(SimConfig::default())
    .add_plugins(simulation::SimulationPlugin)
    .add_systems(
        Startup,
        (
            // Load config first so the engine and the overlay see the final values.
            config::load_sim_config.before(simulation::init_simulation_system),
            graphics::setup_camera,
            rendering::setup_stats_text
                .after(graphics::setup_camera)
                .after(config::load_sim_config),
        ),
    )
    .add_systems(
        Update,
        (
            (
                rendering::keyboard_controls_system,
                rendering::window_bounds_system,
            )
                .before(simulation::apply_controls_system),
            (
                rendering::gizmo_rendering_system,
                rendering::stats_display_system,
            )
                .after(simulation::publish_stats_system),
        ),
    );

    app.run();
}
