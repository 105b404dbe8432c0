//! Viewer systems: gizmo drawing, the stats overlay, and keyboard controls.
//!
//! None of this is needed to run the engine headless; `main.rs` adds these
//! systems next to [`crate::simulation::SimulationPlugin`].
//!
//! ## Layer Model
//!
//! | Layer               | Technology | Notes                                      |
//! |---------------------|------------|--------------------------------------------|
//! | Gravity range ring  | Gizmos     | Faint; outer edge of the force band        |
//! | Event horizon ring  | Gizmos     | Intensive-erosion boundary is twice this   |
//! | Attractor core      | Gizmos     | Radius grows with `ln(mass / base_mass)`   |
//! | Asteroids           | Gizmos     | Palette colour, fades with health          |
//! | Particles           | Gizmos     | Captured particles glow orange             |
//! | Stats overlay       | Bevy UI    | Counts, gravity level, spawn rate, paused  |
//!
//! ## Controls
//!
//! | Key        | Action                         |
//! |------------|--------------------------------|
//! | Space      | Pause / resume                 |
//! | R          | Reset                          |
//! | S          | Spawn one asteroid now         |
//! | Up / Down  | Spawn rate ± `spawn_rate_step` |

use crate::config::SimConfig;
use crate::graphics::canvas_to_world;
use crate::particles::ParticleKind;
use crate::simulation::{SimulationControls, SimulationState, SimulationStats};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

// ── Component markers ─────────────────────────────────────────────────────────

/// Marker for the stats text root node.
#[derive(Component)]
pub struct StatsTextDisplay;

// ── Colour helpers ────────────────────────────────────────────────────────────

fn range_color() -> Color {
    Color::srgba(0.4, 0.3, 0.8, 0.15)
}
fn horizon_color() -> Color {
    Color::srgba(0.6, 0.2, 0.9, 0.5)
}
fn core_color() -> Color {
    Color::srgb(0.85, 0.75, 1.0)
}
fn captured_color() -> Color {
    Color::srgb(1.0, 0.6, 0.2)
}

fn palette(rgb: [f32; 3], alpha: f32) -> Color {
    Color::srgba(rgb[0], rgb[1], rgb[2], alpha)
}

// ── Startup: stats text ──────────────────────────────────────────────────────

/// Spawn the stats overlay in the top-left corner.
pub fn setup_stats_text(mut commands: Commands, config: Res<SimConfig>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            StatsTextDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: config.stats_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 1.0, 1.0)),
            ));
        });
}

// ── Update: stats text ───────────────────────────────────────────────────────

pub fn format_stats(stats: &SimulationStats, controls: &SimulationControls) -> String {
    let mut line = format!(
        "Asteroids: {} | Particles: {} | Captured: {} | Gravity Lv {} | Spawn {:.1}/s",
        stats.live_bodies, stats.live_particles, stats.captured, stats.gravity_level, controls.spawn_rate
    );
    if controls.paused {
        line.push_str(" | PAUSED");
    }
    line
}

pub fn stats_display_system(
    stats: Res<SimulationStats>,
    controls: Res<SimulationControls>,
    parent_query: Query<&Children, With<StatsTextDisplay>>,
    mut text_query: Query<&mut Text>,
) {
    if !stats.is_changed() && !controls.is_changed() {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(format_stats(&stats, &controls));
            }
        }
    }
}

// ── Update: gizmos ───────────────────────────────────────────────────────────

/// Draw the attractor, every asteroid, and every particle.
pub fn gizmo_rendering_system(mut gizmos: Gizmos, state: Res<SimulationState>) {
    let snapshot = state.0.snapshot();
    let bounds = snapshot.bounds;
    let a = snapshot.attractor;
    let centre = canvas_to_world(a.position, bounds);

    gizmos.circle_2d(centre, a.gravity_range_radius, range_color());
    gizmos.circle_2d(centre, a.event_horizon_radius, horizon_color());
    gizmos.circle_2d(centre, a.display_radius, core_color());

    for body in snapshot.bodies {
        let alpha = 0.35 + 0.65 * body.health_ratio();
        gizmos.circle_2d(
            canvas_to_world(body.position, bounds),
            body.size,
            palette(body.color.rgb(), alpha),
        );
    }

    for particle in snapshot.particles {
        let color = if particle.captured {
            captured_color()
        } else {
            match particle.kind {
                ParticleKind::Fragment => palette(particle.color.rgb(), 1.0),
                ParticleKind::Dust => palette(particle.color.rgb(), 0.6),
            }
        };
        gizmos.circle_2d(
            canvas_to_world(particle.position, bounds),
            particle.size.max(0.5),
            color,
        );
    }
}

// ── Update: input ────────────────────────────────────────────────────────────

/// Keyboard shortcuts; see the module table.
pub fn keyboard_controls_system(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<SimConfig>,
    mut controls: ResMut<SimulationControls>,
) {
    if keys.just_pressed(KeyCode::Space) {
        controls.paused = !controls.paused;
        info!("Simulation {}", if controls.paused { "paused" } else { "resumed" });
    }
    if keys.just_pressed(KeyCode::KeyR) {
        controls.reset = true;
    }
    if keys.just_pressed(KeyCode::KeyS) {
        controls.spawn_now = true;
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        controls.spawn_rate += config.spawn_rate_step;
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        controls.spawn_rate = (controls.spawn_rate - config.spawn_rate_step).max(0.0);
    }
}

/// Follow the primary window size so the attractor stays centred.
pub fn window_bounds_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut controls: ResMut<SimulationControls>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let bounds = Vec2::new(window.width(), window.height());
    if bounds.x > 0.0 && bounds.y > 0.0 && controls.bounds != bounds {
        debug!("Viewport resized to {}x{}", bounds.x, bounds.y);
        controls.bounds = bounds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_line_marks_pause() {
        let stats = SimulationStats {
            live_bodies: 3,
            live_particles: 40,
            captured: 12,
            gravity_level: 13,
            ..Default::default()
        };
        let mut controls = SimulationControls::default();
        let running = format_stats(&stats, &controls);
        assert_eq!(
            running,
            "Asteroids: 3 | Particles: 40 | Captured: 12 | Gravity Lv 13 | Spawn 0.2/s"
        );
        controls.paused = true;
        assert!(format_stats(&stats, &controls).ends_with("| PAUSED"));
    }
}
