//! The single gravity source at the centre of the playfield.

use crate::config::SimConfig;
use bevy::prelude::*;

/// Black hole state.  Owned exclusively by [`crate::simulation::Simulation`].
///
/// `mass == base_mass + captured_count × mass_per_capture` holds after every
/// call to [`Attractor::record_capture`] and [`Attractor::reset`]; mass never
/// decreases except through a full reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Attractor {
    /// Fixed at the viewport centre.
    pub position: Vec2,
    pub draw_radius: f32,
    pub core_radius: f32,
    pub event_horizon_radius: f32,
    pub gravity_range_radius: f32,
    pub mass: f32,
    pub base_mass: f32,
    pub mass_per_capture: f32,
    /// Particles that have entered the capture radius, counted once each.
    pub captured_count: u64,
}

impl Attractor {
    /// Build an attractor sized for the configured viewport.
    pub fn from_config(config: &SimConfig) -> Self {
        let mut attractor = Self {
            position: Vec2::ZERO,
            draw_radius: config.attractor_draw_radius,
            core_radius: config.core_radius,
            event_horizon_radius: config.event_horizon_radius,
            gravity_range_radius: config.gravity_range_radius,
            mass: config.base_mass,
            base_mass: config.base_mass,
            mass_per_capture: config.mass_per_capture,
            captured_count: 0,
        };
        attractor.rescale(config, Vec2::new(config.width, config.height));
        attractor
    }

    /// Recentre on a viewport of size `bounds` and scale every radius by
    /// `min(width / reference_width, height / reference_height)`.
    /// Mass and capture count are untouched.
    pub fn rescale(&mut self, config: &SimConfig, bounds: Vec2) {
        let scale = (bounds.x / config.reference_width).min(bounds.y / config.reference_height);
        self.position = bounds / 2.0;
        self.draw_radius = config.attractor_draw_radius * scale;
        self.core_radius = config.core_radius * scale;
        self.event_horizon_radius = config.event_horizon_radius * scale;
        self.gravity_range_radius = config.gravity_range_radius * scale;
    }

    /// Count one first-time capture and grow the mass accordingly.
    pub fn record_capture(&mut self) {
        self.captured_count += 1;
        self.recompute_mass();
    }

    /// Re-derive mass from the capture counter.
    pub fn recompute_mass(&mut self) {
        self.mass = self.base_mass + self.captured_count as f32 * self.mass_per_capture;
    }

    /// Back to base mass with nothing captured.
    pub fn reset(&mut self) {
        self.captured_count = 0;
        self.recompute_mass();
    }

    /// Radius the renderer should draw the core at: grows with `ln(mass / base_mass)`.
    pub fn display_radius(&self, growth: f32) -> f32 {
        self.draw_radius * (1.0 + (self.mass / self.base_mass).ln() * growth)
    }

    /// Stats-panel level, starting at 1 with nothing captured.
    pub fn gravity_level(&self) -> u64 {
        ((self.mass - self.base_mass) / self.mass_per_capture.max(f32::EPSILON)).floor() as u64 + 1
    }
}
