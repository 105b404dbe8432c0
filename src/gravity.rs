//! Inverse-square attraction toward the black hole, and the proximity-driven
//! erosion it inflicts on asteroids.
//!
//! ## Force law
//!
//! For an entity at distance `d` from the attractor, with
//! `min_gravity_dist < d < gravity_range_radius`:
//!
//! ```text
//! Δv = (Δx / d) · (mass / d²) · damping
//! ```
//!
//! Outside that band the force is zero, which keeps `d → 0` finite and gives
//! the field a hard edge.  The same law is used for asteroids and particles.
//!
//! ## Erosion
//!
//! [`GravityField::erode`] is a separate, asteroid-only call made after
//! [`GravityField::apply`] reports the body is inside the band.  It drains
//! health inside `2 × event_horizon_radius` and stochastically sheds size as
//! dust, more often for bigger and closer bodies.

use crate::asteroid::Asteroid;
use crate::attractor::Attractor;
use crate::config::SimConfig;
use bevy::prelude::*;
use rand::Rng;

/// Anything the force law can push: a position and a velocity.
pub trait HasKinematics {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn set_velocity(&mut self, velocity: Vec2);

    /// Explicit Euler step of one tick.
    fn integrate(&mut self) {
        self.set_position(self.position() + self.velocity());
    }
}

/// Tunables for [`GravityField::erode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErosionParams {
    pub distance_factor: f32,
    pub base_chance: f32,
    pub intensive_chance: f32,
    pub health_loss: f32,
    pub particle_scale: f32,
    pub size_per_particle: f32,
    pub size_reference: f32,
    pub min_body_size: f32,
}

/// Result of one erosion pass over a body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Erosion {
    /// Health removed this tick (before the zero floor).
    pub health_lost: f32,
    /// Dust particles to emit at the body's position; zero when the draw failed.
    pub emitted: usize,
}

/// The attractor's force law.  Stateless apart from tunables; the attractor
/// itself is passed in so mass growth takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityField {
    pub damping: f32,
    pub min_dist: f32,
    pub erosion: ErosionParams,
}

impl GravityField {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            damping: config.gravity_damping,
            min_dist: config.min_gravity_dist,
            erosion: ErosionParams {
                distance_factor: config.erosion_distance_factor,
                base_chance: config.erosion_base_chance,
                intensive_chance: config.erosion_intensive_chance,
                health_loss: config.erosion_health_loss,
                particle_scale: config.erosion_particle_scale,
                size_per_particle: config.erosion_size_per_particle,
                size_reference: config.erosion_size_reference,
                min_body_size: config.min_body_size,
            },
        }
    }

    /// Acceleration the attractor exerts at `position`, or `None` outside the
    /// active band.  The second element is the distance to the attractor.
    pub fn acceleration_at(&self, attractor: &Attractor, position: Vec2) -> Option<(Vec2, f32)> {
        let delta = attractor.position - position;
        let distance = delta.length();
        if !(distance > self.min_dist && distance < attractor.gravity_range_radius) {
            return None;
        }
        let force = attractor.mass / (distance * distance);
        Some((delta / distance * force * self.damping, distance))
    }

    /// Add one tick of attraction to `entity`'s velocity.  Returns the
    /// distance when the entity is inside the active band.
    pub fn apply<E: HasKinematics + ?Sized>(&self, attractor: &Attractor, entity: &mut E) -> Option<f32> {
        let (accel, distance) = self.acceleration_at(attractor, entity.position())?;
        entity.set_velocity(entity.velocity() + accel);
        Some(distance)
    }

    /// Proximity erosion for a body `distance` away from the attractor.
    ///
    /// Health loss is deterministic; shedding is one Bernoulli draw whose
    /// probability and particle count both rise with size and proximity.
    /// Size never drops below `min_body_size` here.
    pub fn erode<R: Rng + ?Sized>(
        &self,
        attractor: &Attractor,
        body: &mut Asteroid,
        distance: f32,
        rng: &mut R,
    ) -> Erosion {
        let p = &self.erosion;
        let strength = ((attractor.gravity_range_radius / distance) * p.distance_factor).min(1.0);
        let size_multiplier = (body.size / p.size_reference).max(1.0);
        let base_chance = strength * p.base_chance * size_multiplier;

        let horizon_band = attractor.event_horizon_radius * 2.0;
        let intensive_zone = if distance < horizon_band {
            1.0 - distance / horizon_band
        } else {
            0.0
        };

        let mut erosion = Erosion::default();
        if intensive_zone > 0.0 {
            erosion.health_lost = intensive_zone * p.health_loss * size_multiplier;
            body.health = (body.health - erosion.health_lost).max(0.0);
        }

        let chance = base_chance + intensive_zone * p.intensive_chance * size_multiplier;
        let count = if intensive_zone > 0.0 {
            (intensive_zone * size_multiplier * p.particle_scale).floor() as usize + 1
        } else {
            1
        };

        if rng.gen::<f32>() < chance {
            body.size = (body.size - count as f32 * p.size_per_particle).max(p.min_body_size);
            erosion.emitted = count;
        }
        erosion
    }
}
