//! Asteroids: the rigid bodies that fall into the black hole.
//!
//! Lifecycle: *spawned* at a viewport edge → *active* (gravity + erosion
//! every tick) → *destroyed* by depletion, by leaving the playfield, or by a
//! collision.  Depletion and collisions turn the body's mass into particles;
//! leaving the playfield does not.

use crate::config::SimConfig;
use crate::gravity::HasKinematics;
use bevy::prelude::*;
use rand::Rng;

/// Two rock palettes.  Opaque to the engine; carried through to debris so the
/// renderer can tint particles after their source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsteroidColor {
    /// Saddle brown.
    Rust,
    /// Dim grey.
    Slate,
}

impl AsteroidColor {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Rust
        } else {
            Self::Slate
        }
    }

    /// sRGB components in 0–1.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            Self::Rust => [139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0],
            Self::Slate => [105.0 / 255.0, 105.0 / 255.0, 105.0 / 255.0],
        }
    }
}

/// A rigid body.  `size` is its collision radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub color: AsteroidColor,
}

/// Where the edge spawner placed a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// What the end-of-tick check decided for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    /// Out of health or eroded to the size floor; becomes debris.
    Depleted,
    /// Drifted past the cull margin; removed silently.
    Exited,
}

impl Asteroid {
    pub fn new(position: Vec2, velocity: Vec2, size: f32, max_health: f32, color: AsteroidColor) -> Self {
        Self {
            position,
            velocity,
            size,
            health: max_health,
            max_health,
            color,
        }
    }

    /// A fresh body just outside a random viewport edge, heading inward.
    pub fn spawn_at_boundary<R: Rng + ?Sized>(bounds: Vec2, config: &SimConfig, rng: &mut R) -> Self {
        let edge = match rng.gen_range(0..4) {
            0 => Edge::Left,
            1 => Edge::Right,
            2 => Edge::Top,
            _ => Edge::Bottom,
        };
        Self::spawn_on_edge(edge, bounds, config, rng)
    }

    /// A fresh body just outside `edge`.  Inward speed is drawn from
    /// `[spawn_speed_min, spawn_speed_max)`, lateral drift from
    /// `±spawn_lateral_speed`.
    pub fn spawn_on_edge<R: Rng + ?Sized>(edge: Edge, bounds: Vec2, config: &SimConfig, rng: &mut R) -> Self {
        let inset = config.spawn_inset;
        let inward = rng.gen_range(config.spawn_speed_min..config.spawn_speed_max);
        let lateral = rng.gen_range(-config.spawn_lateral_speed..=config.spawn_lateral_speed);

        let (position, velocity) = match edge {
            Edge::Left => (
                Vec2::new(-inset, rng.gen_range(0.0..=bounds.y)),
                Vec2::new(inward, lateral),
            ),
            Edge::Right => (
                Vec2::new(bounds.x + inset, rng.gen_range(0.0..=bounds.y)),
                Vec2::new(-inward, lateral),
            ),
            Edge::Top => (
                Vec2::new(rng.gen_range(0.0..=bounds.x), -inset),
                Vec2::new(lateral, inward),
            ),
            Edge::Bottom => (
                Vec2::new(rng.gen_range(0.0..=bounds.x), bounds.y + inset),
                Vec2::new(lateral, -inward),
            ),
        };

        let size = rng.gen_range(config.body_size_min..config.body_size_max);
        Self::new(position, velocity, size, config.body_max_health, AsteroidColor::random(rng))
    }

    /// Two children at `split_size_ratio` of this body's size, jittered in
    /// position and velocity, with full health.  Their combined size exceeds
    /// the parent's: splitting does not conserve mass.
    pub fn split<R: Rng + ?Sized>(&self, config: &SimConfig, rng: &mut R) -> [Asteroid; 2] {
        let child_size = self.size * config.split_size_ratio;
        let mut child = || {
            let offset = Vec2::new(
                rng.gen_range(-config.split_position_jitter..=config.split_position_jitter),
                rng.gen_range(-config.split_position_jitter..=config.split_position_jitter),
            );
            let kick = Vec2::new(
                rng.gen_range(-config.split_velocity_jitter..=config.split_velocity_jitter),
                rng.gen_range(-config.split_velocity_jitter..=config.split_velocity_jitter),
            );
            Asteroid::new(
                self.position + offset,
                self.velocity + kick,
                child_size,
                self.max_health,
                self.color,
            )
        };
        [child(), child()]
    }

    /// True when a collision should split rather than shatter this body.
    pub fn splits_on_impact(&self, config: &SimConfig) -> bool {
        self.size > config.split_size_threshold
    }

    /// Circles overlap when centres are closer than the sum of sizes.
    pub fn overlaps(&self, other: &Asteroid) -> bool {
        self.position.distance(other.position) < self.size + other.size
    }

    /// End-of-tick termination check against a `bounds`-sized viewport.
    pub fn fate(&self, bounds: Vec2, config: &SimConfig) -> Fate {
        if self.health <= 0.0 || self.size <= config.min_body_size {
            return Fate::Depleted;
        }
        let margin = config.body_cull_margin;
        let p = self.position;
        if p.x < -margin || p.x > bounds.x + margin || p.y < -margin || p.y > bounds.y + margin {
            return Fate::Exited;
        }
        Fate::Alive
    }

    /// Debris count when this body is depleted: `floor(size / 2) + base`.
    pub fn debris_count(&self, base: usize) -> usize {
        (self.size / 2.0).floor() as usize + base
    }

    /// Health as a fraction of the maximum, for damage tinting.
    pub fn health_ratio(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

impl HasKinematics for Asteroid {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn velocity(&self) -> Vec2 {
        self.velocity
    }
    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bounds() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn edge_spawns_start_outside_and_head_inward() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
            let body = Asteroid::spawn_on_edge(edge, bounds(), &config, &mut rng);
            let towards_centre = (bounds() / 2.0 - body.position).normalize();
            let inward_component = match edge {
                Edge::Left | Edge::Right => body.velocity.x * towards_centre.x.signum(),
                Edge::Top | Edge::Bottom => body.velocity.y * towards_centre.y.signum(),
            };
            assert!(inward_component >= 1.0, "{edge:?} spawn not heading inward");
            assert!(body.size >= 10.0 && body.size < 25.0);
            assert_eq!(body.health, body.max_health);
            assert_eq!(body.fate(bounds(), &config), Fate::Alive);
        }
    }

    #[test]
    fn split_children_are_seventy_percent_with_full_health() {
        let config = SimConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut parent = Asteroid::new(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0, 100.0, AsteroidColor::Rust);
        parent.health = 12.0;

        let children = parent.split(&config, &mut rng);

        for child in &children {
            assert!((child.size - 14.0).abs() < 1e-5);
            assert_eq!(child.health, child.max_health);
            assert_eq!(child.color, AsteroidColor::Rust);
            assert!(child.position.distance(parent.position) <= 5.0 * 2f32.sqrt() + 1e-4);
        }
        // Mass is deliberately not conserved.
        assert!(children[0].size + children[1].size > parent.size);
    }

    #[test]
    fn depleted_by_health_or_size() {
        let config = SimConfig::default();
        let mut body = Asteroid::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 12.0, 100.0, AsteroidColor::Slate);
        assert_eq!(body.fate(bounds(), &config), Fate::Alive);
        body.health = 0.0;
        assert_eq!(body.fate(bounds(), &config), Fate::Depleted);
        body.health = 50.0;
        body.size = 5.0;
        assert_eq!(body.fate(bounds(), &config), Fate::Depleted);
    }

    #[test]
    fn exits_only_past_the_margin() {
        let config = SimConfig::default();
        let mut body = Asteroid::new(Vec2::new(-199.0, 300.0), Vec2::ZERO, 12.0, 100.0, AsteroidColor::Rust);
        assert_eq!(body.fate(bounds(), &config), Fate::Alive);
        body.position.x = -201.0;
        assert_eq!(body.fate(bounds(), &config), Fate::Exited);
        body.position = Vec2::new(400.0, 801.0);
        assert_eq!(body.fate(bounds(), &config), Fate::Exited);
    }

    #[test]
    fn debris_count_follows_size() {
        let body = Asteroid::new(Vec2::ZERO, Vec2::ZERO, 13.7, 100.0, AsteroidColor::Rust);
        assert_eq!(body.debris_count(5), 11);
    }

    #[test]
    fn overlap_uses_sum_of_sizes() {
        let a = Asteroid::new(Vec2::ZERO, Vec2::ZERO, 20.0, 100.0, AsteroidColor::Rust);
        let b = Asteroid::new(Vec2::new(15.0, 0.0), Vec2::ZERO, 20.0, 100.0, AsteroidColor::Rust);
        let c = Asteroid::new(Vec2::new(41.0, 0.0), Vec2::ZERO, 20.0, 100.0, AsteroidColor::Rust);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
