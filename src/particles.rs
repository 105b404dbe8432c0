//! Free particles: debris shed by asteroids, and the accretion ring they form.
//!
//! ## Design
//!
//! Particles are plain values in an [`EntityStore`].  Each tick runs them
//! through three stages, in this order, from [`crate::simulation::Simulation`]:
//!
//! | Stage                         | Purpose                                            |
//! |-------------------------------|----------------------------------------------------|
//! | [`FreeParticle::advance`]     | Gravity, Euler step, friction, per-axis speed clamp |
//! | [`sanitize`]                  | Repair non-finite state; recentre strays           |
//! | [`FreeParticle::try_capture`] | Count first entry into the capture radius; re-seed onto the orbit shell |
//!
//! Captured particles are never removed.  Every entry into the capture radius
//! re-seeds the particle onto a shell `[capture_radius, capture_radius +
//! orbit_band_width)` from the attractor with a mostly tangential velocity,
//! which keeps a visible ring alive instead of letting captured mass vanish.
//! Only the first entry counts toward the attractor's mass.

use crate::asteroid::AsteroidColor;
use crate::attractor::Attractor;
use crate::config::SimConfig;
use crate::gravity::{GravityField, HasKinematics};
use crate::store::EntityStore;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

/// Origin of a particle; selects its friction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Collision and destruction debris.
    Fragment,
    /// Shed continuously by erosion.
    Dust,
}

/// A single debris particle.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: AsteroidColor,
    pub kind: ParticleKind,
    /// Set once, on first entry into the capture radius.
    pub captured: bool,
}

/// How a burst of emissions went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emission {
    pub created: usize,
    /// Requests dropped because the store was at capacity.
    pub dropped: usize,
}

/// Outcome of [`FreeParticle::try_capture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Outside the capture radius; untouched.
    Outside,
    /// First entry: flag set, re-seeded.  The caller must count it.
    First,
    /// Already captured earlier; re-seeded only.
    Reseeded,
}

/// Which repair [`sanitize`] performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    None,
    /// Position or velocity was NaN/∞; reset near the attractor.
    NonFinite,
    /// Too far outside the viewport; moved back near the attractor.
    Recentered,
}

/// Corrected kinematic state returned by [`sanitize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sanitized {
    pub position: Vec2,
    pub velocity: Vec2,
    pub recovery: Recovery,
}

impl FreeParticle {
    /// One particle near `origin`.  Size is `min(source_size × ratio, U[min, max))`.
    pub fn emit<R: Rng + ?Sized>(
        origin: Vec2,
        source_size: f32,
        color: AsteroidColor,
        kind: ParticleKind,
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        let pos_jitter = config.particle_position_jitter;
        let vel_jitter = config.particle_velocity_jitter;
        let size = rng
            .gen_range(config.particle_size_min..config.particle_size_max)
            .min(source_size * config.particle_source_size_ratio);
        Self {
            position: origin
                + Vec2::new(
                    rng.gen_range(-pos_jitter..=pos_jitter),
                    rng.gen_range(-pos_jitter..=pos_jitter),
                ),
            velocity: Vec2::new(
                rng.gen_range(-vel_jitter..=vel_jitter),
                rng.gen_range(-vel_jitter..=vel_jitter),
            ),
            size,
            color,
            kind,
            captured: false,
        }
    }

    pub fn friction(&self, config: &SimConfig) -> f32 {
        match self.kind {
            ParticleKind::Fragment => config.fragment_friction,
            ParticleKind::Dust => config.dust_friction,
        }
    }

    /// Gravity, Euler step, friction, then clamp each velocity axis to
    /// `±max_particle_speed`.
    pub fn advance(&mut self, field: &GravityField, attractor: &Attractor, config: &SimConfig) {
        field.apply(attractor, self);
        self.integrate();
        self.velocity *= self.friction(config);
        let max = config.max_particle_speed;
        self.velocity = self.velocity.clamp(Vec2::splat(-max), Vec2::splat(max));
    }

    /// Re-seed onto the orbit shell when inside the capture radius.
    pub fn try_capture<R: Rng + ?Sized>(
        &mut self,
        attractor: &Attractor,
        config: &SimConfig,
        rng: &mut R,
    ) -> Capture {
        let offset = self.position - attractor.position;
        if offset.length() >= config.capture_radius {
            return Capture::Outside;
        }

        let first = !self.captured;
        self.captured = true;

        let angle = offset.y.atan2(offset.x);
        let radius = config.capture_radius + rng.gen_range(0.0..config.orbit_band_width.max(f32::EPSILON));
        self.position = attractor.position + Vec2::from_angle(angle) * radius;

        let speed = rng.gen_range(config.orbit_speed_min..config.orbit_speed_max);
        let half_jitter = config.orbit_angle_jitter / 2.0;
        let jitter = rng.gen_range(-half_jitter..=half_jitter);
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.velocity = Vec2::from_angle(angle + FRAC_PI_2 * direction + jitter) * speed;

        if first {
            Capture::First
        } else {
            Capture::Reseeded
        }
    }
}

impl HasKinematics for FreeParticle {
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

/// Push `count` particles into `store`, dropping any that exceed its capacity.
#[allow(clippy::too_many_arguments)]
pub fn emit_into<R: Rng + ?Sized>(
    store: &mut EntityStore<FreeParticle>,
    count: usize,
    origin: Vec2,
    source_size: f32,
    color: AsteroidColor,
    kind: ParticleKind,
    config: &SimConfig,
    rng: &mut R,
) -> Emission {
    let mut emission = Emission::default();
    for _ in 0..count {
        let particle = FreeParticle::emit(origin, source_size, color, kind, config, rng);
        match store.insert(particle) {
            Some(_) => emission.created += 1,
            None => emission.dropped += 1,
        }
    }
    emission
}

/// Post-integration repair shared by every entity kind.
///
/// Non-finite state is replaced by a small random offset from the attractor.
/// When `recenter_margin` is given, positions that far outside the
/// `bounds`-sized viewport are moved back within `recenter_spread / 2` of the
/// attractor, keeping their velocity.
pub fn sanitize<R: Rng + ?Sized>(
    position: Vec2,
    velocity: Vec2,
    attractor: Vec2,
    bounds: Vec2,
    recenter_margin: Option<f32>,
    config: &SimConfig,
    rng: &mut R,
) -> Sanitized {
    if !position.is_finite() || !velocity.is_finite() {
        let spread = config.nan_reset_spread / 2.0;
        let kick = config.nan_reset_velocity / 2.0;
        return Sanitized {
            position: attractor
                + Vec2::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread)),
            velocity: Vec2::new(rng.gen_range(-kick..=kick), rng.gen_range(-kick..=kick)),
            recovery: Recovery::NonFinite,
        };
    }

    if let Some(margin) = recenter_margin {
        let outside = position.x < -margin
            || position.x > bounds.x + margin
            || position.y < -margin
            || position.y > bounds.y + margin;
        if outside {
            let spread = config.particle_recenter_spread / 2.0;
            return Sanitized {
                position: attractor
                    + Vec2::new(rng.gen_range(-spread..=spread), rng.gen_range(-spread..=spread)),
                velocity,
                recovery: Recovery::Recentered,
            };
        }
    }

    Sanitized {
        position,
        velocity,
        recovery: Recovery::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (SimConfig, Attractor, StdRng) {
        let config = SimConfig::default();
        let attractor = Attractor::from_config(&config);
        (config, attractor, StdRng::seed_from_u64(42))
    }

    fn particle_at(position: Vec2, kind: ParticleKind) -> FreeParticle {
        FreeParticle {
            position,
            velocity: Vec2::ZERO,
            size: 2.0,
            color: AsteroidColor::Slate,
            kind,
            captured: false,
        }
    }

    #[test]
    fn emitted_size_is_capped_by_source() {
        let (config, _, mut rng) = setup();
        for _ in 0..50 {
            let p = FreeParticle::emit(Vec2::ZERO, 6.0, AsteroidColor::Rust, ParticleKind::Dust, &config, &mut rng);
            assert!(p.size <= 0.6 + 1e-6);
            assert!(p.position.x.abs() <= 10.0 && p.position.y.abs() <= 10.0);
            assert!(!p.captured);
        }
    }

    #[test]
    fn emit_into_reports_dropped_overflow() {
        let (config, _, mut rng) = setup();
        let mut store = EntityStore::new(5);
        let emission = emit_into(&mut store, 8, Vec2::ZERO, 20.0, AsteroidColor::Rust, ParticleKind::Fragment, &config, &mut rng);
        assert_eq!(emission, Emission { created: 5, dropped: 3 });
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn fragments_keep_more_speed_than_dust() {
        let (config, attractor, _) = setup();
        let field = GravityField::from_config(&config);
        // Far outside gravity range so only friction acts.
        let mut fragment = particle_at(Vec2::new(-300.0, -300.0), ParticleKind::Fragment);
        let mut dust = particle_at(Vec2::new(-300.0, -300.0), ParticleKind::Dust);
        fragment.velocity = Vec2::new(10.0, 0.0);
        dust.velocity = Vec2::new(10.0, 0.0);

        fragment.advance(&field, &attractor, &config);
        dust.advance(&field, &attractor, &config);

        assert!((fragment.velocity.x - 9.99).abs() < 1e-4);
        assert!((dust.velocity.x - 9.98).abs() < 1e-4);
        assert_eq!(fragment.position, Vec2::new(-290.0, -300.0));
    }

    #[test]
    fn speed_is_clamped_per_axis() {
        let (config, attractor, _) = setup();
        let field = GravityField::from_config(&config);
        let mut p = particle_at(Vec2::new(-300.0, -300.0), ParticleKind::Fragment);
        p.velocity = Vec2::new(50.0, -80.0);
        p.advance(&field, &attractor, &config);
        assert_eq!(p.velocity, Vec2::new(20.0, -20.0));
    }

    #[test]
    fn first_capture_sets_flag_and_lands_on_shell() {
        let (config, attractor, mut rng) = setup();
        let mut p = particle_at(attractor.position + Vec2::new(0.0, 39.0), ParticleKind::Dust);

        assert_eq!(p.try_capture(&attractor, &config, &mut rng), Capture::First);
        assert!(p.captured);
        let r = p.position.distance(attractor.position);
        assert!((40.0..=120.0).contains(&r), "shell radius {r}");
        let speed = p.velocity.length();
        assert!((2.0..=6.0).contains(&speed), "orbit speed {speed}");

        // Mostly tangential: within ±30° of perpendicular to the radius.
        let radial = (p.position - attractor.position).normalize();
        let cos = radial.dot(p.velocity.normalize()).abs();
        assert!(cos <= (std::f32::consts::FRAC_PI_6).sin() + 1e-4);
    }

    #[test]
    fn recapture_does_not_count_again() {
        let (config, attractor, mut rng) = setup();
        let mut p = particle_at(attractor.position + Vec2::new(5.0, 5.0), ParticleKind::Dust);
        assert_eq!(p.try_capture(&attractor, &config, &mut rng), Capture::First);
        p.position = attractor.position + Vec2::new(-3.0, 1.0);
        assert_eq!(p.try_capture(&attractor, &config, &mut rng), Capture::Reseeded);
        assert!(p.captured);
    }

    #[test]
    fn outside_capture_radius_is_untouched() {
        let (config, attractor, mut rng) = setup();
        let mut p = particle_at(attractor.position + Vec2::new(40.0, 0.0), ParticleKind::Dust);
        let before = p.clone();
        assert_eq!(p.try_capture(&attractor, &config, &mut rng), Capture::Outside);
        assert_eq!(p, before);
    }

    #[test]
    fn sanitize_repairs_nan_near_attractor() {
        let (config, attractor, mut rng) = setup();
        let fixed = sanitize(
            Vec2::new(f32::NAN, 10.0),
            Vec2::new(1.0, f32::INFINITY),
            attractor.position,
            Vec2::new(800.0, 600.0),
            Some(config.particle_recenter_margin),
            &config,
            &mut rng,
        );
        assert_eq!(fixed.recovery, Recovery::NonFinite);
        assert!(fixed.position.is_finite() && fixed.velocity.is_finite());
        assert!((fixed.position - attractor.position).abs().max_element() <= 50.0);
        assert!(fixed.velocity.abs().max_element() <= 2.0);
    }

    #[test]
    fn sanitize_recentres_strays_only_when_asked() {
        let (config, attractor, mut rng) = setup();
        let far = Vec2::new(-600.0, 300.0);
        let v = Vec2::new(1.0, 2.0);
        let bounds = Vec2::new(800.0, 600.0);

        let kept = sanitize(far, v, attractor.position, bounds, None, &config, &mut rng);
        assert_eq!(kept.recovery, Recovery::None);
        assert_eq!(kept.position, far);

        let moved = sanitize(far, v, attractor.position, bounds, Some(500.0), &config, &mut rng);
        assert_eq!(moved.recovery, Recovery::Recentered);
        assert_eq!(moved.velocity, v);
        assert!((moved.position - attractor.position).abs().max_element() <= 100.0);
    }
}
