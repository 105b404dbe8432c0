//! Asteroid–asteroid collisions.
//!
//! Two bodies collide when their centres are closer than the sum of their
//! sizes.  Each body in a colliding pair either splits into two smaller
//! children (size above `split_size_threshold`) or shatters into
//! `shatter_particle_count` fragments.  Both originals are removed.
//!
//! The scan is O(n²) over index-ascending `(i, j)` pairs and never mutates the
//! store while scanning: pairs are collected first, outcomes are committed
//! afterwards, and removed slots are compacted at the very end.
//!
//! In [`CollisionMode::FirstPair`] only the first overlapping pair is
//! resolved per call; any other overlaps are left for later ticks.  In
//! [`CollisionMode::AllPairs`] every disjoint pair is resolved, with each body
//! taking part in at most one collision per call.

use crate::asteroid::Asteroid;
use crate::config::{CollisionMode, SimConfig};
use crate::particles::{emit_into, FreeParticle, ParticleKind};
use crate::store::EntityStore;
use rand::Rng;

/// Tally of one [`CollisionResolver::resolve`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub pairs: usize,
    /// Bodies that split in two.
    pub split: usize,
    /// Bodies that shattered into particles.
    pub shattered: usize,
    pub bodies_created: usize,
    pub particles_created: usize,
    /// Children or fragments dropped at a store's capacity.
    pub dropped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResolver {
    pub mode: CollisionMode,
}

impl CollisionResolver {
    pub fn new(mode: CollisionMode) -> Self {
        Self { mode }
    }

    /// Index pairs that would be resolved by [`resolve`](Self::resolve), in
    /// resolution order.  Slots already marked for removal are ignored.
    pub fn find_pairs(&self, bodies: &EntityStore<Asteroid>) -> Vec<(usize, usize)> {
        let n = bodies.len();
        let mut taken = vec![false; n];
        let mut pairs = Vec::new();

        'outer: for i in 0..n {
            if taken[i] || bodies.is_marked(i) {
                continue;
            }
            let Some(a) = bodies.get(i) else { continue };
            for j in (i + 1)..n {
                if taken[j] || bodies.is_marked(j) {
                    continue;
                }
                let Some(b) = bodies.get(j) else { continue };
                if a.overlaps(b) {
                    pairs.push((i, j));
                    taken[i] = true;
                    taken[j] = true;
                    match self.mode {
                        CollisionMode::FirstPair => break 'outer,
                        CollisionMode::AllPairs => continue 'outer,
                    }
                }
            }
        }
        pairs
    }

    /// Resolve collisions and commit them to both stores.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        bodies: &mut EntityStore<Asteroid>,
        particles: &mut EntityStore<FreeParticle>,
        config: &SimConfig,
        rng: &mut R,
    ) -> CollisionReport {
        let pairs = self.find_pairs(bodies);
        let mut report = CollisionReport {
            pairs: pairs.len(),
            ..Default::default()
        };
        if pairs.is_empty() {
            return report;
        }

        let mut children = Vec::new();
        for &(i, j) in &pairs {
            for index in [i, j] {
                let Some(body) = bodies.get(index).cloned() else {
                    continue;
                };
                if body.splits_on_impact(config) {
                    children.extend(body.split(config, rng));
                    report.split += 1;
                } else {
                    let emission = emit_into(
                        particles,
                        config.shatter_particle_count,
                        body.position,
                        body.size,
                        body.color,
                        ParticleKind::Fragment,
                        config,
                        rng,
                    );
                    report.particles_created += emission.created;
                    report.dropped += emission.dropped;
                    report.shattered += 1;
                }
                bodies.mark_removed(index);
            }
        }

        for child in children {
            match bodies.insert(child) {
                Some(_) => report.bodies_created += 1,
                None => report.dropped += 1,
            }
        }
        bodies.compact();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asteroid::AsteroidColor;
    use bevy::prelude::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn body(x: f32, y: f32, size: f32) -> Asteroid {
        Asteroid::new(Vec2::new(x, y), Vec2::ZERO, size, 100.0, AsteroidColor::Rust)
    }

    fn stores(bodies: Vec<Asteroid>) -> (EntityStore<Asteroid>, EntityStore<FreeParticle>) {
        let mut store = EntityStore::new(64);
        for b in bodies {
            store.insert(b);
        }
        (store, EntityStore::new(1024))
    }

    #[test]
    fn no_overlap_is_a_no_op() {
        let config = SimConfig::default();
        let (mut bodies, mut particles) = stores(vec![body(0.0, 0.0, 10.0), body(100.0, 0.0, 10.0)]);
        let report = CollisionResolver::default().resolve(&mut bodies, &mut particles, &config, &mut StdRng::seed_from_u64(1));
        assert_eq!(report, CollisionReport::default());
        assert_eq!(bodies.len(), 2);
    }

    #[test]
    fn first_pair_is_found_in_index_order() {
        let (bodies, _) = stores(vec![
            body(0.0, 0.0, 10.0),
            body(500.0, 0.0, 10.0),
            body(505.0, 0.0, 10.0),
            body(5.0, 0.0, 10.0),
        ]);
        let pairs = CollisionResolver::new(CollisionMode::FirstPair).find_pairs(&bodies);
        assert_eq!(pairs, vec![(0, 3)]);
    }

    #[test]
    fn all_pairs_uses_each_body_once() {
        let (bodies, _) = stores(vec![
            body(0.0, 0.0, 10.0),
            body(5.0, 0.0, 10.0),
            body(10.0, 0.0, 10.0),
            body(500.0, 0.0, 10.0),
            body(505.0, 0.0, 10.0),
        ]);
        let pairs = CollisionResolver::new(CollisionMode::AllPairs).find_pairs(&bodies);
        assert_eq!(pairs, vec![(0, 1), (3, 4)]);
    }

    #[test]
    fn small_bodies_shatter_into_eight_fragments_each() {
        let config = SimConfig::default();
        let (mut bodies, mut particles) = stores(vec![body(0.0, 0.0, 6.0), body(4.0, 0.0, 7.0)]);
        let report = CollisionResolver::default().resolve(&mut bodies, &mut particles, &config, &mut StdRng::seed_from_u64(2));

        assert_eq!(report.shattered, 2);
        assert_eq!(report.particles_created, 16);
        assert!(bodies.is_empty());
        assert!(particles.iter().all(|p| p.kind == ParticleKind::Fragment));
    }

    #[test]
    fn mixed_pair_splits_one_and_shatters_the_other() {
        let config = SimConfig::default();
        let (mut bodies, mut particles) = stores(vec![body(0.0, 0.0, 20.0), body(10.0, 0.0, 8.0)]);
        let report = CollisionResolver::default().resolve(&mut bodies, &mut particles, &config, &mut StdRng::seed_from_u64(3));

        assert_eq!(report.split, 1);
        assert_eq!(report.shattered, 1);
        assert_eq!(bodies.len(), 2);
        assert!(bodies.iter().all(|b| (b.size - 14.0).abs() < 1e-5));
        assert_eq!(particles.len(), 8);
    }

    #[test]
    fn children_dropped_at_body_capacity_are_reported() {
        let config = SimConfig::default();
        let mut bodies = EntityStore::new(3);
        bodies.insert(body(0.0, 0.0, 20.0));
        bodies.insert(body(10.0, 0.0, 20.0));
        let mut particles = EntityStore::new(16);

        let report = CollisionResolver::default().resolve(&mut bodies, &mut particles, &config, &mut StdRng::seed_from_u64(4));

        assert_eq!(report.bodies_created, 3);
        assert_eq!(report.dropped, 1);
        assert_eq!(bodies.len(), 3);
    }
}
