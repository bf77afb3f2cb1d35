//! Falling-rock particle simulation.
//!
//! A bounded set of rocks integrated under gravity with a single
//! terrain-collision response: snap to the surface, damp the vertical
//! component, apply ground friction, and put the rock to rest once it is
//! slow enough. The field owns its particles; nothing outside this module
//! mutates them.

use crate::terrain::HeightField;
use rand::Rng;
use talus_data::{HazardStats, Particle, Vec3};

/// Live-set capacity; spawning beyond it evicts the oldest rocks.
pub const MAX_ROCKS: usize = 150;

/// Longest integration step accepted per call, seconds. Wall-clock gaps
/// (backgrounded tabs, frame hitches) are clamped to this to keep Euler
/// integration stable.
pub const MAX_DT: f64 = 0.05;

const GRAVITY: Vec3 = Vec3 {
    x: 0.0,
    y: -9.81,
    z: 0.0,
};
const RESTITUTION: f64 = -0.25;
const GROUND_FRICTION: f64 = 0.94;
const REST_SPEED: f64 = 0.35;

/// Owns the rock collection and the terrain it collides with.
pub struct ParticleField<T: HeightField> {
    terrain: T,
    rocks: Vec<Particle>,
    next_id: u64,
}

impl<T: HeightField> ParticleField<T> {
    #[must_use]
    pub fn new(terrain: T) -> Self {
        Self {
            terrain,
            rocks: Vec::new(),
            next_id: 1,
        }
    }

    #[must_use]
    pub fn rocks(&self) -> &[Particle] {
        &self.rocks
    }

    #[must_use]
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    /// Appends one active rock with randomized spawn kinematics: x,z within
    /// ±20 m, 8-12 m above the floor, downward-biased velocity, 0.2-1.0 m
    /// radius. Evicts the oldest entries beyond [`MAX_ROCKS`].
    pub fn spawn<R: Rng>(&mut self, rng: &mut R) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let rock = Particle {
            id,
            position: Vec3::new(
                (rng.gen::<f64>() - 0.5) * 40.0,
                8.0 + rng.gen::<f64>() * 4.0,
                (rng.gen::<f64>() - 0.5) * 40.0,
            ),
            velocity: Vec3::new(
                (rng.gen::<f64>() - 0.5) * 2.0,
                -2.0 - rng.gen::<f64>() * 2.0,
                (rng.gen::<f64>() - 0.5) * 2.0,
            ),
            size: 0.2 + rng.gen::<f64>() * 0.8,
            active: true,
        };
        self.rocks.push(rock);
        if self.rocks.len() > MAX_ROCKS {
            let excess = self.rocks.len() - MAX_ROCKS;
            self.rocks.drain(..excess);
        }
        id
    }

    /// Places a specific rock; used by tests and scripted scenarios.
    pub fn insert(&mut self, position: Vec3, velocity: Vec3, size: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.rocks.push(Particle {
            id,
            position,
            velocity,
            size,
            active: true,
        });
        if self.rocks.len() > MAX_ROCKS {
            let excess = self.rocks.len() - MAX_ROCKS;
            self.rocks.drain(..excess);
        }
        id
    }

    /// Advances every active rock by `dt` seconds (clamped to [`MAX_DT`]).
    ///
    /// Rocks never end a step below the terrain surface: penetration is
    /// resolved by snapping to `height + size` before the rest test runs.
    /// The active -> inactive transition happens at most once per rock.
    pub fn step(&mut self, dt: f64) {
        let dt = dt.clamp(0.0, MAX_DT);
        if dt == 0.0 {
            return;
        }
        for rock in &mut self.rocks {
            if !rock.active {
                continue;
            }
            let mut v = rock.velocity.added(GRAVITY.scaled(dt));
            let mut p = rock.position.added(v.scaled(dt));
            let ground = self.terrain.height(p.x, p.z);
            if p.y - rock.size <= ground {
                p.y = ground + rock.size;
                v.y *= RESTITUTION;
                v.x *= GROUND_FRICTION;
                v.z *= GROUND_FRICTION;
                if v.length() < REST_SPEED {
                    rock.position = p;
                    rock.velocity = Vec3::ZERO;
                    rock.active = false;
                    continue;
                }
            }
            rock.position = p;
            rock.velocity = v;
        }
    }

    /// Derives the simulation-source hazard tuple from current kinematics.
    /// An empty or fully-settled field yields zeroed stats.
    #[must_use]
    pub fn stats(&self) -> HazardStats {
        let active: Vec<&Particle> = self.rocks.iter().filter(|r| r.active).collect();
        let active_rocks = active.len() as f64;
        let velocity_avg = if active.is_empty() {
            0.0
        } else {
            active.iter().map(|r| r.velocity.length()).sum::<f64>() / active_rocks
        };
        let hazard_index = ((active_rocks * 0.6 + velocity_avg * 9.0) * 1.2).clamp(0.0, 100.0);
        let confidence = 65.0 + ((100.0 - (50.0 - hazard_index).abs()).max(0.0) * 0.3).min(35.0);
        HazardStats {
            hazard_index,
            velocity_avg,
            active_rocks,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{BaseTerrain, Flat};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_field_zeroed_stats() {
        let field = ParticleField::new(BaseTerrain);
        let stats = field.stats();
        assert_eq!(stats.active_rocks, 0.0);
        assert_eq!(stats.velocity_avg, 0.0);
        assert_eq!(stats.hazard_index, 0.0);
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut field = ParticleField::new(BaseTerrain);
        for _ in 0..50 {
            field.spawn(&mut rng);
        }
        for rock in field.rocks() {
            assert!(rock.position.x >= -20.0 && rock.position.x <= 20.0);
            assert!(rock.position.z >= -20.0 && rock.position.z <= 20.0);
            assert!(rock.position.y >= 8.0 && rock.position.y <= 12.0);
            assert!(rock.velocity.y >= -4.0 && rock.velocity.y <= -2.0);
            assert!(rock.size >= 0.2 && rock.size <= 1.0);
            assert!(rock.active);
        }
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut field = ParticleField::new(BaseTerrain);
        for _ in 0..200 {
            field.spawn(&mut rng);
        }
        assert_eq!(field.rocks().len(), MAX_ROCKS);
        // ids 51..=200 survive; 1..=50 were evicted oldest-first
        assert_eq!(field.rocks().first().map(|r| r.id), Some(51));
        assert_eq!(field.rocks().last().map(|r| r.id), Some(200));
    }

    #[test]
    fn test_ids_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut field = ParticleField::new(BaseTerrain);
        let a = field.spawn(&mut rng);
        let b = field.spawn(&mut rng);
        assert!(b > a);
    }

    #[test]
    fn test_settles_on_flat_terrain() {
        let mut field = ParticleField::new(Flat(-1.2));
        field.insert(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -2.0, 0.0), 0.3);
        for _ in 0..10_000 {
            field.step(0.016);
            if !field.rocks()[0].active {
                break;
            }
        }
        let rock = &field.rocks()[0];
        assert!(!rock.active, "rock should come to rest");
        assert!((rock.position.y - (-0.9)).abs() < 1e-9);
        assert_eq!(rock.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_inactive_never_reactivates() {
        let mut field = ParticleField::new(Flat(0.0));
        field.insert(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -2.0, 0.0), 0.3);
        let mut transitions = 0;
        let mut was_active = true;
        for _ in 0..10_000 {
            field.step(0.016);
            let active = field.rocks()[0].active;
            if was_active && !active {
                transitions += 1;
            }
            assert!(!(!was_active && active), "inactive rock must stay inactive");
            was_active = active;
        }
        assert_eq!(transitions, 1);
    }

    #[test]
    fn test_dt_clamp_no_tunnel_on_long_pause() {
        let mut field = ParticleField::new(Flat(0.0));
        field.insert(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -3.0, 0.0), 0.3);
        // A 5-second wall-clock gap must be integrated as MAX_DT, not 5s.
        field.step(5.0);
        let rock = &field.rocks()[0];
        assert!(rock.position.y >= field.terrain().height(rock.position.x, rock.position.z));
        assert!(rock.position.y > 1.5, "clamped step moves at most ~MAX_DT worth");
    }

    #[test]
    fn test_stats_confidence_capped() {
        let mut field = ParticleField::new(Flat(-100.0));
        for i in 0..100 {
            field.insert(
                Vec3::new(i as f64, 50.0, 0.0),
                Vec3::new(0.0, -10.0, 0.0),
                0.5,
            );
        }
        let stats = field.stats();
        assert!(stats.hazard_index <= 100.0);
        assert!(stats.confidence <= 100.0);
    }
}
