//! Procedural terrain height fields.
//!
//! The base terrain is a deterministic sum of three sinusoids. The same
//! function must back both the collision tests in the particle field and
//! any rendered mesh, so that simulated rocks and the displayed ground
//! agree on elevation; sharing the [`HeightField`] trait enforces that.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Maps a horizontal position to ground elevation.
pub trait HeightField {
    fn height(&self, x: f64, z: f64) -> f64;
}

/// The pit-floor terrain: three overlaid sinusoids, offset downward.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseTerrain;

impl HeightField for BaseTerrain {
    fn height(&self, x: f64, z: f64) -> f64 {
        (x * 0.25).sin() * 0.75 + (z * 0.18).cos() * 0.5 + ((x + z) * 0.12).sin() * 0.6 - 1.2
    }
}

/// Constant-elevation field for tests and flat-site scenarios.
#[derive(Debug, Clone, Copy)]
pub struct Flat(pub f64);

impl HeightField for Flat {
    fn height(&self, _x: f64, _z: f64) -> f64 {
        self.0
    }
}

/// One cone-shaped hill: center, falloff radius.
#[derive(Debug, Clone, Copy)]
struct HillCenter {
    cx: f64,
    cz: f64,
    radius: f64,
}

/// Perimeter hill overlay.
///
/// Generated once per (amplitude, count, seed) configuration and reused
/// across evaluations; the centers are sampled up front so repeated height
/// queries never touch the RNG.
#[derive(Debug, Clone)]
pub struct HillField {
    amplitude: f64,
    centers: Vec<HillCenter>,
}

impl HillField {
    /// Places `count` hills at randomized angles and radii around the
    /// perimeter of the site.
    #[must_use]
    pub fn generate(amplitude: f64, count: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let centers = (0..count)
            .map(|i| {
                let angle =
                    (i as f64 / count.max(1) as f64) * std::f64::consts::TAU + rng.gen::<f64>() * 0.3;
                let r = 34.0 + rng.gen::<f64>() * 6.0;
                HillCenter {
                    cx: angle.cos() * r,
                    cz: angle.sin() * r,
                    radius: 10.0 + rng.gen::<f64>() * 10.0,
                }
            })
            .collect();
        Self { amplitude, centers }
    }

    /// Maps a 0-100 hilliness preference to an overlay amplitude.
    #[must_use]
    pub fn amplitude_from_hilliness(hilliness: f64) -> f64 {
        12.0 * (hilliness.clamp(0.0, 100.0) / 100.0)
    }

    /// Hill count from the mountain-count preference, floored at two.
    #[must_use]
    pub fn count_from_preference(mountain_count: f64) -> usize {
        (mountain_count.round().max(2.0)) as usize
    }
}

impl HeightField for HillField {
    fn height(&self, x: f64, z: f64) -> f64 {
        let mut y = 0.0;
        for c in &self.centers {
            let dx = x - c.cx;
            let dz = z - c.cz;
            let d = (dx * dx + dz * dz).sqrt();
            let t = (1.0 - d / c.radius).max(0.0);
            // steeper sides than a plain cone
            let cone = t.powf(1.6);
            let ridges = (((x + z) * 0.25).sin() + (x * 0.35).cos() * 0.5).abs() * 0.25 * t;
            y += (cone + ridges) * self.amplitude;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_height_at_origin() {
        // sin(0)*0.75 + cos(0)*0.5 + sin(0)*0.6 - 1.2 = -0.7
        let y = BaseTerrain.height(0.0, 0.0);
        assert!((y - (-0.7)).abs() < 1e-12);
    }

    #[test]
    fn test_base_is_deterministic() {
        let a = BaseTerrain.height(3.7, -12.1);
        let b = BaseTerrain.height(3.7, -12.1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hill_field_deterministic_per_seed() {
        let a = HillField::generate(4.8, 6, 7);
        let b = HillField::generate(4.8, 6, 7);
        assert_eq!(a.height(10.0, 5.0), b.height(10.0, 5.0));
    }

    #[test]
    fn test_hill_field_nonnegative() {
        let field = HillField::generate(4.8, 6, 1);
        for i in -10..10 {
            for j in -10..10 {
                assert!(field.height(i as f64 * 4.0, j as f64 * 4.0) >= 0.0);
            }
        }
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let field = HillField::generate(0.0, 6, 1);
        assert_eq!(field.height(34.0, 0.0), 0.0);
    }

    #[test]
    fn test_hilliness_mapping() {
        assert_eq!(HillField::amplitude_from_hilliness(0.0), 0.0);
        assert_eq!(HillField::amplitude_from_hilliness(100.0), 12.0);
        assert_eq!(HillField::amplitude_from_hilliness(150.0), 12.0);
        assert_eq!(HillField::count_from_preference(0.4), 2);
        assert_eq!(HillField::count_from_preference(14.0), 14);
    }
}
