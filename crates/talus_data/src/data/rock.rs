use serde::{Deserialize, Serialize};

/// Three-component vector in meters / meters-per-second.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    #[must_use]
    pub fn scaled(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub fn added(&self, other: Vec3) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// A simulated falling rock.
///
/// Exclusively owned by the particle field; once the post-collision speed
/// drops below the rest threshold the rock flips to inactive and its
/// velocity is zeroed. Inactive rocks stay visible until capacity eviction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Radius in meters, fixed at spawn.
    pub size: f64,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert!((v.length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Vec3::ZERO, Vec3::default());
    }
}
