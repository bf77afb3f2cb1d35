//! Hardware-sensor hazard scoring.
//!
//! Maps a single field-node reading onto the hazard scale through fixed
//! increments per asserted detection flag plus motion terms from the IMU.
//! Every field is optional; a missing field is treated as absent / false /
//! zero, never as an error.

use crate::scoring::HazardScorer;
use serde::{Deserialize, Serialize};
use talus_data::{HardwareReading, HazardStats};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HardwareConfig {
    /// Floor value when a node reports but nothing is asserted.
    pub base_hazard: f64,
    pub rain_increment: f64,
    pub soil_increment: f64,
    pub vibration_increment: f64,
    /// Gain on |accel magnitude - 1g| (accelerometer reports in g).
    pub accel_gain: f64,
    pub accel_cap: f64,
    /// Gain on angular-rate magnitude, deg/s.
    pub gyro_gain: f64,
    pub gyro_cap: f64,
    pub humidity_threshold: f64,
    pub humidity_increment: f64,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            base_hazard: 10.0,
            rain_increment: 25.0,
            soil_increment: 20.0,
            vibration_increment: 30.0,
            accel_gain: 25.0,
            accel_cap: 20.0,
            gyro_gain: 0.1,
            gyro_cap: 10.0,
            humidity_threshold: 70.0,
            humidity_increment: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareScorer {
    config: HardwareConfig,
}

impl HardwareScorer {
    #[must_use]
    pub fn new(config: HardwareConfig) -> Self {
        Self { config }
    }
}

impl HazardScorer<HardwareReading> for HardwareScorer {
    fn evaluate(&mut self, reading: &HardwareReading) -> HazardStats {
        let c = &self.config;
        let mut hazard = c.base_hazard;
        let mut flags = 0.0;

        if HardwareReading::flag(reading.rain_detected) {
            hazard += c.rain_increment;
            flags += 1.0;
        }
        if HardwareReading::flag(reading.soil_moisture_wet) {
            hazard += c.soil_increment;
            flags += 1.0;
        }
        if HardwareReading::flag(reading.vibration_detected) {
            hazard += c.vibration_increment;
            flags += 1.0;
        }

        // A fully absent IMU must not read as a 1g deviation.
        let has_accel =
            reading.accel_x.is_some() || reading.accel_y.is_some() || reading.accel_z.is_some();
        if has_accel {
            let ax = reading.accel_x.unwrap_or(0.0);
            let ay = reading.accel_y.unwrap_or(0.0);
            let az = reading.accel_z.unwrap_or(0.0);
            let magnitude = (ax * ax + ay * ay + az * az).sqrt();
            hazard += ((magnitude - 1.0).abs() * c.accel_gain).min(c.accel_cap);
        }

        let gx = reading.gyro_x.unwrap_or(0.0);
        let gy = reading.gyro_y.unwrap_or(0.0);
        let gz = reading.gyro_z.unwrap_or(0.0);
        let spin = (gx * gx + gy * gy + gz * gz).sqrt();
        let spin_term = (spin * c.gyro_gain).min(c.gyro_cap);
        hazard += spin_term;

        if reading.humidity.unwrap_or(0.0) > c.humidity_threshold {
            hazard += c.humidity_increment;
        }

        HazardStats {
            hazard_index: hazard.clamp(0.0, 100.0),
            velocity_avg: spin_term,
            active_rocks: flags,
            confidence: (40.0 + reading.populated_fields() as f64 * 5.0).min(100.0),
        }
    }
}
