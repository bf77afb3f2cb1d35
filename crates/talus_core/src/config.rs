//! Configuration management for pipeline parameters.
//!
//! Strongly-typed sections that map to `config.toml`. Defaults are
//! hardcoded in the `Default` impls and overridden by the file; user-facing
//! preferences (toggles, sliders) live in the separate prefs store, not
//! here.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [simulation]
//! spawn_interval_ms = 900
//! sensor_poll_interval_ms = 3000
//!
//! [terrain]
//! hilliness = 85.0
//! mountain_count = 14.0
//!
//! [alerts]
//! cooldown_ms = 20000
//! edge_triggered = true
//! ```

use crate::alerts::AlertConfig;
use crate::scoring::hardware::HardwareConfig;
use crate::scoring::{GeoWeights, VisionConfig};
use crate::smoothing::SmoothingConfig;
use serde::{Deserialize, Serialize};

/// Timing of the cooperative loops.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Period of the rock-spawn timer, milliseconds.
    pub spawn_interval_ms: u64,
    /// Period of the hardware-sensor polling loop, milliseconds.
    pub sensor_poll_interval_ms: u64,
    /// Frame-stepping rate the runtime aims for.
    pub target_fps: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 900,
            sensor_poll_interval_ms: 3_000,
            target_fps: 60,
        }
    }
}

/// Hill-overlay shape parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TerrainConfig {
    /// 0-100; maps linearly to overlay amplitude 0-12.
    pub hilliness: f64,
    /// Number of perimeter peaks, floored at 2.
    pub mountain_count: f64,
    /// Seed for hill placement; None means derive from wall clock.
    pub seed: Option<u64>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            hilliness: 85.0,
            mountain_count: 14.0,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub terrain: TerrainConfig,
    pub smoothing: SmoothingConfig,
    pub vision: VisionConfig,
    pub geo: GeoWeights,
    pub hardware: HardwareConfig,
    pub alerts: AlertConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.simulation.spawn_interval_ms > 0,
            "Spawn interval must be positive"
        );
        anyhow::ensure!(
            self.simulation.sensor_poll_interval_ms > 0,
            "Sensor poll interval must be positive"
        );
        anyhow::ensure!(self.simulation.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(
            self.simulation.target_fps <= 240,
            "Target FPS too high (max 240)"
        );

        anyhow::ensure!(
            (0.0..=100.0).contains(&self.terrain.hilliness),
            "Hilliness must be in [0, 100]"
        );
        anyhow::ensure!(
            self.terrain.mountain_count >= 0.0,
            "Mountain count must be non-negative"
        );

        anyhow::ensure!(
            self.smoothing.alpha > 0.0 && self.smoothing.alpha < 1.0,
            "Smoothing alpha must be in (0, 1)"
        );
        anyhow::ensure!(
            self.smoothing.max_delta_per_second > 0.0,
            "Max hazard delta must be positive"
        );

        anyhow::ensure!(self.vision.fps >= 1.0, "Vision FPS must be at least 1");
        anyhow::ensure!(self.vision.fps <= 30.0, "Vision FPS too high (max 30)");
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.vision.confidence_threshold),
            "Vision confidence threshold must be in [0, 1]"
        );
        anyhow::ensure!(
            self.vision.pixels_per_unit > 0.0,
            "Vision pixel scale must be positive"
        );

        for (name, w) in [
            ("slope", self.geo.slope),
            ("cliff", self.geo.cliff),
            ("quarry", self.geo.quarry),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&w),
                "Geo weight '{}' must be in [0.0, 1.0]",
                name
            );
        }

        anyhow::ensure!(
            self.hardware.base_hazard >= 0.0,
            "Hardware base hazard must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.hardware.humidity_threshold),
            "Humidity threshold must be in [0, 100]"
        );

        anyhow::ensure!(
            self.alerts.warning_threshold < self.alerts.critical_threshold,
            "Warning threshold must be below critical threshold"
        );
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.alerts.warning_threshold),
            "Warning threshold must be in [0, 100]"
        );
        anyhow::ensure!(
            (0.0..=100.0).contains(&self.alerts.critical_threshold),
            "Critical threshold must be in [0, 100]"
        );
        anyhow::ensure!(self.alerts.cooldown_ms >= 0, "Cooldown must be non-negative");

        Ok(())
    }

    /// Loads and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.simulation).as_bytes());
        hasher.update(format!("{:?}", self.terrain).as_bytes());
        hasher.update(format!("{:?}", self.smoothing).as_bytes());
        hasher.update(format!("{:?}", self.vision).as_bytes());
        hasher.update(format!("{:?}", self.geo).as_bytes());
        hasher.update(format!("{:?}", self.hardware).as_bytes());
        hasher.update(format!("{:?}", self.alerts).as_bytes());
        hex::encode(hasher.finalize())
    }
}
