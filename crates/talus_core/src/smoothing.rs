//! Exponential-moving-average smoothing with a hazard rate limit.
//!
//! Vision and hardware sources can produce single-frame spikes; the
//! smoother bounds both the jitter (EMA) and the largest per-tick jump of
//! the displayed hazard index (max-delta clamp). The simulation source is
//! already physically smooth, so the filter is idempotent there at steady
//! state.
//!
//! The delta budget is per wall-clock second, so the smoother must know
//! how often `apply` is called. The caller passes its call rate at
//! construction rather than reading it from a second config knob that
//! could drift from the real cadence.

use serde::{Deserialize, Serialize};
use talus_data::HazardStats;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SmoothingConfig {
    /// EMA factor; clamped into [0.05, 0.95] at use.
    pub alpha: f64,
    /// Largest hazard-index change allowed per second.
    pub max_delta_per_second: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: 0.35,
            max_delta_per_second: 10.0,
        }
    }
}

/// Stateful smoother over the four-field hazard tuple.
pub struct EmaSmoother {
    config: SmoothingConfig,
    /// How often `apply` is called, Hz. Floored at 1 in `max_step`.
    rate_hz: f64,
    prev: HazardStats,
}

impl EmaSmoother {
    #[must_use]
    pub fn new(config: SmoothingConfig, rate_hz: f64) -> Self {
        Self {
            config,
            rate_hz,
            prev: HazardStats::seed(),
        }
    }

    #[must_use]
    pub fn last(&self) -> HazardStats {
        self.prev
    }

    /// Largest hazard step a single call may take.
    #[must_use]
    pub fn max_step(&self) -> f64 {
        self.config.max_delta_per_second / self.rate_hz.max(1.0)
    }

    /// Filters one raw reading: per-field EMA, then the hazard-index delta
    /// is clamped to `max_delta_per_second / rate_hz`.
    pub fn apply(&mut self, raw: HazardStats) -> HazardStats {
        let a = self.config.alpha.clamp(0.05, 0.95);
        let prev = self.prev;
        let velocity_avg = prev.velocity_avg + a * (raw.velocity_avg - prev.velocity_avg);
        let active_rocks = prev.active_rocks + a * (raw.active_rocks - prev.active_rocks);
        let confidence = prev.confidence + a * (raw.confidence - prev.confidence);

        let target = prev.hazard_index + a * (raw.hazard_index - prev.hazard_index);
        let max_step = self.max_step();
        let hazard_index = prev.hazard_index + (target - prev.hazard_index).clamp(-max_step, max_step);

        let smoothed = HazardStats {
            hazard_index,
            velocity_avg,
            active_rocks,
            confidence,
        };
        self.prev = smoothed;
        smoothed
    }

    /// Drops accumulated state back to the seed value.
    pub fn reset(&mut self) {
        self.prev = HazardStats::seed();
    }
}
