//! Rolling metrics window for charting consumers.

use std::collections::VecDeque;
use talus_data::{HazardStats, MetricSample};

/// Samples retained before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 120;

/// In-memory rolling buffer of published hazard/velocity samples.
///
/// This is the only persistence of historical hazard data; nothing is
/// written to disk.
#[derive(Debug, Clone, Default)]
pub struct MetricsHistory {
    samples: VecDeque<MetricSample>,
}

impl MetricsHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one smoothed tuple at `t` (epoch millis).
    pub fn push(&mut self, t: i64, stats: &HazardStats) {
        if self.samples.len() == HISTORY_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(MetricSample {
            t,
            hazard: stats.hazard_index,
            velocity: stats.velocity_avg,
        });
    }

    /// Oldest-to-newest snapshot for chart rendering.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MetricSample> {
        self.samples.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<MetricSample> {
        self.samples.back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(h: f64) -> HazardStats {
        HazardStats {
            hazard_index: h,
            velocity_avg: h / 10.0,
            active_rocks: 1.0,
            confidence: 70.0,
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = MetricsHistory::new();
        for i in 0..200 {
            history.push(i, &stats(i as f64));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let snapshot = history.snapshot();
        assert_eq!(snapshot.first().map(|s| s.t), Some(80));
        assert_eq!(snapshot.last().map(|s| s.t), Some(199));
    }

    #[test]
    fn test_latest() {
        let mut history = MetricsHistory::new();
        assert!(history.latest().is_none());
        history.push(5, &stats(42.0));
        assert_eq!(history.latest().map(|s| s.hazard), Some(42.0));
    }
}
