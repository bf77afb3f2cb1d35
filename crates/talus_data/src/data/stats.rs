use serde::{Deserialize, Serialize};

/// The common output contract of every hazard scorer.
///
/// All four evidence sources (simulation, vision, geospatial, hardware)
/// emit exactly this shape so that smoothing, alerting, and charting
/// consumers stay source-agnostic. `active_rocks` is fractional because
/// the vision source smooths its detection count over time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HazardStats {
    /// 0-100 hazard score.
    pub hazard_index: f64,
    /// m/s, or a scaled proxy depending on the source.
    pub velocity_avg: f64,
    /// Count or count-equivalent of tracked rocks.
    pub active_rocks: f64,
    /// 0-100 source confidence.
    pub confidence: f64,
}

impl Default for HazardStats {
    /// The "no source active" value: zero hazard, low confidence.
    fn default() -> Self {
        Self {
            hazard_index: 0.0,
            velocity_avg: 0.0,
            active_rocks: 0.0,
            confidence: 0.0,
        }
    }
}

impl HazardStats {
    /// Seed value for smoothing filters before the first real reading.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            hazard_index: 0.0,
            velocity_avg: 0.0,
            active_rocks: 0.0,
            confidence: 50.0,
        }
    }
}

/// One point of the rolling metrics chart.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    /// Epoch milliseconds.
    pub t: i64,
    pub hazard: f64,
    pub velocity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(HazardStats::default()).unwrap();
        assert!(json.get("hazardIndex").is_some());
        assert!(json.get("velocityAvg").is_some());
        assert!(json.get("activeRocks").is_some());
        assert!(json.get("confidence").is_some());
    }

    #[test]
    fn test_default_is_low_confidence_zero() {
        let s = HazardStats::default();
        assert_eq!(s.hazard_index, 0.0);
        assert_eq!(s.confidence, 0.0);
    }
}
