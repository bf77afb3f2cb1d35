//! Geospatial site-heuristic hazard scoring.
//!
//! Evidence comes from three independently failable lookups: an elevation
//! sample grid, and counts of nearby cliff/quarry/cutting features. A
//! failed lookup arrives as an empty grid or zero counts and contributes
//! nothing to its term; the scorer itself never fails.

use crate::scoring::HazardScorer;
use serde::{Deserialize, Serialize};
use talus_data::{FeatureCounts, HazardStats};

/// Approximate width of the elevation sample grid, meters.
const GRID_SPAN_METERS: f64 = 6_000.0;
/// Modest slopes are amplified by this factor before clamping.
const SLOPE_GAIN: f64 = 4.0;
/// Elevation standard deviation mapping to roughness 100.
const ROUGHNESS_FULL_SCALE: f64 = 80.0;

/// Mixing weights for the combined hazard score. Each is clamped into
/// [0, 1] at use so a misconfigured file cannot blow past the scale.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoWeights {
    pub slope: f64,
    pub cliff: f64,
    pub quarry: f64,
}

impl Default for GeoWeights {
    fn default() -> Self {
        Self {
            slope: 0.45,
            cliff: 0.30,
            quarry: 0.15,
        }
    }
}

/// Everything the geospatial scorer needs for one evaluation.
#[derive(Debug, Clone, Default)]
pub struct SiteEvidence {
    /// Elevation samples around the site (5x5 grid when the lookup
    /// succeeds, empty when it fails).
    pub elevations: Vec<f64>,
    pub features: FeatureCounts,
}

/// Derived slope/roughness summary, kept for display.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlopeSummary {
    pub slope_pct: f64,
    pub elev_avg: f64,
    pub roughness: f64,
}

pub struct GeoSiteScorer {
    weights: GeoWeights,
    last_summary: SlopeSummary,
}

impl GeoSiteScorer {
    #[must_use]
    pub fn new(weights: GeoWeights) -> Self {
        Self {
            weights,
            last_summary: SlopeSummary::default(),
        }
    }

    #[must_use]
    pub fn last_summary(&self) -> SlopeSummary {
        self.last_summary
    }

    /// Slope index, mean elevation, and roughness from the sample grid.
    /// An empty grid (failed lookup) yields all zeros.
    #[must_use]
    pub fn slope_from_elevations(elevations: &[f64]) -> SlopeSummary {
        if elevations.is_empty() {
            return SlopeSummary::default();
        }
        let n = elevations.len() as f64;
        let elev_avg = elevations.iter().sum::<f64>() / n;
        let min = elevations.iter().copied().fold(f64::INFINITY, f64::min);
        let max = elevations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let slope = (max - min) / GRID_SPAN_METERS * 100.0;
        let slope_pct = (slope * SLOPE_GAIN).clamp(0.0, 100.0);
        let variance = elevations
            .iter()
            .map(|e| (e - elev_avg).powi(2))
            .sum::<f64>()
            / n;
        let roughness = (variance.sqrt() / ROUGHNESS_FULL_SCALE * 100.0).clamp(0.0, 100.0);
        SlopeSummary {
            slope_pct,
            elev_avg,
            roughness,
        }
    }
}

impl HazardScorer<SiteEvidence> for GeoSiteScorer {
    fn evaluate(&mut self, evidence: &SiteEvidence) -> HazardStats {
        let summary = Self::slope_from_elevations(&evidence.elevations);
        self.last_summary = summary;
        let FeatureCounts {
            cliff,
            quarry,
            cutting,
        } = evidence.features;
        let (cliff, quarry, cutting) = (f64::from(cliff), f64::from(quarry), f64::from(cutting));

        let slope_score = summary.slope_pct.min(100.0);
        let geom_factor = (cliff * 6.0 + cutting * 4.0).min(100.0);
        let mining_factor = (quarry * 12.0).min(100.0);
        let roughness_factor = summary.roughness.min(100.0);

        let w_slope = self.weights.slope.clamp(0.0, 1.0);
        let w_cliff = self.weights.cliff.clamp(0.0, 1.0);
        let w_quarry = self.weights.quarry.clamp(0.0, 1.0);

        let hazard_index = (5.0
            + w_slope * slope_score
            + w_cliff * geom_factor
            + w_quarry * mining_factor
            + 0.1 * roughness_factor)
            .round()
            .min(100.0);
        let active_rocks = (cliff * 0.7 + cutting * 0.5 + quarry * 0.6).round();
        let velocity_avg = (slope_score / 100.0 * 6.0 * 10.0).round() / 10.0;
        let confidence = (35.0
            + if evidence.elevations.is_empty() {
                0.0
            } else {
                25.0
            }
            + ((cliff + quarry + cutting) * 4.0).min(40.0)
            + (roughness_factor / 10.0).round().min(10.0))
        .min(100.0);

        HazardStats {
            hazard_index,
            velocity_avg,
            active_rocks,
            confidence,
        }
    }
}
