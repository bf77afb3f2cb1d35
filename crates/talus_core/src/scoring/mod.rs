//! The four hazard-evidence scorers.
//!
//! Each scorer maps one kind of evidence onto the shared
//! [`HazardStats`](talus_data::HazardStats) tuple so the smoothing and
//! alerting layers never care which source is active. The surrounding
//! application selects the source; this module only defines the mappings.

pub mod geosite;
pub mod hardware;
pub mod simulation;
pub mod vision;

pub use geosite::{GeoSiteScorer, GeoWeights, SiteEvidence};
pub use hardware::HardwareScorer;
pub use simulation::SimulationScorer;
pub use vision::{VisionConfig, VisionScorer};

use talus_data::HazardStats;

/// Produces a hazard tuple from one kind of evidence.
///
/// Scorers may carry state between evaluations (the vision scorer matches
/// detection centers across frames), hence `&mut self`.
pub trait HazardScorer<E: ?Sized> {
    fn evaluate(&mut self, evidence: &E) -> HazardStats;
}
