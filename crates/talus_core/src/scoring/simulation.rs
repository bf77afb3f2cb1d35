//! Simulation-backed hazard scoring.
//!
//! The particle field already derives its own kinematic stats; this scorer
//! is the thin adapter that exposes them through the common trait so the
//! aggregation layer can swap sources freely.

use crate::particles::ParticleField;
use crate::scoring::HazardScorer;
use crate::terrain::HeightField;
use talus_data::HazardStats;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationScorer;

impl<T: HeightField> HazardScorer<ParticleField<T>> for SimulationScorer {
    fn evaluate(&mut self, evidence: &ParticleField<T>) -> HazardStats {
        evidence.stats()
    }
}
