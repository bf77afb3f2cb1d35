//! Application state: the particle field, the four scorers, and the
//! smoothing/alerting/history pipeline behind them.
//!
//! All mutation happens from the owning runtime loop; see
//! [`crate::app::runtime`]. Everything here is synchronous so the pipeline
//! can be driven tick by tick in tests.

use crate::app::prefs::Prefs;
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use talus_core::alerts::{AlertConfig, AlertPolicy};
use talus_core::config::AppConfig;
use talus_core::history::MetricsHistory;
use talus_core::metrics::Metrics;
use talus_core::particles::ParticleField;
use talus_core::scoring::{
    GeoSiteScorer, HardwareScorer, HazardScorer, SimulationScorer, SiteEvidence, VisionScorer,
};
use talus_core::smoothing::EmaSmoother;
use talus_core::terrain::{BaseTerrain, HillField};
use talus_data::{AlertItem, Detection, GeoPlace, HardwareReading, HazardStats, RainfallSummary};

/// Which evidence source feeds the published hazard value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvidenceSource {
    #[default]
    Simulation,
    Vision,
    Geospatial,
    Hardware,
}

pub struct App {
    pub config: AppConfig,
    pub prefs: Prefs,
    pub source: EvidenceSource,
    pub paused: bool,
    pub site: Option<GeoPlace>,
    pub rainfall: RainfallSummary,
    pub metrics: Metrics,
    field: ParticleField<BaseTerrain>,
    hills: HillField,
    rng: ChaCha8Rng,
    simulation: SimulationScorer,
    vision: VisionScorer,
    geo: GeoSiteScorer,
    hardware: HardwareScorer,
    geo_latest: HazardStats,
    hardware_latest: HazardStats,
    smoother: EmaSmoother,
    alerts: AlertPolicy,
    history: MetricsHistory,
}

impl App {
    #[must_use]
    pub fn new(config: AppConfig, prefs: Prefs) -> Self {
        let seed = config
            .terrain
            .seed
            .unwrap_or_else(|| Utc::now().timestamp_millis() as u64);
        let hills = HillField::generate(
            HillField::amplitude_from_hilliness(prefs.hilliness),
            HillField::count_from_preference(prefs.mountain_count),
            seed,
        );
        let alerts = AlertPolicy::new(Self::alert_config(&config, &prefs));
        let paused = !prefs.running;
        Self {
            field: ParticleField::new(BaseTerrain),
            hills,
            rng: ChaCha8Rng::seed_from_u64(seed),
            simulation: SimulationScorer,
            vision: VisionScorer::new(config.vision.clone()),
            geo: GeoSiteScorer::new(config.geo),
            hardware: HardwareScorer::new(config.hardware),
            geo_latest: HazardStats::default(),
            hardware_latest: HazardStats::default(),
            // the smoother's per-second budget is spread over the frame
            // rate it is actually stepped at
            smoother: EmaSmoother::new(config.smoothing, config.simulation.target_fps as f64),
            alerts,
            history: MetricsHistory::new(),
            metrics: Metrics::new(),
            rainfall: RainfallSummary::default(),
            site: None,
            source: EvidenceSource::Simulation,
            paused,
            config,
            prefs,
        }
    }

    /// The preference sliders override the file-level alert timings.
    fn alert_config(config: &AppConfig, prefs: &Prefs) -> AlertConfig {
        AlertConfig {
            cooldown_ms: (prefs.alerts_min_interval as i64) * 1_000,
            ..config.alerts
        }
    }

    /// Advances the pipeline by one frame: step, score, smooth, record,
    /// offer to the alert policy. Returns the fired alert, if any.
    pub fn frame(&mut self, dt: f64, now_ms: i64) -> Option<AlertItem> {
        if self.paused {
            return None;
        }
        let started = Instant::now();
        self.field.step(dt);
        let raw = match self.source {
            EvidenceSource::Simulation => self.simulation.evaluate(&self.field),
            EvidenceSource::Vision => self.vision.last(),
            EvidenceSource::Geospatial => self.geo_latest,
            EvidenceSource::Hardware => self.hardware_latest,
        };
        let smoothed = self.smoother.apply(raw);
        self.history.push(now_ms, &smoothed);
        let active = self.field.rocks().iter().filter(|r| r.active).count();
        self.metrics
            .record_tick(started.elapsed(), active, smoothed.hazard_index);

        if !self.prefs.alerts_enabled {
            return None;
        }
        let site = self.site.as_ref().map(GeoPlace::pretty);
        let fired = self.alerts.offer(
            smoothed.hazard_index,
            smoothed.active_rocks,
            site.as_deref(),
            now_ms,
        );
        if fired.is_some() {
            self.metrics.record_alert();
        }
        fired
    }

    /// Spawn-timer entry point; a no-op while paused.
    pub fn spawn_rock(&mut self) {
        if self.paused {
            return;
        }
        self.field.spawn(&mut self.rng);
    }

    /// Halts stepping and spawning; existing rocks are retained.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Feeds one frame of detection boxes through the vision scorer.
    pub fn ingest_vision(&mut self, detections: &[Detection]) -> HazardStats {
        self.vision.evaluate(detections)
    }

    /// Records a vision-source failure without touching the stats.
    pub fn vision_failed(&mut self, message: &str) {
        self.vision.note_failure(message);
        self.metrics.increment_counter("vision_failures");
    }

    /// Feeds one polled hardware reading through the hardware scorer.
    pub fn ingest_hardware(&mut self, reading: &HardwareReading) -> HazardStats {
        self.hardware_latest = self.hardware.evaluate(reading);
        self.hardware_latest
    }

    /// Applies the results of a completed geospatial lookup chain.
    pub fn apply_site_evidence(&mut self, evidence: &SiteEvidence) -> HazardStats {
        self.geo_latest = self.geo.evaluate(evidence);
        self.geo_latest
    }

    /// Regenerates the hill overlay after a preference change.
    pub fn rebuild_hills(&mut self) {
        let seed = self
            .config
            .terrain
            .seed
            .unwrap_or_else(|| Utc::now().timestamp_millis() as u64);
        self.hills = HillField::generate(
            HillField::amplitude_from_hilliness(self.prefs.hilliness),
            HillField::count_from_preference(self.prefs.mountain_count),
            seed,
        );
    }

    #[must_use]
    pub fn field(&self) -> &ParticleField<BaseTerrain> {
        &self.field
    }

    #[must_use]
    pub fn hills(&self) -> &HillField {
        &self.hills
    }

    #[must_use]
    pub fn published(&self) -> HazardStats {
        self.smoother.last()
    }

    #[must_use]
    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    #[must_use]
    pub fn alert_feed(&self) -> &[AlertItem] {
        self.alerts.feed()
    }

    #[must_use]
    pub fn vision_status(&self) -> &str {
        self.vision.status()
    }
}
