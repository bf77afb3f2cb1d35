//! Vision-detection hazard scoring.
//!
//! Consumes detection boxes from the external inference call. Frame-to-frame
//! motion is estimated by greedy nearest-neighbor matching of box centers;
//! the per-field EMA and the hazard rate limit keep single-frame detection
//! noise from jumping the published value.

use crate::scoring::HazardScorer;
use serde::{Deserialize, Serialize};
use talus_data::{Detection, HazardStats};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VisionConfig {
    /// Target sampling rate of the inference loop, frames per second.
    pub fps: f64,
    /// Detections below this confidence are dropped.
    pub confidence_threshold: f64,
    /// Class allow-list, lowercase. Empty accepts every class.
    pub classes: Vec<String>,
    /// EMA factor; clamped into [0.05, 0.95] at use.
    pub alpha: f64,
    /// Largest hazard-index change allowed per second.
    pub max_delta_per_second: f64,
    /// Pixel displacement per velocity-proxy unit.
    pub pixels_per_unit: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            fps: 2.0,
            confidence_threshold: 0.6,
            classes: vec![
                "rock".to_string(),
                "rockfall".to_string(),
                "falling_rock".to_string(),
            ],
            alpha: 0.35,
            max_delta_per_second: 10.0,
            pixels_per_unit: 100.0,
        }
    }
}

impl VisionConfig {
    /// Parses a comma-separated allow-list ("rock, rockfall").
    #[must_use]
    pub fn parse_classes(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Stateful scorer over successive detection frames.
pub struct VisionScorer {
    config: VisionConfig,
    last_centers: Vec<(f64, f64)>,
    prev: HazardStats,
    status: String,
}

impl VisionScorer {
    #[must_use]
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            last_centers: Vec::new(),
            prev: HazardStats::seed(),
            status: "Idle".to_string(),
        }
    }

    /// Human-readable source state ("Running inference", error text, ...).
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn last(&self) -> HazardStats {
        self.prev
    }

    /// Records a camera or inference failure. The source is degraded, not
    /// fatal: stats simply stay at their previous values this cycle.
    pub fn note_failure(&mut self, message: &str) {
        self.status = message.to_string();
        tracing::warn!(status = message, "Vision source failure");
    }

    /// Clears cross-frame state when the camera (re)starts.
    pub fn reset(&mut self) {
        self.last_centers.clear();
        self.status = "Running inference".to_string();
    }

    fn keep(&self, detection: &Detection) -> bool {
        detection.confidence >= self.config.confidence_threshold
            && (self.config.classes.is_empty()
                || self
                    .config
                    .classes
                    .iter()
                    .any(|c| c == &detection.class_name.to_lowercase()))
    }
}

impl HazardScorer<[Detection]> for VisionScorer {
    fn evaluate(&mut self, evidence: &[Detection]) -> HazardStats {
        let kept: Vec<&Detection> = evidence.iter().filter(|d| self.keep(d)).collect();
        let centers: Vec<(f64, f64)> = kept.iter().map(|d| (d.x, d.y)).collect();

        // Greedy nearest-neighbor against the previous frame; unmatched
        // centers contribute zero displacement.
        let mut total_disp = 0.0;
        for (x1, y1) in &centers {
            let mut best = f64::INFINITY;
            for (x0, y0) in &self.last_centers {
                let d = (x1 - x0).hypot(y1 - y0);
                if d < best {
                    best = d;
                }
            }
            if best.is_finite() {
                total_disp += best;
            }
        }
        let px_per_sec = total_disp / (centers.len().max(1) as f64) * self.config.fps;
        let raw_velocity = if px_per_sec.is_finite() {
            px_per_sec / self.config.pixels_per_unit
        } else {
            0.0
        };
        let raw_active = kept.len() as f64;
        let raw_conf = if kept.is_empty() {
            0.0
        } else {
            kept.iter().map(|d| d.confidence).sum::<f64>() / raw_active
        };

        let a = self.config.alpha.clamp(0.05, 0.95);
        let prev = self.prev;
        let velocity_avg = prev.velocity_avg + a * (raw_velocity - prev.velocity_avg);
        let active_rocks = prev.active_rocks + a * (raw_active - prev.active_rocks);
        let confidence = prev.confidence + a * (raw_conf * 100.0 - prev.confidence);

        let hazard_target =
            (active_rocks * 10.0 + confidence * 0.4 + velocity_avg * 20.0).clamp(0.0, 100.0);
        let max_step = self.config.max_delta_per_second / self.config.fps.max(1.0);
        let hazard_index =
            prev.hazard_index + (hazard_target - prev.hazard_index).clamp(-max_step, max_step);

        let stats = HazardStats {
            hazard_index,
            velocity_avg,
            active_rocks,
            confidence,
        };
        self.prev = stats;
        self.last_centers = centers;
        self.status = format!("Detections: {}", kept.len());
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x: f64, y: f64, class_name: &str, confidence: f64) -> Detection {
        Detection {
            x,
            y,
            width: 10.0,
            height: 10.0,
            class_name: class_name.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_filters_by_confidence_and_class() {
        let mut scorer = VisionScorer::new(VisionConfig::default());
        let frame = vec![
            det(0.0, 0.0, "rock", 0.9),
            det(5.0, 5.0, "rock", 0.2),
            det(9.0, 9.0, "helmet", 0.95),
        ];
        scorer.evaluate(&frame);
        assert_eq!(scorer.status(), "Detections: 1");
    }

    #[test]
    fn test_empty_allowlist_accepts_all_classes() {
        let config = VisionConfig {
            classes: Vec::new(),
            ..Default::default()
        };
        let mut scorer = VisionScorer::new(config);
        scorer.evaluate(&[det(0.0, 0.0, "anything", 0.9)]);
        assert_eq!(scorer.status(), "Detections: 1");
    }

    #[test]
    fn test_displacement_drives_velocity() {
        let config = VisionConfig {
            alpha: 0.95,
            fps: 1.0,
            ..Default::default()
        };
        let mut scorer = VisionScorer::new(config);
        scorer.evaluate(&[det(0.0, 0.0, "rock", 0.9)]);
        // first frame has no previous centers: zero displacement
        assert_eq!(scorer.last().velocity_avg, 0.0);
        let moved = scorer.evaluate(&[det(30.0, 40.0, "rock", 0.9)]);
        // 50px over one frame at 1 fps => 0.5 proxy units, EMA'd at 0.95
        assert!((moved.velocity_avg - 0.475).abs() < 1e-9);
    }

    #[test]
    fn test_hazard_rate_limited() {
        let config = VisionConfig {
            fps: 2.0,
            alpha: 0.95,
            ..Default::default()
        };
        let mut scorer = VisionScorer::new(config);
        let frame: Vec<Detection> = (0..20).map(|i| det(i as f64, 0.0, "rock", 0.99)).collect();
        let first = scorer.evaluate(&frame);
        // max step is 10 / 2 = 5 per evaluation
        assert!((first.hazard_index - 5.0).abs() < 1e-9);
        let second = scorer.evaluate(&frame);
        assert!((second.hazard_index - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_failure_leaves_stats_untouched() {
        let mut scorer = VisionScorer::new(VisionConfig::default());
        scorer.evaluate(&[det(0.0, 0.0, "rock", 0.9)]);
        let before = scorer.last();
        scorer.note_failure("Camera error");
        assert_eq!(scorer.last(), before);
        assert_eq!(scorer.status(), "Camera error");
    }

    #[test]
    fn test_parse_classes() {
        let classes = VisionConfig::parse_classes("Rock, rockfall , ,FALLING_ROCK");
        assert_eq!(classes, vec!["rock", "rockfall", "falling_rock"]);
    }

    #[test]
    fn test_confidence_tracks_detections() {
        let config = VisionConfig {
            alpha: 0.95,
            ..Default::default()
        };
        let mut scorer = VisionScorer::new(config);
        let out = scorer.evaluate(&[det(0.0, 0.0, "rock", 0.8)]);
        // EMA from seed 50 toward 80
        assert!((out.confidence - (50.0 + 0.95 * 30.0)).abs() < 1e-9);
    }
}
