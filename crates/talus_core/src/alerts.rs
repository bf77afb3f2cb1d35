//! Alert thresholding and the capped alert feed.
//!
//! The smoothed hazard value is bucketed into severities; an alert fires
//! only when a bucket applies and the cooldown has elapsed. In
//! edge-triggered mode an alert additionally requires entering a *new*
//! bucket, so a sustained hazard produces one alert instead of one per
//! cooldown window. Edge-triggered is the default; the cooldown-only
//! variant remains available behind the toggle.

use serde::{Deserialize, Serialize};
use talus_data::{AlertItem, AlertLevel};

/// Maximum number of retained alerts, oldest evicted first.
pub const FEED_CAPACITY: usize = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AlertConfig {
    /// Hazard at or above this is a warning.
    pub warning_threshold: f64,
    /// Hazard at or above this is critical.
    pub critical_threshold: f64,
    /// Minimum time between alerts, milliseconds.
    pub cooldown_ms: i64,
    /// Fire only on entering a new severity bucket.
    pub edge_triggered: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            warning_threshold: 60.0,
            critical_threshold: 85.0,
            cooldown_ms: 20_000,
            edge_triggered: true,
        }
    }
}

impl AlertConfig {
    /// The stricter variant: lower thresholds, same cooldown.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            warning_threshold: 55.0,
            critical_threshold: 80.0,
            ..Default::default()
        }
    }
}

/// Severity classification of a smoothed hazard value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBucket {
    None,
    Warning,
    Critical,
}

impl SeverityBucket {
    fn level(self) -> Option<AlertLevel> {
        match self {
            SeverityBucket::None => None,
            SeverityBucket::Warning => Some(AlertLevel::Warning),
            SeverityBucket::Critical => Some(AlertLevel::Critical),
        }
    }
}

/// Decides when alerts fire and retains the most recent feed.
pub struct AlertPolicy {
    config: AlertConfig,
    feed: Vec<AlertItem>,
    next_id: u64,
    last_alert_at: Option<i64>,
    last_bucket: SeverityBucket,
}

impl AlertPolicy {
    #[must_use]
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            feed: Vec::new(),
            next_id: 1,
            last_alert_at: None,
            last_bucket: SeverityBucket::None,
        }
    }

    /// Newest first.
    #[must_use]
    pub fn feed(&self) -> &[AlertItem] {
        &self.feed
    }

    #[must_use]
    pub fn bucket(&self, hazard: f64) -> SeverityBucket {
        if hazard >= self.config.critical_threshold {
            SeverityBucket::Critical
        } else if hazard >= self.config.warning_threshold {
            SeverityBucket::Warning
        } else {
            SeverityBucket::None
        }
    }

    /// Offers one smoothed hazard observation at `now_ms` (epoch millis).
    ///
    /// Returns the fired alert, if any. Hazard dips always update the
    /// bucket tracker so edge-triggered mode sees re-entries, but a bucket
    /// change suppressed by the cooldown alone is left pending: the
    /// escalation fires once the window elapses instead of being lost.
    pub fn offer(
        &mut self,
        hazard: f64,
        active_rocks: f64,
        site: Option<&str>,
        now_ms: i64,
    ) -> Option<AlertItem> {
        let bucket = self.bucket(hazard);
        let entered_new = bucket != self.last_bucket;

        let Some(level) = bucket.level() else {
            self.last_bucket = bucket;
            return None;
        };
        if self.config.edge_triggered && !entered_new {
            return None;
        }
        if let Some(last) = self.last_alert_at {
            if now_ms - last < self.config.cooldown_ms {
                return None;
            }
        }
        self.last_bucket = bucket;
        self.last_alert_at = Some(now_ms);

        let item = AlertItem {
            id: self.next_id,
            level,
            message: Self::render_message(level, hazard, site, active_rocks),
            time: now_ms,
        };
        self.next_id += 1;
        self.feed.insert(0, item.clone());
        self.feed.truncate(FEED_CAPACITY);
        tracing::info!(
            level = level.label(),
            hazard = hazard.round(),
            "Alert fired"
        );
        Some(item)
    }

    fn render_message(
        level: AlertLevel,
        hazard: f64,
        site: Option<&str>,
        active_rocks: f64,
    ) -> String {
        let pct = hazard.round() as i64;
        let base = match level {
            AlertLevel::Critical => format!("Critical rockfall risk ({pct}%)."),
            AlertLevel::Warning => format!("Elevated rockfall risk ({pct}%)."),
            AlertLevel::Info => format!("Minor activity ({pct}%)."),
        };
        let mut message = match site {
            Some(site) if !site.is_empty() => format!("{base} at {site}"),
            _ => base,
        };
        let rocks = active_rocks.round() as i64;
        if rocks > 0 {
            message = format!("{message} \u{2022} Active rocks: {rocks}.");
        }
        message
    }
}
