use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

/// A single fired alert. Immutable after creation; the feed keeps only the
/// ten most recent items.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AlertItem {
    pub id: u64,
    pub level: AlertLevel,
    pub message: String,
    /// Epoch milliseconds at creation.
    pub time: i64,
}
