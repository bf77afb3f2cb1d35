//! User preference store.
//!
//! Visualization toggles and terrain sliders that survive restarts.
//! Loaded once at startup and written back on every change; a missing or
//! unreadable file silently falls back to defaults so a fresh install
//! starts clean. Unknown or absent keys keep their defaults, which lets
//! old files survive new fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Prefs {
    /// Simulation running (false = paused; particles are retained).
    pub running: bool,
    pub show_wireframe: bool,
    pub show_heatmap: bool,
    pub show_pit: bool,
    pub show_tunnels: bool,
    pub show_structures: bool,
    pub show_hills: bool,
    /// 0-100 slider mapped to hill amplitude.
    pub hilliness: f64,
    pub mountain_count: f64,
    pub alerts_enabled: bool,
    /// Minimum seconds between alerts.
    pub alerts_min_interval: u64,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            running: true,
            show_wireframe: false,
            show_heatmap: true,
            show_pit: true,
            show_tunnels: true,
            show_structures: true,
            show_hills: true,
            hilliness: 85.0,
            mountain_count: 14.0,
            alerts_enabled: true,
            alerts_min_interval: 30,
        }
    }
}

impl Prefs {
    /// Loads preferences, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!("Ignoring malformed prefs file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Writes the current preferences back to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize preferences")?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let prefs = Prefs::load(Path::new("/nonexistent/talus-prefs.toml"));
        assert_eq!(prefs, Prefs::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_rest() {
        let prefs: Prefs = toml::from_str("hilliness = 40.0\nrunning = false\n").unwrap();
        assert_eq!(prefs.hilliness, 40.0);
        assert!(!prefs.running);
        assert_eq!(prefs.mountain_count, 14.0);
        assert!(prefs.show_heatmap);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut path = std::env::temp_dir();
        path.push(format!("talus-prefs-test-{}.toml", std::process::id()));
        let prefs = Prefs {
            hilliness: 12.0,
            alerts_enabled: false,
            ..Default::default()
        };
        prefs.save(&path).unwrap();
        let loaded = Prefs::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let mut path = std::env::temp_dir();
        path.push(format!("talus-prefs-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "not = [valid").unwrap();
        let loaded = Prefs::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, Prefs::default());
    }
}
