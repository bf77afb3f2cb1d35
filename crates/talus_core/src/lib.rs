//! # Talus Core
//!
//! The hazard-aggregation and rockfall-simulation engine behind the Talus
//! monitoring dashboard.
//!
//! This crate contains the deterministic scoring logic, including:
//! - A continuous-time rockfall particle simulation (gravity + terrain
//!   collision with restitution and friction)
//! - Procedural terrain height fields shared between collision tests and
//!   mesh consumers
//! - Four interchangeable hazard scorers (simulation, vision, geospatial,
//!   hardware sensors) normalized onto one 0-100 `HazardStats` contract
//! - Exponential-moving-average smoothing with per-tick rate limiting
//! - A cooldown/hysteresis alert decision policy
//! - A rolling metrics history for charting
//!
//! ## Example
//!
//! ```
//! use talus_core::particles::ParticleField;
//! use talus_core::terrain::BaseTerrain;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut field = ParticleField::new(BaseTerrain);
//! field.spawn(&mut rng);
//! field.step(0.016);
//! let stats = field.stats();
//! assert!(stats.hazard_index <= 100.0);
//! ```

/// Alert thresholding, cooldown, and the capped alert feed
pub mod alerts;
/// Configuration management for pipeline parameters
pub mod config;
/// Rolling metrics window for charting consumers
pub mod history;
/// Pipeline counters and periodic tick logging
pub mod metrics;
/// Falling-rock particle simulation
pub mod particles;
/// The four evidence-source scorers and their shared trait
pub mod scoring;
/// EMA smoothing and per-tick rate limiting
pub mod smoothing;
/// Procedural terrain height fields
pub mod terrain;

pub use alerts::{AlertPolicy, SeverityBucket};
pub use config::AppConfig;
pub use history::MetricsHistory;
pub use metrics::Metrics;
pub use particles::ParticleField;
pub use scoring::HazardScorer;
pub use smoothing::EmaSmoother;
pub use talus_data::{HazardStats, Particle, Vec3};
pub use terrain::{BaseTerrain, Flat, HeightField, HillField};
