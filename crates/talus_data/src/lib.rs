//! Shared value types for the Talus hazard-monitoring core.
//!
//! Every crate in the workspace speaks these types: the simulation and the
//! four hazard scorers all emit [`HazardStats`], the sensor server and the
//! polling loop exchange [`HardwareReading`], and the vision pipeline
//! consumes [`Detection`] boxes. Keeping them in one leaf crate avoids
//! dependency cycles between the engine, the lookup clients, and the server.

pub mod data;

pub use data::alert::{AlertItem, AlertLevel};
pub use data::geo::{FeatureCounts, GeoPlace, RainfallSummary};
pub use data::rock::{Particle, Vec3};
pub use data::sensor::{HardwareReading, SensorsLatestResponse};
pub use data::stats::{HazardStats, MetricSample};
pub use data::vision::{Detection, InferenceResult};
