//! # Talus
//!
//! Runtime for the mine-slope rockfall monitoring pipeline: owns the
//! cooperative loops (simulation frames, spawn timer, sensor polling,
//! vision sampling, geospatial lookups) and the user preference store,
//! wiring the scorers from `talus_core` to the clients in `talus_net`.

pub mod app;

pub use app::clock::FrameClock;
pub use app::prefs::Prefs;
pub use app::state::App;
