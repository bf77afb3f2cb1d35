//! Core data structures for the Talus hazard pipeline.

pub mod alert;
pub mod geo;
pub mod rock;
pub mod sensor;
pub mod stats;
pub mod vision;
