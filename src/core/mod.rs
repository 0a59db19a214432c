//! Entity record schema shared by classification, aggregation and display.

pub mod lenient;
mod types;

pub use types::{EntityRecord, Network, NetworkTelemetry};
