// Export modules for library usage
pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod display;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod report;
pub mod risk;
pub mod testkit;

// Re-export commonly used types
pub use crate::aggregation::{
    aggregate_by_group, group_by, summarize, GroupDescriptor, GroupRegistry, GroupRollup,
    RollupStats,
};
pub use crate::config::{FleetRiskConfig, ThresholdConfig, ThresholdOverrides};
pub use crate::core::{EntityRecord, Network, NetworkTelemetry};
pub use crate::display::{numeric_tier, recency_tier, DisplayContext, DisplayTier, Polarity};
pub use crate::report::FleetReport;
pub use crate::risk::{
    classify, classify_fleet, classify_now, Classification, ClassifiedEntity, RiskReason, RiskTier,
};
