//! CLI command implementations.
//!
//! - **classify**: classify a fleet file and write a report
//! - **init**: write a default `.fleetrisk.toml`
//! - **thresholds**: print the effective thresholds

pub mod classify;
pub mod init;
pub mod thresholds;
