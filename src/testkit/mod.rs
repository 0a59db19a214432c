//! Testing infrastructure for fleetrisk.
//!
//! Builders and fixtures shared by unit tests, the integration tests under
//! `tests/` and the benchmarks:
//!
//! - **[`EntityBuilder`]**: fluent construction of entity records, starting
//!   from either an empty record or a fully healthy one
//! - **[`reference_time`]**: a fixed evaluation instant so scan ages are
//!   deterministic
//! - **[`sample_fleet`]**: a deterministic mixed-tier fleet of any size
//!
//! # Quick Start
//!
//! ```rust
//! use fleetrisk::config::ThresholdConfig;
//! use fleetrisk::risk::{classify, RiskTier};
//! use fleetrisk::testkit::{reference_time, EntityBuilder};
//!
//! let as_of = reference_time();
//! let entity = EntityBuilder::healthy("unit-1", as_of)
//!     .primary(|t| t.breakfix = Some(2))
//!     .build();
//!
//! let result = classify(&entity, &ThresholdConfig::default(), as_of);
//! assert_eq!(result.tier, RiskTier::High);
//! ```

pub mod helpers;

pub use helpers::{entities_json, reference_time, sample_fleet, EntityBuilder};
