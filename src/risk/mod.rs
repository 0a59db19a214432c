pub mod classifier;
pub mod reasons;

pub use classifier::{classify, classify_now, is_exemption_eligible};
pub use reasons::{Comparison, ReasonKind, RiskReason, Stage};

use crate::config::ThresholdConfig;
use crate::core::EntityRecord;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk tier of one unit. Ordered by severity: `Low < Med < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Med,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Med, RiskTier::Low];

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Med => "MED",
            RiskTier::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying one unit.
///
/// `reasons` lists every check that contributed, in evaluation order. The
/// same metric may appear once per network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tier: RiskTier,
    pub reasons: Vec<RiskReason>,
}

impl Classification {
    pub fn low() -> Self {
        Self {
            tier: RiskTier::Low,
            reasons: Vec::new(),
        }
    }

    pub fn reason_text(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEntity {
    pub entity: EntityRecord,
    pub classification: Classification,
}

impl ClassifiedEntity {
    pub fn tier(&self) -> RiskTier {
        self.classification.tier
    }
}

/// Classify a batch of units.
///
/// Units are independent, so the batch is spread over the rayon pool. The
/// output preserves input order.
pub fn classify_fleet(
    entities: &[EntityRecord],
    config: &ThresholdConfig,
    as_of: DateTime<Utc>,
) -> Vec<ClassifiedEntity> {
    let span = tracing::debug_span!("classify_fleet", entities = entities.len());
    let _guard = span.enter();

    let classified: Vec<ClassifiedEntity> = entities
        .par_iter()
        .map(|entity| ClassifiedEntity {
            classification: classify(entity, config, as_of),
            entity: entity.clone(),
        })
        .collect();

    let high = classified.iter().filter(|c| c.tier() == RiskTier::High).count();
    tracing::debug!(total = classified.len(), high, "classified fleet");

    classified
}
