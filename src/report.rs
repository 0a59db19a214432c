//! The bundle handed to output writers: classified units annotated with
//! display bands, group rollups and the fleet summary.

use crate::aggregation::{aggregate_by_group, summarize, GroupRegistry, GroupRollup, RollupStats};
use crate::config::ThresholdConfig;
use crate::core::EntityRecord;
use crate::display::{DisplayContext, EntityDisplayTiers};
use crate::risk::{classify_fleet, Classification, ClassifiedEntity, RiskTier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub entity: EntityRecord,
    pub classification: Classification,
    /// Rendered reasons, parallel to `classification.reasons`
    pub reason_text: Vec<String>,
    pub display: EntityDisplayTiers,
}

impl EntityReport {
    pub fn tier(&self) -> RiskTier {
        self.classification.tier
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub as_of: DateTime<Utc>,
    pub context: DisplayContext,
    pub summary: RollupStats,
    /// Parent name to group rollups
    pub groups: BTreeMap<String, Vec<GroupRollup>>,
    pub entities: Vec<EntityReport>,
}

impl FleetReport {
    pub fn build(
        entities: &[EntityRecord],
        config: &ThresholdConfig,
        registry: &GroupRegistry,
        context: DisplayContext,
        as_of: DateTime<Utc>,
    ) -> Self {
        let span = tracing::debug_span!("build_report", entities = entities.len());
        let _guard = span.enter();

        let classified = classify_fleet(entities, config, as_of);
        Self::from_classified(classified, config, registry, context, as_of)
    }

    pub fn from_classified(
        classified: Vec<ClassifiedEntity>,
        config: &ThresholdConfig,
        registry: &GroupRegistry,
        context: DisplayContext,
        as_of: DateTime<Utc>,
    ) -> Self {
        let summary = summarize(&classified);
        let groups = aggregate_by_group(&classified, registry);

        let entities = classified
            .into_iter()
            .map(|item| EntityReport {
                reason_text: item.classification.reason_text(),
                display: EntityDisplayTiers::for_entity(&item.entity, config, context, as_of),
                entity: item.entity,
                classification: item.classification,
            })
            .collect();

        Self {
            as_of,
            context,
            summary,
            groups,
            entities,
        }
    }

    /// Entities ordered HIGH first. Input order is kept within a tier.
    pub fn by_severity(&self) -> Vec<&EntityReport> {
        let mut ordered: Vec<&EntityReport> = self.entities.iter().collect();
        ordered.sort_by_key(|report| std::cmp::Reverse(report.tier()));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{reference_time, sample_fleet, EntityBuilder};

    #[test]
    fn test_build_report_from_fleet() {
        let as_of = reference_time();
        let fleet = sample_fleet(12, as_of);
        let report = FleetReport::build(
            &fleet,
            &ThresholdConfig::default(),
            &GroupRegistry::new(),
            DisplayContext::Standard,
            as_of,
        );

        assert_eq!(report.entities.len(), 12);
        assert_eq!(report.summary.unit_count, 12);
        let grouped: usize = report
            .groups
            .values()
            .flatten()
            .map(|rollup| rollup.stats.unit_count)
            .sum();
        assert_eq!(grouped, 12);

        for entity in &report.entities {
            assert_eq!(entity.reason_text.len(), entity.classification.reasons.len());
        }
    }

    #[test]
    fn test_by_severity_puts_high_first() {
        let as_of = reference_time();
        let fleet = vec![
            EntityBuilder::healthy("low", as_of).build(),
            EntityBuilder::healthy("high", as_of)
                .primary(|t| t.breakfix = Some(1))
                .build(),
            EntityBuilder::healthy("med", as_of)
                .primary(|t| t.vph = Some(3.0))
                .build(),
        ];
        let report = FleetReport::build(
            &fleet,
            &ThresholdConfig::default(),
            &GroupRegistry::new(),
            DisplayContext::Standard,
            as_of,
        );

        let ids: Vec<&str> = report
            .by_severity()
            .iter()
            .map(|r| r.entity.id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "med", "low"]);
    }
}
