//! Factory functions and builders for test data.
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`EntityBuilder`] | Build entity records fluently |
//! | [`reference_time`] | Fixed evaluation instant |
//! | [`sample_fleet`] | Deterministic fleet covering every tier |
//! | [`entities_json`] | Serialize records as an input file would hold them |

use crate::core::{EntityRecord, Network, NetworkTelemetry};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// 2024-06-01T00:00:00Z.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Telemetry that passes every default LOW requirement.
fn healthy_telemetry(as_of: DateTime<Utc>) -> NetworkTelemetry {
    NetworkTelemetry {
        breakfix: Some(0),
        product_compliance: Some(99.0),
        true_policy: Some(99.0),
        raw_policy: Some(99.0),
        vph: Some(1.0),
        last_scan: Some(as_of - Duration::days(1)),
        scan_exempt: None,
        asset_count: Some(10),
    }
}

/// Fluent builder for [`EntityRecord`].
///
/// ```rust
/// use fleetrisk::testkit::{reference_time, EntityBuilder};
///
/// let entity = EntityBuilder::healthy("unit-1", reference_time())
///     .group("north")
///     .secondary(|t| t.vph = Some(4.0))
///     .overdue_tickets(2)
///     .build();
/// assert_eq!(entity.secondary.vph, Some(4.0));
/// ```
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    entity: EntityRecord,
}

impl EntityBuilder {
    /// Start from a record with no telemetry at all.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            entity: EntityRecord::new(id),
        }
    }

    /// Start from a record that classifies LOW under default thresholds at
    /// `as_of`: assets on both networks, a scan one day old and every
    /// reading well inside its LOW limit.
    pub fn healthy(id: impl Into<String>, as_of: DateTime<Utc>) -> Self {
        let mut builder = Self::new(id);
        for network in Network::ALL {
            *builder.entity.network_mut(network) = healthy_telemetry(as_of);
        }
        builder
    }

    pub fn group(mut self, key: impl Into<String>) -> Self {
        self.entity.group = Some(key.into());
        self
    }

    pub fn single_network(mut self) -> Self {
        self.entity.single_network_mode = true;
        self
    }

    pub fn primary(self, edit: impl FnOnce(&mut NetworkTelemetry)) -> Self {
        self.network(Network::Primary, edit)
    }

    pub fn secondary(self, edit: impl FnOnce(&mut NetworkTelemetry)) -> Self {
        self.network(Network::Secondary, edit)
    }

    pub fn network(mut self, network: Network, edit: impl FnOnce(&mut NetworkTelemetry)) -> Self {
        edit(self.entity.network_mut(network));
        self
    }

    pub fn overdue_tickets(mut self, count: u64) -> Self {
        self.entity.overdue_tickets = Some(count);
        self
    }

    pub fn build(self) -> EntityRecord {
        self.entity
    }
}

/// A deterministic fleet of `size` units cycling through healthy, MED, HIGH,
/// exempt and single-network shapes across four groups.
pub fn sample_fleet(size: usize, as_of: DateTime<Utc>) -> Vec<EntityRecord> {
    const GROUPS: [&str; 4] = ["alpha", "bravo", "charlie", "delta"];

    (0..size)
        .map(|i| {
            let builder = EntityBuilder::healthy(format!("unit-{i:05}"), as_of)
                .group(GROUPS[i % GROUPS.len()]);
            let builder = match i % 6 {
                0 => builder,
                1 => builder
                    .primary(|t| t.vph = Some(4.0))
                    .secondary(|t| t.vph = Some(3.75)),
                2 => builder.primary(|t| t.breakfix = Some((i % 5) as u64 + 1)),
                3 => EntityBuilder::new(format!("unit-{i:05}"))
                    .group(GROUPS[i % GROUPS.len()])
                    .primary(|t| t.scan_exempt = Some(true)),
                4 => builder
                    .single_network()
                    .secondary(|t| t.breakfix = Some(7)),
                _ => builder
                    .primary(|t| t.product_compliance = Some(92.0))
                    .overdue_tickets(1),
            };
            builder.build()
        })
        .collect()
}

/// JSON array form of `entities`, as the `classify` command reads it.
pub fn entities_json(entities: &[EntityRecord]) -> String {
    serde_json::to_string_pretty(entities).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThresholdConfig;
    use crate::risk::{classify, RiskTier};

    #[test]
    fn test_healthy_builder_classifies_low() {
        let as_of = reference_time();
        let entity = EntityBuilder::healthy("u", as_of).build();
        let result = classify(&entity, &ThresholdConfig::default(), as_of);
        assert_eq!(result.tier, RiskTier::Low);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_sample_fleet_covers_every_tier() {
        let as_of = reference_time();
        let fleet = sample_fleet(12, as_of);
        let tiers: Vec<RiskTier> = fleet
            .iter()
            .map(|e| classify(e, &ThresholdConfig::default(), as_of).tier)
            .collect();

        assert_eq!(fleet.len(), 12);
        for tier in RiskTier::ALL {
            assert!(tiers.contains(&tier), "missing {tier}");
        }
    }

    #[test]
    fn test_entities_json_round_trips_through_reader() {
        let fleet = sample_fleet(3, reference_time());
        let parsed: Vec<EntityRecord> = serde_json::from_str(&entities_json(&fleet)).unwrap();
        assert_eq!(parsed, fleet);
    }
}
