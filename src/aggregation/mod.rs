//! Fleet rollups.
//!
//! Groups classified units by organizational key and reduces each partition
//! to counts, breakfix totals and compliance averages. Network exclusion
//! applies here the same way it does in classification: a single-network
//! unit contributes nothing from its secondary network.

mod registry;

pub use registry::{GroupDescriptor, GroupRegistry, UNKNOWN_GROUP};

use crate::core::{Network, NetworkTelemetry};
use crate::risk::{ClassifiedEntity, RiskTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compliance percentages never average above this.
pub const AVERAGE_CAP: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub med: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn get(&self, tier: RiskTier) -> usize {
        match tier {
            RiskTier::High => self.high,
            RiskTier::Med => self.med,
            RiskTier::Low => self.low,
        }
    }

    fn record(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::High => self.high += 1,
            RiskTier::Med => self.med += 1,
            RiskTier::Low => self.low += 1,
        }
    }
}

/// A value kept separately for each network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkPair<T> {
    pub primary: T,
    pub secondary: T,
}

impl<T> NetworkPair<T> {
    pub fn get(&self, network: Network) -> &T {
        match network {
            Network::Primary => &self.primary,
            Network::Secondary => &self.secondary,
        }
    }

    fn get_mut(&mut self, network: Network) -> &mut T {
        match network {
            Network::Primary => &mut self.primary,
            Network::Secondary => &mut self.secondary,
        }
    }

    fn map<U>(self, f: impl Fn(T) -> U) -> NetworkPair<U> {
        NetworkPair {
            primary: f(self.primary),
            secondary: f(self.secondary),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakfixTotals {
    pub primary: u64,
    pub secondary: u64,
    pub total: u64,
}

/// Mean compliance per network over units that reported a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAverages {
    pub product_compliance: NetworkPair<f64>,
    pub true_policy: NetworkPair<f64>,
    pub raw_policy: NetworkPair<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupStats {
    pub unit_count: usize,
    pub tiers: TierCounts,
    pub breakfix: BreakfixTotals,
    pub averages: ComplianceAverages,
}

/// Rollup of one organizational group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRollup {
    /// Raw group key, or `Unknown` for units without one
    pub key: String,
    pub group: GroupDescriptor,
    pub stats: RollupStats,
}

#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: Option<f64>) {
        if let Some(value) = NetworkTelemetry::finite(value) {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum / self.count as f64).min(AVERAGE_CAP)
        }
    }
}

#[derive(Debug, Default)]
struct RollupAccumulator {
    unit_count: usize,
    tiers: TierCounts,
    breakfix: NetworkPair<u64>,
    product_compliance: NetworkPair<MeanAccumulator>,
    true_policy: NetworkPair<MeanAccumulator>,
    raw_policy: NetworkPair<MeanAccumulator>,
}

impl RollupAccumulator {
    fn add(&mut self, item: &ClassifiedEntity) {
        self.unit_count += 1;
        self.tiers.record(item.tier());

        let entity = &item.entity;
        for &network in entity.applicable_networks() {
            let telemetry = entity.network(network);
            let breakfix = self.breakfix.get_mut(network);
            *breakfix = breakfix.saturating_add(telemetry.breakfix.unwrap_or(0));
            self.product_compliance
                .get_mut(network)
                .add(telemetry.product_compliance);
            self.true_policy.get_mut(network).add(telemetry.true_policy);
            self.raw_policy.get_mut(network).add(telemetry.raw_policy);
        }
    }

    fn finish(self) -> RollupStats {
        RollupStats {
            unit_count: self.unit_count,
            tiers: self.tiers,
            breakfix: BreakfixTotals {
                primary: self.breakfix.primary,
                secondary: self.breakfix.secondary,
                total: self.breakfix.primary.saturating_add(self.breakfix.secondary),
            },
            averages: ComplianceAverages {
                product_compliance: self.product_compliance.map(MeanAccumulator::mean),
                true_policy: self.true_policy.map(MeanAccumulator::mean),
                raw_policy: self.raw_policy.map(MeanAccumulator::mean),
            },
        }
    }
}

fn rollup<'a>(items: impl IntoIterator<Item = &'a ClassifiedEntity>) -> RollupStats {
    let mut acc = RollupAccumulator::default();
    for item in items {
        acc.add(item);
    }
    acc.finish()
}

/// Fleet-wide rollup, independent of grouping.
pub fn summarize(entities: &[ClassifiedEntity]) -> RollupStats {
    rollup(entities)
}

/// Partition `items` by a selected field. `None` lands in the `Unknown`
/// bucket. Input order is kept within each bucket.
pub fn group_by<'a, T, F>(items: &'a [T], selector: F) -> BTreeMap<String, Vec<&'a T>>
where
    F: Fn(&T) -> Option<String>,
{
    let mut buckets: BTreeMap<String, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        let key = selector(item).unwrap_or_else(|| UNKNOWN_GROUP.to_string());
        buckets.entry(key).or_default().push(item);
    }
    buckets
}

/// Roll up classified units by parent, then by group key.
///
/// Group keys are resolved through `registry`; keys it does not know get a
/// synthesized descriptor under the `Unknown` parent.
pub fn aggregate_by_group(
    entities: &[ClassifiedEntity],
    registry: &GroupRegistry,
) -> BTreeMap<String, Vec<GroupRollup>> {
    let span = tracing::debug_span!("aggregate_by_group", entities = entities.len());
    let _guard = span.enter();

    // Missing keys and a literal `Unknown` key share one bucket
    let mut partitions: BTreeMap<&str, Vec<&ClassifiedEntity>> = BTreeMap::new();
    for item in entities {
        partitions
            .entry(item.entity.group_key().unwrap_or(UNKNOWN_GROUP))
            .or_default()
            .push(item);
    }

    let mut by_parent: BTreeMap<String, Vec<GroupRollup>> = BTreeMap::new();
    for (key, members) in partitions {
        let group = registry.describe(Some(key));
        let stats = rollup(members);
        by_parent
            .entry(group.parent.clone())
            .or_default()
            .push(GroupRollup {
                key: key.to_string(),
                group,
                stats,
            });
    }

    tracing::debug!(parents = by_parent.len(), "aggregated groups");
    by_parent
}
