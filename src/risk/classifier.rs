//! Per-unit risk classification.
//!
//! Four stages run in a fixed order:
//!
//! 1. HIGH triggers. Any one fires HIGH; all of them are still evaluated so
//!    every applicable reason is collected.
//! 2. MED predicates (only when not HIGH). Each network instance counts
//!    separately; two or more make the unit MED.
//! 3. LOW validation (only when still LOW). Strict requirements: upper-bound
//!    readings must be strictly below their limit, compliance readings at or
//!    above. Any failure makes the unit MED, never HIGH.
//! 4. Exemption (only when HIGH). A unit that is HIGH solely for missing
//!    telemetry and carries a scan exemption is downgraded to MED.
//!
//! Readings that are absent or non-finite skip their check. For
//! single-network units every secondary-network check is skipped.

use super::reasons::{Comparison, ReasonKind, RiskReason, Stage};
use super::{Classification, RiskTier};
use crate::config::{sentinel_disabled, toggle_enabled, zero_disabled, ThresholdConfig};
use crate::core::{EntityRecord, NetworkTelemetry};
use chrono::{DateTime, Utc};

/// Number of satisfied MED predicates that makes a unit MED.
const MED_PREDICATE_QUORUM: usize = 2;

/// Classify one unit against `config`, measuring scan age up to `as_of`.
pub fn classify(
    entity: &EntityRecord,
    config: &ThresholdConfig,
    as_of: DateTime<Utc>,
) -> Classification {
    let (high, missing_telemetry) = high_triggers(entity, config, as_of);
    if !high.is_empty() {
        return apply_exemption(entity, missing_telemetry, high);
    }

    let med = med_predicates(entity, config, as_of);
    if med.len() >= MED_PREDICATE_QUORUM {
        return Classification {
            tier: RiskTier::Med,
            reasons: med,
        };
    }

    let failures = low_failures(entity, config, as_of);
    if failures.is_empty() {
        Classification::low()
    } else {
        Classification {
            tier: RiskTier::Med,
            reasons: failures,
        }
    }
}

/// Classify against the current wall-clock time.
pub fn classify_now(entity: &EntityRecord, config: &ThresholdConfig) -> Classification {
    classify(entity, config, Utc::now())
}

/// Single-network units need both exemption flags; dual-network units need
/// either one.
pub fn is_exemption_eligible(entity: &EntityRecord) -> bool {
    let primary = entity.primary.is_scan_exempt();
    let secondary = entity.secondary.is_scan_exempt();
    if entity.single_network_mode {
        primary && secondary
    } else {
        primary || secondary
    }
}

fn reading(telemetry: &NetworkTelemetry, metric: ReasonKind, as_of: DateTime<Utc>) -> Option<f64> {
    match metric {
        ReasonKind::Breakfix => telemetry.breakfix.map(|count| count as f64),
        ReasonKind::ProductCompliance => NetworkTelemetry::finite(telemetry.product_compliance),
        ReasonKind::TruePolicy => NetworkTelemetry::finite(telemetry.true_policy),
        ReasonKind::RawPolicy => NetworkTelemetry::finite(telemetry.raw_policy),
        ReasonKind::Vph => NetworkTelemetry::finite(telemetry.vph),
        ReasonKind::ScanAge => telemetry.scan_age_days(as_of),
        ReasonKind::NoTelemetry | ReasonKind::OverdueTickets | ReasonKind::ScanExempt => None,
    }
}

/// Collects the reasons produced by one stage.
struct StageChecks<'a> {
    entity: &'a EntityRecord,
    as_of: DateTime<Utc>,
    stage: Stage,
    reasons: Vec<RiskReason>,
}

impl<'a> StageChecks<'a> {
    fn new(entity: &'a EntityRecord, as_of: DateTime<Utc>, stage: Stage) -> Self {
        Self {
            entity,
            as_of,
            stage,
            reasons: Vec::new(),
        }
    }

    /// Check one metric on each applicable network, primary first.
    fn per_network(&mut self, metric: ReasonKind, comparison: Comparison, threshold: f64) {
        for &network in self.entity.applicable_networks() {
            let Some(observed) = reading(self.entity.network(network), metric, self.as_of) else {
                continue;
            };
            if comparison.holds(observed, threshold) {
                self.reasons.push(RiskReason::breach(
                    self.stage,
                    metric,
                    Some(network),
                    observed,
                    comparison,
                    threshold,
                ));
            }
        }
    }

    fn overdue_tickets(&mut self, comparison: Comparison, threshold: f64) {
        let Some(count) = self.entity.overdue_tickets else {
            return;
        };
        let observed = count as f64;
        if comparison.holds(observed, threshold) {
            self.reasons.push(RiskReason::breach(
                self.stage,
                ReasonKind::OverdueTickets,
                None,
                observed,
                comparison,
                threshold,
            ));
        }
    }

    fn push(&mut self, reason: RiskReason) {
        self.reasons.push(reason);
    }

    fn finish(self) -> Vec<RiskReason> {
        self.reasons
    }
}

/// Returns the HIGH reasons and whether the missing-telemetry trigger fired.
/// Presence is checked on the applicable networks only, so a single-network
/// unit needs primary presence and its secondary readings never count.
fn high_triggers(
    entity: &EntityRecord,
    config: &ThresholdConfig,
    as_of: DateTime<Utc>,
) -> (Vec<RiskReason>, bool) {
    let mut checks = StageChecks::new(entity, as_of, Stage::HighTrigger);

    checks.per_network(ReasonKind::Breakfix, Comparison::Above, 0.0);

    let missing_telemetry = !entity
        .applicable_networks()
        .iter()
        .any(|&network| entity.network(network).has_presence());
    if missing_telemetry {
        checks.push(RiskReason::no_telemetry());
    }

    if !zero_disabled(config.high_ess_compliance) {
        checks.per_network(
            ReasonKind::ProductCompliance,
            Comparison::Below,
            config.high_ess_compliance,
        );
    }
    if !sentinel_disabled(config.auto_high_ra_vph) {
        checks.per_network(ReasonKind::Vph, Comparison::Above, config.auto_high_ra_vph);
    }
    if !sentinel_disabled(config.auto_high_scan_age_days) {
        checks.per_network(
            ReasonKind::ScanAge,
            Comparison::Above,
            config.auto_high_scan_age_days,
        );
    }
    if !zero_disabled(config.high_true_policy_compliance) {
        checks.per_network(
            ReasonKind::TruePolicy,
            Comparison::Below,
            config.high_true_policy_compliance,
        );
    }
    if !zero_disabled(config.high_raw_policy_compliance) {
        checks.per_network(
            ReasonKind::RawPolicy,
            Comparison::Below,
            config.high_raw_policy_compliance,
        );
    }
    if !sentinel_disabled(config.high_tam_past_due) {
        checks.overdue_tickets(Comparison::Above, config.high_tam_past_due);
    }

    (checks.finish(), missing_telemetry)
}

fn med_predicates(
    entity: &EntityRecord,
    config: &ThresholdConfig,
    as_of: DateTime<Utc>,
) -> Vec<RiskReason> {
    let mut checks = StageChecks::new(entity, as_of, Stage::MedPredicate);

    checks.per_network(ReasonKind::Vph, Comparison::Above, config.med_ra_vph);
    checks.per_network(
        ReasonKind::ProductCompliance,
        Comparison::Below,
        config.med_ess_compliance,
    );
    if !zero_disabled(config.med_true_policy_compliance) {
        checks.per_network(
            ReasonKind::TruePolicy,
            Comparison::Below,
            config.med_true_policy_compliance,
        );
    }
    if !zero_disabled(config.med_raw_policy_compliance) {
        checks.per_network(
            ReasonKind::RawPolicy,
            Comparison::Below,
            config.med_raw_policy_compliance,
        );
    }
    checks.per_network(ReasonKind::ScanAge, Comparison::Above, config.med_scan_age_days);
    checks.overdue_tickets(Comparison::Above, config.med_tam_past_due);

    checks.finish()
}

fn low_failures(
    entity: &EntityRecord,
    config: &ThresholdConfig,
    as_of: DateTime<Utc>,
) -> Vec<RiskReason> {
    let mut checks = StageChecks::new(entity, as_of, Stage::LowRequirement);

    checks.per_network(ReasonKind::Vph, Comparison::AtOrAbove, config.low_vph);
    checks.per_network(
        ReasonKind::ProductCompliance,
        Comparison::Below,
        config.low_product_compliance,
    );
    if toggle_enabled(config.low_true_policy_enabled) {
        checks.per_network(
            ReasonKind::TruePolicy,
            Comparison::Below,
            config.low_true_policy_compliance,
        );
    }
    if toggle_enabled(config.low_raw_policy_enabled) {
        checks.per_network(
            ReasonKind::RawPolicy,
            Comparison::Below,
            config.low_raw_policy_compliance,
        );
    }
    if toggle_enabled(config.low_scan_age_enabled) {
        checks.per_network(
            ReasonKind::ScanAge,
            Comparison::AtOrAbove,
            config.low_scan_age_days,
        );
    }
    if toggle_enabled(config.low_tam_past_due_enabled) {
        checks.overdue_tickets(Comparison::AtOrAbove, config.low_tam_past_due);
    }

    checks.finish()
}

fn apply_exemption(
    entity: &EntityRecord,
    missing_telemetry: bool,
    mut reasons: Vec<RiskReason>,
) -> Classification {
    let only_missing_telemetry =
        missing_telemetry && reasons.iter().all(RiskReason::is_missing_telemetry);

    if only_missing_telemetry && is_exemption_eligible(entity) {
        reasons.push(RiskReason::scan_exempt());
        return Classification {
            tier: RiskTier::Med,
            reasons,
        };
    }

    Classification {
        tier: RiskTier::High,
        reasons,
    }
}
