//! Structured classification reasons.
//!
//! Reasons are recorded as data (which check, which network, observed value,
//! threshold) and only rendered to text at the presentation boundary.

use crate::core::Network;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The stage of the classifier that produced a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    HighTrigger,
    MedPredicate,
    LowRequirement,
    Exemption,
}

/// What a reason is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    Breakfix,
    NoTelemetry,
    ProductCompliance,
    TruePolicy,
    RawPolicy,
    Vph,
    ScanAge,
    OverdueTickets,
    ScanExempt,
}

impl ReasonKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReasonKind::Breakfix => "breakfix",
            ReasonKind::NoTelemetry => "telemetry",
            ReasonKind::ProductCompliance => "product compliance",
            ReasonKind::TruePolicy => "true policy compliance",
            ReasonKind::RawPolicy => "raw policy compliance",
            ReasonKind::Vph => "VPH",
            ReasonKind::ScanAge => "scan age (days)",
            ReasonKind::OverdueTickets => "overdue tickets",
            ReasonKind::ScanExempt => "scan exemption",
        }
    }
}

/// The comparison that held between the observed value and the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    Below,
    AtOrAbove,
}

impl Comparison {
    pub fn holds(&self, observed: f64, threshold: f64) -> bool {
        match self {
            Comparison::Above => observed > threshold,
            Comparison::Below => observed < threshold,
            Comparison::AtOrAbove => observed >= threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Above => ">",
            Comparison::Below => "<",
            Comparison::AtOrAbove => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReason {
    pub stage: Stage,
    pub metric: ReasonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

impl RiskReason {
    /// A reading that breached a threshold.
    pub fn breach(
        stage: Stage,
        metric: ReasonKind,
        network: Option<Network>,
        observed: f64,
        comparison: Comparison,
        threshold: f64,
    ) -> Self {
        Self {
            stage,
            metric,
            network,
            observed: Some(observed),
            threshold: Some(threshold),
            comparison: Some(comparison),
        }
    }

    pub fn no_telemetry() -> Self {
        Self {
            stage: Stage::HighTrigger,
            metric: ReasonKind::NoTelemetry,
            network: None,
            observed: None,
            threshold: None,
            comparison: None,
        }
    }

    pub fn scan_exempt() -> Self {
        Self {
            stage: Stage::Exemption,
            metric: ReasonKind::ScanExempt,
            network: None,
            observed: None,
            threshold: None,
            comparison: None,
        }
    }

    pub fn is_missing_telemetry(&self) -> bool {
        self.metric == ReasonKind::NoTelemetry
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

impl fmt::Display for RiskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.metric {
            ReasonKind::NoTelemetry => {
                return f.write_str("No telemetry reported on any required network");
            }
            ReasonKind::ScanExempt => {
                return f.write_str("Scan exempt: missing telemetry downgraded to MED");
            }
            _ => {}
        }

        let subject = match self.network {
            Some(network) => format!("{} {}", capitalize(network.label()), self.metric.label()),
            None => capitalize(self.metric.label()),
        };

        let (Some(observed), Some(threshold), Some(comparison)) =
            (self.observed, self.threshold, self.comparison)
        else {
            return f.write_str(&subject);
        };

        let observed = format_value(observed);
        let threshold = format_value(threshold);
        match self.stage {
            Stage::LowRequirement => {
                // Render the requirement that failed, not the breach.
                let required = match comparison {
                    Comparison::AtOrAbove => "<",
                    Comparison::Below => ">=",
                    Comparison::Above => "<=",
                };
                write!(
                    f,
                    "{subject} {observed} fails LOW requirement ({required} {threshold})"
                )
            }
            Stage::HighTrigger => write!(
                f,
                "{subject} {observed} {} {threshold} (HIGH)",
                comparison.symbol()
            ),
            Stage::MedPredicate => write!(
                f,
                "{subject} {observed} {} {threshold} (MED)",
                comparison.symbol()
            ),
            Stage::Exemption => f.write_str(&subject),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
