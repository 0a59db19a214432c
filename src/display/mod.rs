//! Display tiers for metric cells.
//!
//! Maps a single metric reading onto a best/mid/worst band for visual
//! scanning. These bands are configured independently of the risk
//! thresholds and never feed back into risk classification.
//!
//! Boundary policy: a reading sitting exactly on a boundary lands in the
//! better band. This is deliberately looser than the strict LOW-stage risk
//! requirements, where a VPH equal to `low_vph` fails.

mod families;

pub use families::{
    ColorBand, DisplayContext, EntityDisplayTiers, MetricFamily, NetworkDisplayTiers,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayTier {
    Best,
    Mid,
    Worst,
}

impl DisplayTier {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayTier::Best => "best",
            DisplayTier::Mid => "mid",
            DisplayTier::Worst => "worst",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Compliance-style percentages
    HigherIsBetter,
    /// VPH, scan age
    LowerIsBetter,
}

/// Band a numeric reading. Absent or non-finite readings are unclassified.
pub fn numeric_tier(
    value: Option<f64>,
    green: f64,
    red: f64,
    polarity: Polarity,
) -> Option<DisplayTier> {
    let value = value.filter(|v| v.is_finite())?;

    let tier = match polarity {
        Polarity::HigherIsBetter => {
            if value >= green {
                DisplayTier::Best
            } else if value < red {
                DisplayTier::Worst
            } else {
                DisplayTier::Mid
            }
        }
        Polarity::LowerIsBetter => {
            if value <= green {
                DisplayTier::Best
            } else if value > red {
                DisplayTier::Worst
            } else {
                DisplayTier::Mid
            }
        }
    };

    Some(tier)
}

/// Band scan recency by age in whole days.
///
/// Unlike numeric readings, an unknown last-scan time is itself a risk
/// signal and lands in the worst band.
pub fn recency_tier(
    last_scan: Option<DateTime<Utc>>,
    as_of: DateTime<Utc>,
    green_days: f64,
    red_days: f64,
) -> DisplayTier {
    last_scan
        .map(|scanned| (as_of - scanned).num_days().max(0) as f64)
        .and_then(|age| numeric_tier(Some(age), green_days, red_days, Polarity::LowerIsBetter))
        .unwrap_or(DisplayTier::Worst)
}
