use super::{numeric_tier, recency_tier, DisplayTier, Polarity};
use crate::config::ThresholdConfig;
use crate::core::{EntityRecord, Network, NetworkTelemetry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric families that carry their own color band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    Vph,
    ProductCompliance,
    TruePolicy,
    RawPolicy,
    ScanAge,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 5] = [
        MetricFamily::Vph,
        MetricFamily::ProductCompliance,
        MetricFamily::TruePolicy,
        MetricFamily::RawPolicy,
        MetricFamily::ScanAge,
    ];

    pub fn polarity(&self) -> Polarity {
        match self {
            MetricFamily::Vph | MetricFamily::ScanAge => Polarity::LowerIsBetter,
            MetricFamily::ProductCompliance
            | MetricFamily::TruePolicy
            | MetricFamily::RawPolicy => Polarity::HigherIsBetter,
        }
    }
}

/// Which parallel set of color thresholds applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayContext {
    #[default]
    Standard,
    /// The `hq_color_*` set
    Headquarters,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    pub green: f64,
    pub red: f64,
    pub polarity: Polarity,
}

impl ColorBand {
    pub fn tier(&self, value: Option<f64>) -> Option<DisplayTier> {
        numeric_tier(value, self.green, self.red, self.polarity)
    }
}

/// Display bands for the metric cells of one network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDisplayTiers {
    pub vph: Option<DisplayTier>,
    pub product_compliance: Option<DisplayTier>,
    pub true_policy: Option<DisplayTier>,
    pub raw_policy: Option<DisplayTier>,
    pub scan_recency: DisplayTier,
}

impl NetworkDisplayTiers {
    pub fn for_network(
        telemetry: &NetworkTelemetry,
        config: &ThresholdConfig,
        context: DisplayContext,
        as_of: DateTime<Utc>,
    ) -> Self {
        let band = |family| config.color_band(family, context);
        let scan_band = band(MetricFamily::ScanAge);

        Self {
            vph: band(MetricFamily::Vph).tier(telemetry.vph),
            product_compliance: band(MetricFamily::ProductCompliance)
                .tier(telemetry.product_compliance),
            true_policy: band(MetricFamily::TruePolicy).tier(telemetry.true_policy),
            raw_policy: band(MetricFamily::RawPolicy).tier(telemetry.raw_policy),
            scan_recency: recency_tier(telemetry.last_scan, as_of, scan_band.green, scan_band.red),
        }
    }
}

/// Display bands for every cell of one entity. The secondary network is
/// omitted for single-network units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDisplayTiers {
    pub primary: NetworkDisplayTiers,
    pub secondary: Option<NetworkDisplayTiers>,
}

impl EntityDisplayTiers {
    pub fn for_entity(
        entity: &EntityRecord,
        config: &ThresholdConfig,
        context: DisplayContext,
        as_of: DateTime<Utc>,
    ) -> Self {
        let tiers_for = |network: Network| {
            NetworkDisplayTiers::for_network(entity.network(network), config, context, as_of)
        };

        Self {
            primary: tiers_for(Network::Primary),
            secondary: (!entity.is_excluded(Network::Secondary))
                .then(|| tiers_for(Network::Secondary)),
        }
    }

    pub fn network(&self, network: Network) -> Option<&NetworkDisplayTiers> {
        match network {
            Network::Primary => Some(&self.primary),
            Network::Secondary => self.secondary.as_ref(),
        }
    }
}
