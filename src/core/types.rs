use super::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two telemetry networks a unit can report through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Primary,
    Secondary,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Primary, Network::Secondary];

    pub fn label(&self) -> &'static str {
        match self {
            Network::Primary => "primary",
            Network::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Telemetry a unit reports through one network.
///
/// Every field is optional: `None` means the source did not report a value,
/// which is never the same thing as a reported zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkTelemetry {
    /// Assets currently in an unremediated failure state
    #[serde(deserialize_with = "lenient::count")]
    pub breakfix: Option<u64>,

    /// Product compliance percentage (higher is better)
    #[serde(deserialize_with = "lenient::number", alias = "ess_compliance")]
    pub product_compliance: Option<f64>,

    /// Policy enforcement percentage (higher is better)
    #[serde(deserialize_with = "lenient::number", alias = "true_policy_compliance")]
    pub true_policy: Option<f64>,

    /// Raw policy enforcement percentage (higher is better)
    #[serde(deserialize_with = "lenient::number", alias = "raw_policy_compliance")]
    pub raw_policy: Option<f64>,

    /// Vulnerabilities per host (lower is better)
    #[serde(deserialize_with = "lenient::number", alias = "ra_vph")]
    pub vph: Option<f64>,

    #[serde(deserialize_with = "lenient::timestamp")]
    pub last_scan: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "lenient::optional_flag")]
    pub scan_exempt: Option<bool>,

    /// Asset count; only used to detect whether the network reports at all
    #[serde(deserialize_with = "lenient::count")]
    pub asset_count: Option<u64>,
}

impl NetworkTelemetry {
    /// Whether any scan or asset signal exists for this network, regardless
    /// of what the signals say.
    pub fn has_presence(&self) -> bool {
        self.asset_count.is_some_and(|count| count > 0) || self.last_scan.is_some()
    }

    /// Whole days elapsed between the last scan and `as_of`, clamped at zero.
    pub fn scan_age_days(&self, as_of: DateTime<Utc>) -> Option<f64> {
        self.last_scan
            .map(|scanned| (as_of - scanned).num_days().max(0) as f64)
    }

    pub fn is_scan_exempt(&self) -> bool {
        self.scan_exempt == Some(true)
    }

    /// Finite reading of a floating-point field.
    pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
        value.and_then(lenient::finite)
    }
}

/// One fleet unit as supplied by the ingestion layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRecord {
    #[serde(deserialize_with = "lenient::or_default")]
    pub id: String,

    /// Organizational group key; resolved against the group registry
    #[serde(deserialize_with = "lenient::text", alias = "group_key")]
    pub group: Option<String>,

    /// The unit reports only through the primary network; secondary-network
    /// readings are ignored for risk and rollup purposes.
    #[serde(deserialize_with = "lenient::flag")]
    pub single_network_mode: bool,

    #[serde(deserialize_with = "lenient::or_default")]
    pub primary: NetworkTelemetry,

    #[serde(deserialize_with = "lenient::or_default")]
    pub secondary: NetworkTelemetry,

    #[serde(deserialize_with = "lenient::count", alias = "tam_past_due")]
    pub overdue_tickets: Option<u64>,
}

const DUAL_NETWORK: &[Network] = &[Network::Primary, Network::Secondary];
const SINGLE_NETWORK: &[Network] = &[Network::Primary];

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn network(&self, network: Network) -> &NetworkTelemetry {
        match network {
            Network::Primary => &self.primary,
            Network::Secondary => &self.secondary,
        }
    }

    pub fn network_mut(&mut self, network: Network) -> &mut NetworkTelemetry {
        match network {
            Network::Primary => &mut self.primary,
            Network::Secondary => &mut self.secondary,
        }
    }

    /// Networks whose readings take part in risk checks and rollups.
    pub fn applicable_networks(&self) -> &'static [Network] {
        if self.single_network_mode {
            SINGLE_NETWORK
        } else {
            DUAL_NETWORK
        }
    }

    pub fn is_excluded(&self, network: Network) -> bool {
        !self.applicable_networks().contains(&network)
    }

    /// Group key with surrounding whitespace removed; blank keys count as
    /// missing.
    pub fn group_key(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use indoc::indoc;

    #[test]
    fn test_entity_deserializes_full_record() {
        let json = indoc! {r#"
            {
                "id": "unit-7",
                "group": "G1",
                "single_network_mode": false,
                "primary": {
                    "breakfix": 0,
                    "product_compliance": 97.5,
                    "true_policy": 91,
                    "vph": 1.2,
                    "last_scan": "2024-05-30T00:00:00Z",
                    "asset_count": 42
                },
                "secondary": { "scan_exempt": true },
                "overdue_tickets": 1
            }
        "#};
        let entity: EntityRecord = serde_json::from_str(json).unwrap();

        assert_eq!(entity.id, "unit-7");
        assert_eq!(entity.group.as_deref(), Some("G1"));
        assert_eq!(entity.primary.breakfix, Some(0));
        assert_eq!(entity.primary.product_compliance, Some(97.5));
        assert_eq!(entity.primary.raw_policy, None);
        assert_eq!(entity.primary.asset_count, Some(42));
        assert_eq!(entity.secondary.scan_exempt, Some(true));
        assert_eq!(entity.overdue_tickets, Some(1));
    }

    #[test]
    fn test_entity_survives_malformed_fields() {
        let json = r#"{
            "id": 12,
            "group": ["x"],
            "single_network_mode": "yes",
            "primary": "oops",
            "secondary": { "vph": "high", "breakfix": -3, "last_scan": "soon" },
            "overdue_tickets": null
        }"#;
        let entity: EntityRecord = serde_json::from_str(json).unwrap();

        assert_eq!(entity.id, "");
        assert_eq!(entity.group, None);
        assert!(!entity.single_network_mode);
        assert_eq!(entity.primary, NetworkTelemetry::default());
        assert_eq!(entity.secondary.vph, None);
        assert_eq!(entity.secondary.breakfix, None);
        assert_eq!(entity.secondary.last_scan, None);
        assert_eq!(entity.overdue_tickets, None);
    }

    #[test]
    fn test_presence_requires_assets_or_scan() {
        let mut telemetry = NetworkTelemetry::default();
        assert!(!telemetry.has_presence());

        telemetry.asset_count = Some(0);
        assert!(!telemetry.has_presence());

        telemetry.asset_count = Some(3);
        assert!(telemetry.has_presence());

        let scanned_only = NetworkTelemetry {
            last_scan: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(scanned_only.has_presence());
    }

    #[test]
    fn test_scan_age_days_floors_and_clamps() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let telemetry = NetworkTelemetry {
            last_scan: Some(Utc.with_ymd_and_hms(2024, 5, 29, 18, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(telemetry.scan_age_days(as_of), Some(2.0));

        let future = NetworkTelemetry {
            last_scan: Some(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert_eq!(future.scan_age_days(as_of), Some(0.0));
        assert_eq!(NetworkTelemetry::default().scan_age_days(as_of), None);
    }

    #[test]
    fn test_applicable_networks_honor_single_network_mode() {
        let mut entity = EntityRecord::new("u");
        assert_eq!(entity.applicable_networks(), &Network::ALL);
        assert!(!entity.is_excluded(Network::Secondary));

        entity.single_network_mode = true;
        assert_eq!(entity.applicable_networks(), &[Network::Primary]);
        assert!(entity.is_excluded(Network::Secondary));
    }
}
