use crate::display::{ColorBand, DisplayContext, MetricFamily};
use serde::{Deserialize, Serialize};

/// Value of a HIGH auto-escalation threshold that switches the check off.
pub const DISABLED_SENTINEL: f64 = 9999.0;

/// A toggle knob is on only when it holds exactly `1`.
pub fn toggle_enabled(value: f64) -> bool {
    value == 1.0
}

/// HIGH upper-bound checks (VPH, scan age, tickets) are off at the sentinel.
pub fn sentinel_disabled(threshold: f64) -> bool {
    threshold == DISABLED_SENTINEL
}

/// Lower-bound compliance checks and optional MED predicates are off at `0`.
pub fn zero_disabled(threshold: f64) -> bool {
    threshold == 0.0
}

/// Declares the closed threshold schema once and derives both the resolved
/// form and the partially specified override form from it.
macro_rules! threshold_schema {
    ($(
        $(#[doc = $doc:literal])*
        $name:ident $(| $alias:literal)* = $default:expr;
    )*) => {
        /// Fully resolved thresholds for risk tiering and display coloring.
        ///
        /// `ThresholdConfig::default()` is the complete default set. Callers
        /// pass a resolved value to every operation explicitly; there is no
        /// ambient fallback.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(from = "ThresholdOverrides")]
        pub struct ThresholdConfig {
            $(
                $(#[doc = $doc])*
                pub $name: f64,
            )*
        }

        impl Default for ThresholdConfig {
            fn default() -> Self {
                Self {
                    $( $name: $default, )*
                }
            }
        }

        /// Partially specified thresholds as they come out of a settings
        /// file. Missing, wrong-typed and non-finite entries are `None`.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct ThresholdOverrides {
            $(
                #[serde(
                    deserialize_with = "crate::core::lenient::number",
                    skip_serializing_if = "Option::is_none"
                )]
                $( #[serde(alias = $alias)] )*
                pub $name: Option<f64>,
            )*
        }

        impl ThresholdOverrides {
            /// Fill every unspecified knob from `defaults`.
            pub fn resolve(&self, defaults: &ThresholdConfig) -> ThresholdConfig {
                ThresholdConfig {
                    $(
                        $name: self
                            .$name
                            .filter(|value| value.is_finite())
                            .unwrap_or(defaults.$name),
                    )*
                }
            }

            pub fn is_empty(&self) -> bool {
                true $( && self.$name.is_none() )*
            }
        }
    };
}

threshold_schema! {
    // === HIGH auto-escalation ===
    /// VPH above this escalates to HIGH (9999 disables)
    auto_high_ra_vph = 10.0;
    /// Days since last scan above this escalates to HIGH (9999 disables)
    auto_high_scan_age_days = 30.0;
    /// Product compliance below this escalates to HIGH (0 disables)
    high_ess_compliance | "high_product_compliance" = 50.0;
    /// True policy compliance below this escalates to HIGH (0 disables)
    high_true_policy_compliance = 0.0;
    /// Raw policy compliance below this escalates to HIGH (0 disables)
    high_raw_policy_compliance = 0.0;
    /// Overdue tickets above this escalates to HIGH (9999 disables)
    high_tam_past_due = 10.0;

    // === MED counted predicates ===
    med_ra_vph = 3.5;
    med_ess_compliance | "med_product_compliance" = 85.0;
    /// 0 disables
    med_true_policy_compliance = 80.0;
    /// 0 disables
    med_raw_policy_compliance = 0.0;
    med_scan_age_days = 14.0;
    med_tam_past_due = 3.0;

    // === LOW strict requirements ===
    /// VPH must be strictly below this
    low_vph = 2.5;
    /// Product compliance must be at least this
    low_product_compliance | "low_ess_compliance" = 95.0;
    low_true_policy_compliance = 90.0;
    low_true_policy_enabled = 0.0;
    low_raw_policy_compliance = 90.0;
    low_raw_policy_enabled = 0.0;
    low_scan_age_days = 7.0;
    low_scan_age_enabled = 0.0;
    low_tam_past_due = 1.0;
    low_tam_past_due_enabled = 0.0;

    // === Display colors, standard context ===
    color_vph_green = 2.5;
    color_vph_red = 3.5;
    color_product_compliance_green = 95.0;
    color_product_compliance_red = 85.0;
    color_true_policy_green = 90.0;
    color_true_policy_red = 80.0;
    color_raw_policy_green = 90.0;
    color_raw_policy_red = 80.0;
    color_scan_age_green = 7.0;
    color_scan_age_red = 14.0;

    // === Display colors, headquarters context ===
    hq_color_vph_green = 2.0;
    hq_color_vph_red = 3.0;
    hq_color_product_compliance_green = 97.0;
    hq_color_product_compliance_red = 90.0;
    hq_color_true_policy_green = 95.0;
    hq_color_true_policy_red = 85.0;
    hq_color_raw_policy_green = 95.0;
    hq_color_raw_policy_red = 85.0;
    hq_color_scan_age_green = 3.0;
    hq_color_scan_age_red = 7.0;
}

impl From<ThresholdOverrides> for ThresholdConfig {
    fn from(overrides: ThresholdOverrides) -> Self {
        overrides.resolve(&ThresholdConfig::default())
    }
}

impl ThresholdConfig {
    /// Green/red boundaries for one metric family in one display context.
    pub fn color_band(&self, family: MetricFamily, context: DisplayContext) -> ColorBand {
        let (green, red) = match (context, family) {
            (DisplayContext::Standard, MetricFamily::Vph) => {
                (self.color_vph_green, self.color_vph_red)
            }
            (DisplayContext::Standard, MetricFamily::ProductCompliance) => (
                self.color_product_compliance_green,
                self.color_product_compliance_red,
            ),
            (DisplayContext::Standard, MetricFamily::TruePolicy) => {
                (self.color_true_policy_green, self.color_true_policy_red)
            }
            (DisplayContext::Standard, MetricFamily::RawPolicy) => {
                (self.color_raw_policy_green, self.color_raw_policy_red)
            }
            (DisplayContext::Standard, MetricFamily::ScanAge) => {
                (self.color_scan_age_green, self.color_scan_age_red)
            }
            (DisplayContext::Headquarters, MetricFamily::Vph) => {
                (self.hq_color_vph_green, self.hq_color_vph_red)
            }
            (DisplayContext::Headquarters, MetricFamily::ProductCompliance) => (
                self.hq_color_product_compliance_green,
                self.hq_color_product_compliance_red,
            ),
            (DisplayContext::Headquarters, MetricFamily::TruePolicy) => {
                (self.hq_color_true_policy_green, self.hq_color_true_policy_red)
            }
            (DisplayContext::Headquarters, MetricFamily::RawPolicy) => {
                (self.hq_color_raw_policy_green, self.hq_color_raw_policy_red)
            }
            (DisplayContext::Headquarters, MetricFamily::ScanAge) => {
                (self.hq_color_scan_age_green, self.hq_color_scan_age_red)
            }
        };

        ColorBand {
            green,
            red,
            polarity: family.polarity(),
        }
    }

    /// Strict preset: tighter MED and LOW limits and every optional LOW
    /// requirement switched on.
    pub fn strict() -> Self {
        Self {
            med_ra_vph: 3.0,
            med_ess_compliance: 90.0,
            low_vph: 2.0,
            low_product_compliance: 97.0,
            low_true_policy_enabled: 1.0,
            low_raw_policy_enabled: 1.0,
            low_scan_age_enabled: 1.0,
            low_tam_past_due_enabled: 1.0,
            ..Default::default()
        }
    }

    /// Lenient preset: HIGH auto-escalation limited to breakfix and
    /// missing telemetry.
    pub fn lenient() -> Self {
        Self {
            auto_high_ra_vph: DISABLED_SENTINEL,
            auto_high_scan_age_days: DISABLED_SENTINEL,
            high_ess_compliance: 0.0,
            high_tam_past_due: DISABLED_SENTINEL,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Polarity;
    use indoc::indoc;

    #[test]
    fn test_toggle_requires_exactly_one() {
        assert!(toggle_enabled(1.0));
        assert!(!toggle_enabled(0.0));
        assert!(!toggle_enabled(2.0));
        assert!(!toggle_enabled(0.999));
        assert!(!toggle_enabled(f64::NAN));
    }

    #[test]
    fn test_sentinels() {
        assert!(sentinel_disabled(DISABLED_SENTINEL));
        assert!(!sentinel_disabled(10.0));
        assert!(zero_disabled(0.0));
        assert!(!zero_disabled(50.0));
    }

    #[test]
    fn test_all_defaults_are_finite() {
        let json = serde_json::to_value(ThresholdConfig::default()).unwrap();
        let map = json.as_object().unwrap();
        assert!(map.len() > 40);
        for (key, value) in map {
            let number = value.as_f64().unwrap_or(f64::NAN);
            assert!(number.is_finite(), "{key} is not finite");
        }
    }

    #[test]
    fn test_empty_overrides_resolve_to_defaults() {
        let overrides = ThresholdOverrides::default();
        assert!(overrides.is_empty());
        assert_eq!(
            overrides.resolve(&ThresholdConfig::default()),
            ThresholdConfig::default()
        );
    }

    #[test]
    fn test_partial_overrides_from_toml() {
        let toml_content = indoc! {r#"
            med_ra_vph = 4
            low_true_policy_enabled = 1
            high_product_compliance = 40.0
            low_vph = "two"
            low_scan_age_days = nan
        "#};
        let overrides: ThresholdOverrides = toml::from_str(toml_content).unwrap();
        let resolved = overrides.resolve(&ThresholdConfig::default());

        assert_eq!(resolved.med_ra_vph, 4.0);
        assert!(toggle_enabled(resolved.low_true_policy_enabled));
        assert_eq!(resolved.high_ess_compliance, 40.0);
        assert_eq!(resolved.low_vph, 2.5);
        assert_eq!(resolved.low_scan_age_days, 7.0);
    }

    #[test]
    fn test_overrides_resolve_against_caller_defaults() {
        let defaults = ThresholdConfig::strict();
        let overrides = ThresholdOverrides {
            low_vph: Some(1.5),
            ..Default::default()
        };
        let resolved = overrides.resolve(&defaults);
        assert_eq!(resolved.low_vph, 1.5);
        assert_eq!(resolved.med_ess_compliance, 90.0);
    }

    #[test]
    fn test_non_numeric_toggle_is_disabled() {
        let overrides: ThresholdOverrides =
            serde_json::from_str(r#"{"low_raw_policy_enabled": true}"#).unwrap();
        let resolved = overrides.resolve(&ThresholdConfig::default());
        assert!(!toggle_enabled(resolved.low_raw_policy_enabled));
    }

    #[test]
    fn test_threshold_config_deserializes_through_overrides() {
        let config: ThresholdConfig = serde_json::from_str(r#"{"low_vph": 3}"#).unwrap();
        assert_eq!(config.low_vph, 3.0);
        assert_eq!(config.med_ra_vph, 3.5);
    }

    #[test]
    fn test_color_band_selects_context() {
        let config = ThresholdConfig::default();

        let standard = config.color_band(MetricFamily::Vph, DisplayContext::Standard);
        assert_eq!(standard.green, 2.5);
        assert_eq!(standard.red, 3.5);
        assert_eq!(standard.polarity, Polarity::LowerIsBetter);

        let hq = config.color_band(MetricFamily::ProductCompliance, DisplayContext::Headquarters);
        assert_eq!(hq.green, 97.0);
        assert_eq!(hq.red, 90.0);
        assert_eq!(hq.polarity, Polarity::HigherIsBetter);
    }
}
