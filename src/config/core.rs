use super::thresholds::{ThresholdConfig, ThresholdOverrides};
use crate::aggregation::GroupRegistry;
use crate::display::DisplayContext;
use crate::io::output::OutputFormat;
use serde::{Deserialize, Serialize};

/// Root of `.fleetrisk.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetRiskConfig {
    /// Threshold overrides, resolved against the built-in defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdOverrides>,

    /// Group key to descriptor mapping (`[groups.<key>]`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<GroupRegistry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: Option<OutputFormat>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
    /// Color band set used for metric cells
    #[serde(default)]
    pub context: Option<DisplayContext>,
}

impl FleetRiskConfig {
    /// Thresholds with every override applied on top of the defaults.
    pub fn resolved_thresholds(&self) -> ThresholdConfig {
        self.resolved_thresholds_from(&ThresholdConfig::default())
    }

    /// Thresholds with every override applied on top of `defaults`, such as
    /// a preset chosen on the command line.
    pub fn resolved_thresholds_from(&self, defaults: &ThresholdConfig) -> ThresholdConfig {
        match &self.thresholds {
            Some(overrides) => overrides.resolve(defaults),
            None => defaults.clone(),
        }
    }

    pub fn registry(&self) -> GroupRegistry {
        self.groups.clone().unwrap_or_default()
    }

    pub fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }
}
