mod core;
mod loader;
mod thresholds;

pub use self::core::{FleetRiskConfig, OutputConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from, parse_config,
    resolve_config, threshold_warnings, CONFIG_FILE_NAME,
};
pub use thresholds::{
    sentinel_disabled, toggle_enabled, zero_disabled, ThresholdConfig, ThresholdOverrides,
    DISABLED_SENTINEL,
};
