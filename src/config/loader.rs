use std::fs;
use std::path::{Path, PathBuf};

use super::core::FleetRiskConfig;
use super::thresholds::{toggle_enabled, ThresholdConfig};
use crate::display::{DisplayContext, MetricFamily, Polarity};
use crate::errors::Error;

pub const CONFIG_FILE_NAME: &str = ".fleetrisk.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse `.fleetrisk.toml` contents.
pub fn parse_config(contents: &str) -> Result<FleetRiskConfig, String> {
    let config = toml::from_str::<FleetRiskConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    for warning in threshold_warnings(&config.resolved_thresholds()) {
        log::warn!("{}", warning);
    }

    Ok(config)
}

/// Settings that parse but probably do not mean what the author intended.
pub fn threshold_warnings(thresholds: &ThresholdConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for context in [DisplayContext::Standard, DisplayContext::Headquarters] {
        for family in MetricFamily::ALL {
            let band = thresholds.color_band(family, context);
            let inverted = match band.polarity {
                Polarity::HigherIsBetter => band.green < band.red,
                Polarity::LowerIsBetter => band.green > band.red,
            };
            if inverted {
                warnings.push(format!(
                    "Color band for {:?} ({:?}) has green {} on the wrong side of red {}",
                    family, context, band.green, band.red
                ));
            }
        }
    }

    let toggles = [
        ("low_true_policy_enabled", thresholds.low_true_policy_enabled),
        ("low_raw_policy_enabled", thresholds.low_raw_policy_enabled),
        ("low_scan_age_enabled", thresholds.low_scan_age_enabled),
        ("low_tam_past_due_enabled", thresholds.low_tam_past_due_enabled),
    ];
    for (name, value) in toggles {
        if value != 0.0 && !toggle_enabled(value) {
            warnings.push(format!(
                "{} = {} leaves the requirement off; only 1 enables it",
                name, value
            ));
        }
    }

    warnings
}

/// Load an explicitly named config file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<FleetRiskConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents).map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try one candidate location during discovery. Problems are logged and the
/// candidate is skipped.
fn try_load_config_from_path(config_path: &Path) -> Option<FleetRiskConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// `start` followed by its ancestors, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
pub fn discover_config(start: PathBuf) -> Option<FleetRiskConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

/// Discover a config file from the working directory, falling back to
/// defaults.
pub fn load_config() -> FleetRiskConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return FleetRiskConfig::default();
        }
    };

    discover_config(current).unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        FleetRiskConfig::default()
    })
}

/// An explicit path must load; otherwise fall back to discovery.
pub fn resolve_config(explicit: Option<&Path>) -> Result<FleetRiskConfig, Error> {
    match explicit {
        Some(path) => load_config_from(path),
        None => Ok(load_config()),
    }
}
