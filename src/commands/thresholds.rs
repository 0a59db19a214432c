use crate::config::{resolve_config, ThresholdConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Resolved thresholds as a `[thresholds]` TOML table.
pub fn render_thresholds(thresholds: &ThresholdConfig) -> Result<String> {
    let body = toml::to_string(thresholds).context("Failed to render thresholds")?;
    Ok(format!("[thresholds]\n{body}"))
}

pub fn show_thresholds(config: Option<&Path>, base: &ThresholdConfig) -> Result<()> {
    let settings = resolve_config(config).context("Failed to load configuration")?;
    let thresholds = settings.resolved_thresholds_from(base);
    print!("{}", render_thresholds(&thresholds)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_thresholds_lists_every_key() {
        let rendered = render_thresholds(&ThresholdConfig::default()).unwrap();
        assert!(rendered.starts_with("[thresholds]\n"));
        assert!(rendered.contains("auto_high_ra_vph = 10.0"));
        assert!(rendered.contains("hq_color_scan_age_red = 7.0"));

        let parsed: toml::Table = toml::from_str(&rendered).unwrap();
        let table = parsed["thresholds"].as_table().unwrap();
        let json = serde_json::to_value(ThresholdConfig::default()).unwrap();
        assert_eq!(table.len(), json.as_object().unwrap().len());
    }
}
