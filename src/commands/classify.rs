use crate::config::{resolve_config, ThresholdConfig};
use crate::display::DisplayContext;
use crate::formatting::{ColorMode, FormattingConfig};
use crate::io::output::{create_writer, OutputFormat};
use crate::io::{load_entities, load_registry};
use crate::report::FleetReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Everything the `classify` command needs, after CLI parsing.
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub registry: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub as_of: Option<DateTime<Utc>>,
    pub context: Option<DisplayContext>,
    /// Defaults that config-file overrides are applied on top of
    pub base_thresholds: ThresholdConfig,
    pub plain: bool,
}

impl ClassifyConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            config: None,
            registry: None,
            format: None,
            output: None,
            as_of: None,
            context: None,
            base_thresholds: ThresholdConfig::default(),
            plain: false,
        }
    }
}

pub fn classify_fleet_file(config: ClassifyConfig) -> Result<()> {
    let settings = resolve_config(config.config.as_deref()).context("Failed to load configuration")?;
    let thresholds = settings.resolved_thresholds_from(&config.base_thresholds);
    let output_settings = settings.output();

    let mut registry = settings.registry();
    if let Some(path) = &config.registry {
        registry.merge(load_registry(path)?);
    }

    let entities = load_entities(&config.input)
        .with_context(|| format!("Failed to load entities from {}", config.input.display()))?;

    let as_of = config.as_of.unwrap_or_else(Utc::now);
    let format = config
        .format
        .or(output_settings.default_format)
        .unwrap_or_default();
    let context = config
        .context
        .or(output_settings.context)
        .unwrap_or_default();

    let formatting = if config.plain {
        FormattingConfig::plain()
    } else if config.output.is_some() {
        // Files never get escape codes
        FormattingConfig {
            color: ColorMode::Never,
            ..FormattingConfig::from_env()
        }
    } else {
        FormattingConfig::from_env().with_config_color(output_settings.use_color)
    };
    formatting.apply();

    let report = FleetReport::build(&entities, &thresholds, &registry, context, as_of);
    tracing::info!(
        units = report.summary.unit_count,
        high = report.summary.tiers.high,
        med = report.summary.tiers.med,
        low = report.summary.tiers.low,
        "classification complete"
    );

    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            create_writer(format, &mut writer, formatting).write_report(&report)?;
            writer.flush()?;
            log::debug!("Wrote report to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            create_writer(format, &mut handle, formatting).write_report(&report)?;
            handle.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{entities_json, reference_time, sample_fleet};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_classify_writes_json_report_to_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("fleet.json");
        let output = temp.path().join("report.json");
        fs::write(&input, entities_json(&sample_fleet(6, reference_time()))).unwrap();
        let config_path = temp.path().join("settings.toml");
        fs::write(&config_path, "").unwrap();

        let mut config = ClassifyConfig::new(&input);
        config.config = Some(config_path);
        config.format = Some(OutputFormat::Json);
        config.output = Some(output.clone());
        config.as_of = Some(reference_time());

        classify_fleet_file(config).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["summary"]["unit_count"], 6);
        assert_eq!(json["entities"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_classify_missing_input_fails() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("settings.toml");
        fs::write(&config_path, "").unwrap();

        let mut config = ClassifyConfig::new(temp.path().join("absent.json"));
        config.config = Some(config_path);
        let err = classify_fleet_file(config).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
