use crate::config::{ThresholdConfig, CONFIG_FILE_NAME};
use crate::io;
use anyhow::{Context, Result};
use std::path::Path;

const HEADER: &str = "# fleetrisk configuration
#
# Thresholds below are the built-in defaults; delete any line to keep the
# default. HIGH upper-bound checks are switched off with 9999, compliance
# floors and optional MED predicates with 0. The *_enabled toggles turn an
# optional LOW requirement on only when set to exactly 1.
";

const FOOTER: &str = "
[output]
default_format = \"terminal\"
context = \"standard\"

# Group registry: one table per group key found in the input.
# [groups.alpha]
# name = \"Alpha Company\"
# short_code = \"ALPHA\"
# parent = \"North\"
";

/// Contents of a freshly initialized config file.
pub fn default_config_contents() -> Result<String> {
    let thresholds = toml::to_string(&ThresholdConfig::default())
        .context("Failed to render default thresholds")?;
    Ok(format!("{HEADER}\n[thresholds]\n{thresholds}{FOOTER}"))
}

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, &default_config_contents()?)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
