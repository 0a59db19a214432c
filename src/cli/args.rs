use crate::config::ThresholdConfig;
use crate::core::lenient::parse_timestamp;
use crate::display::DisplayContext;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThresholdPreset {
    /// Tighter MED/LOW limits with every optional LOW requirement on
    Strict,
    /// Built-in defaults
    Balanced,
    /// HIGH auto-escalation only for breakfix and missing telemetry
    Lenient,
}

impl ThresholdPreset {
    pub fn thresholds(self) -> ThresholdConfig {
        match self {
            ThresholdPreset::Strict => ThresholdConfig::strict(),
            ThresholdPreset::Balanced => ThresholdConfig::default(),
            ThresholdPreset::Lenient => ThresholdConfig::lenient(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fleetrisk")]
#[command(about = "Fleet telemetry risk classifier", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every unit in a fleet file and report tiers and rollups
    Classify {
        /// JSON file of entity records (`-` for stdin)
        input: PathBuf,

        /// Configuration file (defaults to a discovered .fleetrisk.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Group registry file (JSON or TOML), merged over config groups
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Output format (defaults to the config file, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reference time for scan ages (RFC 3339 or YYYY-MM-DD; defaults to now)
        #[arg(long = "as-of", value_parser = parse_as_of)]
        as_of: Option<DateTime<Utc>>,

        /// Display band set for metric cells
        #[arg(long, value_enum)]
        context: Option<ContextArg>,

        /// Threshold preset that config overrides apply on top of
        #[arg(long, value_enum)]
        preset: Option<ThresholdPreset>,

        /// Number of parallel jobs (0 = use all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Plain output: no colors, ASCII tables
        #[arg(long)]
        plain: bool,
    },

    /// Write a default .fleetrisk.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective thresholds as TOML
    Thresholds {
        /// Configuration file (defaults to a discovered .fleetrisk.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum)]
        preset: Option<ThresholdPreset>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    Standard,
    /// Headquarters bands
    #[value(alias = "headquarters")]
    Hq,
}

impl From<ContextArg> for DisplayContext {
    fn from(context: ContextArg) -> Self {
        match context {
            ContextArg::Standard => DisplayContext::Standard,
            ContextArg::Hq => DisplayContext::Headquarters,
        }
    }
}

fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw.trim())
        .ok_or_else(|| format!("'{raw}' is not an RFC 3339 timestamp or YYYY-MM-DD date"))
}
