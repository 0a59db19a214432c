use anyhow::Result;
use clap::Parser;
use fleetrisk::cli::{configure_thread_pool, get_worker_count, init_logging, Cli, Commands};
use fleetrisk::commands::classify::ClassifyConfig;
use fleetrisk::config::ThresholdConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Classify {
            input,
            config,
            registry,
            format,
            output,
            as_of,
            context,
            preset,
            jobs,
            plain,
        } => {
            configure_thread_pool(jobs);
            tracing::debug!(workers = get_worker_count(jobs), "thread pool ready");

            let classify_config = ClassifyConfig {
                input,
                config,
                registry,
                format: format.map(Into::into),
                output,
                as_of,
                context: context.map(Into::into),
                base_thresholds: base_thresholds(preset),
                plain,
            };
            fleetrisk::commands::classify::classify_fleet_file(classify_config)
        }
        Commands::Init { force } => fleetrisk::commands::init::init_config(force),
        Commands::Thresholds { config, preset } => {
            fleetrisk::commands::thresholds::show_thresholds(
                config.as_deref(),
                &base_thresholds(preset),
            )
        }
    }
}

fn base_thresholds(preset: Option<fleetrisk::cli::ThresholdPreset>) -> ThresholdConfig {
    preset.map(|p| p.thresholds()).unwrap_or_default()
}
