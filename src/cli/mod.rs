//! CLI module for fleetrisk
//!
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{Cli, Commands, ContextArg, OutputFormat, ThresholdPreset};
pub use setup::{configure_thread_pool, get_worker_count, init_logging, LOG_ENV};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    use clap::Parser;
    Cli::parse()
}
