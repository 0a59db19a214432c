//! Runtime setup for the CLI: thread pool and logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "FLEETRISK_LOG";

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();

    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }

    if let Err(e) = builder.build_global() {
        // Already configured - this is fine, just ignore
        eprintln!("Note: Thread pool already configured: {}", e);
    }
}

/// Get the number of worker threads to use
pub fn get_worker_count(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}

/// Filter directive used when `FLEETRISK_LOG` is unset.
pub fn default_log_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("fleetrisk={level}")
}

/// Install the tracing subscriber. Records from the `log` macros are
/// forwarded through the same subscriber. Output goes to stderr so report
/// output on stdout stays machine-readable.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbosity)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if let Err(e) = result {
        eprintln!("Note: Logging already configured: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_count() {
        assert_eq!(get_worker_count(3), 3);
        assert!(get_worker_count(0) >= 1);
    }

    #[test]
    fn test_default_log_directive() {
        assert_eq!(default_log_directive(0), "fleetrisk=warn");
        assert_eq!(default_log_directive(2), "fleetrisk=debug");
        assert_eq!(default_log_directive(9), "fleetrisk=trace");
    }
}
