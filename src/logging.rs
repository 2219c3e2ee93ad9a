use crate::cli::LogLevel;
use tracing_subscriber::EnvFilter;

/// Send log output to stderr so that it never mixes with catalog output.
///
/// `RUST_LOG` replaces the `--log-level` directive when it is set.
pub fn initialize(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
