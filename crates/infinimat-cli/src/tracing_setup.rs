//! Structured logging setup
//!
//! Log events go to stderr so command output on stdout stays machine
//! readable. `RUST_LOG` takes precedence over the configured filter.

use crate::config::{LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const VERBOSE_FILTER: &str = "infinimat_cli=debug,infinimat_core=debug";

/// Pick the filter directive: `RUST_LOG`, then `--verbose`, then the configured filter
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { config.filter.as_str() })
    })
}

/// Initialize the global subscriber
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let filter = build_filter(config, verbose);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|err| anyhow::anyhow!("Failed to initialize tracing: {err}"))?;

    info!(format = ?config.format, "Logging initialized");
    Ok(())
}
