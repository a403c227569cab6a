//! Structured logging
//!
//! Initializes the `tracing` subscriber with configurable format (JSON or
//! pretty-printed) and environment-based filtering via `RUST_LOG`.
//!
//! All log output is written to stderr so that stdout remains available for
//! the wallet balance CSV.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output for local runs
    Pretty,
    /// JSON lines for log aggregation
    Json,
}

/// Build the filter, letting `RUST_LOG` override `default_level`
///
/// Falls back to `default_level` when `RUST_LOG` is unset or unparsable, and
/// to `info` when `default_level` itself is not a valid directive.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global tracing subscriber
///
/// Call once, early in `main()`. Later calls are ignored.
///
/// # Arguments
///
/// * `default_level` - Filter used when `RUST_LOG` is not set, e.g. `"info"`
///   or `"wallet_balance_engine=debug"`
/// * `format` - Output format
pub fn init_logging(default_level: &str, format: LogFormat) {
    let filter = env_filter(default_level);

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::debug!(?format, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_level() {
        // Only checks that construction never panics, whatever RUST_LOG holds
        let _ = env_filter("debug");
        let _ = env_filter("wallet_balance_engine=trace,warn");
    }

    #[test]
    fn test_env_filter_invalid_default_falls_back() {
        let _ = env_filter("not a [valid directive");
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging("info", LogFormat::Pretty);
        init_logging("info", LogFormat::Json);
    }
}
