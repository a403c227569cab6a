use crate::core::EngineConfig;
use crate::logging::LogFormat;
use crate::runner::BatchConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Apply deposits and withdrawals to wallets and print the resulting balances
#[derive(Parser, Debug)]
#[command(name = "wallet-engine")]
#[command(about = "Apply wallet deposits and withdrawals concurrently", long_about = None)]
pub struct CliArgs {
    /// Operations CSV file path (`type,wallet,amount`)
    #[arg(value_name = "OPERATIONS", help = "Path to the operations CSV file")]
    pub operations_file: PathBuf,

    /// Wallet seed CSV file path (`wallet,balance`)
    #[arg(
        long = "wallets",
        value_name = "PATH",
        help = "Path to the CSV file provisioning wallets and opening balances"
    )]
    pub wallets_file: PathBuf,

    /// Number of operations per batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations read and dispatched per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of runtime worker threads
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Timeout for a single durable store call, in milliseconds
    #[arg(long = "store-timeout-ms", value_name = "MS", env = "WALLET_STORE_TIMEOUT_MS")]
    pub store_timeout_ms: Option<u64>,

    /// Timeout for a single cache call, in milliseconds
    #[arg(long = "cache-timeout-ms", value_name = "MS", env = "WALLET_CACHE_TIMEOUT_MS")]
    pub cache_timeout_ms: Option<u64>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long = "log-level", value_name = "LEVEL", env = "WALLET_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.worker_threads.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.worker_threads.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create an EngineConfig from CLI arguments, falling back to defaults
    pub fn to_engine_config(&self) -> EngineConfig {
        let default = EngineConfig::default();
        EngineConfig::new(
            self.store_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default.store_timeout),
            self.cache_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default.cache_timeout),
        )
    }
}
