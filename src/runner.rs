//! Batch driver
//!
//! Wires the in-memory store and cache into a [`BalanceEngine`], seeds the
//! store from a wallet CSV, then streams operations through a
//! [`BatchProcessor`] one batch at a time.
//!
//! # Architecture
//!
//! ```text
//! WalletRunner
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── read_wallets_csv (seed file → InMemoryWalletStore)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (one task per wallet)
//!     └── BalanceEngine
//!         ├── InMemoryWalletStore
//!         ├── InMemoryWalletCache
//!         └── WalletLocks
//! ```
//!
//! Batches run sequentially: the next batch is read only after every
//! operation of the current one has finished. Within a batch, each wallet's
//! operations are applied in file order, so the result does not depend on
//! the batch size.

use crate::core::{
    BalanceEngine, BatchProcessor, EngineConfig, InMemoryWalletCache, InMemoryWalletStore,
    WalletStore,
};
use crate::io::{read_wallets_csv, write_wallets_csv, AsyncReader};
use crate::types::WalletError;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, replacing zero values with the defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "Invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Counts reported after a run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Wallets provisioned from the seed file
    pub wallets: usize,
    /// Operations that mutated a balance
    pub applied: usize,
    /// Operations refused by the engine plus records the reader skipped
    pub rejected: usize,
}

/// Runs a seed file and an operations file through the balance engine
#[derive(Debug, Clone, Default)]
pub struct WalletRunner {
    batch_config: BatchConfig,
    engine_config: EngineConfig,
}

impl WalletRunner {
    /// Create a runner with the given batching and engine settings
    pub fn new(batch_config: BatchConfig, engine_config: EngineConfig) -> Self {
        Self {
            batch_config,
            engine_config,
        }
    }

    /// Batching settings in effect
    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch_config
    }

    /// Apply every operation and write the resulting balances
    ///
    /// Builds a multi-threaded runtime with `worker_threads` workers and
    /// blocks on it, so this must not be called from within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `wallets_path` - Seed CSV (`wallet,balance`)
    /// * `operations_path` - Operations CSV (`type,wallet,amount`)
    /// * `output` - Destination for the `wallet,balance` result CSV
    ///
    /// # Errors
    ///
    /// Fatal errors only: unreadable files, a bad seed row, a runtime that
    /// cannot be built, or a failed write. A rejected operation is counted in
    /// the summary and processing continues.
    pub fn process(
        &self,
        wallets_path: &Path,
        operations_path: &Path,
        output: &mut dyn Write,
    ) -> Result<RunSummary, WalletError> {
        let store = Arc::new(InMemoryWalletStore::new());
        let seed = File::open(wallets_path).map_err(|e| open_error(wallets_path, e))?;
        for wallet in read_wallets_csv(BufReader::new(seed))? {
            store.insert(wallet)?;
        }
        info!(wallets = store.len(), path = %wallets_path.display(), "Wallets provisioned");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.batch_config.worker_threads)
            .enable_all()
            .build()
            .map_err(|e| WalletError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let durable: Arc<dyn WalletStore> = store.clone();
            let engine = Arc::new(BalanceEngine::with_config(
                durable,
                Arc::new(InMemoryWalletCache::new()),
                self.engine_config.clone(),
            ));
            let processor = BatchProcessor::new(Arc::clone(&engine));

            let file = tokio::fs::File::open(operations_path)
                .await
                .map_err(|e| open_error(operations_path, e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut summary = RunSummary {
                wallets: store.len(),
                ..RunSummary::default()
            };

            loop {
                let batch = reader.read_batch(self.batch_config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                let batch_len = batch.len();
                for processed in processor.process_batch(batch).await {
                    if processed.result.is_ok() {
                        summary.applied += 1;
                    } else {
                        summary.rejected += 1;
                    }
                }

                let pruned = engine.locks().prune();
                debug!(operations = batch_len, pruned, "Batch complete");
            }
            summary.rejected += reader.rejected();

            let mut wallets = Vec::with_capacity(summary.wallets);
            for id in store.wallet_ids() {
                wallets.push(engine.find_balance(id).await?);
            }
            write_wallets_csv(&wallets, output)?;

            info!(
                applied = summary.applied,
                rejected = summary.rejected,
                "Operations processed"
            );
            Ok(summary)
        })
    }
}

fn open_error(path: &Path, error: std::io::Error) -> WalletError {
    WalletError::IoError {
        message: format!("Failed to open file '{}': {}", path.display(), error),
    }
}
