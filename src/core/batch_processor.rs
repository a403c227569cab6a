//! Concurrent batch processing of wallet operations
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! operations against a shared `BalanceEngine`.
//!
//! # Design
//!
//! A batch is partitioned by wallet id. Each wallet's operations run
//! sequentially, in input order, inside one task; different wallets run in
//! parallel. The engine's lock table still serializes any other caller that
//! touches the same wallet.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::BalanceEngine;
use crate::types::{Operation, Wallet, WalletError, WalletId};

/// Result of processing a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The operation that was processed
    pub operation: Operation,

    /// The committed wallet, or why the operation was not applied
    pub result: Result<Wallet, WalletError>,
}

/// Batch processor with wallet-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared engine
    ///
    /// Wrapped in Arc to enable sharing across async tasks.
    engine: Arc<BalanceEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    pub fn new(engine: Arc<BalanceEngine>) -> Self {
        Self { engine }
    }

    /// Partition a batch by wallet id
    ///
    /// Each operation is paired with its position in `batch`. Operations for
    /// a wallet keep their original order.
    pub fn partition_by_wallet(
        &self,
        batch: Vec<Operation>,
    ) -> HashMap<WalletId, Vec<(usize, Operation)>> {
        let mut wallet_batches: HashMap<WalletId, Vec<(usize, Operation)>> = HashMap::new();

        for (index, operation) in batch.into_iter().enumerate() {
            wallet_batches
                .entry(operation.wallet_id)
                .or_default()
                .push((index, operation));
        }

        wallet_batches
    }

    /// Apply one wallet's operations in order
    ///
    /// Every operation is attempted; a rejection does not stop the rest.
    pub async fn process_wallet_operations(
        &self,
        operations: Vec<(usize, Operation)>,
    ) -> Vec<(usize, ProcessingResult)> {
        let mut results = Vec::with_capacity(operations.len());

        for (index, operation) in operations {
            let result = self.engine.apply(&operation).await;
            log_result(&operation, &result);
            results.push((index, ProcessingResult { operation, result }));
        }

        results
    }

    /// Process a batch of operations
    ///
    /// Spawns one task per wallet and waits for all of them.
    ///
    /// # Returns
    ///
    /// Results in the same order as the input operations. Operations of a
    /// wallet whose task panicked are logged and have no result.
    pub async fn process_batch(&self, batch: Vec<Operation>) -> Vec<ProcessingResult> {
        let batch_len = batch.len();
        let wallet_batches = self.partition_by_wallet(batch);

        let mut tasks = Vec::with_capacity(wallet_batches.len());
        for (wallet_id, operations) in wallet_batches {
            let processor = self.clone();
            let task = tokio::spawn(async move {
                processor.process_wallet_operations(operations).await
            });
            tasks.push((wallet_id, task));
        }

        let mut slots: Vec<Option<ProcessingResult>> = Vec::with_capacity(batch_len);
        slots.resize_with(batch_len, || None);
        for (wallet_id, task) in tasks {
            match task.await {
                Ok(wallet_results) => {
                    for (index, processed) in wallet_results {
                        slots[index] = Some(processed);
                    }
                }
                Err(e) => error!(%wallet_id, error = ?e, "Task panicked"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

fn log_result(operation: &Operation, result: &Result<Wallet, WalletError>) {
    match result {
        Ok(wallet) => debug!(
            wallet_id = %wallet.id,
            kind = %operation.kind,
            amount = %operation.amount,
            balance = %wallet.balance,
            "Operation applied"
        ),
        Err(e) if e.is_client_error() => warn!(
            wallet_id = %operation.wallet_id,
            kind = %operation.kind,
            amount = %operation.amount,
            error = %e,
            "Operation rejected"
        ),
        Err(e) => error!(
            wallet_id = %operation.wallet_id,
            kind = %operation.kind,
            amount = %operation.amount,
            error = %e,
            "Operation failed"
        ),
    }
}
