//! Per-wallet mutual exclusion
//!
//! `WalletLocks` hands out one async mutex per wallet id. Holding the guard
//! gives exclusive access to that wallet's read-modify-write cycle; guards for
//! different wallets never contend.
//!
//! # Design
//!
//! The lock table is a `DashMap<WalletId, Arc<Mutex<()>>>`. The map entry is
//! only touched long enough to clone the `Arc`, so the shard lock is never held
//! across an `.await`. Waiting happens on the tokio mutex, which is fair
//! (FIFO), so queued mutations on a hot wallet commit in arrival order.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::WalletId;

/// Guard proving exclusive access to one wallet
///
/// The wallet is released when the guard is dropped.
#[derive(Debug)]
pub struct WalletGuard {
    id: WalletId,
    _guard: OwnedMutexGuard<()>,
}

impl WalletGuard {
    /// The wallet this guard locks
    pub fn wallet_id(&self) -> WalletId {
        self.id
    }
}

/// Keyed lock table, one mutex per wallet id
#[derive(Debug, Default)]
pub struct WalletLocks {
    locks: DashMap<WalletId, Arc<Mutex<()>>>,
}

impl WalletLocks {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Wait for exclusive access to a wallet
    pub async fn lock(&self, id: WalletId) -> WalletGuard {
        let mutex = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        WalletGuard {
            id,
            _guard: mutex.lock_owned().await,
        }
    }

    /// Remove lock entries nobody is holding or waiting on
    ///
    /// Returns the number of entries dropped. Safe to call at any time: an entry
    /// is only removed while the table holds the sole reference to it.
    pub fn prune(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        before.saturating_sub(self.locks.len())
    }

    /// Number of wallets with a lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
