//! Collaborator traits for the durable store and the cache
//!
//! The engine only talks to its dependencies through these traits, so any
//! durable store (SQL row, key/value record) and any cache (remote key/value
//! server, in-process map) can be plugged in. Both are object safe and are
//! passed to the engine as `Arc<dyn ...>` handles at construction.

use crate::types::{Wallet, WalletError, WalletId};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Authoritative storage for wallet records
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Load a wallet by id
    ///
    /// Returns `Ok(None)` when no record exists. Any failure to reach the store
    /// is reported as `WalletError::StoreUnavailable`.
    async fn get(&self, id: WalletId) -> Result<Option<Wallet>, WalletError>;

    /// Overwrite the balance of an existing wallet
    ///
    /// Must be atomic per call: either the new balance is committed or the
    /// stored record is unchanged.
    async fn set_balance(&self, id: WalletId, balance: Decimal) -> Result<(), WalletError>;
}

/// Best-effort mirror of wallet records
///
/// Never authoritative. Callers must treat any error as a miss (on `get`) or
/// ignore it (on `set`).
#[async_trait]
pub trait WalletCache: Send + Sync {
    /// Look up a cached wallet, `Ok(None)` on a miss
    async fn get(&self, id: WalletId) -> Result<Option<Wallet>, WalletError>;

    /// Store the full wallet record, replacing any previous entry
    async fn set(&self, id: WalletId, wallet: &Wallet) -> Result<(), WalletError>;
}
