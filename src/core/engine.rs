//! Balance mutation engine and balance read path
//!
//! This module provides the `BalanceEngine` struct, which orchestrates
//! read-modify-write cycles against a durable `WalletStore` and keeps a
//! `WalletCache` in step with it.
//!
//! # Architecture
//!
//! ```text
//! BalanceEngine
//!     ├── Arc<dyn WalletStore>  (authoritative wallet records)
//!     ├── Arc<dyn WalletCache>  (advisory mirror, never trusted for writes)
//!     └── Arc<WalletLocks>      (one async mutex per wallet id)
//! ```
//!
//! # Concurrency
//!
//! Mutations on one wallet are serialized through `WalletLocks`: the lock is
//! taken before the store read and released after the cache write, so no two
//! mutations can act on the same pre-mutation balance and cache writes for a
//! wallet land in commit order. Different wallets never contend.
//!
//! The read path only takes the wallet lock on a cache miss. That keeps a
//! reader from repopulating the cache with a balance that a concurrent
//! mutation has already replaced.
//!
//! # Failure Handling
//!
//! Every store call is bounded by `EngineConfig::store_timeout`; a failure or
//! timeout aborts the call with `StoreUnavailable` and nothing is committed.
//! Every cache call is bounded by `EngineConfig::cache_timeout`; failures are
//! logged and degrade to a miss (reads) or are ignored (writes).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, error, instrument, warn};

use super::locks::WalletLocks;
use super::traits::{WalletCache, WalletStore};
use crate::types::{Operation, OperationKind, Wallet, WalletError, WalletId};

/// Timeouts applied to collaborator calls
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on a single durable store call
    pub store_timeout: Duration,
    /// Upper bound on a single cache call
    pub cache_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(500),
        }
    }
}

impl EngineConfig {
    /// Create an EngineConfig, replacing zero timeouts with the defaults
    pub fn new(store_timeout: Duration, cache_timeout: Duration) -> Self {
        let default = Self::default();

        let store_timeout = if store_timeout.is_zero() {
            warn!(
                default = ?default.store_timeout,
                "Invalid store timeout (0), using default"
            );
            default.store_timeout
        } else {
            store_timeout
        };

        let cache_timeout = if cache_timeout.is_zero() {
            warn!(
                default = ?default.cache_timeout,
                "Invalid cache timeout (0), using default"
            );
            default.cache_timeout
        } else {
            cache_timeout
        };

        Self {
            store_timeout,
            cache_timeout,
        }
    }
}

/// Compute the balance that results from applying an operation
///
/// # Errors
///
/// * `WalletError::InvalidInput` - If `amount` is negative
/// * `WalletError::InsufficientFunds` - If a withdrawal exceeds the balance
/// * `WalletError::ArithmeticOverflow` - If a deposit overflows `Decimal`
pub fn next_balance(
    wallet: &Wallet,
    kind: OperationKind,
    amount: Decimal,
) -> Result<Decimal, WalletError> {
    if amount < Decimal::ZERO {
        return Err(WalletError::negative_amount(amount));
    }

    match kind {
        OperationKind::Deposit => wallet
            .balance
            .checked_add(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("deposit", wallet.id)),
        OperationKind::Withdraw => {
            if wallet.balance < amount {
                return Err(WalletError::insufficient_funds(
                    wallet.id,
                    wallet.balance,
                    amount,
                ));
            }
            wallet
                .balance
                .checked_sub(amount)
                .ok_or_else(|| WalletError::arithmetic_overflow("withdraw", wallet.id))
        }
    }
}

/// Wallet balance engine
///
/// Cheap to clone; clones share the same store, cache and lock table, so one
/// engine can be handed to any number of tasks.
#[derive(Clone)]
pub struct BalanceEngine {
    store: Arc<dyn WalletStore>,
    cache: Arc<dyn WalletCache>,
    locks: Arc<WalletLocks>,
    config: EngineConfig,
}

impl fmt::Debug for BalanceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BalanceEngine")
            .field("locked_wallets", &self.locks.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BalanceEngine {
    /// Create an engine with default timeouts
    pub fn new(store: Arc<dyn WalletStore>, cache: Arc<dyn WalletCache>) -> Self {
        Self::with_config(store, cache, EngineConfig::default())
    }

    /// Create an engine with explicit timeouts
    pub fn with_config(
        store: Arc<dyn WalletStore>,
        cache: Arc<dyn WalletCache>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            cache,
            locks: Arc::new(WalletLocks::new()),
            config,
        }
    }

    /// Timeouts in effect
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The per-wallet lock table
    pub fn locks(&self) -> &WalletLocks {
        &self.locks
    }

    /// Deposit into or withdraw from a wallet
    ///
    /// Loads the wallet, applies the delta, commits the new balance to the
    /// store and then overwrites the cache entry with the full record. The
    /// store write is the commit point: success is only returned once it is
    /// confirmed, and the cache write is always attempted before returning.
    ///
    /// # Returns
    ///
    /// The committed wallet record.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidInput` - If `amount` is negative (no store access)
    /// * `WalletError::WalletNotFound` - If no wallet exists for `wallet_id`
    /// * `WalletError::InsufficientFunds` - If a withdrawal exceeds the balance
    /// * `WalletError::ArithmeticOverflow` - If a deposit overflows
    /// * `WalletError::StoreUnavailable` - If the store fails or times out
    #[instrument(level = "debug", skip(self))]
    pub async fn perform_operation(
        &self,
        wallet_id: WalletId,
        kind: OperationKind,
        amount: Decimal,
    ) -> Result<Wallet, WalletError> {
        if amount < Decimal::ZERO {
            return Err(WalletError::negative_amount(amount));
        }

        let _guard = self.locks.lock(wallet_id).await;

        let wallet = self
            .load(wallet_id)
            .await?
            .ok_or_else(|| WalletError::wallet_not_found(wallet_id))?;

        let balance = next_balance(&wallet, kind, amount)?;
        self.commit(wallet_id, balance).await?;

        let updated = wallet.with_balance(balance);
        self.refresh_cache(&updated).await;

        debug!(
            previous = %wallet.balance,
            balance = %updated.balance,
            "Operation committed"
        );
        Ok(updated)
    }

    /// Apply a validated operation
    ///
    /// See [`BalanceEngine::perform_operation`].
    pub async fn apply(&self, operation: &Operation) -> Result<Wallet, WalletError> {
        self.perform_operation(operation.wallet_id, operation.kind, operation.amount)
            .await
    }

    /// Look up a wallet, cache first
    ///
    /// A cache hit is returned without touching the store. On a miss the
    /// store is read and the cache populated with the result; failing to
    /// populate the cache does not fail the read.
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - If neither cache nor store has the wallet
    /// * `WalletError::StoreUnavailable` - If the store fails or times out on a miss
    #[instrument(level = "debug", skip(self))]
    pub async fn find_balance(&self, wallet_id: WalletId) -> Result<Wallet, WalletError> {
        if let Some(wallet) = self.cached(wallet_id).await {
            debug!(balance = %wallet.balance, "Found wallet in cache");
            return Ok(wallet);
        }

        let _guard = self.locks.lock(wallet_id).await;

        let wallet = self
            .load(wallet_id)
            .await?
            .ok_or_else(|| WalletError::wallet_not_found(wallet_id))?;
        debug!(balance = %wallet.balance, "Found wallet in store");

        self.refresh_cache(&wallet).await;
        Ok(wallet)
    }

    async fn load(&self, wallet_id: WalletId) -> Result<Option<Wallet>, WalletError> {
        let result = tokio::time::timeout(self.config.store_timeout, self.store.get(wallet_id))
            .await
            .unwrap_or_else(|_| {
                Err(WalletError::store_unavailable(format!(
                    "get for wallet {} timed out after {:?}",
                    wallet_id, self.config.store_timeout
                )))
            });

        if let Err(e) = &result {
            error!(%wallet_id, error = %e, "Store read failed");
        }
        result
    }

    async fn commit(&self, wallet_id: WalletId, balance: Decimal) -> Result<(), WalletError> {
        let result = tokio::time::timeout(
            self.config.store_timeout,
            self.store.set_balance(wallet_id, balance),
        )
        .await
        .unwrap_or_else(|_| {
            Err(WalletError::store_unavailable(format!(
                "set_balance for wallet {} timed out after {:?}",
                wallet_id, self.config.store_timeout
            )))
        });

        if let Err(e) = &result {
            error!(%wallet_id, %balance, error = %e, "Store write failed, operation not applied");
        }
        result
    }

    async fn cached(&self, wallet_id: WalletId) -> Option<Wallet> {
        match tokio::time::timeout(self.config.cache_timeout, self.cache.get(wallet_id)).await {
            Ok(Ok(Some(wallet))) if wallet.id == wallet_id => Some(wallet),
            Ok(Ok(Some(wallet))) => {
                warn!(%wallet_id, cached_id = %wallet.id, "Cache entry belongs to another wallet, ignoring");
                None
            }
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                warn!(%wallet_id, error = %e, "Cache read failed, treating as miss");
                None
            }
            Err(_) => {
                warn!(
                    %wallet_id,
                    timeout = ?self.config.cache_timeout,
                    "Cache read timed out, treating as miss"
                );
                None
            }
        }
    }

    async fn refresh_cache(&self, wallet: &Wallet) {
        match tokio::time::timeout(self.config.cache_timeout, self.cache.set(wallet.id, wallet))
            .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(wallet_id = %wallet.id, error = %e, "Cache write failed, ignoring");
            }
            Err(_) => {
                warn!(
                    wallet_id = %wallet.id,
                    timeout = ?self.config.cache_timeout,
                    "Cache write timed out, ignoring"
                );
            }
        }
    }
}
