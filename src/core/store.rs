//! In-memory durable store
//!
//! `InMemoryWalletStore` keeps wallet records in a `DashMap`. Each call locks a
//! single shard entry, so `set_balance` is atomic per call, matching what a
//! single-row `UPDATE` gives a relational store.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::traits::WalletStore;
use crate::types::{Wallet, WalletError, WalletId};

/// Wallet store backed by a concurrent hash map
#[derive(Debug, Default)]
pub struct InMemoryWalletStore {
    wallets: DashMap<WalletId, Wallet>,
}

impl InMemoryWalletStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
        }
    }

    /// Provision a wallet, replacing any existing record with the same id
    ///
    /// Provisioning is not part of the engine's contract; this is how the CLI
    /// and tests seed the store.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidInput` - If the balance is negative
    pub fn insert(&self, wallet: Wallet) -> Result<(), WalletError> {
        if wallet.balance < Decimal::ZERO {
            return Err(WalletError::invalid_input(format!(
                "Wallet {} cannot be provisioned with negative balance {}",
                wallet.id, wallet.balance
            )));
        }
        self.wallets.insert(wallet.id, wallet);
        Ok(())
    }

    /// Ids of every stored wallet, sorted
    pub fn wallet_ids(&self) -> Vec<WalletId> {
        let mut ids: Vec<WalletId> = self.wallets.iter().map(|entry| *entry.key()).collect();
        ids.sort();
        ids
    }

    /// Number of stored wallets
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether the store holds no wallets
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn get(&self, id: WalletId) -> Result<Option<Wallet>, WalletError> {
        Ok(self.wallets.get(&id).map(|entry| entry.value().clone()))
    }

    async fn set_balance(&self, id: WalletId, balance: Decimal) -> Result<(), WalletError> {
        let mut entry = self
            .wallets
            .get_mut(&id)
            .ok_or_else(|| WalletError::wallet_not_found(id))?;
        entry.value_mut().balance = balance;
        Ok(())
    }
}
