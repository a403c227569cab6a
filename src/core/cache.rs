//! In-memory wallet cache
//!
//! `InMemoryWalletCache` behaves like a remote key/value cache: entries are
//! stored under `wallet:{id}` keys as JSON documents, so every `get` decodes a
//! fresh copy and a corrupt entry surfaces as a cache error rather than a
//! wrong balance.

use async_trait::async_trait;
use dashmap::DashMap;

use super::traits::WalletCache;
use crate::types::{Wallet, WalletError, WalletId};

/// Key prefix for wallet entries
pub const WALLET_CACHE_PREFIX: &str = "wallet:";

/// Build the cache key for a wallet
pub fn cache_key(id: WalletId) -> String {
    format!("{}{}", WALLET_CACHE_PREFIX, id)
}

/// Wallet cache backed by a concurrent map of JSON documents
#[derive(Debug, Default)]
pub struct InMemoryWalletCache {
    entries: DashMap<String, String>,
}

impl InMemoryWalletCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn insert_raw(&self, id: WalletId, document: impl Into<String>) {
        self.entries.insert(cache_key(id), document.into());
    }
}

#[async_trait]
impl WalletCache for InMemoryWalletCache {
    async fn get(&self, id: WalletId) -> Result<Option<Wallet>, WalletError> {
        let Some(document) = self
            .entries
            .get(&cache_key(id))
            .map(|entry| entry.value().clone())
        else {
            return Ok(None);
        };

        serde_json::from_str(&document).map(Some).map_err(|e| {
            WalletError::cache_unavailable(format!("Undecodable entry for wallet {}: {}", id, e))
        })
    }

    async fn set(&self, id: WalletId, wallet: &Wallet) -> Result<(), WalletError> {
        let document = serde_json::to_string(wallet).map_err(|e| {
            WalletError::cache_unavailable(format!("Cannot encode wallet {}: {}", id, e))
        })?;
        self.entries.insert(cache_key(id), document);
        Ok(())
    }
}
