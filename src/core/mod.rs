//! Core business logic module
//!
//! This module contains the wallet balance components:
//! - `traits` - Collaborator interfaces for the durable store and the cache
//! - `engine` - Balance mutation engine and cache-aside read path
//! - `locks` - Per-wallet mutual exclusion
//! - `store` - In-memory durable store
//! - `cache` - In-memory JSON cache
//! - `batch_processor` - Concurrent execution of operation batches

pub mod batch_processor;
pub mod cache;
pub mod engine;
pub mod locks;
pub mod store;
pub mod traits;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use cache::InMemoryWalletCache;
pub use engine::{next_balance, BalanceEngine, EngineConfig};
pub use locks::{WalletGuard, WalletLocks};
pub use store::InMemoryWalletStore;
pub use traits::{WalletCache, WalletStore};
