//! Wallet Balance Engine Library
//! # Overview
//!
//! This library applies deposits and withdrawals to wallet balances held in a
//! durable store, keeping a read-through cache in step with every committed
//! mutation.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Wallet, Operation, WalletError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Balance mutation and cache-aside reads
//!   - [`core::traits`] - Durable store and cache interfaces
//!   - [`core::locks`] - Per-wallet mutual exclusion
//!   - [`core::store`] / [`core::cache`] - In-memory implementations
//!   - [`core::batch_processor`] - Concurrent execution of operation batches
//! - [`io`] - CSV seed, operation and balance files
//! - [`runner`] - Batch driver used by the binary
//! - [`logging`] - tracing subscriber setup
//!
//! # Operations
//!
//! - **Deposit**: Add the amount to the wallet balance
//! - **Withdraw**: Subtract the amount, refused when the balance would go
//!   negative
//!
//! # Guarantees
//!
//! - Balances never go negative.
//! - Two concurrent mutations on one wallet never both act on the same
//!   pre-mutation balance.
//! - A failed operation leaves both the store and the cache untouched.
//! - A successful mutation is visible to the next `find_balance` call.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod runner;
pub mod types;

pub use core::{
    BalanceEngine, BatchProcessor, EngineConfig, InMemoryWalletCache, InMemoryWalletStore,
    WalletCache, WalletStore,
};
pub use io::write_wallets_csv;
pub use runner::{BatchConfig, RunSummary, WalletRunner};
pub use types::{Operation, OperationKind, Wallet, WalletError, WalletId};
