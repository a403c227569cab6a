//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `wallet`: The wallet record and its identifier
//! - `operation`: Deposit/withdraw requests
//! - `error`: Error types for the wallet balance engine

pub mod error;
pub mod operation;
pub mod wallet;

pub use error::WalletError;
pub use operation::{Operation, OperationKind};
pub use wallet::{Wallet, WalletId};
