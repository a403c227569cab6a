//! Error types for the wallet balance engine
//!
//! This module defines all error types that can occur while reading or mutating
//! wallet balances, plus the I/O and parsing errors of the CSV front end.
//!
//! # Error Categories
//!
//! - **Client Errors**: Wallet not found, insufficient funds, invalid input
//! - **Dependency Errors**: Durable store unavailable, cache unavailable
//! - **Arithmetic Errors**: Overflow in balance calculations
//! - **File I/O Errors**: Reading operations or writing results

use super::wallet::WalletId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the wallet balance engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// No wallet record exists for the given id
    ///
    /// Surfaced to callers as a "not found" condition.
    #[error("Wallet not found: {id}")]
    WalletNotFound {
        /// The requested wallet id
        id: WalletId,
    },

    /// Withdrawal would drive the balance below zero
    ///
    /// No state change happens when this is returned.
    #[error("Insufficient funds in wallet: {id} (balance {balance}, requested {requested})")]
    InsufficientFunds {
        /// Wallet id
        id: WalletId,
        /// Balance at the time of the check
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// Malformed or out-of-range input, rejected before any store access
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was wrong
        message: String,
    },

    /// The durable store failed or timed out
    ///
    /// The operation must be treated as not applied.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the store failure
        message: String,
    },

    /// The cache failed or timed out
    ///
    /// Never returned by the engine; degraded to a cache miss and logged.
    #[error("Cache unavailable: {message}")]
    CacheUnavailable {
        /// Description of the cache failure
        message: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for wallet {id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Wallet id
        id: WalletId,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// The malformed record is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for WalletError {
    fn from(error: std::io::Error) -> Self {
        WalletError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for WalletError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        WalletError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl WalletError {
    /// Create a WalletNotFound error
    pub fn wallet_not_found(id: WalletId) -> Self {
        WalletError::WalletNotFound { id }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: WalletId, balance: Decimal, requested: Decimal) -> Self {
        WalletError::InsufficientFunds {
            id,
            balance,
            requested,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        WalletError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an InvalidInput error for a negative amount
    pub fn negative_amount(amount: Decimal) -> Self {
        WalletError::InvalidInput {
            message: format!(
                "Amount must be greater than or equal to 0.0, got {}",
                amount
            ),
        }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        WalletError::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Create a CacheUnavailable error
    pub fn cache_unavailable(message: impl Into<String>) -> Self {
        WalletError::CacheUnavailable {
            message: message.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, id: WalletId) -> Self {
        WalletError::ArithmeticOverflow {
            operation: operation.to_string(),
            id,
        }
    }

    /// Whether the caller, not a dependency, is at fault
    ///
    /// Client errors map to "not found" / "rejected" responses at a request
    /// boundary; everything else is a server-side failure. An overflow is
    /// caused by the requested amount and a parse error by the submitted
    /// record, so both count as client errors.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WalletError::WalletNotFound { .. }
                | WalletError::InsufficientFunds { .. }
                | WalletError::InvalidInput { .. }
                | WalletError::ArithmeticOverflow { .. }
                | WalletError::ParseError { .. }
        )
    }
}
