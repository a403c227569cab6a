//! Operation types for the wallet balance engine
//!
//! An operation is a request to mutate a single wallet. It exists only for the
//! duration of one mutation call and is never persisted.

use super::error::WalletError;
use super::wallet::WalletId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Credit funds to the wallet
    Deposit,

    /// Debit funds from the wallet
    ///
    /// Rejected when the balance is smaller than the amount.
    Withdraw,
}

impl OperationKind {
    /// Lowercase name used on the wire and in CSV files
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(OperationKind::Deposit),
            "withdraw" => Ok(OperationKind::Withdraw),
            other => Err(WalletError::invalid_input(format!(
                "Invalid value for operation type: '{}'",
                other
            ))),
        }
    }
}

/// A validated mutation request
///
/// Construct through [`Operation::new`], which enforces a non-negative amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Target wallet
    pub wallet_id: WalletId,

    /// Deposit or withdraw
    pub kind: OperationKind,

    /// Amount to apply, never negative
    pub amount: Decimal,
}

impl Operation {
    /// Create an operation, rejecting negative amounts
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidInput` - If `amount` is negative
    pub fn new(
        wallet_id: WalletId,
        kind: OperationKind,
        amount: Decimal,
    ) -> Result<Self, WalletError> {
        if amount < Decimal::ZERO {
            return Err(WalletError::negative_amount(amount));
        }

        Ok(Operation {
            wallet_id,
            kind,
            amount,
        })
    }

    /// Create a deposit operation
    pub fn deposit(wallet_id: WalletId, amount: Decimal) -> Result<Self, WalletError> {
        Self::new(wallet_id, OperationKind::Deposit, amount)
    }

    /// Create a withdraw operation
    pub fn withdraw(wallet_id: WalletId, amount: Decimal) -> Result<Self, WalletError> {
        Self::new(wallet_id, OperationKind::Withdraw, amount)
    }
}
