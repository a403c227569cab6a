//! Wallet-related types for the wallet balance engine
//!
//! This module defines the Wallet record held by the durable store and
//! mirrored by the cache.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wallet identifier
///
/// An opaque 128-bit key. Wallets are provisioned outside the engine, so any
/// well-formed UUID may or may not refer to an existing wallet.
pub type WalletId = Uuid;

/// Wallet record
///
/// The authoritative copy lives in the durable store. The cache may hold a
/// copy of the full record, serialized as JSON with the balance rendered as a
/// decimal string so no precision is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// The wallet identifier
    pub id: WalletId,

    /// Current balance
    ///
    /// Arbitrary-precision decimal. Never negative on any record returned
    /// by a successful read.
    pub balance: Decimal,
}

impl Wallet {
    /// Create a wallet record with the given balance
    pub fn new(id: WalletId, balance: Decimal) -> Self {
        Wallet { id, balance }
    }

    /// Copy of this record carrying a different balance
    pub fn with_balance(&self, balance: Decimal) -> Self {
        Wallet {
            id: self.id,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_balance_keeps_id() {
        let id = Uuid::new_v4();
        let wallet = Wallet::new(id, Decimal::new(50000, 2));

        let updated = wallet.with_balance(Decimal::new(40000, 2));

        assert_eq!(updated.id, id);
        assert_eq!(updated.balance, Decimal::new(40000, 2));
        assert_eq!(wallet.balance, Decimal::new(50000, 2));
    }

    #[test]
    fn test_json_balance_is_a_decimal_string() {
        let id = Uuid::nil();
        let wallet = Wallet::new(id, Decimal::new(12345, 2));

        let json = serde_json::to_string(&wallet).unwrap();
        assert_eq!(
            json,
            r#"{"id":"00000000-0000-0000-0000-000000000000","balance":"123.45"}"#
        );

        let decoded: Wallet = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, wallet);
    }
}
