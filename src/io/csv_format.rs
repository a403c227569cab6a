//! CSV format handling for wallet seeds, operations and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - `OperationCsvRecord` for deserializing operations (`type,wallet,amount`)
//! - `WalletCsvRecord` for deserializing wallet seeds (`wallet,balance`)
//! - Conversion from CSV records to validated domain types
//! - Wallet balance output serialization
//!
//! Conversion functions are pure (no I/O) for easy testing.

use crate::types::{Operation, OperationKind, Wallet, WalletError, WalletId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::{Read, Write};
use std::str::FromStr;

/// Operation row: `type,wallet,amount`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OperationCsvRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub wallet: String,
    pub amount: Option<String>,
}

/// Wallet seed row: `wallet,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WalletCsvRecord {
    pub wallet: String,
    pub balance: String,
}

fn parse_wallet_id(raw: &str) -> Result<WalletId, WalletError> {
    WalletId::parse_str(raw.trim())
        .map_err(|e| WalletError::invalid_input(format!("Invalid wallet id '{}': {}", raw, e)))
}

fn parse_amount(raw: &str, field: &str) -> Result<Decimal, WalletError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| WalletError::invalid_input(format!("Invalid {} '{}'", field, raw)))
}

fn write_error(error: csv::Error) -> WalletError {
    WalletError::IoError {
        message: format!("Failed to write wallet record: {}", error),
    }
}

/// Convert an operation row into a validated `Operation`
///
/// # Errors
///
/// `WalletError::InvalidInput` when the type is not `deposit`/`withdraw`, the
/// wallet id is not a UUID, or the amount is missing, malformed or negative.
pub fn convert_operation_record(record: OperationCsvRecord) -> Result<Operation, WalletError> {
    let kind = OperationKind::from_str(&record.kind)?;
    let wallet_id = parse_wallet_id(&record.wallet)?;

    let amount = match record.amount {
        Some(raw) if !raw.trim().is_empty() => parse_amount(&raw, "amount")?,
        _ => {
            return Err(WalletError::invalid_input(format!(
                "{} for wallet {} requires an amount",
                kind, wallet_id
            )))
        }
    };

    Operation::new(wallet_id, kind, amount)
}

/// Convert a seed row into a `Wallet`
///
/// # Errors
///
/// `WalletError::InvalidInput` when the id is not a UUID or the balance is
/// malformed or negative.
pub fn convert_wallet_record(record: WalletCsvRecord) -> Result<Wallet, WalletError> {
    let id = parse_wallet_id(&record.wallet)?;
    let balance = parse_amount(&record.balance, "balance")?;

    if balance < Decimal::ZERO {
        return Err(WalletError::invalid_input(format!(
            "Wallet {} has negative balance {}",
            id, balance
        )));
    }

    Ok(Wallet::new(id, balance))
}

/// Read every wallet from a seed CSV
///
/// Unlike operations, a bad seed row is fatal: starting from a partial set of
/// wallets would turn later operations into spurious "not found" errors.
///
/// # Errors
///
/// `WalletError::ParseError` for malformed CSV, `WalletError::InvalidInput`
/// for a row that does not convert.
pub fn read_wallets_csv<R: Read>(input: R) -> Result<Vec<Wallet>, WalletError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut wallets = Vec::new();
    for record in reader.deserialize::<WalletCsvRecord>() {
        wallets.push(convert_wallet_record(record?)?);
    }

    Ok(wallets)
}

/// Write wallet balances to CSV format
///
/// Writes wallets with columns: wallet, balance. Wallets are sorted by id for
/// deterministic output; balances keep the scale they carry.
///
/// # Errors
///
/// Returns `WalletError::IoError` if writing fails.
pub fn write_wallets_csv(wallets: &[Wallet], output: &mut dyn Write) -> Result<(), WalletError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["wallet", "balance"])
        .map_err(write_error)?;

    let mut sorted_wallets = wallets.to_vec();
    sorted_wallets.sort_by_key(|wallet| wallet.id);

    for wallet in sorted_wallets {
        writer
            .write_record(&[wallet.id.to_string(), wallet.balance.to_string()])
            .map_err(write_error)?;
    }

    writer.flush()?;

    Ok(())
}
