//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, wallet seeds, output serialization)
//! - `async_reader` - Asynchronous operation reader with batch reading interface

pub mod async_reader;
pub mod csv_format;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_operation_record, convert_wallet_record, read_wallets_csv, write_wallets_csv,
    OperationCsvRecord, WalletCsvRecord,
};
