//! Wallet Balance Engine CLI
//!
//! Command-line interface for applying wallet operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --wallets wallets.csv operations.csv > balances.csv
//! cargo run -- --wallets wallets.csv --batch-size 2000 --workers 8 operations.csv > balances.csv
//! RUST_LOG=wallet_balance_engine=debug cargo run -- --wallets wallets.csv operations.csv
//! ```
//!
//! The program provisions wallets from the seed CSV, applies every operation
//! through the balance engine, and writes the final balances to stdout.
//! Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, bad seed file, etc.)

use std::process;
use tracing::{error, info};
use wallet_balance_engine::cli;
use wallet_balance_engine::logging::init_logging;
use wallet_balance_engine::runner::WalletRunner;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();

    init_logging(&args.log_level, args.log_format);

    let runner = WalletRunner::new(args.to_batch_config(), args.to_engine_config());
    info!(
        operations = %args.operations_file.display(),
        wallets = %args.wallets_file.display(),
        batch_size = runner.batch_config().batch_size,
        workers = runner.batch_config().worker_threads,
        "Starting run"
    );

    // Output goes to stdout
    let mut output = std::io::stdout();
    match runner.process(&args.wallets_file, &args.operations_file, &mut output) {
        Ok(summary) => info!(
            wallets = summary.wallets,
            applied = summary.applied,
            rejected = summary.rejected,
            "Run complete"
        ),
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
