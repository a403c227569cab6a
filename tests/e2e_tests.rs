//! End-to-end integration tests
//!
//! These tests validate the complete pipeline using predefined CSV test
//! fixtures. Each test:
//! 1. Provisions wallets from wallets.csv in a fixture directory
//! 2. Applies operations.csv through the engine
//! 3. Generates output CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path scenarios
//! - Insufficient funds and unknown wallets
//! - Malformed operation records
//! - Precision and boundary values
//! - Order-dependent sequences on the same wallet
//!
//! Each fixture is run with one operation per batch and with the whole file
//! in a single concurrent batch; both must produce the same output.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;
    use wallet_balance_engine::{BatchConfig, EngineConfig, WalletError, WalletRunner};

    /// Run a test fixture and compare the output with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read or the output does not match.
    fn run_test_fixture(fixture_name: &str, batch_size: usize) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let wallets_path = format!("{}/wallets.csv", fixture_dir);
        let operations_path = format!("{}/operations.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        for path in [&wallets_path, &operations_path, &expected_path] {
            assert!(Path::new(path).exists(), "Fixture file not found: {}", path);
        }

        let runner = WalletRunner::new(BatchConfig::new(batch_size, 4), EngineConfig::default());

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        runner
            .process(
                Path::new(&wallets_path),
                Path::new(&operations_path),
                &mut temp_output,
            )
            .unwrap_or_else(|e| panic!("Failed to process operations: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (batch size: {})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, batch_size, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures, sequential and fully concurrent
    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_funds")]
    #[case("unknown_wallet")]
    #[case("malformed_data")]
    #[case("precision_testing")]
    #[case("boundary_values")]
    #[case("multiple_wallets")]
    #[case("order_dependent")]
    fn test_fixtures(#[case] fixture: &str, #[values(1, 1000)] batch_size: usize) {
        run_test_fixture(fixture, batch_size);
    }

    #[rstest]
    #[case::happy_path("happy_path", 3, 0)]
    #[case::insufficient_funds("insufficient_funds", 2, 1)]
    #[case::unknown_wallet("unknown_wallet", 1, 2)]
    #[case::malformed_data("malformed_data", 1, 6)]
    #[case::boundary_values("boundary_values", 3, 1)]
    #[case::order_dependent("order_dependent", 6, 1)]
    fn test_fixture_summary(
        #[case] fixture: &str,
        #[case] applied: usize,
        #[case] rejected: usize,
    ) {
        let fixture_dir = format!("tests/fixtures/{}", fixture);
        let mut output = Vec::new();

        let summary = WalletRunner::default()
            .process(
                Path::new(&format!("{}/wallets.csv", fixture_dir)),
                Path::new(&format!("{}/operations.csv", fixture_dir)),
                &mut output,
            )
            .unwrap();

        assert_eq!(summary.applied, applied);
        assert_eq!(summary.rejected, rejected);
    }

    #[test]
    fn test_missing_wallets_file_is_fatal() {
        let mut output = Vec::new();

        let result = WalletRunner::default().process(
            Path::new("tests/fixtures/does_not_exist/wallets.csv"),
            Path::new("tests/fixtures/happy_path/operations.csv"),
            &mut output,
        );

        assert!(matches!(result, Err(WalletError::IoError { .. })));
        assert!(output.is_empty());
    }
}
