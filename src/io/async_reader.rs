//! Asynchronous CSV reader for wallet operations
//!
//! Provides a streaming interface over operation records from a CSV file.
//! Supports batch reading for efficient async processing.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Operations
//!                  ↓
//!           csv_format module
//!   (OperationCsvRecord, convert_operation_record)
//! ```

use crate::io::csv_format::{convert_operation_record, OperationCsvRecord};
use crate::types::Operation;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Provides batch reading interface over operation records.
/// Maintains streaming behavior with constant memory usage.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    rejected: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            rejected: 0,
        }
    }

    /// Read a batch of operations
    ///
    /// Reads up to `batch_size` records, converting them to validated
    /// operations. Invalid records are logged, counted and skipped.
    ///
    /// # Returns
    ///
    /// A vector of valid operations. Returns an empty vector when the end of
    /// the file is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Operation> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<OperationCsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_operation_record(csv_record) {
                    Ok(operation) => batch.push(operation),
                    Err(e) => {
                        self.rejected += 1;
                        warn!(error = %e, "Skipping invalid operation record");
                    }
                },
                Some(Err(e)) => {
                    self.rejected += 1;
                    warn!(error = %e, "Skipping malformed CSV record");
                }
                None => break,
            }
        }

        batch
    }

    /// Number of records skipped so far
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
