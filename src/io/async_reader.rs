//! Asynchronous CSV reader with batch interface
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCommand;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Reads ledger commands in batches while keeping memory use bounded by the
/// batch size.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read a batch of ledger commands
    ///
    /// Reads up to `batch_size` valid commands. Rows that fail to parse or
    /// convert are logged and skipped without counting toward the batch.
    ///
    /// Returns an empty vector when the end of the file is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(command) => batch.push(command),
                    Err(e) => warn!("Record conversion error: {}", e),
                },
                Some(Err(e)) => warn!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal_macros::dec;

    fn reader(content: &'static str) -> AsyncReader<Cursor<&'static [u8]>> {
        AsyncReader::new(Cursor::new(content.as_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut async_reader = reader(
            "op,account,to,amount\ncreate,1,,100.0\nwithdraw,1,,50.0\ntransfer,1,2,20\n",
        );

        let batch = async_reader.read_batch(2).await;
        assert_eq!(
            batch,
            vec![
                LedgerCommand::Create {
                    account_id: "1".into(),
                    balance: dec!(100.0)
                },
                LedgerCommand::Withdraw {
                    account_id: "1".into(),
                    amount: dec!(50.0)
                },
            ]
        );

        let batch = async_reader.read_batch(2).await;
        assert_eq!(
            batch,
            vec![LedgerCommand::Transfer {
                from: "1".into(),
                to: "2".into(),
                amount: dec!(20)
            }]
        );

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader("op,account,to,amount\n");
        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_records() {
        let mut async_reader = reader(
            "op,account,to,amount\nfreeze,1,,100.0\ntransfer,1,,5\ndeposit,1,,50.0\n",
        );

        let batch = async_reader.read_batch(10).await;

        assert_eq!(
            batch,
            vec![LedgerCommand::Deposit {
                account_id: "1".into(),
                amount: dec!(50.0)
            }]
        );
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let mut async_reader = reader("op,account,to,amount\n  DEPOSIT  ,  7  ,  ,  1.5  \n");

        let batch = async_reader.read_batch(10).await;

        assert_eq!(
            batch,
            vec![LedgerCommand::Deposit {
                account_id: "7".into(),
                amount: dec!(1.5)
            }]
        );
    }
}
