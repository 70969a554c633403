//! Synchronous processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It coordinates between the SyncReader (for CSV
//! input) and the Ledger (for business logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Command execution to `Ledger::execute`
//! - Output to `csv_format::write_accounts` (format handling)
//!
//! Commands run strictly in file order on the calling thread, which makes this
//! strategy the reference result for the async one.

use crate::cli::OutputFormat;
use crate::core::{AccountStore, Ledger, LedgerConfig, LoggingNotifier};
use crate::io::csv_format::write_accounts;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use concurrent_ledger::cli::OutputFormat;
/// use concurrent_ledger::core::LedgerConfig;
/// use concurrent_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default(), OutputFormat::Csv);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    ledger_config: LedgerConfig,
    format: OutputFormat,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy
    pub fn new(ledger_config: LedgerConfig, format: OutputFormat) -> Self {
        Self {
            ledger_config,
            format,
        }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process commands from input file and write results to output
    ///
    /// This method:
    /// 1. Creates a SyncReader to stream commands from the CSV file
    /// 2. Creates a Ledger over an empty store
    /// 3. Executes each command in file order
    /// 4. Writes the final account states in the configured format
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let reader = SyncReader::new(input_path)?;

        let ledger = Ledger::new(
            Arc::new(AccountStore::new()),
            Arc::new(LoggingNotifier),
            self.ledger_config,
        );

        let mut executed = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result {
                Ok(command) => {
                    executed += 1;
                    if let Err(e) = ledger.execute(&command) {
                        rejected += 1;
                        warn!(command = command.kind(), "command rejected: {}", e);
                    }
                }
                Err(e) => warn!("CSV parsing error: {}", e),
            }
        }
        info!(executed, rejected, "finished processing");

        write_accounts(&ledger.list_accounts(), self.format, output)
    }
}
