//! Processing strategy module for command-file processing
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! encompassing both CSV parsing and ledger execution. This allows different
//! implementations (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::{OutputFormat, StrategyType};
use crate::core::LedgerConfig;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command-file pipelines
///
/// Each strategy reads ledger commands from a CSV file, executes them against
/// a fresh ledger, and writes the final account states to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from input file and write results to output
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all processing completed (rejected commands included)
    /// * `Err(String)` if a fatal error occurred (file not found, I/O error, etc.)
    ///
    /// Malformed rows and rejected commands are logged and skipped. They never
    /// cause this method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `batch_config` - Optional configuration for async batch processing (ignored for sync)
/// * `ledger_config` - Lock timeout for the ledger both strategies build
/// * `format` - Output format for the final account report
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    ledger_config: LedgerConfig,
    format: OutputFormat,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger_config, format)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch_config.unwrap_or_default(),
            ledger_config,
            format,
        )),
    }
}
