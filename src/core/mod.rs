//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Trait abstractions for external collaborators (notification hook)
//! - `account_store` - Thread-safe account state with per-account locks
//! - `ledger` - Deposit, withdraw and transfer under the locking protocol
//! - `batch_processor` - Concurrent execution of command batches
//! - `notifier` - Built-in notification hooks
//! - `config` - Ledger runtime configuration

pub mod account_store;
pub mod batch_processor;
pub mod config;
pub mod ledger;
pub mod notifier;
pub mod traits;

pub use account_store::AccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use config::LedgerConfig;
pub use ledger::Ledger;
pub use notifier::{LoggingNotifier, NoopNotifier};
pub use traits::Notifier;
