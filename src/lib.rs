//! Concurrent Ledger Library
//! # Overview
//!
//! An in-memory bank-account ledger that stays consistent under concurrent
//! deposits, withdrawals and transfers, plus a command-file driver with a sync
//! and an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, LedgerCommand, LedgerError)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Thread-safe account map with per-account locks
//!   - [`core::ledger`] - Balance operations and the transfer locking protocol
//!   - [`core::batch_processor`] - Concurrent execution of account-disjoint groups
//! - [`io`] - Command-file reading and account output
//! - [`strategy`] - End-to-end processing pipelines
//!
//! # Operations
//!
//! - **Create**: Open an account with a non-negative opening balance
//! - **Deposit**: Credit funds to an account
//! - **Withdraw**: Debit funds from an account (requires sufficient balance)
//! - **Transfer**: Move funds between two distinct accounts atomically
//!
//! # Invariants
//!
//! - No balance ever becomes negative
//! - A transfer either applies both legs or neither
//! - The sum of all balances only changes through deposits and withdrawals

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{AccountStore, Ledger, LedgerConfig, Notifier};
pub use io::write_accounts_csv;
pub use types::{Account, AccountId, LedgerCommand, LedgerError, NotificationError, TransferSide};
