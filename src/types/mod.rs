//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the Account entity and id validation
//! - `command`: parsed ledger commands
//! - `error`: Error types for the ledger

pub mod account;
pub mod command;
pub mod error;

pub use account::{validate_account_id, Account, AccountId};
pub use command::LedgerCommand;
pub use error::{LedgerError, NotificationError, TransferSide};
