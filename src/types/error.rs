//! Error types for the concurrent ledger
//!
//! This module defines all error types that ledger operations can report.
//! Errors carry enough context to be shown verbatim to a caller.
//!
//! # Error Categories
//!
//! - **Validation Errors**: invalid account ids, negative amounts, same-account transfers
//! - **State Errors**: duplicate or missing accounts, insufficient funds
//! - **Concurrency Errors**: lock acquisition timeouts
//! - **Invariant Violations**: a stored balance found negative (fatal)

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which side of a transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    /// The account funds are taken from
    Source,
    /// The account funds are credited to
    Destination,
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferSide::Source => write!(f, "source"),
            TransferSide::Destination => write!(f, "destination"),
        }
    }
}

/// Main error type for the ledger
///
/// Every variant except [`LedgerError::NegativeBalance`] is an expected,
/// recoverable outcome that leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Account id is empty or contains alphabetic characters
    #[error("Invalid account id '{account_id}': {reason}")]
    InvalidAccount {
        /// The rejected id
        account_id: String,
        /// Which rule the id broke
        reason: String,
    },

    /// An account with this id already exists
    #[error("Account id {account_id} already exists")]
    DuplicateAccount {
        /// The id that is already taken
        account_id: String,
    },

    /// Referenced account is not in the store
    #[error("Account {account_id}{} does not exist", side.map(|s| format!(" ({} of transfer)", s)).unwrap_or_default())]
    AccountNotFound {
        /// The missing id
        account_id: String,
        /// Set when the lookup was one leg of a transfer
        side: Option<TransferSide>,
    },

    /// Amount is negative
    #[error("Amount {amount} must not be negative")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Debit exceeds the current balance
    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account being debited
        account_id: String,
        /// Balance at the time of the check
        balance: Decimal,
        /// Requested debit
        requested: Decimal,
    },

    /// Transfer source and destination are identical
    #[error("Transfer source and destination must differ (account {account_id})")]
    SameAccount {
        /// The id used on both sides
        account_id: String,
    },

    /// An account lock could not be acquired in time
    #[error("Timed out after {timeout_ms}ms waiting for lock on account {account_id}")]
    LockTimeout {
        /// Account whose lock was contended
        account_id: String,
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {account_id}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account being updated
        account_id: String,
    },

    /// A stored balance was found negative
    ///
    /// This can only happen if the store invariant was broken. It signals a bug
    /// rather than a caller mistake.
    #[error("Invariant violated: account {account_id} holds negative balance {balance}")]
    NegativeBalance {
        /// Corrupted account
        account_id: String,
        /// The negative balance observed
        balance: Decimal,
    },
}

impl LedgerError {
    /// Create an InvalidAccount error
    pub fn invalid_account(account_id: &str, reason: &str) -> Self {
        LedgerError::InvalidAccount {
            account_id: account_id.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account_id: &str) -> Self {
        LedgerError::DuplicateAccount {
            account_id: account_id.to_string(),
        }
    }

    /// Create an AccountNotFound error for a single-account operation
    pub fn account_not_found(account_id: &str) -> Self {
        LedgerError::AccountNotFound {
            account_id: account_id.to_string(),
            side: None,
        }
    }

    /// Create an AccountNotFound error for one side of a transfer
    pub fn transfer_account_not_found(account_id: &str, side: TransferSide) -> Self {
        LedgerError::AccountNotFound {
            account_id: account_id.to_string(),
            side: Some(side),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account_id: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account_id: account_id.to_string(),
            balance,
            requested,
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account_id: &str) -> Self {
        LedgerError::SameAccount {
            account_id: account_id.to_string(),
        }
    }

    /// Create a LockTimeout error
    pub fn lock_timeout(account_id: &str, timeout_ms: u64) -> Self {
        LedgerError::LockTimeout {
            account_id: account_id.to_string(),
            timeout_ms,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account_id: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_id: account_id.to_string(),
        }
    }

    /// Create a NegativeBalance error
    pub fn negative_balance(account_id: &str, balance: Decimal) -> Self {
        LedgerError::NegativeBalance {
            account_id: account_id.to_string(),
            balance,
        }
    }

    /// Whether this error signals a broken internal invariant
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::NegativeBalance { .. })
    }
}

/// Failure reported by a notification hook
///
/// Never propagated out of ledger operations; the ledger only logs it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Notification failed: {message}")]
pub struct NotificationError {
    /// Description of the failure
    pub message: String,
}

impl NotificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
