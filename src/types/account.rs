//! Account-related types for the concurrent ledger
//!
//! This module defines the Account structure, the id validation policy and the
//! pure balance arithmetic used by the ledger operations.

use super::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier
///
/// Any non-empty string without alphabetic characters (e.g. `"111"`, `"42-7"`).
pub type AccountId = String;

/// Bank account state
///
/// Serializes as `{"accountId":"...","balance":...}` with the balance rendered
/// as an exact JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The account identifier, fixed at creation
    pub account_id: AccountId,

    /// Current balance
    ///
    /// Never negative while the account is owned by the store.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with the given opening balance
    ///
    /// No validation happens here; the store validates on insertion.
    pub fn new(account_id: impl Into<AccountId>, balance: Decimal) -> Self {
        Account {
            account_id: account_id.into(),
            balance,
        }
    }

    /// Compute the balance after crediting `amount`
    ///
    /// Does not mutate the account, so callers can validate several legs of an
    /// operation before applying any of them.
    ///
    /// # Returns
    ///
    /// * `Ok(Decimal)` - The new balance
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is negative
    /// * `Err(LedgerError::NegativeBalance)` - If the stored balance is already negative
    /// * `Err(LedgerError::ArithmeticOverflow)` - If the sum does not fit
    pub fn credited(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.check_preconditions(amount)?;
        self.balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", &self.account_id))
    }

    /// Compute the balance after debiting `amount`
    ///
    /// # Returns
    ///
    /// * `Ok(Decimal)` - The new balance
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is negative
    /// * `Err(LedgerError::NegativeBalance)` - If the stored balance is already negative
    /// * `Err(LedgerError::InsufficientFunds)` - If `amount` exceeds the balance
    pub fn debited(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.check_preconditions(amount)?;
        if amount > self.balance {
            return Err(LedgerError::insufficient_funds(
                &self.account_id,
                self.balance,
                amount,
            ));
        }
        Ok(self.balance - amount)
    }

    fn check_preconditions(&self, amount: Decimal) -> Result<(), LedgerError> {
        if self.balance < Decimal::ZERO {
            return Err(LedgerError::negative_balance(&self.account_id, self.balance));
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }
        Ok(())
    }
}

/// Validate an account identifier
///
/// Ids must be non-empty and must not contain any alphabetic character.
pub fn validate_account_id(account_id: &str) -> Result<(), LedgerError> {
    if account_id.is_empty() {
        return Err(LedgerError::invalid_account(
            account_id,
            "account id must not be empty",
        ));
    }
    if account_id.chars().any(char::is_alphabetic) {
        return Err(LedgerError::invalid_account(
            account_id,
            "account id must not contain alphabetic characters",
        ));
    }
    Ok(())
}
