//! Balance-changing operations over a shared account store
//!
//! This module provides the `Ledger` struct, which runs deposits, withdrawals
//! and transfers against an [`AccountStore`] under a per-account locking
//! protocol, then reports each committed change to a [`Notifier`].
//!
//! # Architecture
//!
//! ```text
//! Ledger
//!     ├── Arc<AccountStore>  (thread-safe account state)
//!     ├── Arc<dyn Notifier>  (post-commit notification hook)
//!     └── LedgerConfig       (lock timeout)
//! ```
//!
//! # Locking Protocol
//!
//! - A deposit or withdrawal holds the account's mutex for the whole
//!   read-validate-write sequence, so concurrent mutations of one account
//!   serialize and no update is lost.
//! - A transfer holds both account mutexes. They are always acquired in
//!   ascending id order (lexicographic), whatever the transfer direction, so two
//!   transfers over the same pair can never wait on each other in a cycle.
//! - Both legs of a transfer are validated before either is applied. A rejected
//!   transfer leaves both balances untouched.
//! - Every acquisition is bounded by `LedgerConfig::lock_timeout` and fails with
//!   `LedgerError::LockTimeout` instead of blocking forever.
//! - Notifications run after the locks are released.
//!
//! # Thread Safety
//!
//! `Ledger` is cheap to clone; clones share the same store and notifier.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::account_store::AccountStore;
use super::config::LedgerConfig;
use super::traits::Notifier;
use crate::types::{Account, LedgerCommand, LedgerError, TransferSide};

/// Deposit/withdraw/transfer processor
#[derive(Clone)]
pub struct Ledger {
    /// Shared account state
    store: Arc<AccountStore>,

    /// Hook invoked after each committed mutation
    notifier: Arc<dyn Notifier>,

    /// Lock timeout and other runtime settings
    config: LedgerConfig,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Create a new Ledger
    ///
    /// # Arguments
    ///
    /// * `store` - Arc-wrapped AccountStore holding all account state
    /// * `notifier` - Hook called after every committed balance change
    /// * `config` - Ledger settings (lock timeout)
    pub fn new(store: Arc<AccountStore>, notifier: Arc<dyn Notifier>, config: LedgerConfig) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// The underlying account store
    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Open a new account
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The account was created
    /// * `Err(LedgerError::InvalidAccount)` - The id is empty or contains letters
    /// * `Err(LedgerError::InvalidAmount)` - The opening balance is negative
    /// * `Err(LedgerError::DuplicateAccount)` - The id is already taken
    pub fn create_account(&self, account: Account) -> Result<(), LedgerError> {
        let account_id = account.account_id.clone();
        let balance = account.balance;
        match self.store.create(account) {
            Ok(()) => {
                info!(account_id = %account_id, balance = %balance, "account created");
                Ok(())
            }
            Err(e) => {
                warn!(account_id = %account_id, "account creation rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Look up one account
    pub fn get_account(&self, account_id: &str) -> Option<Account> {
        self.store.get(account_id)
    }

    /// Snapshot of every account, in no particular order
    pub fn list_accounts(&self) -> Vec<Account> {
        self.store.list()
    }

    /// Credit `amount` to an account
    ///
    /// Not idempotent: every call adds the amount again.
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The account right after the deposit
    /// * `Err(LedgerError::AccountNotFound)` - No such account
    /// * `Err(LedgerError::InvalidAmount)` - `amount` is negative
    /// * `Err(LedgerError::LockTimeout)` - The account lock was not acquired in time
    /// * `Err(LedgerError::ArithmeticOverflow)` - The new balance does not fit
    pub fn deposit(&self, account_id: &str, amount: Decimal) -> Result<Account, LedgerError> {
        let updated = self
            .update(account_id, |account| account.credited(amount))
            .inspect_err(|e| self.report_rejection("deposit", account_id, e))?;

        info!(account_id, amount = %amount, balance = %updated.balance, "deposit committed");
        self.notify(&updated, &format!(" {} transfer to {}", amount, account_id));
        Ok(updated)
    }

    /// Debit `amount` from an account
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The account right after the withdrawal
    /// * `Err(LedgerError::AccountNotFound)` - No such account
    /// * `Err(LedgerError::InvalidAmount)` - `amount` is negative
    /// * `Err(LedgerError::InsufficientFunds)` - `amount` exceeds the balance
    /// * `Err(LedgerError::LockTimeout)` - The account lock was not acquired in time
    pub fn withdraw(&self, account_id: &str, amount: Decimal) -> Result<Account, LedgerError> {
        let updated = self
            .update(account_id, |account| account.debited(amount))
            .inspect_err(|e| self.report_rejection("withdraw", account_id, e))?;

        info!(account_id, amount = %amount, balance = %updated.balance, "withdrawal committed");
        self.notify(&updated, &format!(" {} transfer from {}", amount, account_id));
        Ok(updated)
    }

    /// Move `amount` from one account to another
    ///
    /// This method:
    /// 1. Rejects identical source and destination
    /// 2. Resolves both accounts (source first)
    /// 3. Locks both accounts in ascending id order
    /// 4. Validates the debit and the credit
    /// 5. Applies both, releases the locks, then notifies both sides
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Both legs were applied
    /// * `Err(LedgerError::SameAccount)` - `from == to` (checked before anything else)
    /// * `Err(LedgerError::AccountNotFound)` - A side is missing; `side` names it
    /// * `Err(LedgerError::InvalidAmount)` - `amount` is negative
    /// * `Err(LedgerError::InsufficientFunds)` - The source cannot cover `amount`
    /// * `Err(LedgerError::LockTimeout)` - A lock was not acquired in time
    ///
    /// On any error neither balance has changed.
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), LedgerError> {
        let (source, destination) = self
            .apply_transfer(from, to, amount)
            .inspect_err(|e| self.report_rejection("transfer", from, e))?;

        info!(
            from,
            to,
            amount = %amount,
            from_balance = %source.balance,
            to_balance = %destination.balance,
            "transfer committed"
        );
        self.notify(&destination, &format!(" {} transfer to {}", amount, to));
        self.notify(&source, &format!(" {} transfer from {}", amount, from));
        Ok(())
    }

    /// Run a parsed command
    ///
    /// Routes the command to the matching operation and discards its value.
    pub fn execute(&self, command: &LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Create {
                account_id,
                balance,
            } => self.create_account(Account::new(account_id.as_str(), *balance)),
            LedgerCommand::Deposit { account_id, amount } => {
                self.deposit(account_id, *amount).map(|_| ())
            }
            LedgerCommand::Withdraw { account_id, amount } => {
                self.withdraw(account_id, *amount).map(|_| ())
            }
            LedgerCommand::Transfer { from, to, amount } => self.transfer(from, to, *amount),
        }
    }

    /// Read-validate-write one account under its lock
    ///
    /// `compute` returns the new balance or an error; the balance is only
    /// written when it succeeds.
    fn update<F>(&self, account_id: &str, compute: F) -> Result<Account, LedgerError>
    where
        F: FnOnce(&Account) -> Result<Decimal, LedgerError>,
    {
        let handle = self
            .store
            .handle(account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        let mut account = self.lock(account_id, &handle)?;
        let new_balance = compute(&*account)?;
        account.balance = new_balance;
        Ok(account.clone())
    }

    /// Locked section of a transfer
    ///
    /// Returns `(source, destination)` snapshots taken before the locks drop.
    fn apply_transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<(Account, Account), LedgerError> {
        if from == to {
            return Err(LedgerError::same_account(from));
        }

        let source_handle = self
            .store
            .handle(from)
            .ok_or_else(|| LedgerError::transfer_account_not_found(from, TransferSide::Source))?;
        let destination_handle = self.store.handle(to).ok_or_else(|| {
            LedgerError::transfer_account_not_found(to, TransferSide::Destination)
        })?;

        let (mut source, mut destination) = if from < to {
            let source = self.lock(from, &source_handle)?;
            let destination = self.lock(to, &destination_handle)?;
            (source, destination)
        } else {
            let destination = self.lock(to, &destination_handle)?;
            let source = self.lock(from, &source_handle)?;
            (source, destination)
        };

        let new_source_balance = source.debited(amount)?;
        let new_destination_balance = destination.credited(amount)?;

        source.balance = new_source_balance;
        destination.balance = new_destination_balance;

        Ok((source.clone(), destination.clone()))
    }

    /// Acquire one account lock within the configured timeout
    fn lock<'a>(
        &self,
        account_id: &str,
        handle: &'a Mutex<Account>,
    ) -> Result<MutexGuard<'a, Account>, LedgerError> {
        debug!(account_id, "acquiring account lock");
        handle
            .try_lock_for(self.config.lock_timeout)
            .ok_or_else(|| LedgerError::lock_timeout(account_id, self.config.lock_timeout_ms()))
    }

    fn notify(&self, account: &Account, message: &str) {
        if let Err(e) = self.notifier.notify(account, message) {
            warn!(account_id = %account.account_id, "notification dropped: {}", e);
        }
    }

    fn report_rejection(&self, operation: &str, account_id: &str, e: &LedgerError) {
        if e.is_fatal() {
            error!(operation, account_id, "ledger invariant violated: {}", e);
        } else {
            warn!(operation, account_id, "{} rejected: {}", operation, e);
        }
    }
}
