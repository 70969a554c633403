//! Thread-safe account storage
//!
//! This module provides the `AccountStore` struct, the single owner of all
//! account state. It maps account ids to per-account locks using concurrent
//! data structures so any number of threads can share one store.
//!
//! # Design
//!
//! The store is a `DashMap` (a sharded concurrent HashMap) whose values are
//! `Arc<Mutex<Account>>` handles:
//!
//! ```text
//! AccountStore
//!     └── DashMap<AccountId, Arc<Mutex<Account>>>
//!             ├── shard locks   (guard map structure: insert, lookup, clear)
//!             └── account locks (guard balances: held across read-modify-write)
//! ```
//!
//! DashMap's shard locks make `create` an atomic insert-if-absent. The
//! per-account `parking_lot::Mutex` is what the ledger holds while it reads,
//! validates and writes back a balance, and it can be held across two accounts
//! during a transfer.
//!
//! # Lock Discipline
//!
//! A shard guard is never held while waiting for an account mutex. Every method
//! clones the `Arc` handle out of the map, drops the map reference, and only
//! then locks the account.

use crate::types::{validate_account_id, Account, AccountId, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Shared handle to one account's lock
pub(crate) type AccountHandle = Arc<Mutex<Account>>;

/// Thread-safe account store
///
/// All methods take `&self` and are safe to call concurrently. Wrap the store
/// in an `Arc` to share it between threads or tasks.
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Concurrent map from account id to the account's lock
    accounts: DashMap<AccountId, AccountHandle>,
}

impl AccountStore {
    /// Create a new empty AccountStore
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Insert a new account if its id is free
    ///
    /// The check and the insert happen under the same shard lock, so of any
    /// number of concurrent creates for one id exactly one succeeds.
    ///
    /// # Arguments
    ///
    /// * `account` - The account to insert, with its opening balance
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The account was inserted
    /// * `Err(LedgerError::InvalidAccount)` - The id is empty or contains letters
    /// * `Err(LedgerError::InvalidAmount)` - The opening balance is negative
    /// * `Err(LedgerError::DuplicateAccount)` - An account with this id exists
    pub fn create(&self, account: Account) -> Result<(), LedgerError> {
        validate_account_id(&account.account_id)?;
        if account.balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(account.balance));
        }

        match self.accounts.entry(account.account_id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_account(&account.account_id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(account)));
                Ok(())
            }
        }
    }

    /// Get a snapshot of an account
    ///
    /// Waits for any in-flight mutation of the account to finish, so the
    /// snapshot never shows a half-applied operation.
    ///
    /// # Returns
    ///
    /// * `Some(Account)` - A copy of the account's current state
    /// * `None` - No account with this id
    pub fn get(&self, account_id: &str) -> Option<Account> {
        self.handle(account_id).map(|handle| handle.lock().clone())
    }

    /// Get the lock handle for an account
    ///
    /// The returned handle stays valid even if the store is cleared afterwards.
    pub(crate) fn handle(&self, account_id: &str) -> Option<AccountHandle> {
        self.accounts
            .get(account_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Get snapshots of all accounts
    ///
    /// The accounts are returned in an arbitrary order. Each account is read
    /// consistently, but the list as a whole is not an atomic snapshot:
    /// mutations that run while the list is built may or may not be visible.
    pub fn list(&self) -> Vec<Account> {
        let handles: Vec<AccountHandle> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        handles.iter().map(|handle| handle.lock().clone()).collect()
    }

    /// Remove every account
    ///
    /// Intended for resetting state between test scenarios.
    pub fn clear(&self) {
        self.accounts.clear();
    }

    /// Number of accounts in the store
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn test_create_and_get() {
        let store = AccountStore::new();

        store.create(Account::new("111", dec!(2000))).unwrap();

        let account = store.get("111").unwrap();
        assert_eq!(account.account_id, "111");
        assert_eq!(account.balance, dec!(2000));
    }

    #[test]
    fn test_get_missing_account_returns_none() {
        let store = AccountStore::new();
        assert!(store.get("404").is_none());
    }

    #[test]
    fn test_create_duplicate_fails_and_keeps_original() {
        let store = AccountStore::new();
        store.create(Account::new("555", dec!(3000))).unwrap();

        let result = store.create(Account::new("555", dec!(1)));

        assert_eq!(result, Err(LedgerError::duplicate_account("555")));
        assert_eq!(store.get("555").unwrap().balance, dec!(3000));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    #[case::empty_id("")]
    #[case::alphabetic_id("Id-111")]
    fn test_create_invalid_id_leaves_store_unchanged(#[case] id: &str) {
        let store = AccountStore::new();

        let result = store.create(Account::new(id, dec!(1000)));

        assert!(matches!(result, Err(LedgerError::InvalidAccount { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_negative_opening_balance_fails() {
        let store = AccountStore::new();

        let result = store.create(Account::new("111", dec!(-1000)));

        assert_eq!(result, Err(LedgerError::invalid_amount(dec!(-1000))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_returns_all_accounts() {
        let store = AccountStore::new();
        store.create(Account::new("1", dec!(10))).unwrap();
        store.create(Account::new("2", dec!(20))).unwrap();
        store.create(Account::new("3", dec!(30))).unwrap();

        let mut ids: Vec<String> = store.list().into_iter().map(|a| a.account_id).collect();
        ids.sort();

        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = AccountStore::new();
        store.create(Account::new("1", dec!(10))).unwrap();
        store.create(Account::new("2", dec!(20))).unwrap();

        store.clear();

        assert!(store.is_empty());
        assert!(store.list().is_empty());
        // Ids can be reused after a reset
        assert!(store.create(Account::new("1", dec!(5))).is_ok());
    }

    #[test]
    fn test_handle_writes_are_visible_through_get() {
        let store = AccountStore::new();
        store.create(Account::new("1", dec!(10))).unwrap();

        let handle = store.handle("1").unwrap();
        handle.lock().balance = dec!(42);

        assert_eq!(store.get("1").unwrap().balance, dec!(42));
    }

    #[test]
    fn test_concurrent_duplicate_creates_exactly_one_wins() {
        let store = Arc::new(AccountStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.create(Account::new("999", Decimal::from(i))))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| *r == Err(LedgerError::duplicate_account("999"))));
        assert_eq!(store.len(), 1);
    }
}
