//! Multi-threaded integration tests for the ledger
//!
//! Each test hammers a shared `Ledger` from several OS threads and then checks
//! the invariants that must hold for any interleaving: balances never go
//! negative, transfers conserve the total, and account creation is
//! insert-if-absent.
//!
//! Randomized workloads use seeded RNGs so a failure can be replayed.

use concurrent_ledger::core::{AccountStore, Ledger, LedgerConfig, NoopNotifier};
use concurrent_ledger::types::{Account, LedgerError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

const POOL_SIZE: usize = 10;
const THREADS: u64 = 8;
const OPS_PER_THREAD: usize = 500;

fn ledger() -> Arc<Ledger> {
    Arc::new(Ledger::new(
        Arc::new(AccountStore::new()),
        Arc::new(NoopNotifier),
        LedgerConfig::default(),
    ))
}

fn pool(ledger: &Ledger, opening: Decimal) -> Vec<String> {
    (0..POOL_SIZE)
        .map(|i| {
            let id = format!("{}", 1000 + i);
            ledger
                .create_account(Account::new(id.clone(), opening))
                .unwrap();
            id
        })
        .collect()
}

fn total(ledger: &Ledger) -> Decimal {
    ledger.list_accounts().iter().map(|a| a.balance).sum()
}

#[test]
fn test_random_transfers_conserve_total() {
    let ledger = ledger();
    let ids = Arc::new(pool(&ledger, dec!(1000.00)));

    let handles: Vec<_> = (0..THREADS)
        .map(|seed| {
            let ledger = Arc::clone(&ledger);
            let ids = Arc::clone(&ids);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut outcomes = (0usize, 0usize);
                for _ in 0..OPS_PER_THREAD {
                    let from = &ids[rng.random_range(0..ids.len())];
                    let to = &ids[rng.random_range(0..ids.len())];
                    let amount = Decimal::new(rng.random_range(0..=50_000), 2);

                    match ledger.transfer(from, to, amount) {
                        Ok(()) => outcomes.0 += 1,
                        Err(LedgerError::SameAccount { .. })
                        | Err(LedgerError::InsufficientFunds { .. }) => outcomes.1 += 1,
                        Err(e) => panic!("unexpected transfer error: {}", e),
                    }
                }
                outcomes
            })
        })
        .collect();

    let (succeeded, rejected) = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .fold((0, 0), |acc, o| (acc.0 + o.0, acc.1 + o.1));

    assert_eq!(succeeded + rejected, THREADS as usize * OPS_PER_THREAD);
    assert!(succeeded > 0);
    assert_eq!(total(&ledger), dec!(10000.00));
    assert!(ledger
        .list_accounts()
        .iter()
        .all(|a| a.balance >= Decimal::ZERO));
}

#[test]
fn test_snapshots_never_observe_negative_balances() {
    let ledger = ledger();
    let ids = Arc::new(pool(&ledger, dec!(100)));

    let writers: Vec<_> = (0..THREADS)
        .map(|seed| {
            let ledger = Arc::clone(&ledger);
            let ids = Arc::clone(&ids);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(100 + seed);
                for _ in 0..OPS_PER_THREAD {
                    let id = &ids[rng.random_range(0..ids.len())];
                    let amount = Decimal::from(rng.random_range(0..=80u32));
                    if rng.random_bool(0.5) {
                        let _ = ledger.withdraw(id, amount);
                    } else {
                        let _ = ledger.deposit(id, amount);
                    }
                }
            })
        })
        .collect();

    let reader = {
        let ledger = Arc::clone(&ledger);
        thread::spawn(move || {
            for _ in 0..200 {
                for account in ledger.list_accounts() {
                    assert!(account.balance >= Decimal::ZERO, "{:?}", account);
                }
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    reader.join().unwrap();
}

#[test]
fn test_opposing_transfers_do_not_deadlock() {
    let ledger = ledger();
    ledger.create_account(Account::new("1", dec!(1000))).unwrap();
    ledger.create_account(Account::new("2", dec!(1000))).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let (from, to) = if i % 2 == 0 { ("1", "2") } else { ("2", "1") };
                for _ in 0..OPS_PER_THREAD {
                    // A deadlock would surface as LockTimeout here
                    match ledger.transfer(from, to, dec!(1)) {
                        Ok(()) | Err(LedgerError::InsufficientFunds { .. }) => {}
                        Err(e) => panic!("unexpected transfer error: {}", e),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(total(&ledger), dec!(2000));
}

#[test]
fn test_concurrent_deposits_are_not_lost() {
    let ledger = ledger();
    ledger.create_account(Account::new("42", dec!(0))).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..OPS_PER_THREAD {
                    ledger.deposit("42", dec!(0.01)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(ledger.get_account("42").unwrap().balance, dec!(40.00));
}

#[test]
fn test_concurrent_duplicate_creates_exactly_one_wins() {
    let ledger = ledger();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.create_account(Account::new("777", Decimal::from(i))))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::DuplicateAccount { .. })));
    assert_eq!(ledger.list_accounts().len(), 1);
}
