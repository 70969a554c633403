//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! ledger commands concurrently while producing the same final state as running
//! them one by one in file order.
//!
//! # Design
//!
//! A batch is split into groups such that no two groups touch a common account.
//! A transfer links its two accounts, so every command that (transitively)
//! shares an account with another lands in the same group. Groups run
//! concurrently as tokio tasks; commands inside a group run sequentially in
//! their original order.
//!
//! ```text
//! batch:  create 1 | create 2 | create 3 | transfer 1→2 | deposit 3
//! groups: [create 1, create 2, transfer 1→2]   [create 3, deposit 3]
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be shared across async tasks. The
//! underlying `Ledger` locks accounts itself, so partitioning is about
//! preserving order, not about safety.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::ledger::Ledger;
use crate::types::{LedgerCommand, LedgerError};

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub command: LedgerCommand,

    /// The outcome (success or error)
    pub result: Result<(), LedgerError>,
}

/// Batch processor with account-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared ledger
    ledger: Arc<Ledger>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Partition a batch into groups of commands with disjoint account sets
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one group
    /// - Commands sharing an account (directly or through transfers) share a group
    /// - Commands keep their original relative order inside a group
    /// - Groups are ordered by the position of their first command
    pub fn partition_by_accounts(&self, batch: Vec<LedgerCommand>) -> Vec<Vec<LedgerCommand>> {
        let mut parent: Vec<usize> = (0..batch.len()).collect();
        {
            let mut first_seen: HashMap<&str, usize> = HashMap::new();
            for (index, command) in batch.iter().enumerate() {
                for account_id in command.account_ids() {
                    match first_seen.entry(account_id) {
                        Entry::Occupied(seen) => union(&mut parent, index, *seen.get()),
                        Entry::Vacant(slot) => {
                            slot.insert(index);
                        }
                    }
                }
            }
        }

        let roots: Vec<usize> = (0..batch.len()).map(|i| find(&mut parent, i)).collect();

        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<LedgerCommand>> = Vec::new();
        for (command, root) in batch.into_iter().zip(roots) {
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(command);
        }

        debug!(groups = groups.len(), "partitioned batch");
        groups
    }

    /// Run one group of commands sequentially
    ///
    /// Every command runs even if earlier ones fail. Results keep input order.
    pub fn process_group(&self, commands: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        commands
            .into_iter()
            .map(|command| {
                let result = self.ledger.execute(&command);
                if let Err(e) = &result {
                    warn!(command = command.kind(), "command rejected: {}", e);
                }
                ProcessingResult { command, result }
            })
            .collect()
    }

    /// Process a batch of commands with account-based partitioning
    ///
    /// This method:
    /// 1. Partitions the batch into account-disjoint groups
    /// 2. Spawns one tokio task per group
    /// 3. Waits for all tasks and collects their results
    ///
    /// Results of different groups may interleave in any order.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let groups = self.partition_by_accounts(batch);

        let mut tasks = Vec::with_capacity(groups.len());
        for commands in groups {
            let processor = self.clone();
            tasks.push(tokio::spawn(
                async move { processor.process_group(commands) },
            ));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => error!("Task panicked: {:?}", e),
            }
        }

        results
    }
}

fn find(parent: &mut [usize], mut index: usize) -> usize {
    while parent[index] != index {
        parent[index] = parent[parent[index]];
        index = parent[index];
    }
    index
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        // Keep the earlier command as root so group order follows the file
        let (low, high) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        parent[high] = low;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccountStore, LedgerConfig, NoopNotifier};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn processor() -> (BatchProcessor, Arc<Ledger>) {
        let ledger = Arc::new(Ledger::new(
            Arc::new(AccountStore::new()),
            Arc::new(NoopNotifier),
            LedgerConfig::default(),
        ));
        (BatchProcessor::new(Arc::clone(&ledger)), ledger)
    }

    fn create(id: &str, balance: Decimal) -> LedgerCommand {
        LedgerCommand::Create {
            account_id: id.to_string(),
            balance,
        }
    }

    fn deposit(id: &str, amount: Decimal) -> LedgerCommand {
        LedgerCommand::Deposit {
            account_id: id.to_string(),
            amount,
        }
    }

    fn withdraw(id: &str, amount: Decimal) -> LedgerCommand {
        LedgerCommand::Withdraw {
            account_id: id.to_string(),
            amount,
        }
    }

    fn transfer(from: &str, to: &str, amount: Decimal) -> LedgerCommand {
        LedgerCommand::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn test_partition_empty_batch() {
        let (processor, _) = processor();
        assert!(processor.partition_by_accounts(vec![]).is_empty());
    }

    #[test]
    fn test_partition_independent_accounts() {
        let (processor, _) = processor();

        let groups = processor.partition_by_accounts(vec![
            deposit("1", dec!(1)),
            deposit("2", dec!(2)),
            deposit("1", dec!(3)),
            deposit("3", dec!(4)),
        ]);

        assert_eq!(
            groups,
            vec![
                vec![deposit("1", dec!(1)), deposit("1", dec!(3))],
                vec![deposit("2", dec!(2))],
                vec![deposit("3", dec!(4))],
            ]
        );
    }

    #[test]
    fn test_partition_transfer_links_groups() {
        let (processor, _) = processor();

        let groups = processor.partition_by_accounts(vec![
            create("1", dec!(10)),
            create("2", dec!(10)),
            create("3", dec!(10)),
            transfer("1", "2", dec!(5)),
            deposit("3", dec!(1)),
        ]);

        assert_eq!(
            groups,
            vec![
                vec![
                    create("1", dec!(10)),
                    create("2", dec!(10)),
                    transfer("1", "2", dec!(5)),
                ],
                vec![create("3", dec!(10)), deposit("3", dec!(1))],
            ]
        );
    }

    #[test]
    fn test_partition_transitive_chain() {
        let (processor, _) = processor();

        let groups = processor.partition_by_accounts(vec![
            deposit("1", dec!(1)),
            deposit("3", dec!(1)),
            transfer("1", "2", dec!(1)),
            transfer("2", "3", dec!(1)),
            deposit("4", dec!(1)),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 4);
        assert_eq!(groups[0][0], deposit("1", dec!(1)));
        assert_eq!(groups[0][1], deposit("3", dec!(1)));
        assert_eq!(groups[1], vec![deposit("4", dec!(1))]);
    }

    #[test]
    fn test_process_group_continues_after_errors() {
        let (processor, ledger) = processor();

        let results = processor.process_group(vec![
            create("1", dec!(10)),
            withdraw("1", dec!(50)),
            deposit("1", dec!(5)),
        ]);

        assert_eq!(results.len(), 3);
        assert!(results[0].result.is_ok());
        assert!(matches!(
            results[1].result,
            Err(LedgerError::InsufficientFunds { .. })
        ));
        assert!(results[2].result.is_ok());
        assert_eq!(ledger.get_account("1").unwrap().balance, dec!(15));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_matches_sequential_order() {
        let (processor, ledger) = processor();

        let batch = vec![
            create("1", dec!(100)),
            create("2", dec!(0)),
            create("3", dec!(50)),
            // Only succeeds if the deposit below has not run yet
            withdraw("3", dec!(50)),
            transfer("1", "2", dec!(60)),
            deposit("3", dec!(7)),
            // Fails because 1 only has 40 left after the transfer
            transfer("1", "2", dec!(60)),
        ];

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 7);
        assert_eq!(results.iter().filter(|r| r.result.is_err()).count(), 1);
        assert_eq!(ledger.get_account("1").unwrap().balance, dec!(40));
        assert_eq!(ledger.get_account("2").unwrap().balance, dec!(60));
        assert_eq!(ledger.get_account("3").unwrap().balance, dec!(7));
    }
}
