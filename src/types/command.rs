//! Ledger command types
//!
//! A `LedgerCommand` is one parsed request against the ledger, as read from a
//! command file by the CLI driver.

use super::account::AccountId;
use rust_decimal::Decimal;

/// A single operation to run against the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Open a new account with an initial balance
    Create {
        account_id: AccountId,
        balance: Decimal,
    },

    /// Credit funds to an existing account
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },

    /// Debit funds from an existing account
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },

    /// Move funds between two existing accounts
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

impl LedgerCommand {
    /// Short lowercase name of the operation, as written in command files
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerCommand::Create { .. } => "create",
            LedgerCommand::Deposit { .. } => "deposit",
            LedgerCommand::Withdraw { .. } => "withdraw",
            LedgerCommand::Transfer { .. } => "transfer",
        }
    }

    /// Every account id this command reads or writes
    ///
    /// Used to group commands that must run in file order.
    pub fn account_ids(&self) -> Vec<&str> {
        match self {
            LedgerCommand::Create { account_id, .. }
            | LedgerCommand::Deposit { account_id, .. }
            | LedgerCommand::Withdraw { account_id, .. } => vec![account_id.as_str()],
            LedgerCommand::Transfer { from, to, .. } => vec![from.as_str(), to.as_str()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case(LedgerCommand::Create { account_id: "1".into(), balance: Decimal::ZERO }, "create", vec!["1"])]
    #[case(LedgerCommand::Deposit { account_id: "2".into(), amount: Decimal::ONE }, "deposit", vec!["2"])]
    #[case(LedgerCommand::Withdraw { account_id: "3".into(), amount: Decimal::ONE }, "withdraw", vec!["3"])]
    #[case(LedgerCommand::Transfer { from: "4".into(), to: "5".into(), amount: Decimal::ONE }, "transfer", vec!["4", "5"])]
    fn test_kind_and_account_ids(
        #[case] command: LedgerCommand,
        #[case] kind: &str,
        #[case] ids: Vec<&str>,
    ) {
        assert_eq!(command.kind(), kind);
        assert_eq!(command.account_ids(), ids);
    }
}
