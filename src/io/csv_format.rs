//! CSV and JSON format handling for ledger commands and account output
//!
//! This module centralizes all format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Account output serialization (CSV or JSON)
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::cli::OutputFormat;
use crate::types::{Account, LedgerCommand};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, account, to, amount.
/// `to` is only meaningful for transfers.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub account: String,
    pub to: Option<String>,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// This function:
/// - Parses the operation name (case-insensitive)
/// - Parses the amount string into an exact Decimal
/// - Requires an amount for every operation
/// - Requires a destination account for transfers
///
/// Sign and id validation are left to the ledger, which reports them as
/// typed errors.
///
/// # Returns
///
/// * `Ok(LedgerCommand)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, String> {
    let op = csv_record.op.trim().to_lowercase();
    let account = csv_record.account.trim().to_string();

    let amount = match csv_record.amount.as_deref().map(str::trim) {
        Some(amount_str) if !amount_str.is_empty() => Decimal::from_str(amount_str)
            .map_err(|_| format!("Invalid amount '{}' for {} on account {}", amount_str, op, account))?,
        _ => return Err(format!("{} on account {} requires an amount", op, account)),
    };

    match op.as_str() {
        "create" => Ok(LedgerCommand::Create {
            account_id: account,
            balance: amount,
        }),
        "deposit" => Ok(LedgerCommand::Deposit {
            account_id: account,
            amount,
        }),
        "withdraw" | "withdrawal" => Ok(LedgerCommand::Withdraw {
            account_id: account,
            amount,
        }),
        "transfer" => {
            let to = csv_record
                .to
                .as_deref()
                .map(str::trim)
                .filter(|to| !to.is_empty())
                .ok_or_else(|| format!("transfer from account {} requires a destination", account))?;
            Ok(LedgerCommand::Transfer {
                from: account,
                to: to.to_string(),
                amount,
            })
        }
        _ => Err(format!(
            "Invalid operation: '{}' for account {}",
            csv_record.op, account
        )),
    }
}

/// Sort accounts by id for deterministic output
fn sorted(accounts: &[Account]) -> Vec<&Account> {
    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));
    sorted_accounts
}

/// Write account states to CSV format
///
/// Writes accounts with columns: account, balance. Accounts are sorted by id
/// and balances are printed exactly, keeping their decimal scale.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for account in sorted(accounts) {
        writer
            .write_record([account.account_id.as_str(), &account.balance.to_string()])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write account states as a JSON array
///
/// Each element has the shape `{"accountId":"...","balance":...}`, sorted by
/// id. The output ends with a newline.
pub fn write_accounts_json(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    serde_json::to_writer(&mut *output, &sorted(accounts))
        .map_err(|e| format!("Failed to write JSON output: {}", e))?;
    writeln!(output).map_err(|e| format!("Failed to write JSON output: {}", e))?;
    output
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write account states in the requested format
pub fn write_accounts(
    accounts: &[Account],
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), String> {
    match format {
        OutputFormat::Csv => write_accounts_csv(accounts, output),
        OutputFormat::Json => write_accounts_json(accounts, output),
    }
}
