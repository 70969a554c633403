//! Core traits for the ledger's external collaborators
//!
//! The ledger reports every committed mutation through a [`Notifier`]. The
//! concrete delivery mechanism (email, message bus, log line) lives outside the
//! core and is injected at construction time.

use crate::types::{Account, NotificationError};

/// Post-mutation notification hook
///
/// Called after a balance change has been committed and the account locks have
/// been released. Implementations must be cheap to share across threads.
///
/// A returned error is logged by the ledger and otherwise ignored: the balance
/// change it describes is already final.
pub trait Notifier: Send + Sync {
    /// Report a committed change to `account`
    ///
    /// # Arguments
    ///
    /// * `account` - Snapshot of the account right after the mutation
    /// * `message` - Human-readable description, e.g. `"500 transfer to 111"`
    fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError>;
}
