//! Built-in notification hooks

use super::traits::Notifier;
use crate::types::{Account, NotificationError};

/// Notifier that records each notification as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError> {
        tracing::info!(
            account_id = %account.account_id,
            balance = %account.balance,
            "notification:{}",
            message
        );
        Ok(())
    }
}

/// Notifier that drops every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _account: &Account, _message: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}
