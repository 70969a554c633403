//! Ledger configuration
//!
//! Runtime knobs for the ledger core. Values come from defaults, the
//! environment, or CLI flags (which take precedence).

use std::env;
use std::time::Duration;

/// Environment variable overriding the lock acquisition timeout (milliseconds)
pub const LOCK_TIMEOUT_ENV: &str = "LEDGER_LOCK_TIMEOUT_MS";

/// Default time to wait for an account lock before failing with `LockTimeout`
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the ledger core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Maximum time to wait for a single account lock
    pub lock_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl LedgerConfig {
    /// Create a configuration with a custom lock timeout
    ///
    /// A zero timeout falls back to the default.
    pub fn new(lock_timeout: Duration) -> Self {
        if lock_timeout.is_zero() {
            tracing::warn!(
                "Invalid lock timeout (0ms), using default ({}ms)",
                DEFAULT_LOCK_TIMEOUT.as_millis()
            );
            return Self::default();
        }
        Self { lock_timeout }
    }

    /// Build a configuration from `LEDGER_LOCK_TIMEOUT_MS`, falling back to defaults
    pub fn from_env() -> Self {
        match env::var(LOCK_TIMEOUT_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
        {
            Some(ms) => Self::new(Duration::from_millis(ms)),
            None => Self::default(),
        }
    }

    /// Lock timeout in whole milliseconds, as reported in errors
    pub fn lock_timeout_ms(&self) -> u64 {
        u64::try_from(self.lock_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}
