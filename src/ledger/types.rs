//! Ledger-specific types and error definitions.

use thiserror::Error;

// Re-export FabricConfig from config module to avoid duplication
pub use crate::config::schema::FabricConfig;

/// Errors that can occur while talking to the ledger network.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Wallet directory missing, unreadable, or identity file malformed.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Requested identity label is not present in the wallet.
    #[error("Identity '{0}' not found in wallet")]
    IdentityNotFound(String),

    /// Connection profile missing, malformed, or missing required entries.
    #[error("Connection profile error: {0}")]
    Profile(String),

    /// Gateway endpoint could not be reached.
    #[error("Gateway connection error: {0}")]
    Connect(String),

    /// Transaction submission was rejected or failed in transit.
    #[error("{0}")]
    Submit(String),

    /// Submission did not settle within the configured deadline.
    #[error("Submission timed out after {0} seconds")]
    Timeout(u64),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
