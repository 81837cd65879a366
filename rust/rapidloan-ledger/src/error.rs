use rapidloan_storage::RapidLoanStorageError;
use thiserror::Error;

/// The common error type used by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The state slot backend failed.
    #[error("ledger state slot: {0}")]
    Slot(#[from] RapidLoanStorageError),

    /// Mock state could not be serialized for persistence.
    #[error("ledger state could not be serialized: {0}")]
    State(String),

    /// A stored owner key is not valid hex.
    #[error("stored owner key is not valid hex: {0}")]
    InvalidStoredKey(String),
}
