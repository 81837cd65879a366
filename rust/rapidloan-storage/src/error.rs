use thiserror::Error;

/// The common error type used by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RapidLoanStorageError {
    /// An error that occurs when working with a slot backend.
    #[error("Slot backend error: {0}")]
    SlotBackend(String),

    /// The storage area backing a slot is unavailable in this environment,
    /// such as `localStorage` in a document with storage disabled.
    #[error("Storage area unavailable: {0}")]
    Unavailable(String),
}
