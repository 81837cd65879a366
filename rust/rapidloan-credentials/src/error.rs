//! Error types for passkey operations.

use rapidloan_storage::RapidLoanStorageError;
use thiserror::Error;

/// Errors from decoding an attestation object's binary payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The attestation object (or the embedded COSE key) is not decodable
    /// CBOR.
    #[error("invalid CBOR: {0}")]
    InvalidCbor(String),

    /// The outer attestation map carries no `authData` byte string.
    #[error("attestation object has no authData")]
    MissingAuthData,

    /// The authenticator data ends before a required field.
    #[error("authenticator data truncated ({0} bytes)")]
    Truncated(usize),

    /// The attested-credential-data flag is unset, so no public key is
    /// present. The layout past the header is only meaningful with this flag
    /// set; its absence is a hard failure, not a default.
    #[error("authenticator data carries no attested credential data")]
    AttestedCredentialDataAbsent,

    /// The COSE key map lacks a required coordinate (labels −2 and −3).
    #[error("COSE key is missing the {0} coordinate")]
    MissingCoordinate(&'static str),
}

/// Errors from the credential record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The underlying slot backend failed.
    #[error("credential store: {0}")]
    Slot(#[from] RapidLoanStorageError),

    /// The record list could not be re-serialized for persistence.
    #[error("credential store: failed to serialize records: {0}")]
    Serialize(String),

    /// Duplicate rejection is enabled and this credential id is already
    /// registered.
    #[error("credential {0} is already registered")]
    Duplicate(String),
}

/// Failures surfaced by passkey registration and authentication.
///
/// Every public flow entry point reports failure to its immediate caller
/// through this type. Ceremonies are independent and retryable; nothing here
/// is fatal to the enclosing application and nothing is recovered silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasskeyError {
    /// The platform credential API is unavailable in this environment.
    #[error("passkeys are not supported in this environment")]
    Unsupported,

    /// The attestation object could not be parsed. Fatal to the current
    /// ceremony; never retried automatically.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The platform rejected the ceremony or it timed out.
    #[error(
        "operation not allowed or timed out; use a secure origin (HTTPS or localhost), \
         make sure a user gesture triggered the request, and that the site matches \
         the authenticator"
    )]
    NotAllowed,

    /// Registration only: this authenticator is already bound here.
    #[error("this authenticator is already registered")]
    DuplicateAuthenticator,

    /// Authentication was attempted with an empty credential store.
    #[error("no passkeys found; create one first")]
    NoCredentials,

    /// Registration requires a non-empty username.
    #[error("a username is required")]
    MissingUsername,

    /// Reading or writing credential records failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Any other ceremony failure; the platform's message passes through
    /// unmodified.
    #[error("{0}")]
    Ceremony(String),
}
