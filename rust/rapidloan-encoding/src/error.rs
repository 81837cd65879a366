use thiserror::Error;

/// The common error type used by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RapidLoanEncodingError {
    /// The input text is not valid base64url.
    ///
    /// Produced when the underlying decode primitive rejects the input, such
    /// as on out-of-alphabet symbols or impossible lengths. No validation
    /// beyond the primitive's own is performed.
    #[error("Failed to decode base64url text: {0}")]
    Base64Decode(base64::DecodeError),
}

impl From<base64::DecodeError> for RapidLoanEncodingError {
    fn from(value: base64::DecodeError) -> Self {
        RapidLoanEncodingError::Base64Decode(value)
    }
}
