#![warn(missing_docs)]

//! Binary-to-text codec helpers shared by the credential and ledger crates.
//!
//! WebAuthn surfaces binary identifiers (credential ids, user handles) that
//! must travel through JSON and storage slots as text. The interchange format
//! is base64url without padding, the encoding the browser itself applies to
//! challenges inside `clientDataJSON`.
//!
//! # Basic Usage
//!
//! ```rust
//! use rapidloan_encoding::{decode, encode};
//!
//! let credential_id = vec![1, 2, 3, 4];
//! let text = encode(&credential_id);
//! assert_eq!(text, "AQIDBA");
//! assert_eq!(decode(&text).unwrap(), credential_id);
//! ```

mod error;
pub use error::*;

mod codec;
pub use codec::*;

mod buffer;
pub use buffer::*;
