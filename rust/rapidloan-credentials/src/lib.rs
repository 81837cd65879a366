#![warn(missing_docs)]

//! Passkey (WebAuthn) credential flows for the RapidLoan demo wallet.
//!
//! The heart of the crate is [`PasskeyClient`], which orchestrates credential
//! creation and assertion ceremonies against a [`CredentialPlatform`],
//! extracts the attested P-256 public key out of the authenticator's CBOR
//! attestation object, and records registered credentials through an injected
//! storage slot.
//!
//! On `wasm32-unknown-unknown` the [`WebCredentialPlatform`] adapter drives
//! the browser's `navigator.credentials` API; on other targets callers
//! provide their own [`CredentialPlatform`] implementation (tests use
//! scripted stubs).

mod attestation;
pub use attestation::*;

mod error;
pub use error::*;

mod flow;
pub use flow::*;

mod platform;
pub use platform::*;

mod store;
pub use store::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod web;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use web::*;
