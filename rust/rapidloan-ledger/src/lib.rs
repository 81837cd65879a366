#![warn(missing_docs)]

//! Mocked Stellar/Soroban ledger client for the RapidLoan demo.
//!
//! The demo runs without a network or a deployed contract: every ledger
//! operation succeeds with synthetic data, and the only state is a
//! contract-id to owner-key map kept in a storage slot. Callers hand the
//! [`MockLedger`] the results of a passkey authentication; nothing here
//! verifies a signature, because the verifier this stands in for lives
//! on-chain.

mod error;
pub use error::*;

mod mock;
pub use mock::*;
