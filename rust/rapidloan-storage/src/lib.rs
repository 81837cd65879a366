#![warn(missing_docs)]

//! Generalized key-value slot storage for the RapidLoan demo crates.
//!
//! Credential records and mock-ledger state both live in single named slots
//! holding JSON text. This crate provides the [`SlotBackend`] abstraction
//! those consumers are injected with, so the same code runs against an
//! in-memory map under test and against `window.localStorage` in a browser.

mod error;
pub use error::*;

mod backend;
pub use backend::*;
