//! Conditional `Send`/`Sync` bounds for cross-target async code.
//!
//! The credential ceremony and storage traits in this workspace compile for
//! both `wasm32-unknown-unknown` (single-threaded, nothing crosses threads)
//! and native targets (where implementers may be shared across a runtime's
//! worker threads). Writing `Send`/`Sync` bounds directly would over-constrain
//! the WASM build, so generic code bounds on these traits instead: they mean
//! `Send` (respectively `Send + Sync`) natively and nothing at all on WASM.

#[cfg(not(target_arch = "wasm32"))]
mod bounds {
    /// `Send` on native targets; no bound on `wasm32-unknown-unknown`.
    pub trait ConditionalSend: Send {}

    impl<S> ConditionalSend for S where S: Send {}

    /// `Send + Sync` on native targets; no bound on `wasm32-unknown-unknown`.
    pub trait ConditionalSync: Send + Sync {}

    impl<S> ConditionalSync for S where S: Send + Sync {}
}

#[cfg(target_arch = "wasm32")]
mod bounds {
    /// `Send` on native targets; no bound on `wasm32-unknown-unknown`.
    pub trait ConditionalSend {}

    impl<S> ConditionalSend for S {}

    /// `Send + Sync` on native targets; no bound on `wasm32-unknown-unknown`.
    pub trait ConditionalSync {}

    impl<S> ConditionalSync for S {}
}

pub use bounds::*;
