use async_trait::async_trait;
use rapidloan_common::ConditionalSend;

use crate::RapidLoanStorageError;

mod memory;
pub use memory::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use local_storage::*;

/// A [`SlotBackend`] is a facade over some durable (or durable-enough)
/// storage substrate that holds text values in named slots.
///
/// Slots are read and overwritten whole; there is no partial update. The
/// consumers in this workspace keep JSON documents in their slots and treat
/// an absent slot the same as an empty document.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait SlotBackend: Clone + ConditionalSend {
    /// The error type produced by this [`SlotBackend`]
    type Error: Into<RapidLoanStorageError>;

    /// Retrieve the value (if any) stored in the given slot
    async fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the given slot with a new value
    async fn write(&mut self, key: &str, value: String) -> Result<(), Self::Error>;

    /// Delete the given slot entirely; deleting an absent slot is a no-op
    async fn remove(&mut self, key: &str) -> Result<(), Self::Error>;
}
