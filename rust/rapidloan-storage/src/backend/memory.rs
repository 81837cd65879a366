use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::RapidLoanStorageError;

use super::SlotBackend;

/// A trivial implementation of [`SlotBackend`] - backed by a [`HashMap`] -
/// where all values are kept in memory and never persisted.
///
/// Clones share the same underlying map, which makes this backend suitable
/// for handing to several consumers in tests.
#[derive(Clone, Default)]
pub struct MemorySlotBackend {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl SlotBackend for MemorySlotBackend {
    type Error = RapidLoanStorageError;

    async fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let slots = self.slots.read().await;
        Ok(slots.get(key).cloned())
    }

    async fn write(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        let mut slots = self.slots.write().await;
        slots.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        let mut slots = self.slots.write().await;
        slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::{MemorySlotBackend, SlotBackend};

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    use wasm_bindgen_test::wasm_bindgen_test;

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_writes_and_reads_a_slot() -> Result<()> {
        let mut backend = MemorySlotBackend::default();

        backend.write("greeting", "hello".into()).await?;

        assert_eq!(backend.read("greeting").await?, Some("hello".into()));
        assert_eq!(backend.read("missing").await?, None);

        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_overwrites_a_slot_whole() -> Result<()> {
        let mut backend = MemorySlotBackend::default();

        backend.write("slot", "first".into()).await?;
        backend.write("slot", "second".into()).await?;

        assert_eq!(backend.read("slot").await?, Some("second".into()));

        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_removes_a_slot() -> Result<()> {
        let mut backend = MemorySlotBackend::default();

        backend.write("slot", "value".into()).await?;
        backend.remove("slot").await?;

        assert_eq!(backend.read("slot").await?, None);

        // Removing an absent slot is a no-op
        backend.remove("slot").await?;

        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_shares_state_between_clones() -> Result<()> {
        let mut writer = MemorySlotBackend::default();
        let reader = writer.clone();

        writer.write("shared", "visible".into()).await?;

        assert_eq!(reader.read("shared").await?, Some("visible".into()));

        Ok(())
    }
}
