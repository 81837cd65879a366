//! Durable credential records.

use rapidloan_storage::{RapidLoanStorageError, SlotBackend};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// The fixed slot the record list persists under.
pub const CREDENTIAL_SLOT_KEY: &str = "passkey-credentials";

/// One registered passkey, as persisted.
///
/// Serialized field names stay camelCase for compatibility with record lists
/// written by earlier drafts of the demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// base64url-encoded credential id from the authenticator.
    pub credential_id: String,
    /// The username supplied at registration.
    pub username: String,
    /// base64url-encoded user handle.
    pub user_id: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// An append-only list of [`CredentialRecord`]s kept whole in a single
/// storage slot.
///
/// Registration appends, authentication reads, and the only removal is a
/// whole-store [`clear`](CredentialStore::clear). The backing slot is
/// injected, so tests run against an in-memory backend and the browser runs
/// against localStorage.
#[derive(Clone)]
pub struct CredentialStore<B> {
    backend: B,
    reject_duplicates: bool,
}

impl<B> CredentialStore<B>
where
    B: SlotBackend,
{
    /// Creates a store over the given backend. Duplicate credential ids are
    /// accepted, matching the demo's historical behavior.
    pub fn new(backend: B) -> Self {
        CredentialStore {
            backend,
            reject_duplicates: false,
        }
    }

    /// Toggles rejection of duplicate credential ids on append.
    #[must_use]
    pub fn with_dedup(mut self, reject_duplicates: bool) -> Self {
        self.reject_duplicates = reject_duplicates;
        self
    }

    /// Loads every stored record.
    ///
    /// An absent slot and an unparseable slot both read as an empty list;
    /// the demo treats corrupt state as no state.
    pub async fn load(&self) -> Result<Vec<CredentialRecord>, StoreError> {
        let Some(raw) = self
            .backend
            .read(CREDENTIAL_SLOT_KEY)
            .await
            .map_err(slot_error)?
        else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    /// Appends one record, rewriting the whole list.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::Duplicate`] when duplicate rejection is
    /// enabled and the credential id is already present.
    pub async fn append(&mut self, record: CredentialRecord) -> Result<(), StoreError> {
        let mut records = self.load().await?;
        if self.reject_duplicates
            && records
                .iter()
                .any(|existing| existing.credential_id == record.credential_id)
        {
            return Err(StoreError::Duplicate(record.credential_id));
        }
        records.push(record);
        let raw = serde_json::to_string(&records)
            .map_err(|error| StoreError::Serialize(error.to_string()))?;
        self.backend
            .write(CREDENTIAL_SLOT_KEY, raw)
            .await
            .map_err(slot_error)
    }

    /// Removes every stored record.
    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.backend
            .remove(CREDENTIAL_SLOT_KEY)
            .await
            .map_err(slot_error)
    }
}

fn slot_error<E>(error: E) -> StoreError
where
    E: Into<RapidLoanStorageError>,
{
    StoreError::Slot(error.into())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rapidloan_storage::{MemorySlotBackend, SlotBackend};

    use super::*;

    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    use wasm_bindgen_test::wasm_bindgen_test;

    fn record(credential_id: &str, username: &str) -> CredentialRecord {
        CredentialRecord {
            credential_id: credential_id.into(),
            username: username.into(),
            user_id: "dXNlcg".into(),
            created_at: "2026-08-04T12:00:00+00:00".into(),
        }
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_loads_an_absent_slot_as_empty() -> Result<()> {
        let store = CredentialStore::new(MemorySlotBackend::default());
        assert_eq!(store.load().await?, Vec::new());
        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_appends_and_persists_camel_case_json() -> Result<()> {
        let backend = MemorySlotBackend::default();
        let mut store = CredentialStore::new(backend.clone());

        store.append(record("AQIDBA", "demo")).await?;

        let raw = backend.read(CREDENTIAL_SLOT_KEY).await?.unwrap();
        assert!(raw.contains("\"credentialId\":\"AQIDBA\""));
        assert!(raw.contains("\"createdAt\""));
        assert!(raw.contains("\"userId\""));

        assert_eq!(store.load().await?, vec![record("AQIDBA", "demo")]);
        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_reads_corrupt_state_as_empty() -> Result<()> {
        let mut backend = MemorySlotBackend::default();
        backend
            .write(CREDENTIAL_SLOT_KEY, "{definitely not json".into())
            .await?;

        let store = CredentialStore::new(backend);
        assert_eq!(store.load().await?, Vec::new());
        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_clears_all_records() -> Result<()> {
        let backend = MemorySlotBackend::default();
        let mut store = CredentialStore::new(backend.clone());

        store.append(record("AQIDBA", "demo")).await?;
        store.clear().await?;

        assert_eq!(store.load().await?, Vec::new());
        assert_eq!(backend.read(CREDENTIAL_SLOT_KEY).await?, None);
        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_accepts_duplicates_by_default() -> Result<()> {
        let mut store = CredentialStore::new(MemorySlotBackend::default());

        store.append(record("AQIDBA", "demo")).await?;
        store.append(record("AQIDBA", "demo")).await?;

        assert_eq!(store.load().await?.len(), 2);
        Ok(())
    }

    #[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_rejects_duplicates_when_configured() -> Result<()> {
        let mut store = CredentialStore::new(MemorySlotBackend::default()).with_dedup(true);

        store.append(record("AQIDBA", "demo")).await?;
        let result = store.append(record("AQIDBA", "other")).await;

        assert_eq!(result, Err(StoreError::Duplicate("AQIDBA".into())));
        assert_eq!(store.load().await?.len(), 1);
        Ok(())
    }
}
