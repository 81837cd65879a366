use async_trait::async_trait;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::RapidLoanStorageError;

use super::SlotBackend;

/// A [`SlotBackend`] implementation over the browser's `window.localStorage`.
///
/// This is where the demo keeps its credential records and mock-ledger state
/// between page loads. All operations are synchronous under the hood; the
/// async signatures exist to match the shared [`SlotBackend`] contract.
#[derive(Clone)]
pub struct LocalStorageSlotBackend {
    storage: Storage,
}

impl LocalStorageSlotBackend {
    /// Creates a new [`LocalStorageSlotBackend`] over the current window's
    /// local storage area.
    ///
    /// # Errors
    ///
    /// Fails when there is no window (for example, inside a worker) or when
    /// the document has storage access disabled.
    pub fn new() -> Result<Self, RapidLoanStorageError> {
        let window = web_sys::window()
            .ok_or_else(|| RapidLoanStorageError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|error| RapidLoanStorageError::Unavailable(describe(&error)))?
            .ok_or_else(|| RapidLoanStorageError::Unavailable("localStorage disabled".into()))?;
        Ok(LocalStorageSlotBackend { storage })
    }
}

#[async_trait(?Send)]
impl SlotBackend for LocalStorageSlotBackend {
    type Error = RapidLoanStorageError;

    async fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|error| RapidLoanStorageError::SlotBackend(describe(&error)))
    }

    async fn write(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        self.storage
            .set_item(key, &value)
            .map_err(|error| RapidLoanStorageError::SlotBackend(describe(&error)))
    }

    async fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        self.storage
            .remove_item(key)
            .map_err(|error| RapidLoanStorageError::SlotBackend(describe(&error)))
    }
}

fn describe(error: &JsValue) -> String {
    error
        .as_string()
        .unwrap_or_else(|| format!("{error:?}"))
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    use crate::{LocalStorageSlotBackend, SlotBackend};

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn it_round_trips_a_slot_through_local_storage() {
        let mut backend = LocalStorageSlotBackend::new().unwrap();

        backend
            .write("rapidloan-test-slot", "persisted".into())
            .await
            .unwrap();
        assert_eq!(
            backend.read("rapidloan-test-slot").await.unwrap(),
            Some("persisted".into())
        );

        backend.remove("rapidloan-test-slot").await.unwrap();
        assert_eq!(backend.read("rapidloan-test-slot").await.unwrap(), None);
    }
}
