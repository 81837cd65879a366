//! Canned Soroban-style ledger operations over a storage slot.

use std::collections::BTreeMap;

use rapidloan_storage::{RapidLoanStorageError, SlotBackend};
use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// The fixed slot mock state persists under.
pub const LEDGER_SLOT_KEY: &str = "ledger-mock-state";

/// The ledger-sequence horizon every auth entry reports.
const LAST_LEDGER: u32 = 12_345;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerState {
    #[serde(default)]
    contracts: BTreeMap<String, ContractEntry>,
    #[serde(default)]
    sequence: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractEntry {
    owner_public_key: String,
}

/// A challenge wrapped for signing, as a real RPC layer would return it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEntry {
    /// The bytes the caller is expected to sign; the mock echoes the
    /// challenge unchanged.
    pub auth_hash: Vec<u8>,
    /// Last ledger sequence the entry stays valid through.
    pub last_ledger: u32,
}

/// The assertion material handed over after a passkey authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAssertion {
    /// Authenticator data covered by the signature.
    pub authenticator_data: Vec<u8>,
    /// Serialized client data covered by the signature.
    pub client_data_json: Vec<u8>,
    /// The assertion signature.
    pub signature: Vec<u8>,
}

/// A canned submission receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Synthetic transaction id.
    pub transaction_id: String,
    /// The contract address the submission targeted.
    pub account_address: String,
}

/// A mock ledger client.
///
/// Synthetic ids come from a persisted monotone sequence rather than the
/// wall clock, so repeated runs against the same slot stay deterministic.
#[derive(Clone)]
pub struct MockLedger<B> {
    backend: B,
}

impl<B> MockLedger<B>
where
    B: SlotBackend,
{
    /// Creates a mock ledger over the given state slot backend.
    pub fn new(backend: B) -> Self {
        MockLedger { backend }
    }

    /// "Deploys" an account contract bound to the given public key and
    /// returns its synthetic contract id.
    pub async fn deploy_account(&mut self, public_key: &[u8]) -> Result<String, LedgerError> {
        let mut state = self.load_state().await?;
        state.sequence += 1;
        let contract_id = format!("GMOCK{:012X}", state.sequence);
        state.contracts.insert(
            contract_id.clone(),
            ContractEntry {
                owner_public_key: hex_encode(public_key),
            },
        );
        self.save_state(&state).await?;
        tracing::info!(contract = %contract_id, "mock account contract deployed");
        Ok(contract_id)
    }

    /// Wraps a ceremony challenge as a signable auth entry. The mock echoes
    /// the challenge bytes as the auth hash with a fixed ledger horizon.
    pub fn build_auth_transaction(&self, _contract_id: &str, challenge: &[u8]) -> AuthEntry {
        AuthEntry {
            auth_hash: challenge.to_vec(),
            last_ledger: LAST_LEDGER,
        }
    }

    /// "Submits" a signed assertion, returning a canned success receipt.
    ///
    /// The assertion content is not inspected.
    pub async fn submit_assertion(
        &mut self,
        contract_id: &str,
        _assertion: &SignedAssertion,
    ) -> Result<Receipt, LedgerError> {
        let mut state = self.load_state().await?;
        state.sequence += 1;
        let receipt = Receipt {
            transaction_id: format!("mock-tx-{}", state.sequence),
            account_address: contract_id.to_owned(),
        };
        self.save_state(&state).await?;
        tracing::info!(transaction = %receipt.transaction_id, "mock assertion submitted");
        Ok(receipt)
    }

    /// Fetches the public key a contract was deployed with, when the
    /// contract exists.
    pub async fn owner_public_key(&self, contract_id: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let state = self.load_state().await?;
        let Some(entry) = state.contracts.get(contract_id) else {
            return Ok(None);
        };
        hex_decode(&entry.owner_public_key).map(Some)
    }

    async fn load_state(&self) -> Result<LedgerState, LedgerError> {
        let Some(raw) = self.backend.read(LEDGER_SLOT_KEY).await.map_err(slot_error)? else {
            return Ok(LedgerState::default());
        };
        // Corrupt state reads as fresh state, like the rest of the demo.
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    async fn save_state(&mut self, state: &LedgerState) -> Result<(), LedgerError> {
        let raw =
            serde_json::to_string(state).map_err(|error| LedgerError::State(error.to_string()))?;
        self.backend
            .write(LEDGER_SLOT_KEY, raw)
            .await
            .map_err(slot_error)
    }
}

fn slot_error<E>(error: E) -> LedgerError
where
    E: Into<RapidLoanStorageError>,
{
    LedgerError::Slot(error.into())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn hex_decode(text: &str) -> Result<Vec<u8>, LedgerError> {
    if text.len() % 2 != 0 {
        return Err(LedgerError::InvalidStoredKey(text.to_owned()));
    }
    (0..text.len())
        .step_by(2)
        .map(|index| {
            u8::from_str_radix(&text[index..index + 2], 16)
                .map_err(|_| LedgerError::InvalidStoredKey(text.to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rapidloan_storage::{MemorySlotBackend, SlotBackend};

    use super::*;

    #[tokio::test]
    async fn it_round_trips_an_owner_key_through_deployment() -> Result<()> {
        let mut ledger = MockLedger::new(MemorySlotBackend::default());

        let contract_id = ledger.deploy_account(&[0xAB; 64]).await?;
        let owner = ledger.owner_public_key(&contract_id).await?;

        assert_eq!(owner, Some(vec![0xAB; 64]));
        Ok(())
    }

    #[tokio::test]
    async fn it_issues_distinct_contract_ids() -> Result<()> {
        let mut ledger = MockLedger::new(MemorySlotBackend::default());

        let first = ledger.deploy_account(&[1; 64]).await?;
        let second = ledger.deploy_account(&[2; 64]).await?;

        assert_ne!(first, second);
        assert!(first.starts_with("GMOCK"));
        Ok(())
    }

    #[tokio::test]
    async fn it_answers_none_for_unknown_contracts() -> Result<()> {
        let ledger = MockLedger::new(MemorySlotBackend::default());
        assert_eq!(ledger.owner_public_key("GMOCKFFFFFFFFFFFF").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn it_echoes_the_challenge_in_the_auth_entry() {
        let ledger = MockLedger::new(MemorySlotBackend::default());

        let entry = ledger.build_auth_transaction("GMOCK000000000001", &[7; 32]);

        assert_eq!(entry.auth_hash, vec![7; 32]);
        assert_eq!(entry.last_ledger, 12_345);
    }

    #[tokio::test]
    async fn it_returns_a_canned_receipt_for_submissions() -> Result<()> {
        let mut ledger = MockLedger::new(MemorySlotBackend::default());
        let contract_id = ledger.deploy_account(&[3; 64]).await?;

        let assertion = SignedAssertion {
            authenticator_data: vec![1],
            client_data_json: vec![2],
            signature: vec![3],
        };
        let receipt = ledger.submit_assertion(&contract_id, &assertion).await?;

        assert!(receipt.transaction_id.starts_with("mock-tx-"));
        assert_eq!(receipt.account_address, contract_id);
        Ok(())
    }

    #[tokio::test]
    async fn it_persists_state_across_clients_sharing_a_backend() -> Result<()> {
        let backend = MemorySlotBackend::default();
        let contract_id = {
            let mut ledger = MockLedger::new(backend.clone());
            ledger.deploy_account(&[0x42; 64]).await?
        };

        let ledger = MockLedger::new(backend);
        assert_eq!(
            ledger.owner_public_key(&contract_id).await?,
            Some(vec![0x42; 64])
        );
        Ok(())
    }

    #[tokio::test]
    async fn it_treats_corrupt_state_as_fresh() -> Result<()> {
        let mut backend = MemorySlotBackend::default();
        backend.write(LEDGER_SLOT_KEY, "][".into()).await?;

        let mut ledger = MockLedger::new(backend);
        let contract_id = ledger.deploy_account(&[9; 64]).await?;

        assert_eq!(contract_id, "GMOCK000000000001");
        Ok(())
    }

    #[tokio::test]
    async fn it_rejects_a_corrupt_stored_owner_key() -> Result<()> {
        let mut backend = MemorySlotBackend::default();
        let state = serde_json::json!({
            "contracts": { "GMOCK000000000001": { "ownerPublicKey": "abc" } },
            "sequence": 1,
        });
        backend.write(LEDGER_SLOT_KEY, state.to_string()).await?;

        let ledger = MockLedger::new(backend);
        let result = ledger.owner_public_key("GMOCK000000000001").await;

        assert_eq!(result, Err(LedgerError::InvalidStoredKey("abc".into())));
        Ok(())
    }
}
