//! Passkey registration and authentication flows.
//!
//! [`PasskeyClient`] is the orchestration layer: it builds ceremony options,
//! hands them to a [`CredentialPlatform`], and turns the platform's answers
//! into encoded credential ids, extracted public keys, and stored records.
//! Each call is one independent ceremony whose single suspension point is
//! the platform's user-presence UI.

use rapidloan_storage::SlotBackend;

use crate::{
    AuthenticatorSelection, CeremonyError, CeremonyErrorKind, CreatedCredential, CreationOptions,
    CredentialDescriptor, CredentialPlatform, CredentialRecord, CredentialStore, ES256,
    PasskeyError, RawPublicKey, RelyingParty, RequestOptions, UserEntity, extract_public_key,
};

/// Ceremony challenge length in bytes.
const CHALLENGE_LEN: usize = 32;

/// User handle length in bytes.
const USER_HANDLE_LEN: usize = 16;

/// Flow configuration, captured once at client construction.
#[derive(Debug, Clone)]
pub struct PasskeyConfig {
    /// Relying party display name; always sent.
    pub rp_name: String,
    /// The active origin's hostname, when known. Whether ceremonies carry an
    /// explicit relying-party id derives from this once, at construction,
    /// rather than being re-probed per call.
    pub hostname: Option<String>,
    /// Ceremony timeout in milliseconds.
    pub timeout_ms: u32,
    /// Reject registrations whose credential id is already stored.
    pub reject_duplicate_ids: bool,
}

impl PasskeyConfig {
    /// Standard configuration for the given relying party name and origin
    /// hostname: 60 second ceremonies, duplicate credential ids accepted.
    pub fn new(rp_name: impl Into<String>, hostname: Option<String>) -> Self {
        PasskeyConfig {
            rp_name: rp_name.into(),
            hostname,
            timeout_ms: 60_000,
            reject_duplicate_ids: false,
        }
    }
}

/// The outcome of a successful registration ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// base64url-encoded credential id.
    pub credential_id: String,
    /// Raw P-256 coordinates extracted from the attestation object.
    pub public_key: RawPublicKey,
}

/// The outcome of a successful authentication ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    /// base64url-encoded credential id the authenticator answered with.
    pub credential_id: String,
    /// The assertion signature, for the caller to hand to a ledger client.
    pub signature: Vec<u8>,
    /// The username of the matching stored record, falling back to the
    /// base64url-encoded raw user handle when no record matches.
    pub user_handle: Option<String>,
}

/// Orchestrates passkey ceremonies against a [`CredentialPlatform`] and
/// records the results in a [`CredentialStore`].
///
/// Registration is the only operation that mutates the store;
/// authentication only reads it.
pub struct PasskeyClient<P, B> {
    platform: P,
    store: CredentialStore<B>,
    config: PasskeyConfig,
}

impl<P, B> PasskeyClient<P, B>
where
    P: CredentialPlatform,
    B: SlotBackend,
{
    /// Creates a client over the given platform adapter and record slot.
    pub fn new(platform: P, backend: B, config: PasskeyConfig) -> Self {
        let store = CredentialStore::new(backend).with_dedup(config.reject_duplicate_ids);
        PasskeyClient {
            platform,
            store,
            config,
        }
    }

    /// The credential store this client records into.
    pub fn store(&self) -> &CredentialStore<B> {
        &self.store
    }

    /// Mutable access to the store, for whole-store maintenance such as
    /// [`clear`](CredentialStore::clear).
    pub fn store_mut(&mut self) -> &mut CredentialStore<B> {
        &mut self.store
    }

    /// Register a new passkey for `username`.
    ///
    /// Issues a fresh challenge and user handle, runs the platform's
    /// creation ceremony, extracts the attested public key, and appends a
    /// [`CredentialRecord`] on success.
    ///
    /// # Errors
    ///
    /// See [`PasskeyError`]; a dismissed or expired prompt maps to
    /// [`PasskeyError::NotAllowed`] and an already-bound authenticator to
    /// [`PasskeyError::DuplicateAuthenticator`].
    pub async fn register(&mut self, username: &str) -> Result<Registration, PasskeyError> {
        if username.trim().is_empty() {
            return Err(PasskeyError::MissingUsername);
        }

        let challenge = fresh_bytes::<CHALLENGE_LEN>()?;
        let user_handle = fresh_bytes::<USER_HANDLE_LEN>()?;

        let options = CreationOptions {
            challenge: challenge.to_vec(),
            relying_party: RelyingParty {
                id: self.rp_id().map(str::to_owned),
                name: self.config.rp_name.clone(),
            },
            user: UserEntity {
                id: user_handle.to_vec(),
                name: username.to_owned(),
                display_name: username.to_owned(),
            },
            algorithms: vec![ES256],
            authenticator_selection: AuthenticatorSelection {
                resident_key: "discouraged",
                user_verification: "preferred",
            },
            timeout_ms: self.config.timeout_ms,
            attestation: "none",
        };

        tracing::debug!(username, "starting passkey registration");
        let created: CreatedCredential = self
            .platform
            .create(options)
            .await
            .map_err(registration_error)?;

        let credential_id = rapidloan_encoding::encode(&created.raw_id);
        let public_key = extract_public_key(&created.attestation_object)?;

        self.store
            .append(CredentialRecord {
                credential_id: credential_id.clone(),
                username: username.to_owned(),
                user_id: rapidloan_encoding::encode(user_handle),
                created_at: timestamp(),
            })
            .await?;

        tracing::info!(credential = %credential_id, "passkey registered");
        Ok(Registration {
            credential_id,
            public_key,
        })
    }

    /// Authenticate against any stored passkey.
    ///
    /// Loads the store first and fails with [`PasskeyError::NoCredentials`]
    /// before any platform call when it is empty. On success the display
    /// name is resolved by matching the answering credential id against the
    /// store.
    pub async fn authenticate(&self) -> Result<Authentication, PasskeyError> {
        let records = self.store.load().await?;
        if records.is_empty() {
            return Err(PasskeyError::NoCredentials);
        }

        let mut allow_credentials = Vec::with_capacity(records.len());
        for record in &records {
            let id = rapidloan_encoding::decode(&record.credential_id).map_err(|error| {
                PasskeyError::Ceremony(format!("stored credential id is not decodable: {error}"))
            })?;
            allow_credentials.push(CredentialDescriptor { id });
        }

        let challenge = fresh_bytes::<CHALLENGE_LEN>()?;
        let options = RequestOptions {
            challenge: challenge.to_vec(),
            rp_id: self.rp_id().map(str::to_owned),
            allow_credentials,
            timeout_ms: self.config.timeout_ms,
            user_verification: "preferred",
        };

        tracing::debug!(candidates = records.len(), "starting passkey authentication");
        let assertion = self
            .platform
            .get(options)
            .await
            .map_err(authentication_error)?;

        let credential_id = rapidloan_encoding::encode(&assertion.raw_id);
        let user_handle = records
            .iter()
            .find(|record| record.credential_id == credential_id)
            .map(|record| record.username.clone())
            .or_else(|| {
                assertion
                    .user_handle
                    .as_deref()
                    .map(rapidloan_encoding::encode)
            });

        tracing::info!(credential = %credential_id, "passkey assertion produced");
        Ok(Authentication {
            credential_id,
            signature: assertion.signature,
            user_handle,
        })
    }

    fn rp_id(&self) -> Option<&str> {
        rp_id_for_hostname(self.config.hostname.as_deref())
    }
}

/// Decide the explicit relying-party id for an origin hostname.
///
/// Browsers reject an explicit rp id on `localhost` and on bare IP literals,
/// so those origins (and an unknown hostname) send none and let the platform
/// infer the scope.
fn rp_id_for_hostname(hostname: Option<&str>) -> Option<&str> {
    let hostname = hostname.filter(|name| !name.is_empty())?;
    if hostname == "localhost" {
        return None;
    }
    if hostname.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    Some(hostname)
}

fn fresh_bytes<const N: usize>() -> Result<[u8; N], PasskeyError> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|error| PasskeyError::Ceremony(format!("entropy source failed: {error}")))?;
    Ok(bytes)
}

fn timestamp() -> String {
    chrono::DateTime::<chrono::Utc>::from(rapidloan_common::now()).to_rfc3339()
}

/// Map a failed creation ceremony onto the user-facing taxonomy.
fn registration_error(error: CeremonyError) -> PasskeyError {
    match error.kind {
        CeremonyErrorKind::Unsupported => PasskeyError::Unsupported,
        CeremonyErrorKind::NotAllowed => PasskeyError::NotAllowed,
        CeremonyErrorKind::InvalidState => PasskeyError::DuplicateAuthenticator,
        CeremonyErrorKind::Other if mentions_rejection(&error.message) => PasskeyError::NotAllowed,
        CeremonyErrorKind::Other => PasskeyError::Ceremony(error.message),
    }
}

/// Map a failed assertion ceremony; everything that is not a user rejection
/// passes through verbatim.
fn authentication_error(error: CeremonyError) -> PasskeyError {
    match error.kind {
        CeremonyErrorKind::Unsupported => PasskeyError::Unsupported,
        CeremonyErrorKind::NotAllowed => PasskeyError::NotAllowed,
        _ if mentions_rejection(&error.message) => PasskeyError::NotAllowed,
        _ => PasskeyError::Ceremony(error.message),
    }
}

/// DOM-style rejections sometimes arrive as bare text; match the phrasing
/// browsers use for dismissed or expired ceremonies.
fn mentions_rejection(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("not allowed") || message.contains("timed out")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rp_id_is_omitted_for_local_origins() {
        assert_eq!(rp_id_for_hostname(None), None);
        assert_eq!(rp_id_for_hostname(Some("")), None);
        assert_eq!(rp_id_for_hostname(Some("localhost")), None);
        assert_eq!(rp_id_for_hostname(Some("127.0.0.1")), None);
        assert_eq!(rp_id_for_hostname(Some("192.168.1.10")), None);
    }

    #[test]
    fn rp_id_matches_real_hostnames_exactly() {
        assert_eq!(
            rp_id_for_hostname(Some("app.rapidloan.example")),
            Some("app.rapidloan.example")
        );
        // Mixed digit/letter hostnames are not IP literals.
        assert_eq!(rp_id_for_hostname(Some("10.things.example")), Some("10.things.example"));
    }

    #[test]
    fn rejection_phrasing_is_matched_case_insensitively() {
        assert!(mentions_rejection(
            "The operation either timed out or was not allowed"
        ));
        assert!(mentions_rejection("NOT ALLOWED by user agent"));
        assert!(!mentions_rejection("something else entirely"));
    }

    #[test]
    fn registration_maps_invalid_state_to_duplicate() {
        let error = CeremonyError {
            kind: CeremonyErrorKind::InvalidState,
            message: "authenticator in use".into(),
        };
        assert_eq!(
            registration_error(error),
            PasskeyError::DuplicateAuthenticator
        );
    }

    #[test]
    fn authentication_passes_invalid_state_through() {
        let error = CeremonyError {
            kind: CeremonyErrorKind::InvalidState,
            message: "authenticator in use".into(),
        };
        assert_eq!(
            authentication_error(error),
            PasskeyError::Ceremony("authenticator in use".into())
        );
    }

    #[test]
    fn both_flows_map_textual_rejections_to_not_allowed() {
        let error = CeremonyError {
            kind: CeremonyErrorKind::Other,
            message: "Operation Timed Out".into(),
        };
        assert_eq!(registration_error(error.clone()), PasskeyError::NotAllowed);
        assert_eq!(authentication_error(error), PasskeyError::NotAllowed);
    }
}
