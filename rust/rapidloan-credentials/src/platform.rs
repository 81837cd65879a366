//! The platform credential API seam.
//!
//! [`CredentialPlatform`] abstracts the browser's `navigator.credentials`
//! container so the flows can be driven by the real API on WASM and by
//! scripted stubs in tests. The option types mirror the Web Authentication
//! API's request structures; field names and value enumerations are an
//! external contract that must reach the wire unchanged.

use async_trait::async_trait;
use rapidloan_common::ConditionalSync;
use thiserror::Error;

/// COSE algorithm identifier for ES256 (ECDSA over P-256 with SHA-256), the
/// only algorithm the demo accepts.
pub const ES256: i32 = -7;

/// The `type` value for public-key credentials, fixed by the Web
/// Authentication API.
pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// The relying party descriptor sent with a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelyingParty {
    /// Scope id (the origin's hostname). Omitted on `localhost` and bare IP
    /// literals, where browsers reject an explicit id.
    pub id: Option<String>,
    /// Human-readable service name; always sent.
    pub name: String,
}

/// The user entity registered alongside a new credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntity {
    /// Opaque handle generated fresh for each registration.
    pub id: Vec<u8>,
    /// Account name.
    pub name: String,
    /// Display name; the demo reuses the account name.
    pub display_name: String,
}

/// Authenticator selection criteria for creation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorSelection {
    /// `residentKey` preference.
    pub resident_key: &'static str,
    /// `userVerification` preference.
    pub user_verification: &'static str,
}

/// Options for a `create()` (registration) ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationOptions {
    /// Fresh ceremony challenge.
    pub challenge: Vec<u8>,
    /// Relying party descriptor.
    pub relying_party: RelyingParty,
    /// User entity being registered.
    pub user: UserEntity,
    /// Accepted COSE algorithms, in preference order.
    pub algorithms: Vec<i32>,
    /// Authenticator selection criteria.
    pub authenticator_selection: AuthenticatorSelection,
    /// Ceremony timeout in milliseconds.
    pub timeout_ms: u32,
    /// Attestation conveyance preference.
    pub attestation: &'static str,
}

/// A credential id filter entry for assertion requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialDescriptor {
    /// Raw credential id bytes.
    pub id: Vec<u8>,
}

/// Options for a `get()` (authentication) ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Fresh ceremony challenge.
    pub challenge: Vec<u8>,
    /// Explicit relying party id, under the same omission rule as creation.
    pub rp_id: Option<String>,
    /// Every credential the caller will accept an assertion from.
    pub allow_credentials: Vec<CredentialDescriptor>,
    /// Ceremony timeout in milliseconds.
    pub timeout_ms: u32,
    /// `userVerification` preference.
    pub user_verification: &'static str,
}

/// The platform's answer to a successful creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCredential {
    /// Raw credential id bytes.
    pub raw_id: Vec<u8>,
    /// The CBOR attestation object containing the authenticator data.
    pub attestation_object: Vec<u8>,
}

/// The platform's answer to a successful assertion ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionCredential {
    /// Raw credential id bytes the authenticator answered with.
    pub raw_id: Vec<u8>,
    /// The assertion signature bytes.
    pub signature: Vec<u8>,
    /// The user handle, when the authenticator returns one.
    pub user_handle: Option<Vec<u8>>,
}

/// How the platform classified a failed ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyErrorKind {
    /// The user dismissed the prompt, or the ceremony timed out.
    NotAllowed,
    /// The request conflicts with authenticator state, such as re-registering
    /// an already-bound authenticator.
    InvalidState,
    /// The credential API is missing or refused the request outright.
    Unsupported,
    /// Anything else.
    Other,
}

/// A failed ceremony, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CeremonyError {
    /// Classification the flows use to pick user-facing messages.
    pub kind: CeremonyErrorKind,
    /// The platform's own message, unmodified.
    pub message: String,
}

/// A facade over the platform's public-key credential container.
///
/// Both methods suspend while the platform runs its user-presence ceremony;
/// that suspension is the flows' only await point, and cancellation exists
/// solely as a platform-side timeout or user dismissal surfacing as a
/// [`CeremonyError`].
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait CredentialPlatform: ConditionalSync {
    /// Run a credential-creation ceremony.
    async fn create(&self, options: CreationOptions) -> Result<CreatedCredential, CeremonyError>;

    /// Run an assertion ceremony against the allowed credential list.
    async fn get(&self, options: RequestOptions) -> Result<AssertionCredential, CeremonyError>;
}
