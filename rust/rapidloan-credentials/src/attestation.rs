//! COSE/CBOR extraction of the attested credential public key.
//!
//! On credential creation the authenticator answers with an attestation
//! object: a CBOR map whose `authData` entry carries the authenticator-data
//! byte layout, ending in a COSE-encoded credential public key. This module
//! walks that layout and returns the raw P-256 point coordinates, the form
//! downstream ledger code consumes keys in.
//!
//! Authenticator data layout (lengths in bytes):
//!
//! ```text
//! ┌───────────┬───────┬────────────┬────────┬──────────────┬───────────────┬──────────┐
//! │ rpIdHash  │ flags │ signCount  │ AAGUID │ credIdLength │ credentialId  │ COSE key │
//! │    32     │   1   │     4      │   16   │   2 (BE)     │     var       │   var    │
//! └───────────┴───────┴────────────┴────────┴──────────────┴───────────────┴──────────┘
//! ```
//!
//! Everything after `signCount` exists only when flags bit 6 (attested
//! credential data) is set.

use ciborium::value::Value;

use crate::FormatError;

/// Length of the fixed authenticator-data header: rpIdHash (32) + flags (1)
/// + signature counter (4).
const HEADER_LEN: usize = 37;

/// Length of the authenticator AAGUID.
const AAGUID_LEN: usize = 16;

/// Flags bit 6: attested credential data present.
const FLAG_ATTESTED_CREDENTIAL_DATA: u8 = 0x40;

/// COSE label for the EC2 X coordinate.
const COSE_LABEL_X: i128 = -2;

/// COSE label for the EC2 Y coordinate.
const COSE_LABEL_Y: i128 = -3;

/// A raw P-256 public key: the 32-byte X coordinate followed by the 32-byte
/// Y coordinate of a point on secp256r1.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawPublicKey([u8; 64]);

impl RawPublicKey {
    /// The 32-byte X coordinate.
    #[must_use]
    pub fn x(&self) -> &[u8] {
        &self.0[..32]
    }

    /// The 32-byte Y coordinate.
    #[must_use]
    pub fn y(&self) -> &[u8] {
        &self.0[32..]
    }

    /// The full 64-byte X ‖ Y representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl AsRef<[u8]> for RawPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<RawPublicKey> for [u8; 64] {
    fn from(value: RawPublicKey) -> Self {
        value.0
    }
}

impl std::fmt::Debug for RawPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawPublicKey(")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Extract the attested credential's public key from a CBOR attestation
/// object.
///
/// # Errors
///
/// Fails with a [`FormatError`] when the outer CBOR map has no `authData`
/// entry, when the attested-credential-data flag (bit 6 of the flags byte at
/// offset 32) is unset, when the byte layout runs short, or when the COSE
/// map lacks an X (label −2) or Y (label −3) coordinate.
pub fn extract_public_key(attestation_object: &[u8]) -> Result<RawPublicKey, FormatError> {
    let decoded: Value = ciborium::from_reader(attestation_object)
        .map_err(|error| FormatError::InvalidCbor(error.to_string()))?;
    let Value::Map(entries) = decoded else {
        return Err(FormatError::MissingAuthData);
    };
    let auth_data = entries
        .iter()
        .find_map(|(key, value)| match (key, value) {
            (Value::Text(name), Value::Bytes(bytes)) if name == "authData" => {
                Some(bytes.as_slice())
            }
            _ => None,
        })
        .ok_or(FormatError::MissingAuthData)?;

    if auth_data.len() < HEADER_LEN {
        return Err(FormatError::Truncated(auth_data.len()));
    }
    if auth_data[32] & FLAG_ATTESTED_CREDENTIAL_DATA == 0 {
        return Err(FormatError::AttestedCredentialDataAbsent);
    }

    // Skip the AAGUID, then the length-prefixed credential id. The id itself
    // is not needed for key extraction.
    let mut offset = HEADER_LEN + AAGUID_LEN;
    if auth_data.len() < offset + 2 {
        return Err(FormatError::Truncated(auth_data.len()));
    }
    let credential_id_len = u16::from_be_bytes([auth_data[offset], auth_data[offset + 1]]) as usize;
    offset += 2;
    if auth_data.len() < offset + credential_id_len {
        return Err(FormatError::Truncated(auth_data.len()));
    }
    offset += credential_id_len;

    let key: Value = ciborium::from_reader(&auth_data[offset..])
        .map_err(|error| FormatError::InvalidCbor(error.to_string()))?;
    let Value::Map(entries) = key else {
        return Err(FormatError::InvalidCbor(
            "credential public key is not a CBOR map".into(),
        ));
    };

    let x = cose_coordinate(&entries, COSE_LABEL_X).ok_or(FormatError::MissingCoordinate("x"))?;
    let y = cose_coordinate(&entries, COSE_LABEL_Y).ok_or(FormatError::MissingCoordinate("y"))?;

    let mut raw = [0u8; 64];
    normalize_coordinate(x, &mut raw[..32]);
    normalize_coordinate(y, &mut raw[32..]);
    Ok(RawPublicKey(raw))
}

fn cose_coordinate<'a>(entries: &'a [(Value, Value)], label: i128) -> Option<&'a [u8]> {
    entries.iter().find_map(|(key, value)| match (key, value) {
        (Value::Integer(integer), Value::Bytes(bytes)) if i128::from(*integer) == label => {
            Some(bytes.as_slice())
        }
        _ => None,
    })
}

/// Tail-aligned normalization to the target width: oversized coordinates
/// keep their trailing bytes, undersized ones are zero-filled on the left.
/// Authenticators in the wild both strip and pad leading zeroes.
fn normalize_coordinate(source: &[u8], target: &mut [u8]) {
    let tail = if source.len() > target.len() {
        &source[source.len() - target.len()..]
    } else {
        source
    };
    let start = target.len() - tail.len();
    target[start..].copy_from_slice(tail);
}
