//! Browser implementation of [`CredentialPlatform`] over
//! `navigator.credentials`.
//!
//! Request objects are assembled field by field with `js_sys::Reflect`, and
//! every binary field crosses the boundary as a fresh, exactly-sized
//! `Uint8Array` (the credential API rejects views into larger buffers).

use async_trait::async_trait;
use js_sys::{Array, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::{
    AssertionCredential, CeremonyError, CeremonyErrorKind, CreatedCredential, CreationOptions,
    CredentialPlatform, PUBLIC_KEY_CREDENTIAL_TYPE, RequestOptions,
};

/// A [`CredentialPlatform`] backed by the browser's Web Authentication API.
///
/// Capability is probed once, at construction: when `navigator.credentials`
/// (with its `create` and `get` functions) is absent,
/// [`WebCredentialPlatform::new`] fails with an `Unsupported` error and no
/// per-call re-checking ever happens.
#[derive(Clone)]
pub struct WebCredentialPlatform {
    credentials: JsValue,
}

impl WebCredentialPlatform {
    /// Locates `navigator.credentials` and verifies both ceremony entry
    /// points exist.
    ///
    /// # Errors
    ///
    /// Fails with [`CeremonyErrorKind::Unsupported`] in environments without
    /// the credential API (non-browser globals, ancient browsers).
    pub fn new() -> Result<Self, CeremonyError> {
        let credentials = credentials_container()?;
        for method in ["create", "get"] {
            if !js_get(&credentials, method)?.is_function() {
                return Err(unsupported(format!(
                    "navigator.credentials.{method} is not a function"
                )));
            }
        }
        Ok(WebCredentialPlatform { credentials })
    }

    /// Call one of the ceremony methods and await its promise.
    async fn invoke(&self, method: &str, request: &Object) -> Result<JsValue, CeremonyError> {
        let function: js_sys::Function = js_get(&self.credentials, method)?.unchecked_into();
        let promise: Promise = function
            .call1(&self.credentials, request)
            .map_err(classify_rejection)?
            .unchecked_into();
        JsFuture::from(promise).await.map_err(classify_rejection)
    }
}

#[async_trait(?Send)]
impl CredentialPlatform for WebCredentialPlatform {
    async fn create(&self, options: CreationOptions) -> Result<CreatedCredential, CeremonyError> {
        let request = creation_request(&options)?;
        let credential = self.invoke("create", &request).await?;

        let raw_id = buffer_bytes(&js_get(&credential, "rawId")?);
        let response = js_get(&credential, "response")?;
        let attestation_object = buffer_bytes(&js_get(&response, "attestationObject")?);

        Ok(CreatedCredential {
            raw_id,
            attestation_object,
        })
    }

    async fn get(&self, options: RequestOptions) -> Result<AssertionCredential, CeremonyError> {
        let request = assertion_request(&options)?;
        let credential = self.invoke("get", &request).await?;

        let raw_id = buffer_bytes(&js_get(&credential, "rawId")?);
        let response = js_get(&credential, "response")?;
        let signature = buffer_bytes(&js_get(&response, "signature")?);
        let handle = js_get(&response, "userHandle")?;
        let user_handle = if handle.is_null() || handle.is_undefined() {
            None
        } else {
            Some(buffer_bytes(&handle))
        };

        Ok(AssertionCredential {
            raw_id,
            signature,
            user_handle,
        })
    }
}

/// Build `{ publicKey: PublicKeyCredentialCreationOptions }`.
fn creation_request(options: &CreationOptions) -> Result<Object, CeremonyError> {
    let public_key = Object::new();

    js_set(&public_key, "challenge", &exact_array(&options.challenge))?;

    let rp = Object::new();
    if let Some(id) = &options.relying_party.id {
        js_set(&rp, "id", &JsValue::from_str(id))?;
    }
    js_set(&rp, "name", &JsValue::from_str(&options.relying_party.name))?;
    js_set(&public_key, "rp", &rp)?;

    let user = Object::new();
    js_set(&user, "id", &exact_array(&options.user.id))?;
    js_set(&user, "name", &JsValue::from_str(&options.user.name))?;
    js_set(
        &user,
        "displayName",
        &JsValue::from_str(&options.user.display_name),
    )?;
    js_set(&public_key, "user", &user)?;

    let params = Array::new();
    for algorithm in &options.algorithms {
        let param = Object::new();
        js_set(&param, "type", &JsValue::from_str(PUBLIC_KEY_CREDENTIAL_TYPE))?;
        js_set(&param, "alg", &JsValue::from_f64(f64::from(*algorithm)))?;
        params.push(&param);
    }
    js_set(&public_key, "pubKeyCredParams", &params)?;

    let selection = Object::new();
    js_set(
        &selection,
        "residentKey",
        &JsValue::from_str(options.authenticator_selection.resident_key),
    )?;
    js_set(
        &selection,
        "userVerification",
        &JsValue::from_str(options.authenticator_selection.user_verification),
    )?;
    js_set(&public_key, "authenticatorSelection", &selection)?;

    js_set(
        &public_key,
        "timeout",
        &JsValue::from_f64(f64::from(options.timeout_ms)),
    )?;
    js_set(
        &public_key,
        "attestation",
        &JsValue::from_str(options.attestation),
    )?;

    wrap_public_key(public_key)
}

/// Build `{ publicKey: PublicKeyCredentialRequestOptions }`.
fn assertion_request(options: &RequestOptions) -> Result<Object, CeremonyError> {
    let public_key = Object::new();

    js_set(&public_key, "challenge", &exact_array(&options.challenge))?;

    if let Some(rp_id) = &options.rp_id {
        js_set(&public_key, "rpId", &JsValue::from_str(rp_id))?;
    }

    let allow = Array::new();
    for descriptor in &options.allow_credentials {
        let entry = Object::new();
        js_set(&entry, "type", &JsValue::from_str(PUBLIC_KEY_CREDENTIAL_TYPE))?;
        js_set(&entry, "id", &exact_array(&descriptor.id))?;
        allow.push(&entry);
    }
    js_set(&public_key, "allowCredentials", &allow)?;

    js_set(
        &public_key,
        "timeout",
        &JsValue::from_f64(f64::from(options.timeout_ms)),
    )?;
    js_set(
        &public_key,
        "userVerification",
        &JsValue::from_str(options.user_verification),
    )?;

    wrap_public_key(public_key)
}

fn wrap_public_key(public_key: Object) -> Result<Object, CeremonyError> {
    let wrapper = Object::new();
    js_set(&wrapper, "publicKey", &public_key)?;
    Ok(wrapper)
}

/// Copy bytes into a fresh, exactly-sized `Uint8Array`.
fn exact_array(bytes: &[u8]) -> Uint8Array {
    Uint8Array::from(rapidloan_encoding::to_exact_buffer(bytes).as_ref())
}

/// Convert a JS `ArrayBuffer` (or typed-array view) to `Vec<u8>`.
fn buffer_bytes(value: &JsValue) -> Vec<u8> {
    let array = Uint8Array::new(value);
    let mut bytes = vec![0u8; array.length() as usize];
    array.copy_to(&mut bytes);
    bytes
}

/// Get `navigator.credentials`.
fn credentials_container() -> Result<JsValue, CeremonyError> {
    let global = js_sys::global();
    let navigator = Reflect::get(&global, &"navigator".into())
        .map_err(|_| unsupported("navigator not found".into()))?;
    if navigator.is_undefined() {
        return Err(unsupported("navigator is undefined".into()));
    }
    let credentials = Reflect::get(&navigator, &"credentials".into())
        .map_err(|_| unsupported("credentials not found".into()))?;
    if credentials.is_undefined() {
        return Err(unsupported("navigator.credentials is undefined".into()));
    }
    Ok(credentials)
}

fn unsupported(message: String) -> CeremonyError {
    CeremonyError {
        kind: CeremonyErrorKind::Unsupported,
        message,
    }
}

/// Map a rejected ceremony promise to a [`CeremonyError`], classifying by
/// DOMException name when one is present.
fn classify_rejection(value: JsValue) -> CeremonyError {
    let name = Reflect::get(&value, &"name".into())
        .ok()
        .and_then(|name| name.as_string());
    let message = Reflect::get(&value, &"message".into())
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    let kind = match name.as_deref() {
        Some("NotAllowedError") => CeremonyErrorKind::NotAllowed,
        Some("InvalidStateError") => CeremonyErrorKind::InvalidState,
        Some("NotSupportedError") => CeremonyErrorKind::Unsupported,
        _ => CeremonyErrorKind::Other,
    };
    CeremonyError { kind, message }
}

/// Shorthand for `Reflect::get` with a string key.
fn js_get(obj: &JsValue, key: &str) -> Result<JsValue, CeremonyError> {
    Reflect::get(obj, &JsValue::from_str(key)).map_err(|error| CeremonyError {
        kind: CeremonyErrorKind::Other,
        message: format!("failed to get '{key}': {error:?}"),
    })
}

/// Shorthand for `Reflect::set` with a string key.
fn js_set(obj: &Object, key: &str, value: &JsValue) -> Result<(), CeremonyError> {
    Reflect::set(obj, &JsValue::from_str(key), value).map_err(|error| CeremonyError {
        kind: CeremonyErrorKind::Other,
        message: format!("failed to set '{key}': {error:?}"),
    })?;
    Ok(())
}
