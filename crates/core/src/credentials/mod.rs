//! Credential codec.
//!
//! Platform account credentials are stored as an opaque AES-256-GCM blob:
//! base64(iv[12] || tag[16] || ciphertext), keyed by the SHA-256 digest of a
//! configured secret. Decoding is deliberately infallible: any failure at any
//! stage degrades to an empty credential map so a corrupt or missing blob
//! surfaces as an adapter auth failure, never as an engine error. Decode
//! failures are still logged so the degradation is observable.

use std::collections::HashMap;

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::warn;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::{Error, Result};

/// Decoded credentials handed to platform adapters.
pub type CredentialMap = HashMap<String, Value>;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Clone)]
pub struct CredentialCodec {
    key: [u8; 32],
}

impl CredentialCodec {
    /// Derives the AEAD key from a configured secret.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Decodes an at-rest encrypted blob into a credential map.
    ///
    /// Never fails: a missing blob, bad base64, truncated payload, or failed
    /// authentication all yield an empty map. Decrypted plaintext that is a
    /// JSON object becomes the map directly; anything else is preserved under
    /// the `"raw"` key.
    pub fn decode(&self, encrypted: Option<&str>) -> CredentialMap {
        let blob = match encrypted {
            Some(blob) if !blob.is_empty() => blob,
            _ => return CredentialMap::new(),
        };

        let plaintext = match self.decrypt(blob) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                warn!("Credential decode failed, degrading to empty credentials: {err}");
                return CredentialMap::new();
            }
        };

        match serde_json::from_str::<Value>(&plaintext) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => {
                let mut map = CredentialMap::new();
                map.insert("raw".to_string(), Value::String(plaintext));
                map
            }
        }
    }

    /// Encrypts a credential map into the at-rest blob format.
    pub fn encode(&self, credentials: &CredentialMap) -> Result<String> {
        let plaintext = serde_json::to_string(credentials)?;
        self.encrypt(&plaintext)
    }

    /// Encrypts an already-serialized plaintext. Used when the caller holds
    /// raw credential text rather than a structured map.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        // aes-gcm appends the tag to the ciphertext; the wire format carries
        // it between the nonce and the ciphertext instead.
        let mut sealed = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| Error::Credential(e.to_string()))?;
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        let mut blob = Vec::with_capacity(NONCE_LEN + TAG_LEN + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&tag);
        blob.extend_from_slice(&sealed);
        Ok(BASE64.encode(blob))
    }

    fn decrypt(&self, blob: &str) -> Result<String> {
        let bytes = BASE64
            .decode(blob)
            .map_err(|e| Error::Credential(format!("invalid base64: {e}")))?;
        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Credential("ciphertext too short".to_string()));
        }

        let (nonce_bytes, rest) = bytes.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed.as_ref())
            .map_err(|_| Error::Credential("authentication failed".to_string()))?;

        String::from_utf8(plaintext).map_err(|e| Error::Credential(e.to_string()))
    }
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("CredentialCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec() -> CredentialCodec {
        CredentialCodec::new("dev-credentials-secret")
    }

    #[test]
    fn round_trips_a_credential_map() {
        let codec = codec();
        let mut credentials = CredentialMap::new();
        credentials.insert("username".to_string(), json!("alice"));
        credentials.insert("token".to_string(), json!("s3cr3t"));

        let blob = codec.encode(&credentials).unwrap();
        assert_eq!(codec.decode(Some(&blob)), credentials);
    }

    #[test]
    fn missing_or_empty_blob_decodes_to_empty_map() {
        let codec = codec();
        assert!(codec.decode(None).is_empty());
        assert!(codec.decode(Some("")).is_empty());
    }

    #[test]
    fn garbage_blob_decodes_to_empty_map() {
        let codec = codec();
        assert!(codec.decode(Some("not base64 at all!!")).is_empty());
        assert!(codec.decode(Some("AAAA")).is_empty());
    }

    #[test]
    fn tampered_blob_decodes_to_empty_map() {
        let codec = codec();
        let mut credentials = CredentialMap::new();
        credentials.insert("username".to_string(), json!("alice"));

        let blob = codec.encode(&credentials).unwrap();
        let mut bytes = BASE64.decode(&blob).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        let tampered = BASE64.encode(bytes);

        assert!(codec.decode(Some(&tampered)).is_empty());
    }

    #[test]
    fn wrong_key_decodes_to_empty_map() {
        let mut credentials = CredentialMap::new();
        credentials.insert("username".to_string(), json!("alice"));
        let blob = codec().encode(&credentials).unwrap();

        let other = CredentialCodec::new("a different secret");
        assert!(other.decode(Some(&blob)).is_empty());
    }

    #[test]
    fn non_object_plaintext_degrades_to_raw() {
        let codec = codec();
        let blob = codec.encrypt("just-an-api-key").unwrap();

        let decoded = codec.decode(Some(&blob));
        assert_eq!(decoded.get("raw"), Some(&json!("just-an-api-key")));

        // Valid JSON that is not an object also degrades to raw.
        let blob = codec.encrypt("[1,2,3]").unwrap();
        let decoded = codec.decode(Some(&blob));
        assert_eq!(decoded.get("raw"), Some(&json!("[1,2,3]")));
    }
}
