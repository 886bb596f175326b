//! Persisted layout of a vault.
//!
//! Two values live in the persistence adapter per app:
//!
//! ```text
//! <app>.credentials       base64 envelope of the SecretMap JSON
//! <app>.credentials.meta  plain Metadata JSON
//! ```
//!
//! The envelope itself (salt, nonce, ciphertext) is described in
//! `crypto::envelope`; this module only covers what goes inside it and
//! how the namespace keys are named.

use zeroize::Zeroizing;

use super::metadata::Metadata;
use super::secret::SecretMap;
use crate::errors::{Result, VaultError};

/// Namespace key of the encrypted blob for `app_name`.
pub fn blob_key(app_name: &str) -> String {
    format!("{app_name}.credentials")
}

/// Namespace key of the unencrypted metadata for `app_name`.
pub fn metadata_key(app_name: &str) -> String {
    format!("{app_name}.credentials.meta")
}

/// Serialize a secret map to the JSON plaintext that gets encrypted.
pub fn encode_secrets(map: &SecretMap) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(map)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::SerializationError(format!("secrets: {e}")))
}

/// Parse decrypted JSON back into a secret map.
///
/// Empty provider ids or empty secrets are rejected as a malformed blob.
pub fn decode_secrets(plaintext: &[u8]) -> Result<SecretMap> {
    let map: SecretMap = serde_json::from_slice(plaintext)
        .map_err(|e| VaultError::InvalidFormat(format!("secrets JSON: {e}")))?;

    if map.iter().any(|(id, secret)| id.is_empty() || secret.is_empty()) {
        return Err(VaultError::InvalidFormat(
            "secrets JSON contains an empty provider id or secret".into(),
        ));
    }
    Ok(map)
}

pub fn encode_metadata(meta: &Metadata) -> Result<String> {
    serde_json::to_string(meta).map_err(|e| VaultError::SerializationError(format!("metadata: {e}")))
}

pub fn decode_metadata(json: &str) -> Result<Metadata> {
    serde_json::from_str(json).map_err(|e| VaultError::InvalidFormat(format!("metadata JSON: {e}")))
}
