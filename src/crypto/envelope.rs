//! Self-describing encrypted envelopes.
//!
//! An envelope is the single text token persisted for a vault:
//!
//! ```text
//! base64( salt: 16 bytes | nonce: 12 bytes | ciphertext + tag )
//! ```
//!
//! Each `encrypt` call draws a new salt and nonce, so the same plaintext
//! under the same passphrase never produces the same token twice.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::encryption::{open, seal, NONCE_LEN, TAG_LEN};
use super::kdf::{derive_key, generate_salt, KdfParams, SALT_LEN};
use crate::errors::{Result, VaultError};

/// Smallest decoded envelope: salt + nonce + tag over an empty plaintext.
const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Passphrase-keyed envelope encryption.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCipher {
    params: KdfParams,
}

impl EnvelopeCipher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `plaintext` into a base64 envelope token.
    pub fn encrypt(&self, plaintext: &[u8], passphrase: &[u8]) -> Result<String> {
        let salt = generate_salt();
        let key = derive_key(passphrase, &salt, &self.params)?;
        let sealed = seal(&key, plaintext)?;

        let mut envelope = Vec::with_capacity(SALT_LEN + sealed.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&sealed);
        Ok(BASE64.encode(envelope))
    }

    /// Decrypt a token produced by `encrypt`.
    ///
    /// Malformed text, truncation, a wrong passphrase and tampering all
    /// yield the same `VaultError::DecryptionFailed`.
    pub fn decrypt(&self, token: &str, passphrase: &[u8]) -> Result<Vec<u8>> {
        let envelope = BASE64
            .decode(token.trim())
            .map_err(|_| VaultError::DecryptionFailed)?;

        if envelope.len() < MIN_ENVELOPE_LEN {
            return Err(VaultError::DecryptionFailed);
        }

        let (salt, sealed) = envelope.split_at(SALT_LEN);
        let key = derive_key(passphrase, salt, &self.params)
            .map_err(|_| VaultError::DecryptionFailed)?;
        open(&key, sealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_layout_has_salt_nonce_and_tag() {
        let cipher = EnvelopeCipher::default();
        let token = cipher.encrypt(b"abc", b"pw").unwrap();
        let raw = BASE64.decode(&token).unwrap();
        assert_eq!(raw.len(), SALT_LEN + NONCE_LEN + 3 + TAG_LEN);
    }

    #[test]
    fn garbage_tokens_fail_uniformly() {
        let cipher = EnvelopeCipher::default();
        let zeros = BASE64.encode([0u8; 40]);
        for token in ["", "not base64!!", "AAAA", zeros.as_str()] {
            assert!(
                matches!(cipher.decrypt(token, b"pw"), Err(VaultError::DecryptionFailed)),
                "token {token:?} should fail"
            );
        }
    }

    #[test]
    fn salt_differs_between_envelopes() {
        let cipher = EnvelopeCipher::default();
        let a = BASE64.decode(cipher.encrypt(b"same", b"pw").unwrap()).unwrap();
        let b = BASE64.decode(cipher.encrypt(b"same", b"pw").unwrap()).unwrap();
        assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
        assert_ne!(
            a[SALT_LEN..SALT_LEN + NONCE_LEN],
            b[SALT_LEN..SALT_LEN + NONCE_LEN]
        );
    }
}
