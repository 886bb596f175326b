//! AES-256-GCM authenticated encryption.
//!
//! `seal` generates a fresh random 12-byte nonce for every call and
//! prepends it to the ciphertext.  `open` splits the nonce back out
//! before decrypting and verifying the tag.
//!
//! Layout of the sealed byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use super::kdf::DerivedKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key`.
///
/// Returns `nonce || ciphertext || tag`.
pub fn seal(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data produced by `seal`.
///
/// Every failure (short input, wrong key, flipped bit) maps to
/// `VaultError::DecryptionFailed`.
pub fn open(key: &DerivedKey, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::{derive_key, KdfParams, SALT_LEN};

    fn key(passphrase: &[u8]) -> DerivedKey {
        derive_key(passphrase, &[9u8; SALT_LEN], &KdfParams::default()).unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let k = key(b"pw");
        let sealed = seal(&k, b"{\"openai\":\"sk-123\"}").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 19 + TAG_LEN);
        assert_eq!(open(&k, &sealed).unwrap(), b"{\"openai\":\"sk-123\"}");
    }

    #[test]
    fn open_rejects_short_input() {
        let k = key(b"pw");
        assert!(matches!(
            open(&k, &[0u8; NONCE_LEN + TAG_LEN - 1]),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn open_rejects_other_key() {
        let sealed = seal(&key(b"pw-one"), b"data").unwrap();
        assert!(open(&key(b"pw-two"), &sealed).is_err());
    }
}
