//! Passphrase-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! PBKDF2 iterates HMAC-SHA256 so that every passphrase guess against a
//! captured blob costs the attacker the full round count.  The round
//! count is configurable via `KdfParams` (loaded from `.credvault.toml`
//! or the default) but may never drop below `MIN_ITERATIONS`.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 round count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Minimum accepted PBKDF2 round count.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Configurable PBKDF2 parameters.
///
/// The round count is not recorded in the envelope, so every vault
/// instance reading a blob must use the same value that wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 rounds (default: 100 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Build params, rejecting round counts below `MIN_ITERATIONS`.
    pub fn new(iterations: u32) -> Result<Self> {
        let params = Self { iterations };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(VaultError::KeyDerivationFailed(format!(
                "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        Ok(())
    }
}

/// A 32-byte symmetric key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Access the raw key bytes (e.g. to build an AEAD cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a 32-byte key from a passphrase and a 16-byte salt.
///
/// The same passphrase + salt + params always produce the same key.
pub fn derive_key(passphrase: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if salt.len() != SALT_LEN {
        return Err(VaultError::InvalidFormat(format!(
            "salt must be exactly {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    params.validate()?;

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(passphrase, salt, params.iterations, &mut bytes);

    let key = DerivedKey { bytes };
    bytes.zeroize();
    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
