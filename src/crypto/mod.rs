//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 passphrase key derivation (`kdf`)
//! - AES-256-GCM sealing and opening (`encryption`)
//! - Salted, text-encoded envelopes combining both (`envelope`)

pub mod encryption;
pub mod envelope;
pub mod kdf;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{EnvelopeCipher, KdfParams, ...};
pub use encryption::{open, seal};
pub use envelope::EnvelopeCipher;
pub use kdf::{derive_key, generate_salt, DerivedKey, KdfParams};
