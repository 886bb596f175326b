//! Vault module: encrypted multi-provider credential storage.
//!
//! This module provides:
//! - The plaintext `SecretMap` (`secret`)
//! - Unencrypted per-provider `Metadata` (`metadata`)
//! - `VaultEvent` change notifications (`event`)
//! - Namespace keys and JSON layout of persisted values (`format`)
//! - The high-level `Vault` (`store`)

pub mod event;
pub mod format;
pub mod metadata;
pub mod secret;
pub mod store;

// Re-export the most commonly used items.
pub use event::{Listener, VaultEvent};
pub use metadata::{LastAction, Metadata, MetadataEntry};
pub use secret::SecretMap;
pub use store::Vault;
