//! Configuration: `.credvault.toml` settings, the immutable per-vault
//! `VaultConfig`, and the fingerprint passphrase fallback.

pub mod fingerprint;
pub mod settings;
mod vault_config;

pub use settings::{Backend, Settings};
pub use vault_config::{validate_app_name, VaultConfig};
