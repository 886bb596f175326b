//! OS keyring backend.
//!
//! Stores each namespace key as a credential in the operating system's
//! secure store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring / KDE Wallet)
//!
//! The service name is the vault's app name, so two apps never share
//! entries even if their namespace keys collide.

use super::Persistence;
use crate::errors::{Result, VaultError};

/// Persistence backed by the OS credential store.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<::keyring::Entry> {
        ::keyring::Entry::new(&self.service, key)
            .map_err(|e| VaultError::KeyringError(format!("failed to create keyring entry: {e}")))
    }
}

impl Persistence for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VaultError::KeyringError(format!(
                "failed to read from keyring: {e}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?.set_password(value).map_err(|e| {
            VaultError::KeyringError(format!("failed to store value in keyring: {e}"))
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(::keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VaultError::KeyringError(format!(
                "failed to delete from keyring: {e}"
            ))),
        }
    }
}
