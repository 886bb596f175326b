//! High-level vault operations.
//!
//! `Vault` wraps a persistence adapter and the envelope cipher so that
//! the rest of the application can work with simple method calls like
//! `vault.store("sk-...", "openai")`.
//!
//! No secret map is cached between calls.  Every operation loads the
//! current blob, decrypts it, works on the plaintext map, and (for
//! mutations) encrypts and persists the whole map again.  A change made
//! to the persisted blob by another process is seen on the next call.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::VaultConfig;
use crate::crypto::EnvelopeCipher;
use crate::errors::{ErrorKind, Result, VaultError};
use crate::persistence::Persistence;
use crate::providers;

use super::event::{Listener, VaultEvent};
use super::format;
use super::metadata::{LastAction, Metadata, MetadataEntry};
use super::secret::SecretMap;

/// The vault handle.  Build one per `VaultConfig`.
///
/// Mutations on one `Vault` are serialized by an internal lock, so
/// concurrent `store`/`remove` calls through the same instance never
/// lose each other's changes.  Two instances sharing a persistence
/// namespace are not coordinated: the last write wins.
pub struct Vault {
    config: VaultConfig,
    storage: Box<dyn Persistence>,
    cipher: EnvelopeCipher,
    listeners: RwLock<Vec<Listener>>,
    op_lock: Mutex<()>,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn new(config: VaultConfig, storage: Box<dyn Persistence>) -> Self {
        if config.uses_fingerprint() {
            warn!(
                app = config.app_name(),
                "no passphrase supplied; keying the vault with the environment fingerprint, which is guessable"
            );
        }

        let cipher = EnvelopeCipher::new(*config.kdf_params());
        Self {
            config,
            storage,
            cipher,
            listeners: RwLock::new(Vec::new()),
            op_lock: Mutex::new(()),
        }
    }

    /// Register a callback for every change event.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&VaultEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Store `secret` for `provider_id`, replacing any previous one.
    ///
    /// Returns `false` if the secret is malformed or the vault could not
    /// be written; the persisted blob is then left as it was.
    pub fn store(&self, secret: &str, provider_id: &str) -> bool {
        self.try_store(secret, provider_id)
            .map_err(|e| log_failure("store", provider_id, &e))
            .is_ok()
    }

    /// Return the secret for `provider_id`, or `None` if there is none or
    /// the vault cannot be read.
    pub fn retrieve(&self, provider_id: &str) -> Option<String> {
        self.try_retrieve(provider_id)
            .map_err(|e| log_failure("retrieve", provider_id, &e))
            .ok()
            .flatten()
    }

    /// Remove the secret for `provider_id`.  Returns `false` if there was
    /// nothing to remove or the vault could not be written.
    pub fn remove(&self, provider_id: &str) -> bool {
        self.try_remove(provider_id)
            .map_err(|e| log_failure("remove", provider_id, &e))
            .is_ok()
    }

    /// Returns `true` if a non-empty secret is stored for `provider_id`.
    pub fn exists(&self, provider_id: &str) -> bool {
        self.retrieve(provider_id).is_some_and(|s| !s.is_empty())
    }

    /// Provider ids that currently have a secret.
    pub fn list_configured(&self) -> BTreeSet<String> {
        self.try_list_configured()
            .map_err(|e| log_failure("list", "*", &e))
            .unwrap_or_default()
    }

    /// Delete the blob and all metadata.  Storage errors are logged and
    /// otherwise ignored.
    pub fn clear_all(&self) {
        {
            let _guard = self.op_lock.lock();
            if let Err(e) = self.storage.remove(&self.blob_key()) {
                log_failure("clear", "*", &e);
            }
            if let Err(e) = self.storage.remove(&self.metadata_key()) {
                log_failure("clear", "*", &e);
            }
        }
        debug!(app = self.config.app_name(), "cleared vault");
        self.emit(&VaultEvent::ClearedAll);
    }

    // ------------------------------------------------------------------
    // Typed variants
    // ------------------------------------------------------------------

    /// Like `store`, but reports why it failed.
    pub fn try_store(&self, secret: &str, provider_id: &str) -> Result<()> {
        providers::validate_provider_id(provider_id)?;
        providers::validate_format(secret)?;

        {
            let _guard = self.op_lock.lock();

            let mut map = match self.load_map() {
                Ok(map) => map,
                Err(e) if is_unreadable(&e) => {
                    warn!(
                        app = self.config.app_name(),
                        kind = %e.kind(),
                        "existing vault blob is unreadable; replacing it"
                    );
                    SecretMap::new()
                }
                Err(e) => return Err(e),
            };

            map.insert(provider_id, secret);
            self.persist_map(&map)?;
            self.record(provider_id, LastAction::Stored);
        }

        debug!(provider = provider_id, "stored credential");
        self.emit(&VaultEvent::Stored(provider_id.to_string()));
        Ok(())
    }

    /// Like `retrieve`, but reports why the vault could not be read.
    pub fn try_retrieve(&self, provider_id: &str) -> Result<Option<String>> {
        providers::validate_provider_id(provider_id)?;
        let map = self.load_map()?;
        Ok(map.get(provider_id).map(str::to_string))
    }

    /// Like `remove`, but reports why it failed.
    ///
    /// Removing the last secret deletes the blob instead of persisting an
    /// empty map.
    pub fn try_remove(&self, provider_id: &str) -> Result<()> {
        providers::validate_provider_id(provider_id)?;

        {
            let _guard = self.op_lock.lock();

            let mut map = self.load_map()?;
            if !map.remove(provider_id) {
                return Err(VaultError::ProviderNotFound(provider_id.to_string()));
            }
            self.persist_map(&map)?;
            self.record(provider_id, LastAction::Deleted);
        }

        debug!(provider = provider_id, "removed credential");
        self.emit(&VaultEvent::Deleted(provider_id.to_string()));
        Ok(())
    }

    /// Like `list_configured`, but reports why the vault could not be read.
    pub fn try_list_configured(&self) -> Result<BTreeSet<String>> {
        Ok(self.load_map()?.provider_ids())
    }

    /// Masked display form of every stored secret, keyed by provider id,
    /// from a single read of the blob.
    pub fn try_list_masked(&self) -> Result<BTreeMap<String, String>> {
        let map = self.load_map()?;
        Ok(map
            .iter()
            .map(|(id, secret)| (id.to_string(), providers::mask_key(secret)))
            .collect())
    }

    // ------------------------------------------------------------------
    // Host-facing queries
    // ------------------------------------------------------------------

    /// Alias of `exists` for UI code asking "is this feature set up?".
    pub fn has_key(&self, provider_id: &str) -> bool {
        self.exists(provider_id)
    }

    /// Read a secret with no side effects beyond the read itself.
    pub fn get_key_silent(&self, provider_id: &str) -> Option<String> {
        self.retrieve(provider_id)
    }

    pub fn delete_key(&self, provider_id: &str) -> bool {
        self.remove(provider_id)
    }

    /// Display form of a secret.  See `providers::mask_key`.
    pub fn mask_key(&self, secret: &str) -> String {
        providers::mask_key(secret)
    }

    /// Last recorded action for `provider_id`, if any.
    pub fn get_metadata(&self, provider_id: &str) -> Option<MetadataEntry> {
        self.metadata().get(provider_id).copied()
    }

    /// All metadata.  Unreadable metadata is reported as empty.
    pub fn metadata(&self) -> Metadata {
        self.load_metadata().unwrap_or_else(|e| {
            log_failure("metadata", "*", &e);
            Metadata::default()
        })
    }

    /// Configured/not-configured for every recognized provider, in the
    /// order given by the config.
    pub fn configured_status(&self) -> Vec<(String, bool)> {
        let configured = self.list_configured();
        self.config
            .providers()
            .iter()
            .map(|id| (id.clone(), configured.contains(id)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Namespace key under which the encrypted blob is persisted.
    pub fn blob_key(&self) -> String {
        format::blob_key(self.config.app_name())
    }

    /// Namespace key under which metadata is persisted.
    pub fn metadata_key(&self) -> String {
        format::metadata_key(self.config.app_name())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Load and decrypt the current map.  An absent blob is an empty map.
    fn load_map(&self) -> Result<SecretMap> {
        let Some(token) = self.storage.get(&self.blob_key())? else {
            return Ok(SecretMap::new());
        };
        let plaintext = Zeroizing::new(self.cipher.decrypt(&token, self.config.passphrase())?);
        format::decode_secrets(&plaintext)
    }

    /// Encrypt and persist `map`, or delete the blob if `map` is empty.
    fn persist_map(&self, map: &SecretMap) -> Result<()> {
        let key = self.blob_key();
        if map.is_empty() {
            return self.storage.remove(&key);
        }

        let plaintext = format::encode_secrets(map)?;
        let token = self.cipher.encrypt(&plaintext, self.config.passphrase())?;
        self.storage.set(&key, &token)
    }

    fn load_metadata(&self) -> Result<Metadata> {
        match self.storage.get(&self.metadata_key())? {
            Some(json) => format::decode_metadata(&json),
            None => Ok(Metadata::default()),
        }
    }

    /// Best-effort metadata update.  Failures are logged only, the
    /// secret change has already been persisted.
    fn record(&self, provider_id: &str, action: LastAction) {
        let mut meta = match self.load_metadata() {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::Format => {
                warn!(kind = %e.kind(), "metadata is unreadable; starting over");
                Metadata::default()
            }
            Err(e) => {
                log_failure("metadata", provider_id, &e);
                return;
            }
        };

        meta.record(provider_id, action, Utc::now());
        let written =
            format::encode_metadata(&meta).and_then(|json| self.storage.set(&self.metadata_key(), &json));
        if let Err(e) = written {
            log_failure("metadata", provider_id, &e);
        }
    }

    fn emit(&self, event: &VaultEvent) {
        for listener in self.listeners.read().iter() {
            listener(event);
        }
    }
}

/// A blob that exists but cannot be turned back into a map.
fn is_unreadable(e: &VaultError) -> bool {
    matches!(e.kind(), ErrorKind::Decryption | ErrorKind::Format)
}

fn log_failure(op: &str, provider_id: &str, e: &VaultError) {
    warn!(op, provider = provider_id, kind = %e.kind(), error = %e, "vault operation failed");
}
