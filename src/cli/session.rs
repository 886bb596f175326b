//! Per-session feature enablement.
//!
//! A host asks for a provider's key when the user reaches a feature that
//! needs it.  The first miss for a provider runs the setup prompt; any
//! later miss in the same session returns `None` without asking again.
//! That debounce is session state and lives here, not in the vault.
//! Setup is never offered while the vault cannot be decrypted.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::vault::Vault;

/// Tracks which providers have already been offered setup.
pub struct Session<P> {
    prompted: HashSet<String>,
    prompt: P,
}

impl<P> Session<P>
where
    P: FnMut(&str) -> Option<String>,
{
    /// `prompt` receives the provider id and returns the key the user
    /// entered, or `None` if they declined.
    pub fn new(prompt: P) -> Self {
        Self {
            prompted: HashSet::new(),
            prompt,
        }
    }

    /// Return the key for `provider_id`, running setup at most once per
    /// session if it is missing.
    pub fn try_enable_feature(&mut self, vault: &Vault, provider_id: &str) -> Option<String> {
        if let Some(secret) = vault.get_key_silent(provider_id) {
            return Some(secret);
        }

        if !self.prompted.insert(provider_id.to_string()) {
            debug!(provider = provider_id, "setup already offered this session");
            return None;
        }

        // A blob this passphrase cannot read would be replaced by the store
        // below, losing every other key.
        if let Err(e) = vault.try_list_configured() {
            warn!(provider = provider_id, kind = %e.kind(), "vault unreadable; skipping setup");
            return None;
        }

        let entered = (self.prompt)(provider_id)?;
        let entered = entered.trim();
        if vault.store(entered, provider_id) {
            Some(entered.to_string())
        } else {
            None
        }
    }

    /// Returns `true` if setup was already offered for `provider_id`.
    pub fn was_prompted(&self, provider_id: &str) -> bool {
        self.prompted.contains(provider_id)
    }
}
