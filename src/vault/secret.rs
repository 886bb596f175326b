//! The plaintext provider → secret map held inside the encrypted blob.
//!
//! A `SecretMap` only exists for the duration of one vault operation.
//! Its values are zeroized when it is dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Provider id → secret.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretMap {
    entries: BTreeMap<String, String>,
}

impl SecretMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, provider_id: &str) -> Option<&str> {
        self.entries.get(provider_id).map(String::as_str)
    }

    /// Insert or overwrite the secret for `provider_id`.
    pub fn insert(&mut self, provider_id: &str, secret: &str) {
        if let Some(mut old) = self
            .entries
            .insert(provider_id.to_string(), secret.to_string())
        {
            old.zeroize();
        }
    }

    /// Remove the secret for `provider_id`.  Returns `false` if absent.
    pub fn remove(&mut self, provider_id: &str) -> bool {
        match self.entries.remove(provider_id) {
            Some(mut old) => {
                old.zeroize();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, provider_id: &str) -> bool {
        self.entries.contains_key(provider_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured provider ids.
    pub fn provider_ids(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Drop for SecretMap {
    fn drop(&mut self) {
        for value in self.entries.values_mut() {
            value.zeroize();
        }
    }
}

/// Lists provider ids only.
impl fmt::Debug for SecretMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
