//! Unencrypted per-provider audit metadata.
//!
//! Records the last action taken for each provider id and when.  Stored
//! next to the blob, never inside it, and never holds a secret value.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The last thing that happened to a provider's secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastAction {
    Stored,
    Deleted,
}

impl LastAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Deleted => "deleted",
        }
    }
}

/// Audit record for one provider id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataEntry {
    pub last_action: LastAction,
    pub timestamp: DateTime<Utc>,
}

/// Provider id → last action.  Entries survive removal of the secret.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, MetadataEntry>,
}

impl Metadata {
    /// Overwrite the entry for `provider_id`.
    pub fn record(&mut self, provider_id: &str, action: LastAction, timestamp: DateTime<Utc>) {
        self.entries.insert(
            provider_id.to_string(),
            MetadataEntry {
                last_action: action,
                timestamp,
            },
        );
    }

    pub fn get(&self, provider_id: &str) -> Option<&MetadataEntry> {
        self.entries.get(provider_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
