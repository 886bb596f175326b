//! Change notifications emitted after a vault mutation is persisted.

use std::fmt;

/// What changed in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// A secret was stored or replaced for this provider id.
    Stored(String),
    /// The secret for this provider id was removed.
    Deleted(String),
    /// Every secret and all metadata were wiped.
    ClearedAll,
}

impl VaultEvent {
    /// Short action name, as recorded in the audit history.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Stored(_) => "stored",
            Self::Deleted(_) => "deleted",
            Self::ClearedAll => "cleared",
        }
    }

    /// The provider id this event concerns, if any.
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            Self::Stored(id) | Self::Deleted(id) => Some(id),
            Self::ClearedAll => None,
        }
    }
}

impl fmt::Display for VaultEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.provider_id() {
            Some(id) => write!(f, "{} {id}", self.action()),
            None => f.write_str(self.action()),
        }
    }
}

/// Callback invoked synchronously for every event.
///
/// Listeners must not call `Vault::subscribe` from inside the callback.
pub type Listener = Box<dyn Fn(&VaultEvent) + Send + Sync>;
