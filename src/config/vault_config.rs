use std::fmt;

use zeroize::Zeroizing;

use super::fingerprint;
use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};
use crate::providers;

/// Maximum length of an app name.
const MAX_APP_NAME_LEN: usize = 64;

/// Where the vault passphrase came from.
enum Passphrase {
    /// Supplied by the host application.
    Explicit(Zeroizing<String>),
    /// Derived from the environment fingerprint (low entropy).
    Fingerprint(Zeroizing<String>),
}

/// Immutable per-instance vault configuration.
///
/// A `Vault` can only be built from a `VaultConfig`, and a `VaultConfig`
/// can only be built with a valid app name, so there is no way to run
/// vault operations on an unconfigured instance.
pub struct VaultConfig {
    app_name: String,
    passphrase: Passphrase,
    providers: Vec<String>,
    kdf: KdfParams,
}

impl VaultConfig {
    /// Build a config for `app_name`.
    ///
    /// With `passphrase = None` the environment fingerprint is used, which
    /// anyone on the same machine can reproduce.
    pub fn new(app_name: &str, passphrase: Option<&str>) -> Result<Self> {
        validate_app_name(app_name)?;

        let passphrase = match passphrase {
            Some("") => {
                return Err(VaultError::ConfigError(
                    "passphrase cannot be empty".into(),
                ))
            }
            Some(p) => Passphrase::Explicit(Zeroizing::new(p.to_string())),
            None => Passphrase::Fingerprint(Zeroizing::new(
                fingerprint::environment_passphrase(app_name),
            )),
        };

        Ok(Self {
            app_name: app_name.to_string(),
            passphrase,
            providers: providers::known_ids(),
            kdf: KdfParams::default(),
        })
    }

    /// Replace the set of recognized provider ids.
    pub fn with_providers<I, S>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Vec::new();
        for id in ids {
            let id = id.into();
            providers::validate_provider_id(&id)
                .map_err(|e| VaultError::ConfigError(e.to_string()))?;
            if !list.contains(&id) {
                list.push(id);
            }
        }
        self.providers = list;
        Ok(self)
    }

    /// Use non-default key derivation parameters.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf = params;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// Returns `true` if the passphrase is the environment fingerprint.
    pub fn uses_fingerprint(&self) -> bool {
        matches!(self.passphrase, Passphrase::Fingerprint(_))
    }

    pub(crate) fn passphrase(&self) -> &[u8] {
        match &self.passphrase {
            Passphrase::Explicit(p) | Passphrase::Fingerprint(p) => p.as_bytes(),
        }
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = if self.uses_fingerprint() {
            "fingerprint"
        } else {
            "explicit"
        };
        f.debug_struct("VaultConfig")
            .field("app_name", &self.app_name)
            .field("passphrase", &source)
            .field("providers", &self.providers)
            .field("kdf", &self.kdf)
            .finish()
    }
}

/// Validate that an app name is usable as a storage namespace.
///
/// Allowed: ASCII letters, digits, underscores, hyphens.  Must not be
/// empty and at most 64 characters.
pub fn validate_app_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::ConfigError("app name cannot be empty".into()));
    }
    if name.len() > MAX_APP_NAME_LEN {
        return Err(VaultError::ConfigError(format!(
            "app name cannot exceed {MAX_APP_NAME_LEN} characters"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(VaultError::ConfigError(format!(
            "app name '{name}' is invalid — only ASCII letters, digits, underscores, and hyphens are allowed"
        )));
    }
    Ok(())
}
