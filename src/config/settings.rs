use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::VaultConfig;
use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};
use crate::providers;

/// Which persistence backend the CLI builds the vault on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One file per key under `vault_dir`.
    File,
    /// The OS credential store (requires the `keyring-store` feature).
    Keyring,
}

/// Project-level configuration, loaded from `.credvault.toml`.
///
/// Every field has a sensible default so CredVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Namespace for stored values and input to the fingerprint passphrase.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Directory (relative to project root) used by the file backend.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Storage backend.
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// PBKDF2 round count (default: 100 000, minimum 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Provider ids shown by `status` and offered for setup.
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_app_name() -> String {
    "credvault".to_string()
}

fn default_vault_dir() -> String {
    ".credvault".to_string()
}

fn default_backend() -> Backend {
    Backend::File
}

fn default_kdf_iterations() -> u32 {
    crate::crypto::kdf::DEFAULT_ITERATIONS
}

fn default_providers() -> Vec<String> {
    providers::known_ids()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            vault_dir: default_vault_dir(),
            backend: default_backend(),
            kdf_iterations: default_kdf_iterations(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".credvault.toml";

    /// Load settings from `<project_dir>/.credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path of the file backend directory.
    ///
    /// Example: `project_dir/.credvault`
    pub fn vault_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        KdfParams::new(self.kdf_iterations)
            .map_err(|e| VaultError::ConfigError(format!("kdf_iterations: {e}")))
    }

    /// Build the vault configuration these settings describe.
    pub fn vault_config(&self, passphrase: Option<&str>) -> Result<VaultConfig> {
        Ok(VaultConfig::new(&self.app_name, passphrase)?
            .with_providers(self.providers.iter().cloned())?
            .with_kdf_params(self.kdf_params()?))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
