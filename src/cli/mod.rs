//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;
pub mod session;

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{Backend, Settings};
use crate::errors::{Result, VaultError};
use crate::persistence::{FileStore, Persistence};
use crate::providers;
use crate::vault::Vault;

/// Environment variable holding the vault passphrase.
pub const PASSPHRASE_ENV: &str = "CREDVAULT_PASSPHRASE";

/// Provider argument that asks for auto-detection.
pub const AUTO_PROVIDER: &str = "auto";

/// CredVault CLI: encrypted API credential vault.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted vault for provider API keys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// App namespace (overrides `app_name` in .credvault.toml)
    #[arg(long, global = true)]
    pub app: Option<String>,

    /// Vault directory for the file backend (overrides `vault_dir`)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Prompt for the passphrase instead of reading CREDVAULT_PASSPHRASE
    #[arg(long, global = true)]
    pub ask_passphrase: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a provider key (add or replace)
    Set {
        /// Provider id (e.g. openai), or `auto` to detect it from the key
        provider: String,
        /// Key value (omit for interactive prompt)
        value: Option<String>,
        /// Replace a vault this passphrase cannot decrypt
        #[arg(short, long)]
        force: bool,
    },

    /// Print a provider key, offering setup if it is missing
    Get {
        /// Provider id
        provider: String,
        /// Never prompt; just report whether the key exists
        #[arg(long)]
        no_setup: bool,
    },

    /// Delete a provider key
    Delete {
        /// Provider id
        provider: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List stored keys (masked)
    List,

    /// Show which recognized providers are configured
    Status,

    /// Guess which provider issued a key
    Detect {
        /// Key value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Print the masked display form of a key
    Mask {
        /// Key value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Delete every stored key and all metadata
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// View the history of vault changes
    History {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.credvault.toml` from the working directory and apply CLI
/// overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(app) = &cli.app {
        settings.app_name = app.clone();
    }
    if let Some(dir) = &cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    Ok(settings)
}

/// Get the vault passphrase, trying in order:
/// 1. `CREDVAULT_PASSPHRASE` env var
/// 2. Interactive prompt, if `--ask-passphrase` was given
///
/// Returns `None` when neither applies; the vault then falls back to the
/// environment fingerprint.
pub fn resolve_passphrase(cli: &Cli) -> Result<Option<Zeroizing<String>>> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Some(Zeroizing::new(pw)));
        }
    }

    if cli.ask_passphrase {
        let pw = dialoguer::Password::new()
            .with_prompt("Enter vault passphrase")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
        return Ok(Some(Zeroizing::new(pw)));
    }

    Ok(None)
}

/// Build the vault described by the settings and CLI flags.
pub fn open_vault(cli: &Cli) -> Result<Vault> {
    let settings = load_settings(cli)?;
    let passphrase = resolve_passphrase(cli)?;
    let config = settings.vault_config(passphrase.as_ref().map(|p| p.as_str()))?;

    if config.uses_fingerprint() {
        output::warning(&format!(
            "No passphrase set; the vault is keyed by a guessable machine fingerprint. Set {PASSPHRASE_ENV} for real protection."
        ));
    }

    let vault_dir = settings.vault_dir_path(&std::env::current_dir()?);
    let storage = build_storage(&settings, &vault_dir)?;
    let vault = Vault::new(config, storage);

    #[cfg(feature = "audit-log")]
    attach_history(&vault, &vault_dir);

    Ok(vault)
}

/// Pick the persistence backend named in the settings.
fn build_storage(settings: &Settings, vault_dir: &Path) -> Result<Box<dyn Persistence>> {
    match settings.backend {
        Backend::File => Ok(Box::new(FileStore::new(vault_dir))),
        #[cfg(feature = "keyring-store")]
        Backend::Keyring => Ok(Box::new(crate::persistence::KeyringStore::new(
            settings.app_name.clone(),
        ))),
        #[cfg(not(feature = "keyring-store"))]
        Backend::Keyring => Err(VaultError::ConfigError(
            "backend = \"keyring\" requires building with the `keyring-store` feature".into(),
        )),
    }
}

/// Record vault events in the history database.  Silently skipped if the
/// database can't be opened.
#[cfg(feature = "audit-log")]
fn attach_history(vault: &Vault, vault_dir: &Path) {
    if FileStore::new(vault_dir).ensure_dir().is_err() {
        return;
    }
    if let Some(log) = crate::audit::AuditLog::open(vault_dir) {
        log.attach(vault);
    }
}

/// Read a key value from one of three sources: the command line, piped
/// stdin, or a hidden interactive prompt.
pub fn read_secret(value: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Key provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim().to_string()));
    }

    let entered = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(entered.trim().to_string()))
}

/// Turn the provider argument into a provider id, detecting it from the
/// key when the argument is `auto`.
pub fn resolve_provider(arg: &str, secret: &str) -> Result<String> {
    let id = if arg == AUTO_PROVIDER {
        providers::detect_provider(secret)
    } else {
        arg
    };
    providers::validate_provider_id(id)?;
    Ok(id.to_string())
}
