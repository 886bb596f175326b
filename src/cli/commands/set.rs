//! `credvault set`: add or replace a provider key.
//!
//! The vault itself replaces a blob it cannot decrypt.  From the CLI that
//! usually means a mistyped passphrase, so `set` refuses unless the user
//! passes `--force` or confirms interactively.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, read_secret, resolve_provider, Cli};
use crate::errors::{ErrorKind, Result, VaultError};
use crate::providers;
use crate::vault::Vault;

/// Execute the `set` command.
pub fn execute(cli: &Cli, provider: &str, value: Option<&str>, force: bool) -> Result<()> {
    let secret = read_secret(value, &format!("Enter key for {provider}"))?;
    let provider_id = resolve_provider(provider, &secret)?;

    let vault = open_vault(cli)?;
    let existed = match vault.try_list_configured() {
        Ok(ids) => ids.contains(&provider_id),
        Err(e) if matches!(e.kind(), ErrorKind::Decryption | ErrorKind::Format) => {
            if !allow_overwrite(&vault, &e, force)? {
                output::info("Cancelled.");
                return Ok(());
            }
            false
        }
        Err(e) => return Err(e),
    };

    vault.try_store(&secret, &provider_id)?;

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!(
        "Key for '{}' {} ({})",
        provider_id,
        verb,
        providers::mask_key(&secret)
    ));

    if !providers::matches_pattern(&provider_id, &secret) {
        output::warning(&format!(
            "This key does not look like a typical {provider_id} key. Stored anyway."
        ));
    }

    Ok(())
}

/// Decide whether an unreadable vault may be replaced.  Without `--force`
/// this needs an interactive yes; with piped input it is an error.
fn allow_overwrite(vault: &Vault, cause: &VaultError, force: bool) -> Result<bool> {
    let app = vault.config().app_name();
    if force {
        output::warning(&format!(
            "Existing vault for '{app}' could not be read ({cause}); replacing it."
        ));
        return Ok(true);
    }

    if !io::stdin().is_terminal() {
        return Err(VaultError::CommandFailed(format!(
            "existing vault for '{app}' could not be read ({cause}). Check {}, or rerun with --force to replace every stored key",
            crate::cli::PASSPHRASE_ENV
        )));
    }

    output::warning(&format!("Existing vault for '{app}' could not be read ({cause})."));
    Confirm::new()
        .with_prompt("Replace it? Every key stored in it will be lost.")
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}
