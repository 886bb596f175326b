//! `credvault delete`: remove a provider key.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, provider: &str, force: bool) -> Result<()> {
    let vault = open_vault(cli)?;

    if !vault.has_key(provider) {
        return Err(VaultError::ProviderNotFound(provider.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete key for '{provider}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.try_remove(provider)?;
    output::success(&format!("Deleted key for '{provider}'"));

    Ok(())
}
