//! `credvault clear`: delete every key and all metadata for the app.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `clear` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let vault = open_vault(cli)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete ALL keys for '{}'? This cannot be undone.",
                vault.config().app_name()
            ))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.clear_all();
    output::success(&format!("Cleared vault for '{}'", vault.config().app_name()));

    Ok(())
}
