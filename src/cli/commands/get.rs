//! `credvault get`: print a provider key.
//!
//! When the key is missing and stdin is a terminal, the user is offered a
//! one-time setup prompt (see `cli::session`).

use std::io::{self, IsTerminal};

use crate::cli::session::Session;
use crate::cli::{open_vault, output, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, provider: &str, no_setup: bool) -> Result<()> {
    let vault = open_vault(cli)?;

    if no_setup || !io::stdin().is_terminal() {
        return match vault.try_retrieve(provider)? {
            Some(secret) => {
                println!("{secret}");
                Ok(())
            }
            None => Err(VaultError::ProviderNotFound(provider.to_string())),
        };
    }

    // Surface a wrong passphrase instead of offering setup over it.
    vault.try_list_configured()?;

    let mut session = Session::new(setup_prompt);
    match session.try_enable_feature(&vault, provider) {
        Some(secret) => {
            println!("{secret}");
            Ok(())
        }
        None => Err(VaultError::ProviderNotFound(provider.to_string())),
    }
}

/// Interactive setup: ask for the key, or `None` if the user declines.
fn setup_prompt(provider_id: &str) -> Option<String> {
    output::info(&format!("No key stored for '{provider_id}'."));
    let wants = dialoguer::Confirm::new()
        .with_prompt("Set it up now?")
        .default(true)
        .interact()
        .ok()?;
    if !wants {
        return None;
    }

    dialoguer::Password::new()
        .with_prompt(format!("Enter key for {provider_id}"))
        .interact()
        .ok()
}
