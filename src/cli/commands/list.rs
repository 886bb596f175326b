//! `credvault list`: show stored keys, masked.

use crate::cli::output::{self, KeyRow};
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let masked = vault.try_list_masked()?;
    let metadata = vault.metadata();

    let rows: Vec<KeyRow> = masked
        .into_iter()
        .map(|(provider, masked)| KeyRow {
            meta: metadata.get(&provider).copied(),
            provider,
            masked,
        })
        .collect();

    output::print_keys_table(&rows);
    Ok(())
}
