//! `credvault status`: configured/missing state per recognized provider.

use crate::cli::output::{self, StatusRow};
use crate::cli::{open_vault, Cli};
use crate::errors::Result;
use crate::providers;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let metadata = vault.metadata();

    let rows: Vec<StatusRow> = vault
        .configured_status()
        .into_iter()
        .map(|(id, configured)| StatusRow {
            name: providers::find(&id).map_or_else(|| id.clone(), |p| p.name.to_string()),
            meta: metadata.get(&id).copied(),
            provider: id,
            configured,
        })
        .collect();

    let configured = rows.iter().filter(|r| r.configured).count();
    output::print_status_table(&rows);
    output::info(&format!("{configured} of {} providers configured", rows.len()));

    Ok(())
}
