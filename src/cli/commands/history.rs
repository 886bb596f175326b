//! `credvault history`: display the vault event history.
//!
//! Usage:
//!   credvault history               # show last 50 entries
//!   credvault history --last 20     # show last 20
//!   credvault history --since 7d    # entries from last 7 days

use chrono::{DateTime, Utc};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// Execute the `history` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{load_settings, output};

    let settings = load_settings(cli)?;
    let vault_dir = settings.vault_dir_path(&std::env::current_dir()?);

    let history = AuditLog::open(&vault_dir)
        .ok_or_else(|| VaultError::AuditError("failed to open history database".into()))?;

    let since_dt = since.map(parse_duration).transpose()?;
    let entries = history.query(last, since_dt, Some(&settings.app_name))?;

    if entries.is_empty() {
        output::info("No history entries found.");
        return Ok(());
    }

    print_history_table(&entries);

    Ok(())
}

#[cfg(not(feature = "audit-log"))]
pub fn execute(_cli: &Cli, _last: usize, since: Option<&str>) -> Result<()> {
    since.map(parse_duration).transpose()?;
    Err(VaultError::ConfigError(
        "history requires building with the `audit-log` feature".into(),
    ))
}

/// Parse a human-friendly duration string like "7d", "24h", "30m" into the
/// instant that far in the past.
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}'; use a format like 7d, 24h, or 30m"
        ))
    };

    let (num_str, duration): (&str, fn(i64) -> Option<chrono::Duration>) =
        if let Some(s) = input.strip_suffix('d') {
            (s, chrono::Duration::try_days)
        } else if let Some(s) = input.strip_suffix('h') {
            (s, chrono::Duration::try_hours)
        } else if let Some(s) = input.strip_suffix('m') {
            (s, chrono::Duration::try_minutes)
        } else {
            return Err(invalid());
        };

    let num: i64 = num_str.parse().map_err(|_| invalid())?;
    if num < 0 {
        return Err(invalid());
    }

    let delta = duration(num).ok_or_else(invalid)?;
    Utc::now().checked_sub_signed(delta).ok_or_else(invalid)
}

/// Print history entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_history_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Action", "App", "Provider"]);

    for entry in entries {
        table.add_row(vec![
            crate::cli::output::format_time(entry.timestamp),
            colorize_action(&entry.action),
            entry.app.clone(),
            entry.provider.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!(
        "{}",
        style(format!("{} history entries:", entries.len())).bold()
    );
    println!("{table}");
}

#[cfg(feature = "audit-log")]
fn colorize_action(action: &str) -> String {
    use console::style;

    match action {
        "stored" => style(action).green().to_string(),
        "deleted" => style(action).red().to_string(),
        "cleared" => style(action).yellow().to_string(),
        _ => action.to_string(),
    }
}
