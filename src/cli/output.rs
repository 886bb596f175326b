//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::MetadataEntry;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// One row of the `list` table.
pub struct KeyRow {
    pub provider: String,
    pub masked: String,
    pub meta: Option<MetadataEntry>,
}

/// Print stored keys (Provider, Key, Last action, When).
pub fn print_keys_table(rows: &[KeyRow]) {
    if rows.is_empty() {
        info("No keys in this vault yet.");
        tip("Run `credvault set <provider>` to add your first key.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Provider", "Key", "Last action", "When"]);

    for row in rows {
        let (action, when) = meta_cells(row.meta.as_ref());
        table.add_row(vec![row.provider.clone(), row.masked.clone(), action, when]);
    }

    println!("{table}");
}

/// One row of the `status` table.
pub struct StatusRow {
    pub provider: String,
    pub name: String,
    pub configured: bool,
    pub meta: Option<MetadataEntry>,
}

/// Print configured/missing state for each recognized provider.
pub fn print_status_table(rows: &[StatusRow]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Provider", "Name", "Configured", "Last action", "When"]);

    for row in rows {
        let configured = if row.configured {
            style("yes").green().to_string()
        } else {
            style("no").dim().to_string()
        };
        let (action, when) = meta_cells(row.meta.as_ref());
        table.add_row(vec![
            row.provider.clone(),
            row.name.clone(),
            configured,
            action,
            when,
        ]);
    }

    println!("{table}");
}

fn meta_cells(meta: Option<&MetadataEntry>) -> (String, String) {
    match meta {
        Some(m) => (m.last_action.as_str().to_string(), format_time(m.timestamp)),
        None => ("-".to_string(), "-".to_string()),
    }
}

pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
