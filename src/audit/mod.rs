//! Audit history: SQLite-based log of vault events.
//!
//! Where `Metadata` only keeps the last action per provider, the history
//! keeps every event in `<vault_dir>/history.db`.  It never stores secret
//! values, only the action, app name and provider id.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, vault operations continue without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{Result, VaultError};
use crate::vault::{Vault, VaultEvent};

/// File name of the history database inside the vault directory.
const DB_FILE: &str = "history.db";

/// A single history entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub app: String,
    pub provider: Option<String>,
}

/// SQLite-backed event history.
pub struct AuditLog {
    conn: Mutex<Connection>,
}

impl AuditLog {
    /// Open (or create) the history database at `<vault_dir>/history.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "history unavailable" and continue normally.
    pub fn open(vault_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(vault_dir);
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS vault_events (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                action    TEXT NOT NULL,
                app       TEXT NOT NULL,
                provider  TEXT
            );",
        )
        .ok()?;

        Some(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Record an event.  Fire-and-forget: errors are logged and dropped.
    pub fn record(&self, app: &str, event: &VaultEvent) {
        let now = Utc::now().to_rfc3339();
        let result = self.conn.lock().execute(
            "INSERT INTO vault_events (timestamp, action, app, provider)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, event.action(), app, event.provider_id()],
        );
        if let Err(e) = result {
            debug!(error = %e, "failed to write history entry");
        }
    }

    /// Forward every event of `vault` into this log.
    pub fn attach(self, vault: &Vault) {
        let app = vault.config().app_name().to_string();
        vault.subscribe(move |event| self.record(&app, event));
    }

    /// Query recent entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only return entries at or after this time.
    /// - `app`: if provided, only return entries for this app namespace.
    pub fn query(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
        app: Option<&str>,
    ) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // Stored timestamps are RFC 3339 in UTC, so text order is time order.
        let since_str = since.map_or_else(String::new, |ts| ts.to_rfc3339());

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, timestamp, action, app, provider
                 FROM vault_events
                 WHERE timestamp >= ?1 AND (?3 IS NULL OR app = ?3)
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| VaultError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64, app], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    action: row.get(2)?,
                    app: row.get(3)?,
                    provider: row.get(4)?,
                })
            })
            .map_err(|e| VaultError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| VaultError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Return the path to the history database (for testing/display).
    pub fn db_path(vault_dir: &Path) -> PathBuf {
        vault_dir.join(DB_FILE)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::VaultConfig;
    use crate::persistence::MemoryStore;
    use tempfile::TempDir;

    #[test]
    fn open_creates_database() {
        let dir = TempDir::new().unwrap();
        assert!(AuditLog::open(dir.path()).is_some());
        assert!(dir.path().join("history.db").exists());
    }

    #[test]
    fn record_and_query_roundtrip() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.record("app", &VaultEvent::Stored("openai".into()));
        audit.record("app", &VaultEvent::Deleted("openai".into()));
        audit.record("app", &VaultEvent::ClearedAll);

        let entries = audit.query(10, None, None).unwrap();
        assert_eq!(entries.len(), 3);

        // Most recent first.
        assert_eq!(entries[0].action, "cleared");
        assert!(entries[0].provider.is_none());
        assert_eq!(entries[1].action, "deleted");
        assert_eq!(entries[2].action, "stored");
        assert_eq!(entries[2].provider.as_deref(), Some("openai"));
        assert_eq!(entries[2].app, "app");
    }

    #[test]
    fn query_with_limit_and_since() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        for i in 0..5 {
            audit.record("app", &VaultEvent::Stored(format!("p{i}")));
        }
        assert_eq!(audit.query(3, None, None).unwrap().len(), 3);

        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(audit.query(10, Some(past), None).unwrap().len(), 5);

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(audit.query(10, Some(future), None).unwrap().is_empty());
    }

    #[test]
    fn query_filters_by_app() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.record("editor", &VaultEvent::Stored("openai".into()));
        audit.record("chat", &VaultEvent::Stored("groq".into()));
        audit.record("editor", &VaultEvent::ClearedAll);

        let editor = audit.query(10, None, Some("editor")).unwrap();
        assert_eq!(editor.len(), 2);
        assert!(editor.iter().all(|e| e.app == "editor"));

        let chat = audit.query(10, None, Some("chat")).unwrap();
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].provider.as_deref(), Some("groq"));

        assert_eq!(audit.query(10, None, None).unwrap().len(), 3);
        assert!(audit.query(10, None, Some("other")).unwrap().is_empty());
    }

    #[test]
    fn attach_records_vault_events() {
        let dir = TempDir::new().unwrap();
        let config = VaultConfig::new("app", Some("pw")).unwrap();
        let vault = Vault::new(config, Box::new(Arc::new(MemoryStore::new())));
        AuditLog::open(dir.path()).unwrap().attach(&vault);

        assert!(vault.store("sk-abcdefghijklmnop", "openai"));
        assert!(vault.remove("openai"));

        let reader = AuditLog::open(dir.path()).unwrap();
        let actions: Vec<String> = reader
            .query(10, None, None)
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, ["deleted", "stored"]);
    }

    #[test]
    fn open_returns_none_on_bad_path() {
        let result = AuditLog::open(Path::new("/nonexistent/path/that/does/not/exist"));
        assert!(result.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn history_db_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let _audit = AuditLog::open(dir.path()).unwrap();

        let perms = std::fs::metadata(dir.path().join("history.db"))
            .unwrap()
            .permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
