//! Environment fingerprint used as a fallback passphrase.
//!
//! When the host supplies no passphrase, the vault is keyed by a string
//! built from easily observable attributes of the machine: app name,
//! locale, timezone, OS, architecture and user name.  Anyone who can see
//! those can rebuild it, so it only keeps a blob unreadable to casual
//! inspection.  It is not a security boundary.

use std::env;

/// The attributes a fingerprint is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentAttributes {
    pub locale: String,
    pub timezone: String,
    pub os: String,
    pub arch: String,
    pub user: String,
}

impl EnvironmentAttributes {
    /// Read the attributes of the current process environment.
    pub fn collect() -> Self {
        Self {
            locale: first_var(&["LC_ALL", "LC_MESSAGES", "LANG"]),
            timezone: first_var(&["TZ"]),
            os: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            user: first_var(&["USER", "USERNAME", "LOGNAME"]),
        }
    }

    /// Join the attributes into a passphrase for `app_name`.
    pub fn passphrase_for(&self, app_name: &str) -> String {
        format!(
            "{app_name}|{}|{}|{}|{}|{}",
            self.locale, self.timezone, self.os, self.arch, self.user
        )
    }
}

/// Fingerprint passphrase for `app_name` in the current environment.
pub fn environment_passphrase(app_name: &str) -> String {
    EnvironmentAttributes::collect().passphrase_for(app_name)
}

fn first_var(names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
