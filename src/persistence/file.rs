//! Directory-backed persistence.
//!
//! Each namespace key maps to one file `<dir>/<key>`.  Writes go through
//! a temp file in the same directory followed by a rename, so a reader
//! sees either the old value or the new one, never a partial write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Persistence;
use crate::errors::{Result, VaultError};

/// Stores each key as an owner-only file inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.  The directory is created lazily
    /// on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the file path for a key, rejecting anything that could
    /// escape the directory.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let safe = !key.is_empty()
            && !key.starts_with('.')
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.');
        if !safe {
            return Err(VaultError::Persistence(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(key))
    }

    /// Ensure the directory exists with restrictive permissions.
    pub fn ensure_dir(&self) -> Result<()> {
        if self.dir.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|e| {
            VaultError::Persistence(format!(
                "cannot create storage directory {}: {e}",
                self.dir.display()
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700));
        }

        Ok(())
    }
}

impl Persistence for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Persistence(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.ensure_dir()?;

        let tmp_path = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp_path, value).map_err(|e| {
            VaultError::Persistence(format!("failed to write {}: {e}", tmp_path.display()))
        })?;

        // On Unix, restrict permissions to owner-only read/write before
        // the file becomes visible under its real name.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(VaultError::Persistence(format!(
                "failed to replace {}: {e}",
                path.display()
            )));
        }

        debug!(key, path = %path.display(), "persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Persistence(format!(
                "failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn roundtrip_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store"));
        store.set("app.credentials", "token-1").unwrap();

        let reopened = FileStore::new(dir.path().join("store"));
        assert_eq!(
            reopened.get("app.credentials").unwrap().as_deref(),
            Some("token-1")
        );
    }

    #[test]
    fn missing_key_is_none_and_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
        store.remove("nothing").unwrap();
    }

    #[test]
    fn overwrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert!(!dir.path().join(".k.tmp").exists());
    }

    #[test]
    fn rejects_path_traversal_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.set("a/b", "x").is_err());
        assert!(store.get(".hidden").is_err());
        assert!(store.set("", "x").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn files_have_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join("vault");
        let store = FileStore::new(&root);
        store.set("app.credentials", "token").unwrap();

        let file_mode = fs::metadata(root.join("app.credentials"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(file_mode & 0o777, 0o600);

        let dir_mode = fs::metadata(&root).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }
}
