//! Cart storage on the local filesystem.
//!
//! One JSON file per key under a root directory. Writes go to a uniquely
//! named temporary file first and are renamed into place, so readers never
//! see a half-written cart.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use jersey_house_core::{CartStorage, StorageError};
use uuid::Uuid;

const EXTENSION: &str = "json";

/// Maximum key length; keeps file names well inside filesystem limits.
const MAX_KEY_LEN: usize = 128;

/// File-per-key cart storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the cart files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{EXTENSION}")))
    }
}

/// Keys become file names: ASCII alphanumerics, `_`, `-` and `.`, not
/// starting with a dot.
fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let temp_path = self
            .root
            .join(format!(".{key}.{}.tmp", Uuid::new_v4().simple()));

        fs::write(&temp_path, value)?;
        if let Err(error) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(error.into());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_key(stem).is_ok()
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_load_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        assert_eq!(storage.load("guest_cart").unwrap(), None);
        storage.store("guest_cart", r#"{"version":2,"items":[]}"#).unwrap();
        assert_eq!(
            storage.load("guest_cart").unwrap().as_deref(),
            Some(r#"{"version":2,"items":[]}"#)
        );
        assert!(dir.path().join("guest_cart.json").exists());

        storage.remove("guest_cart").unwrap();
        storage.remove("guest_cart").unwrap();
        assert_eq!(storage.load("guest_cart").unwrap(), None);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        storage.store("7_cart", "first").unwrap();
        storage.store("7_cart", "second").unwrap();

        assert_eq!(storage.load("7_cart").unwrap().as_deref(), Some("second"));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_keys_are_sorted_and_skip_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.store("guest_cart", "[]").unwrap();
        storage.store("12_cart", "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        assert_eq!(storage.keys().unwrap(), ["12_cart", "guest_cart"]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();

        for key in ["../escape", "a/b", "", ".hidden", "white space"] {
            assert!(
                matches!(storage.store(key, "x"), Err(StorageError::InvalidKey(_))),
                "accepted {key:?}"
            );
        }
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("carts");
        let storage = FileStorage::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.root(), nested);
    }
}
