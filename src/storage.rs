//! Key/value persistence of JSON blobs.
//!
//! Every store in the trainer keeps one document per key. On disk a key maps
//! to `<root>/<key>.json`; tests use [`MemoryStorage`].

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const PROGRESS_KEY: &str = "typing_progress";
pub const MISSED_KEYS_KEY: &str = "missed_keys_data";
pub const SPORT_STUDENTS_KEY: &str = "sport_students";
pub const SPORT_RESULTS_KEY: &str = "sport_results";
pub const SPORT_COMPETITIONS_KEY: &str = "sport_competitions";

pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        tracing::debug!(key, bytes = value.len(), "wrote blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage, handy for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}

/// Load the document at `key`. A missing blob, an unreadable one or malformed
/// JSON all yield the default value.
pub fn load_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Storage + ?Sized,
{
    let raw = match storage.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored data, using defaults");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored data, using defaults");
            T::default()
        }
    }
}

pub fn save<T, S>(storage: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let data = serde_json::to_string_pretty(value)?;
    storage.write(key, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read("k").unwrap(), None);
        storage.write("k", "[1,2,3]").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(dir.path().join("nested").join("k.json").exists());

        storage.remove("k").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);
        storage.remove("k").unwrap();
    }

    #[test]
    fn malformed_json_falls_back_to_default() {
        let storage = MemoryStorage::new();
        storage.write("numbers", "{not json").unwrap();

        let loaded: Vec<u32> = load_or_default(&storage, "numbers");
        assert!(loaded.is_empty());
    }

    #[test]
    fn missing_key_falls_back_to_default() {
        let storage = MemoryStorage::new();
        let loaded: HashMap<String, u32> = load_or_default(&storage, "absent");
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_then_load() {
        let storage = MemoryStorage::new();
        save(&storage, "numbers", &vec![4u32, 2]).unwrap();

        let loaded: Vec<u32> = load_or_default(&storage, "numbers");
        assert_eq!(loaded, vec![4, 2]);
    }
}
