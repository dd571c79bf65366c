//! Key-value persistence for league records.
//!
//! Values are stored JSON-encoded under a string key. [`MemoryStorage`] keeps everything in
//! memory, [`FileStorage`] writes one `<key>.json` file per key into a directory.
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

pub trait Storage {
    /// Returns the raw value stored at `key`, or `None` if the key does not exist.
    fn raw_get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the raw value stored at `key`.
    fn raw_set(&mut self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a key that does not exist is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Returns the decoded value stored at `key`.
    fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.raw_get(key)? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` and stores it at `key`.
    fn set<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = serde_json::to_string(value)?;
        self.raw_set(key, value)
    }
}

/// A [`Storage`] that only lives as long as the value itself.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn raw_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn raw_set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// A [`Storage`] keeping each key in its own file.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Opens the storage at `path`, creating the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_owned();
        fs::create_dir_all(&path)?;

        log::debug!("Opened storage at {}", path.display());

        Ok(Self { path })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&self, key: &str) -> PathBuf {
        self.path.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn raw_get(&self, key: &str) -> Result<Option<String>> {
        let path = self.file(key);
        log::debug!("Reading {}", path.display());

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn raw_set(&mut self, key: &str, value: String) -> Result<()> {
        let path = self.file(key);
        log::debug!("Writing {}", path.display());

        // Replace the file atomically.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.file(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;

    use super::{FileStorage, MemoryStorage, Storage};

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get::<Vec<u32>>("numbers").unwrap(), None);

        storage.set("numbers", &vec![1_u32, 2, 3]).unwrap();
        assert_eq!(
            storage.get::<Vec<u32>>("numbers").unwrap(),
            Some(vec![1, 2, 3])
        );
        assert_eq!(storage.raw_get("numbers").unwrap().unwrap(), "[1,2,3]");

        storage.delete("numbers").unwrap();
        assert_eq!(storage.get::<Vec<u32>>("numbers").unwrap(), None);
        storage.delete("numbers").unwrap();
    }

    #[test]
    fn test_memory_storage_invalid_json() {
        let mut storage = MemoryStorage::new();
        storage.raw_set("numbers", String::from("[1,")).unwrap();

        assert!(storage.get::<Vec<u32>>("numbers").is_err());
    }

    #[test]
    fn test_file_storage() {
        let path = env::temp_dir().join(format!("pinfall-storage-{}", std::process::id()));

        let mut storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get::<String>("name").unwrap(), None);

        storage.set("name", "Strike Night").unwrap();
        assert!(path.join("name.json").exists());
        assert_eq!(
            storage.get::<String>("name").unwrap().as_deref(),
            Some("Strike Night")
        );

        // A second handle sees the same data.
        let other = FileStorage::open(&path).unwrap();
        assert_eq!(
            other.get::<String>("name").unwrap().as_deref(),
            Some("Strike Night")
        );

        storage.delete("name").unwrap();
        assert!(!path.join("name.json").exists());
        storage.delete("name").unwrap();

        fs::remove_dir_all(path).unwrap();
    }
}
