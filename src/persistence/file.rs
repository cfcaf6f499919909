//! JSON file store for native builds

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Native store: all slots live in one JSON object file
///
/// Writes go to a sibling `.tmp` file which is then renamed over the
/// original, so a crash mid-write never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if data.is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&data).map_err(StoreError::Malformed)
    }

    fn write_all(&self, slots: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let bytes = serde_json::to_vec_pretty(slots).map_err(StoreError::Malformed)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, bytes)?;
        match fs::rename(&tmp_path, &self.path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if self.path.exists() {
                    fs::remove_file(&self.path)?;
                    fs::rename(&tmp_path, &self.path)?;
                    Ok(())
                } else {
                    Err(rename_err.into())
                }
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.read_all()?;
        slots.insert(key.to_string(), value.to_string());
        self.write_all(&slots)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut slots = self.read_all()?;
        if slots.remove(key).is_some() {
            self.write_all(&slots)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let store = FileStore::new(dir.path().join("nested").join("storage.json"));
        assert_eq!(store.get("meal-plan").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_get_delete_persist_across_instances() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::new(&path);
        store.set("meal-plan", r#"{"Monday":{}}"#).unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("meal-plan").unwrap().as_deref(),
            Some(r#"{"Monday":{}}"#)
        );

        reopened.delete("meal-plan").unwrap();
        assert_eq!(store.get("meal-plan").unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
        assert!(!dir.path().join("nested").join("storage.json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").expect("fixture should write");

        let store = FileStore::new(&path);
        assert!(matches!(store.get("meal-plan"), Err(StoreError::Malformed(_))));
        assert!(store.set("meal-plan", "{}").is_err());
    }
}
