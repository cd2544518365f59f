//! Durable record stores
//!
//! - Native: a small JSON object of `key -> integer` on disk, replaced
//!   atomically (tmp file, then rename)
//! - WASM: browser LocalStorage, one decimal string per key

#[cfg(not(target_arch = "wasm32"))]
pub use native::JsonFileStore;

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use crate::error::StoreError;
    use crate::records::BestRecordStore;

    /// Records kept in a JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// A missing file is an empty store
        fn read_all(&self) -> Result<BTreeMap<String, u64>, StoreError> {
            match fs::read_to_string(&self.path) {
                Ok(json) => Ok(serde_json::from_str(&json)?),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(e.into()),
            }
        }

        fn write_all(&self, values: &BTreeMap<String, u64>) -> Result<(), StoreError> {
            let json = serde_json::to_string_pretty(values)?;
            let tmp = self.path.with_extension("tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl BestRecordStore for JsonFileStore {
        fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
            Ok(self.read_all()?.get(key).copied())
        }

        fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
            let mut values = match self.read_all() {
                Ok(values) => values,
                Err(StoreError::Corrupt(e)) => {
                    log::warn!("Replacing unreadable {}: {e}", self.path.display());
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            values.insert(key.to_string(), value);
            self.write_all(&values)?;
            log::debug!("Saved {key} = {value} to {}", self.path.display());
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::error::StoreError;
    use crate::records::BestRecordStore;

    /// Records kept in the browser's LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .ok_or_else(|| StoreError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".into()))
        }
    }

    impl BestRecordStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
            let raw = Self::storage()?
                .get_item(key)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
            match raw {
                Some(raw) => Ok(Some(serde_json::from_str(raw.trim())?)),
                None => Ok(None),
            }
        }

        fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(key, &value.to_string())
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::StoreError;
    use crate::records::{self, BEST_DISTANCE_KEY, BEST_SCORE_KEY, BestRecord, BestRecordStore};

    fn scratch(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "espresso-dash-{name}-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = JsonFileStore::new(scratch("missing"));
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), None);
        let (record, errors) = BestRecord::load(&store);
        assert!(record.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch("reopen");
        let mut store = JsonFileStore::new(&path);
        store.set(BEST_SCORE_KEY, 1234).unwrap();
        store.set(BEST_DISTANCE_KEY, 87).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get(BEST_SCORE_KEY).unwrap(), Some(1234));
        assert_eq!(reopened.get(BEST_DISTANCE_KEY).unwrap(), Some(87));
        assert!(!path.with_extension("tmp").exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_reported_then_replaced() {
        let path = scratch("corrupt");
        std::fs::write(&path, "{ not json").unwrap();
        let mut store = JsonFileStore::new(&path);

        assert!(matches!(
            store.get(BEST_SCORE_KEY),
            Err(StoreError::Corrupt(_))
        ));

        let update = records::submit(&mut store, BestRecord::default(), 300, 12);
        assert!(update.persisted());
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), Some(300));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unreachable_path_is_io_error() {
        let path = scratch("dir").join("nested").join("best.json");
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.set(BEST_SCORE_KEY, 1), Err(StoreError::Io(_))));
        // Reads of a missing parent are just "nothing stored"
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), None);
    }
}
