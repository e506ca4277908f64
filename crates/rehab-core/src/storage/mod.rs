mod config;
pub mod database;
pub mod memory;

pub use config::{BreathingConfig, Config, StorageBackend, StorageConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

/// Storage keys shared by every backend.
pub mod keys {
    pub const COMPLETED_EXERCISES: &str = "completedExercises";
    pub const BREATHING_SESSIONS: &str = "breathingSessions";
    pub const WEEKLY_ASSESSMENT: &str = "weeklyAssessment";
    pub const NOTIFICATION_SETTINGS: &str = "notification_settings";

    /// Key for the free-text note of one day.
    pub fn note(date: &str) -> String {
        format!("note_{date}")
    }
}

/// Fallible string key-value persistence.
///
/// Values are opaque strings; the tracker and stores layer JSON on top via
/// [`read_json`] and [`write_json`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;

    /// Read-modify-write of one key. `f` receives the current value and
    /// returns the value to store.
    ///
    /// Backends override this to make the cycle atomic; the default is a
    /// plain get followed by set.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<String, StorageError>,
    ) -> Result<(), StorageError> {
        let current = self.get(key)?;
        let next = f(current.as_deref())?;
        self.set(key, &next)
    }
}

/// Shared handle to whichever backend was selected at startup.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Decode the JSON value stored under `key`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Serialization {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Atomically decode, mutate and re-encode the JSON value under `key`.
///
/// A missing key starts from `T::default()`. A malformed stored value
/// aborts the update and leaves it untouched.
pub fn update_json<T, R>(
    store: &dyn KeyValueStore,
    key: &str,
    f: impl FnOnce(&mut T) -> R,
) -> Result<R, StorageError>
where
    T: DeserializeOwned + Serialize + Default,
{
    let mut f = Some(f);
    let mut out = None;
    store.update(key, &mut |current| {
        let mut value: T = match current {
            Some(raw) => serde_json::from_str(raw).map_err(|source| {
                StorageError::Serialization {
                    key: key.to_string(),
                    source,
                }
            })?,
            None => T::default(),
        };
        let f = f
            .take()
            .ok_or_else(|| StorageError::backend("update", key, "update applied twice"))?;
        out = Some(f(&mut value));
        serde_json::to_string(&value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })
    })?;
    out.ok_or_else(|| StorageError::backend("update", key, "update was not applied"))
}

/// Open the backend named by `config`. Called once per process.
pub fn open_store(config: &StorageConfig) -> Result<SharedStore> {
    let store: SharedStore = match config.backend {
        StorageBackend::Sqlite => {
            let path = data_dir()?.join(&config.database_file);
            Arc::new(Database::open_at(path)?)
        }
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::debug!(backend = ?config.backend, "opened key-value store");
    Ok(store)
}

/// Returns the data directory, creating it if needed.
///
/// `REHAB_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/rehab-tracker[-dev]/`, with `REHAB_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("REHAB_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("REHAB_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("rehab-tracker-dev")
            } else {
                base_dir.join("rehab-tracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn json_helpers_roundtrip_through_store() {
        let store = MemoryStore::new();
        let mut map = BTreeMap::new();
        map.insert("2025-05-01".to_string(), vec!["mon-1".to_string()]);

        write_json(&store, "k", &map).unwrap();
        let back: Option<BTreeMap<String, Vec<String>>> = read_json(&store, "k").unwrap();
        assert_eq!(back, Some(map));
    }

    #[test]
    fn read_json_reports_malformed_value() {
        let store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        let result: Result<Option<Vec<String>>, _> = read_json(&store, "k");
        assert!(matches!(result, Err(StorageError::Serialization { .. })));
    }

    #[test]
    fn update_json_starts_from_default_and_returns_result() {
        let store = MemoryStore::new();
        let len = update_json(&store, "list", |v: &mut Vec<String>| {
            v.push("a".into());
            v.len()
        })
        .unwrap();
        assert_eq!(len, 1);
        assert_eq!(store.get("list").unwrap().as_deref(), Some(r#"["a"]"#));
    }

    #[test]
    fn update_json_leaves_malformed_value_alone() {
        let store = MemoryStore::new();
        store.set("list", "oops").unwrap();
        let result = update_json(&store, "list", |v: &mut Vec<String>| v.push("a".into()));
        assert!(result.is_err());
        assert_eq!(store.get("list").unwrap().as_deref(), Some("oops"));
    }

    #[test]
    fn note_keys_are_per_date() {
        assert_eq!(keys::note("2025-05-04"), "note_2025-05-04");
    }
}
