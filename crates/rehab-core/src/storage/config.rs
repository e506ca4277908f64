//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Breathing exercise behavior (haptic feedback, tick interval)
//! - Storage backend selection
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Breathing exercise configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_true")]
    pub haptics_enabled: bool,
    /// How often the driver ticks the cycle engine.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// File name of the SQLite database inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}
fn default_database_file() -> String {
    "rehab.db".into()
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            haptics_enabled: true,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_file: default_database_file(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Apply a dot-path update in memory without saving.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.breathing.haptics_enabled);
        assert_eq!(parsed.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[breathing]\nhaptics_enabled = false\n").unwrap();
        assert!(!parsed.breathing.haptics_enabled);
        assert_eq!(parsed.breathing.tick_interval_ms, 100);
        assert_eq!(parsed.storage.database_file, "rehab.db");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("breathing.haptics_enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("storage.backend").as_deref(), Some("sqlite"));
        assert!(cfg.get("breathing.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("breathing.haptics_enabled", "false").unwrap();
        cfg.apply("breathing.tick_interval_ms", "250").unwrap();
        cfg.apply("storage.backend", "memory").unwrap();
        assert!(!cfg.breathing.haptics_enabled);
        assert_eq!(cfg.breathing.tick_interval_ms, 250);
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let result = cfg.apply("breathing.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("breathing.haptics_enabled", "not_a_bool").is_err());
        assert!(cfg.apply("breathing.tick_interval_ms", "soon").is_err());
        // Unknown enum variant fails on the way back into the struct.
        assert!(cfg.apply("storage.backend", "postgres").is_err());
        assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert!(cfg.breathing.haptics_enabled);
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.apply("breathing.haptics_enabled", "false").unwrap();
        changed.save_to(&path).unwrap();
        assert!(!Config::load_from(&path).unwrap().breathing.haptics_enabled);
    }

    #[test]
    fn load_from_reports_parse_and_io_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "breathing = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));

        // A directory exists but cannot be read as a file.
        assert!(matches!(Config::load_from(dir.path()), Err(CoreError::Io(_))));
    }
}
