//! Daily reminder settings.
//!
//! Only the settings are kept here; delivering the reminders is left to
//! whatever front end reads them.

use serde::{Deserialize, Serialize};

use super::dates::parse_time;
use crate::error::{Result, ValidationError};
use crate::storage::{keys, read_json, update_json, write_json, SharedStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `HH:MM`
    pub time: String,
    pub enabled: bool,
}

impl NotificationSetting {
    fn new(id: &str, title: &str, description: &str, time: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            time: time.into(),
            enabled: true,
        }
    }
}

/// The five reminders every install starts with.
pub fn default_notifications() -> Vec<NotificationSetting> {
    vec![
        NotificationSetting::new(
            "1",
            "Wake-up breathing",
            "Diaphragmatic breathing right after waking",
            "05:00",
        ),
        NotificationSetting::new(
            "2",
            "Warm-up reminder",
            "Rehab exercises before training",
            "05:10",
        ),
        NotificationSetting::new(
            "3",
            "After-meal breathing",
            "Breathing practice after lunch",
            "12:30",
        ),
        NotificationSetting::new(
            "4",
            "Work-break breathing",
            "Breathing practice during the afternoon break",
            "15:00",
        ),
        NotificationSetting::new(
            "5",
            "Pre-sleep breathing",
            "Relaxing breathing before bed",
            "22:00",
        ),
    ]
}

pub struct NotificationStore {
    store: SharedStore,
}

impl NotificationStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Saved settings, or the defaults when none are saved or they can't be
    /// read.
    pub fn load(&self) -> Vec<NotificationSetting> {
        match read_json(self.store.as_ref(), keys::NOTIFICATION_SETTINGS) {
            Ok(Some(settings)) => settings,
            Ok(None) => default_notifications(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read notification settings, using defaults");
                default_notifications()
            }
        }
    }

    /// Flip `enabled` for reminder `id` and return the new value.
    pub fn toggle(&self, id: &str) -> Result<bool> {
        self.modify(id, |setting| {
            setting.enabled = !setting.enabled;
            setting.enabled
        })
    }

    /// Change the time of reminder `id`. Returns the normalized `HH:MM`.
    pub fn set_time(&self, id: &str, time: &str) -> Result<String> {
        let time = parse_time(time)?;
        self.modify(id, |setting| {
            setting.time = time.clone();
        })?;
        Ok(time)
    }

    pub fn reset(&self) -> Result<Vec<NotificationSetting>> {
        let defaults = default_notifications();
        write_json(self.store.as_ref(), keys::NOTIFICATION_SETTINGS, &defaults)?;
        tracing::info!("notification settings reset to defaults");
        Ok(defaults)
    }

    fn modify<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut NotificationSetting) -> R,
    ) -> Result<R> {
        let result = update_json(
            self.store.as_ref(),
            keys::NOTIFICATION_SETTINGS,
            |stored: &mut Option<Vec<NotificationSetting>>| {
                let settings = stored.get_or_insert_with(default_notifications);
                settings.iter_mut().find(|s| s.id == id).map(f)
            },
        )?;
        result.ok_or_else(|| {
            ValidationError::UnknownId {
                kind: "notification",
                id: id.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn store() -> NotificationStore {
        NotificationStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn defaults_when_nothing_saved() {
        let settings = store().load();
        let times: Vec<&str> = settings.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, ["05:00", "05:10", "12:30", "15:00", "22:00"]);
        assert!(settings.iter().all(|s| s.enabled));
    }

    #[test]
    fn toggle_and_set_time_persist() {
        let store = store();
        assert!(!store.toggle("3").unwrap());
        assert_eq!(store.set_time("5", "21:45").unwrap(), "21:45");

        let settings = store.load();
        assert!(!settings[2].enabled);
        assert_eq!(settings[4].time, "21:45");
        assert_eq!(settings.len(), 5);
    }

    #[test]
    fn invalid_time_and_unknown_id_are_rejected() {
        let store = store();
        assert!(matches!(
            store.set_time("1", "25:00"),
            Err(CoreError::Validation(ValidationError::InvalidTime(_)))
        ));
        assert!(matches!(
            store.toggle("42"),
            Err(CoreError::Validation(ValidationError::UnknownId { .. }))
        ));
    }

    #[test]
    fn reset_restores_defaults() {
        let store = store();
        store.toggle("1").unwrap();
        store.reset().unwrap();
        assert_eq!(store.load(), default_notifications());
    }
}
