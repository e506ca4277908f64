//! Per-date completion sets, persisted as one JSON mapping
//! `{"YYYY-MM-DD": ["id", ...]}` under a single storage key.
//!
//! The plain methods never fail: storage errors are logged and the caller
//! sees an empty result. The `try_*` variants surface the error instead.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::dates::{date_key, parse_date};
use crate::error::StorageError;
use crate::storage::{keys, read_json, update_json, SharedStore};

/// Typed view of the persisted mapping.
pub type CompletionHistory = BTreeMap<NaiveDate, BTreeSet<String>>;

type RawHistory = BTreeMap<String, BTreeSet<String>>;

pub struct CompletionTracker {
    store: SharedStore,
    key: String,
}

impl CompletionTracker {
    /// Tracker for rehab exercise completions.
    pub fn new(store: SharedStore) -> Self {
        Self::with_key(store, keys::COMPLETED_EXERCISES)
    }

    /// Tracker for breathing slot completions, kept apart from exercises so
    /// they never count toward exercise stats.
    pub fn breathing(store: SharedStore) -> Self {
        Self::with_key(store, keys::BREATHING_SESSIONS)
    }

    pub fn with_key(store: SharedStore, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Flip membership of `id` on `date` and return the new membership.
    ///
    /// On storage failure the persisted membership is reported unchanged.
    pub fn toggle_completion(&self, date: NaiveDate, id: &str) -> bool {
        match self.try_toggle_completion(date, id) {
            Ok(done) => done,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    %date,
                    id,
                    error = %e,
                    "failed to toggle completion"
                );
                self.get_completions(date).contains(id)
            }
        }
    }

    pub fn try_toggle_completion(&self, date: NaiveDate, id: &str) -> Result<bool, StorageError> {
        let day = date_key(date);
        let done = update_json(self.store.as_ref(), &self.key, |raw: &mut RawHistory| {
            let set = raw.entry(day.clone()).or_default();
            let done = if set.remove(id) {
                false
            } else {
                set.insert(id.to_string());
                true
            };
            if set.is_empty() {
                raw.remove(&day);
            }
            done
        })?;
        tracing::debug!(key = %self.key, %date, id, done, "toggled completion");
        Ok(done)
    }

    /// Add `id` to `date` without toggling. Returns false if it was
    /// already there.
    pub fn try_mark_completion(&self, date: NaiveDate, id: &str) -> Result<bool, StorageError> {
        let day = date_key(date);
        update_json(self.store.as_ref(), &self.key, |raw: &mut RawHistory| {
            raw.entry(day).or_default().insert(id.to_string())
        })
    }

    /// Replace the whole set for `date`. An empty set removes the date.
    pub fn set_completions(&self, date: NaiveDate, ids: BTreeSet<String>) {
        if let Err(e) = self.try_set_completions(date, ids) {
            tracing::warn!(key = %self.key, %date, error = %e, "failed to save completions");
        }
    }

    pub fn try_set_completions(
        &self,
        date: NaiveDate,
        ids: BTreeSet<String>,
    ) -> Result<(), StorageError> {
        let day = date_key(date);
        update_json(self.store.as_ref(), &self.key, |raw: &mut RawHistory| {
            if ids.is_empty() {
                raw.remove(&day);
            } else {
                raw.insert(day, ids);
            }
        })
    }

    pub fn get_completions(&self, date: NaiveDate) -> BTreeSet<String> {
        self.try_get_completions(date).unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, %date, error = %e, "failed to read completions");
            BTreeSet::new()
        })
    }

    pub fn try_get_completions(&self, date: NaiveDate) -> Result<BTreeSet<String>, StorageError> {
        let mut raw = self.read_raw()?;
        Ok(raw.remove(&date_key(date)).unwrap_or_default())
    }

    pub fn get_all_completions(&self) -> CompletionHistory {
        self.try_get_all_completions().unwrap_or_else(|e| {
            tracing::warn!(key = %self.key, error = %e, "failed to read completion history");
            CompletionHistory::new()
        })
    }

    /// Every date with a stored set. Keys that are not valid dates are
    /// skipped with a warning.
    pub fn try_get_all_completions(&self) -> Result<CompletionHistory, StorageError> {
        let mut history = CompletionHistory::new();
        for (day, ids) in self.read_raw()? {
            match parse_date(&day) {
                Ok(date) => {
                    history.entry(date).or_default().extend(ids);
                }
                Err(e) => tracing::warn!(key = %self.key, error = %e, "skipping stored date"),
            }
        }
        Ok(history)
    }

    fn read_raw(&self) -> Result<RawHistory, StorageError> {
        Ok(read_json(self.store.as_ref(), &self.key)?.unwrap_or_default())
    }
}
