//! Free-text daily notes, stored raw under `note_<date>`.

use chrono::NaiveDate;

use super::dates::date_key;
use crate::error::StorageError;
use crate::storage::{keys, SharedStore};

pub struct NoteStore {
    store: SharedStore,
}

impl NoteStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The note for `date`, or `""` when there is none or it can't be read.
    pub fn get_note(&self, date: NaiveDate) -> String {
        self.try_get_note(date).unwrap_or_else(|e| {
            tracing::warn!(%date, error = %e, "failed to read note");
            String::new()
        })
    }

    pub fn try_get_note(&self, date: NaiveDate) -> Result<String, StorageError> {
        Ok(self
            .store
            .get(&keys::note(&date_key(date)))?
            .unwrap_or_default())
    }

    pub fn save_note(&self, date: NaiveDate, text: &str) -> Result<(), StorageError> {
        self.store.set(&keys::note(&date_key(date)), text)
    }

    pub fn remove_note(&self, date: NaiveDate) -> Result<(), StorageError> {
        self.store.remove(&keys::note(&date_key(date)))
    }
}
