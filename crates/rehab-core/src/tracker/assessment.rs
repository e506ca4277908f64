//! Weekend self-assessment records, one per date, stored together under
//! `weeklyAssessment`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::date_key;
use crate::error::StorageError;
use crate::storage::{keys, read_json, update_json, SharedStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Checklist item ids that were ticked.
    #[serde(default)]
    pub checked: BTreeSet<String>,
    #[serde(default)]
    pub notes: String,
}

type RawAssessments = BTreeMap<String, AssessmentRecord>;

pub struct AssessmentStore {
    store: SharedStore,
}

impl AssessmentStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn get_assessment(&self, date: NaiveDate) -> Option<AssessmentRecord> {
        self.try_get_all()
            .map(|mut all| all.remove(&date_key(date)))
            .unwrap_or_else(|e| {
                tracing::warn!(%date, error = %e, "failed to read assessment");
                None
            })
    }

    /// All records keyed by their stored date string.
    pub fn try_get_all(&self) -> Result<BTreeMap<String, AssessmentRecord>, StorageError> {
        Ok(read_json(self.store.as_ref(), keys::WEEKLY_ASSESSMENT)?.unwrap_or_default())
    }

    pub fn save_assessment(&self, date: NaiveDate, checked: BTreeSet<String>, notes: &str) {
        let record = AssessmentRecord {
            checked,
            notes: notes.to_string(),
        };
        let result = self.modify(date, |r| *r = record);
        if let Err(e) = result {
            tracing::warn!(%date, error = %e, "failed to save assessment");
        }
    }

    /// Flip checklist item `id` on `date` and return whether it is now
    /// checked. On storage failure the persisted state is reported unchanged.
    pub fn toggle_check(&self, date: NaiveDate, id: &str) -> bool {
        let result = self.modify(date, |r| {
            if r.checked.remove(id) {
                false
            } else {
                r.checked.insert(id.to_string());
                true
            }
        });
        result.unwrap_or_else(|e| {
            tracing::warn!(%date, id, error = %e, "failed to toggle assessment item");
            self.get_assessment(date)
                .is_some_and(|r| r.checked.contains(id))
        })
    }

    pub fn set_notes(&self, date: NaiveDate, notes: &str) {
        if let Err(e) = self.modify(date, |r| r.notes = notes.to_string()) {
            tracing::warn!(%date, error = %e, "failed to save assessment notes");
        }
    }

    fn modify<R>(
        &self,
        date: NaiveDate,
        f: impl FnOnce(&mut AssessmentRecord) -> R,
    ) -> Result<R, StorageError> {
        let day = date_key(date);
        update_json(
            self.store.as_ref(),
            keys::WEEKLY_ASSESSMENT,
            |all: &mut RawAssessments| f(all.entry(day).or_default()),
        )
    }
}
