//! Whole-store export and reset.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::assessment::{AssessmentRecord, AssessmentStore};
use super::completion::{CompletionHistory, CompletionTracker};
use super::dates::parse_date;
use super::notes::NoteStore;
use super::notifications::{NotificationSetting, NotificationStore};
use crate::error::StorageError;
use crate::storage::SharedStore;

/// Snapshot of everything the app has persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataExport {
    pub exported_on: NaiveDate,
    pub completed_exercises: CompletionHistory,
    pub breathing_sessions: CompletionHistory,
    pub assessments: BTreeMap<String, AssessmentRecord>,
    pub notification_settings: Vec<NotificationSetting>,
    /// Non-empty notes for every date that appears anywhere above, plus
    /// `exported_on`.
    pub notes: BTreeMap<NaiveDate, String>,
}

/// Collect every persisted mapping. Unlike the fail-soft readers, any
/// storage error aborts the export.
pub fn export_all(store: &SharedStore, today: NaiveDate) -> Result<DataExport, StorageError> {
    let completed_exercises = CompletionTracker::new(store.clone()).try_get_all_completions()?;
    let breathing_sessions = CompletionTracker::breathing(store.clone()).try_get_all_completions()?;
    let assessments = AssessmentStore::new(store.clone()).try_get_all()?;
    let notification_settings = NotificationStore::new(store.clone()).load();

    let mut dates: BTreeSet<NaiveDate> = completed_exercises
        .keys()
        .chain(breathing_sessions.keys())
        .copied()
        .collect();
    dates.extend(assessments.keys().filter_map(|d| parse_date(d).ok()));
    dates.insert(today);

    let note_store = NoteStore::new(store.clone());
    let mut notes = BTreeMap::new();
    for date in dates {
        let note = note_store.try_get_note(date)?;
        if !note.is_empty() {
            notes.insert(date, note);
        }
    }

    tracing::info!(
        exercise_days = completed_exercises.len(),
        breathing_days = breathing_sessions.len(),
        notes = notes.len(),
        "exported data"
    );
    Ok(DataExport {
        exported_on: today,
        completed_exercises,
        breathing_sessions,
        assessments,
        notification_settings,
        notes,
    })
}

/// Delete everything in the store.
pub fn clear_all(store: &SharedStore) -> Result<(), StorageError> {
    store.clear()?;
    tracing::info!("cleared all stored data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn export_gathers_every_mapping() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let may3 = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let may4 = NaiveDate::from_ymd_opt(2025, 5, 4).unwrap();

        CompletionTracker::new(store.clone()).toggle_completion(may3, "sat-1");
        CompletionTracker::breathing(store.clone()).toggle_completion(may4, "morning");
        AssessmentStore::new(store.clone()).toggle_check(may4, "2");
        NoteStore::new(store.clone()).save_note(may3, "tired").unwrap();

        let export = export_all(&store, may4).unwrap();
        assert_eq!(export.completed_exercises.len(), 1);
        assert_eq!(export.breathing_sessions.len(), 1);
        assert!(export.assessments.contains_key("2025-05-04"));
        assert_eq!(export.notification_settings.len(), 5);
        assert_eq!(export.notes.get(&may3).map(String::as_str), Some("tired"));
        assert!(!export.notes.contains_key(&may4));
    }

    #[test]
    fn clear_removes_everything() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let day = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        let tracker = CompletionTracker::new(store.clone());
        tracker.toggle_completion(day, "sat-1");

        clear_all(&store).unwrap();
        assert!(tracker.get_all_completions().is_empty());
    }
}
