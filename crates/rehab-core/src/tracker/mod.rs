//! Completion tracking and the stores that sit beside it.
//!
//! Everything here persists through an injected [`SharedStore`](crate::storage::SharedStore);
//! nothing holds module-level state.

mod assessment;
mod completion;
mod dates;
mod export;
mod notes;
mod notifications;
mod stats;

pub use assessment::{AssessmentRecord, AssessmentStore};
pub use completion::{CompletionHistory, CompletionTracker};
pub use dates::{date_key, parse_date, parse_time, DATE_FORMAT, TIME_FORMAT};
pub use export::{clear_all, export_all, DataExport};
pub use notes::NoteStore;
pub use notifications::{default_notifications, NotificationSetting, NotificationStore};
pub use stats::{
    compute_day_stat, compute_streak, month_grid, week_dates, CompletionLevel, DayStat,
    StatsSummary,
};
