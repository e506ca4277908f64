//! Streak and per-day completion statistics derived from a completion
//! history.
//!
//! All date arithmetic is on timezone-naive calendar days, so month ends,
//! year ends and DST changes need no special handling.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::completion::CompletionHistory;
use crate::content::ExerciseSchedule;

/// Consecutive days with at least one completion, ending today or
/// yesterday.
///
/// Dates with an empty set are ignored. If the newest remaining date is
/// older than yesterday (or lies in the future) the streak is broken and
/// this returns 0. Otherwise the run is counted back from the newest date
/// until the first gap that is not exactly one day.
pub fn compute_streak(history: &CompletionHistory, today: NaiveDate) -> u32 {
    let mut dates = history
        .iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(date, _)| *date)
        .rev();

    let Some(newest) = dates.next() else {
        return 0;
    };
    let age = (today - newest).num_days();
    if !(0..=1).contains(&age) {
        return 0;
    }

    let mut streak = 1;
    let mut previous = newest;
    for date in dates {
        if (previous - date).num_days() != 1 {
            break;
        }
        streak += 1;
        previous = date;
    }
    streak
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionLevel {
    /// Every expected item done.
    Full,
    /// At least 70%.
    High,
    /// At least 40%.
    Partial,
    Low,
}

impl CompletionLevel {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 1.0 {
            Self::Full
        } else if rate >= 0.7 {
            Self::High
        } else if rate >= 0.4 {
            Self::Partial
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub completed_count: usize,
    pub expected_count: usize,
    /// `completed / expected`, clamped to `[0, 1]`; 0 when nothing is
    /// expected.
    pub completion_rate: f64,
}

impl DayStat {
    pub fn level(&self) -> CompletionLevel {
        CompletionLevel::from_rate(self.completion_rate)
    }
}

/// Stats for one day.
///
/// Stale ids left over from a schedule change can push the raw ratio above
/// one; the rate is clamped so it always stays in `[0, 1]`.
pub fn compute_day_stat(
    date: NaiveDate,
    completions: &BTreeSet<String>,
    expected_count: usize,
) -> DayStat {
    let completed_count = completions.len();
    let completion_rate = if expected_count == 0 {
        0.0
    } else {
        (completed_count as f64 / expected_count as f64).clamp(0.0, 1.0)
    };
    DayStat {
        date,
        completed_count,
        expected_count,
        completion_rate,
    }
}

/// What the statistics screen shows: current streak, number of days with
/// any progress, and a stat for every recorded day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub streak: u32,
    pub total_completed_days: usize,
    pub days: BTreeMap<NaiveDate, DayStat>,
}

impl StatsSummary {
    pub fn build(
        history: &CompletionHistory,
        schedule: &ExerciseSchedule,
        today: NaiveDate,
    ) -> Self {
        let days: BTreeMap<NaiveDate, DayStat> = history
            .iter()
            .map(|(date, ids)| {
                let stat = compute_day_stat(*date, ids, schedule.expected_count(*date));
                (*date, stat)
            })
            .collect();
        let total_completed_days = days
            .values()
            .filter(|stat| stat.completion_rate > 0.0)
            .count();

        Self {
            streak: compute_streak(history, today),
            total_completed_days,
            days,
        }
    }
}

/// Monday through Sunday of the week containing `today`.
pub fn week_dates(today: NaiveDate) -> [NaiveDate; 7] {
    let week = today.week(chrono::Weekday::Mon);
    let monday = week.first_day();
    std::array::from_fn(|i| monday + Days::new(i as u64))
}

/// One cell of a month calendar. `None` cells pad the first row so the 1st
/// lands under its weekday (Sunday first).
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; lead];
    cells.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(Some),
    );
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::dates::parse_date;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn history(entries: &[(&str, &[&str])]) -> CompletionHistory {
        entries
            .iter()
            .map(|(d, ids)| (day(d), ids.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn gap_before_today_breaks_run() {
        let h = history(&[
            ("2025-05-01", &["a", "b"]),
            ("2025-05-02", &["a"]),
            ("2025-05-04", &["a"]),
        ]);
        assert_eq!(compute_streak(&h, day("2025-05-04")), 1);
    }

    #[test]
    fn two_day_run_ending_today() {
        let h = history(&[("2025-05-03", &["a"]), ("2025-05-04", &["a"])]);
        assert_eq!(compute_streak(&h, day("2025-05-04")), 2);
    }

    #[test]
    fn run_ending_yesterday_still_counts() {
        let h = history(&[("2025-05-02", &["a"]), ("2025-05-03", &["a"])]);
        assert_eq!(compute_streak(&h, day("2025-05-04")), 2);
        assert_eq!(compute_streak(&h, day("2025-05-05")), 0);
    }

    #[test]
    fn empty_history_and_empty_sets_give_zero() {
        assert_eq!(compute_streak(&CompletionHistory::new(), day("2025-05-04")), 0);
        let h = history(&[("2025-05-04", &[])]);
        assert_eq!(compute_streak(&h, day("2025-05-04")), 0);
    }

    #[test]
    fn empty_set_inside_run_is_a_gap() {
        let h = history(&[
            ("2025-05-02", &["a"]),
            ("2025-05-03", &[]),
            ("2025-05-04", &["a"]),
        ]);
        assert_eq!(compute_streak(&h, day("2025-05-04")), 1);
    }

    #[test]
    fn streak_crosses_year_end() {
        let h = history(&[
            ("2024-12-30", &["a"]),
            ("2024-12-31", &["a"]),
            ("2025-01-01", &["a"]),
        ]);
        assert_eq!(compute_streak(&h, day("2025-01-01")), 3);
    }

    #[test]
    fn future_dates_do_not_count_as_current() {
        let h = history(&[("2025-05-10", &["a"])]);
        assert_eq!(compute_streak(&h, day("2025-05-04")), 0);
    }

    #[test]
    fn day_stat_handles_zero_and_overflow() {
        let ids: BTreeSet<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let d = day("2025-05-04");

        assert_eq!(compute_day_stat(d, &ids, 0).completion_rate, 0.0);
        assert_eq!(compute_day_stat(d, &ids, 3).completion_rate, 1.0);

        let half = compute_day_stat(d, &ids, 8);
        assert_eq!(half.completion_rate, 0.5);
        assert_eq!(half.level(), CompletionLevel::Partial);
    }

    #[test]
    fn levels_follow_thresholds() {
        assert_eq!(CompletionLevel::from_rate(1.0), CompletionLevel::Full);
        assert_eq!(CompletionLevel::from_rate(0.7), CompletionLevel::High);
        assert_eq!(CompletionLevel::from_rate(0.4), CompletionLevel::Partial);
        assert_eq!(CompletionLevel::from_rate(0.39), CompletionLevel::Low);
    }

    #[test]
    fn summary_counts_days_with_progress() {
        let schedule = ExerciseSchedule::default();
        let h = history(&[
            ("2025-05-03", &["sat-1", "sat-2", "sat-3"]),
            ("2025-05-04", &["sun-1"]),
            ("2025-05-05", &[]),
        ]);
        let summary = StatsSummary::build(&h, &schedule, day("2025-05-04"));

        assert_eq!(summary.streak, 2);
        assert_eq!(summary.total_completed_days, 2);
        assert_eq!(summary.days[&day("2025-05-03")].level(), CompletionLevel::Full);
        assert_eq!(summary.days[&day("2025-05-04")].completion_rate, 0.25);
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-05-04 is a Sunday.
        let week = week_dates(day("2025-05-04"));
        assert_eq!(week[0], day("2025-04-28"));
        assert_eq!(week[6], day("2025-05-04"));
    }

    #[test]
    fn month_grid_pads_to_first_weekday() {
        // May 2025 starts on a Thursday.
        let grid = month_grid(2025, 5).unwrap();
        assert_eq!(grid.iter().take_while(|c| c.is_none()).count(), 4);
        assert_eq!(grid.iter().flatten().count(), 31);
        assert_eq!(grid[4], Some(day("2025-05-01")));

        assert_eq!(month_grid(2024, 2).unwrap().iter().flatten().count(), 29);
        assert!(month_grid(2025, 13).is_none());
    }
}
