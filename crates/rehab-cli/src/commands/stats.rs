use chrono::NaiveDate;
use clap::Subcommand;
use rehab_core::tracker::{month_grid, week_dates, CompletionLevel};
use rehab_core::{
    compute_day_stat, compute_streak, Clock, CompletionTracker, DayStat, ExerciseSchedule,
    StatsSummary, SystemClock, ValidationError,
};
use serde::Serialize;
use serde_json::json;

use super::{open, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streak, days with progress and every recorded day
    Summary,
    /// Current streak
    Streak,
    /// Completion of one day
    Day {
        /// YYYY-MM-DD
        date: NaiveDate,
    },
    /// Monday through Sunday of the current week
    Week,
    /// Month calendar with completion levels
    Calendar {
        year: i32,
        /// 1-12
        month: u32,
    },
}

#[derive(Serialize)]
struct LeveledStat {
    #[serde(flatten)]
    stat: DayStat,
    level: CompletionLevel,
}

impl From<DayStat> for LeveledStat {
    fn from(stat: DayStat) -> Self {
        let level = stat.level();
        Self { stat, level }
    }
}

pub fn run(action: StatsAction) -> CmdResult {
    let tracker = CompletionTracker::new(open()?);
    let schedule = ExerciseSchedule::default();
    let today = SystemClock.today();

    let day_stat = |date: NaiveDate| -> LeveledStat {
        compute_day_stat(date, &tracker.get_completions(date), schedule.expected_count(date)).into()
    };

    match action {
        StatsAction::Summary => {
            let history = tracker.get_all_completions();
            print_json(&StatsSummary::build(&history, &schedule, today))?;
        }
        StatsAction::Streak => {
            let streak = compute_streak(&tracker.get_all_completions(), today);
            print_json(&json!({ "today": today, "streak": streak }))?;
        }
        StatsAction::Day { date } => {
            print_json(&day_stat(date))?;
        }
        StatsAction::Week => {
            let week: Vec<LeveledStat> = week_dates(today).into_iter().map(day_stat).collect();
            print_json(&week)?;
        }
        StatsAction::Calendar { year, month } => {
            let grid = month_grid(year, month).ok_or_else(|| {
                ValidationError::InvalidDate(format!("{year:04}-{month:02}"))
            })?;
            let history = tracker.get_all_completions();
            let cells: Vec<_> = grid
                .into_iter()
                .map(|cell| {
                    cell.map(|date| {
                        let level = history.get(&date).map(|ids| {
                            compute_day_stat(date, ids, schedule.expected_count(date)).level()
                        });
                        json!({ "date": date, "level": level })
                    })
                })
                .collect();
            print_json(&json!({ "year": year, "month": month, "cells": cells }))?;
        }
    }
    Ok(())
}
