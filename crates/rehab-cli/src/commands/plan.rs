use chrono::{Datelike, NaiveDate};
use clap::Args;
use rehab_core::content::workout_focus;
use rehab_core::{compute_day_stat, CompletionTracker, DayStat, Exercise, ExerciseSchedule};
use serde::Serialize;

use super::{date_or_today, open, print_json, CmdResult};

#[derive(Args)]
pub struct PlanArgs {
    /// Day to show (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct PlanItem<'a> {
    #[serde(flatten)]
    exercise: &'a Exercise,
    volume: Option<String>,
    completed: bool,
}

#[derive(Serialize)]
struct Plan<'a> {
    date: NaiveDate,
    weekday: String,
    focus: &'static str,
    exercises: Vec<PlanItem<'a>>,
    stat: DayStat,
}

pub fn run(args: PlanArgs) -> CmdResult {
    let date = date_or_today(args.date);
    let schedule = ExerciseSchedule::default();
    let tracker = CompletionTracker::new(open()?);

    let done = tracker.get_completions(date);
    let exercises = schedule
        .for_date(date)
        .iter()
        .map(|exercise| PlanItem {
            exercise,
            volume: exercise.volume(),
            completed: done.contains(&exercise.id),
        })
        .collect();

    print_json(&Plan {
        date,
        weekday: date.weekday().to_string(),
        focus: workout_focus(date.weekday()),
        exercises,
        stat: compute_day_stat(date, &done, schedule.expected_count(date)),
    })
}
