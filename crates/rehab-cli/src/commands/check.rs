use chrono::NaiveDate;
use clap::Args;
use rehab_core::{compute_day_stat, CompletionTracker, ExerciseSchedule, ValidationError};
use serde_json::json;

use super::{date_or_today, open, print_json, CmdResult};

#[derive(Args)]
pub struct CheckArgs {
    /// Exercise id (e.g. "mon-1")
    id: String,
    /// Day to mark (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(args: CheckArgs) -> CmdResult {
    let date = date_or_today(args.date);
    let schedule = ExerciseSchedule::default();

    if schedule.find(&args.id).is_none() {
        return Err(ValidationError::UnknownId {
            kind: "exercise",
            id: args.id,
        }
        .into());
    }
    if !schedule.for_date(date).iter().any(|e| e.id == args.id) {
        tracing::warn!(id = %args.id, %date, "exercise is not scheduled on this day");
    }

    let tracker = CompletionTracker::new(open()?);
    let completed = tracker.try_toggle_completion(date, &args.id)?;
    let stat = compute_day_stat(
        date,
        &tracker.get_completions(date),
        schedule.expected_count(date),
    );

    print_json(&json!({
        "date": date,
        "id": args.id,
        "completed": completed,
        "stat": stat,
    }))
}
