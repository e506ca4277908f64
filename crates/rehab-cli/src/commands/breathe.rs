use std::time::Duration;

use chrono::NaiveDate;
use clap::Subcommand;
use rehab_core::content::{find_slot, BREATHING_SLOTS};
use rehab_core::{
    BreathingDriver, Clock, CompletionTracker, Config, CycleEngine, Event, SystemClock,
    ValidationError,
};
use serde_json::json;

use super::{date_or_today, open, print_json, CmdResult};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// Run a guided session, printing one JSON event per line
    Run {
        /// Full inhale/hold/exhale cycles before stopping
        #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
        cycles: u32,
        /// Disable haptic pulses for this session
        #[arg(long)]
        no_haptics: bool,
        /// Mark this breathing slot done today when all cycles finish
        #[arg(long)]
        slot: Option<String>,
    },
    /// Breathing slots of a day and whether each is done
    Sessions {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Toggle completion of a breathing slot
    Check {
        /// Slot id (morning, after_meal, work_break, before_sleep)
        slot: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: BreatheAction) -> CmdResult {
    match action {
        BreatheAction::Run {
            cycles,
            no_haptics,
            slot,
        } => {
            if let Some(slot) = &slot {
                known_slot(slot)?;
            }
            let config = Config::load_or_default();
            let engine =
                CycleEngine::system().with_haptics(config.breathing.haptics_enabled && !no_haptics);
            let sink = |event: &Event| match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode event"),
            };
            let tick = Duration::from_millis(config.breathing.tick_interval_ms);

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let (finished, completed) = runtime.block_on(async move {
                let mut driver = BreathingDriver::new(engine, sink, tick);
                let finished = tokio::select! {
                    _ = driver.run_cycles(cycles) => true,
                    _ = tokio::signal::ctrl_c() => false,
                };
                driver.stop();
                (finished, driver.completed_cycles())
            });

            if let (true, Some(slot)) = (finished, slot) {
                let tracker = CompletionTracker::breathing(open()?);
                tracker.try_mark_completion(SystemClock.today(), &slot)?;
            }
            tracing::info!(
                cycles = completed,
                requested = cycles,
                finished,
                "breathing session ended"
            );
        }
        BreatheAction::Sessions { date } => {
            let date = date_or_today(date);
            let done = CompletionTracker::breathing(open()?).get_completions(date);
            let slots: Vec<_> = BREATHING_SLOTS
                .iter()
                .map(|slot| {
                    json!({
                        "id": slot.id,
                        "title": slot.title,
                        "description": slot.description,
                        "completed": done.contains(slot.id),
                    })
                })
                .collect();
            print_json(&json!({ "date": date, "sessions": slots }))?;
        }
        BreatheAction::Check { slot, date } => {
            known_slot(&slot)?;
            let date = date_or_today(date);
            let tracker = CompletionTracker::breathing(open()?);
            let completed = tracker.try_toggle_completion(date, &slot)?;
            print_json(&json!({ "date": date, "slot": slot, "completed": completed }))?;
        }
    }
    Ok(())
}

fn known_slot(id: &str) -> Result<(), ValidationError> {
    match find_slot(id) {
        Some(_) => Ok(()),
        None => Err(ValidationError::UnknownId {
            kind: "breathing slot",
            id: id.to_string(),
        }),
    }
}
