use chrono::NaiveDate;
use clap::Subcommand;
use rehab_core::content::{find_check, is_weekend, ASSESSMENT_CHECKLIST, FOAM_ROLLER_AREAS};
use rehab_core::tracker::AssessmentStore;
use rehab_core::ValidationError;
use serde_json::json;

use super::{date_or_today, open, print_json, CmdResult};

#[derive(Subcommand)]
pub enum AssessAction {
    /// Checklist with ticks, notes and foam roller guidance
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Tick or untick a checklist item
    Toggle {
        /// Checklist item id (1-5)
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Replace the assessment notes
    Notes {
        text: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: AssessAction) -> CmdResult {
    let store = AssessmentStore::new(open()?);

    match action {
        AssessAction::Show { date } => {
            let date = date_or_today(date);
            let record = store.get_assessment(date).unwrap_or_default();
            let checklist: Vec<_> = ASSESSMENT_CHECKLIST
                .iter()
                .map(|item| {
                    json!({
                        "id": item.id,
                        "question": item.question,
                        "description": item.description,
                        "checked": record.checked.contains(item.id),
                    })
                })
                .collect();
            print_json(&json!({
                "date": date,
                "is_weekend": is_weekend(date),
                "checklist": checklist,
                "notes": record.notes,
                "foam_roller_areas": FOAM_ROLLER_AREAS,
            }))?;
        }
        AssessAction::Toggle { id, date } => {
            if find_check(&id).is_none() {
                return Err(ValidationError::UnknownId {
                    kind: "assessment item",
                    id,
                }
                .into());
            }
            let date = date_or_today(date);
            let checked = store.toggle_check(date, &id);
            print_json(&json!({ "date": date, "id": id, "checked": checked }))?;
        }
        AssessAction::Notes { text, date } => {
            let date = date_or_today(date);
            store.set_notes(date, &text);
            print_json(&json!({ "date": date, "notes": text }))?;
        }
    }
    Ok(())
}
