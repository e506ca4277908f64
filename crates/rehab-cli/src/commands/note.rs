use chrono::NaiveDate;
use clap::Subcommand;
use rehab_core::tracker::NoteStore;
use serde_json::json;

use super::{date_or_today, open, print_json, CmdResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Print the note of a day
    Get {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Save the note of a day
    Set {
        text: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete the note of a day
    Remove {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: NoteAction) -> CmdResult {
    let notes = NoteStore::new(open()?);

    match action {
        NoteAction::Get { date } => {
            let date = date_or_today(date);
            let note = notes.try_get_note(date)?;
            print_json(&json!({ "date": date, "note": note }))?;
        }
        NoteAction::Set { text, date } => {
            let date = date_or_today(date);
            notes.save_note(date, &text)?;
            print_json(&json!({ "date": date, "note": text }))?;
        }
        NoteAction::Remove { date } => {
            let date = date_or_today(date);
            notes.remove_note(date)?;
            print_json(&json!({ "date": date, "note": "" }))?;
        }
    }
    Ok(())
}
