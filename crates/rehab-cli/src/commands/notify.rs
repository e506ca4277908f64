use clap::Subcommand;
use rehab_core::tracker::NotificationStore;
use serde_json::json;

use super::{open, print_json, CmdResult};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List reminder settings
    List,
    /// Enable or disable a reminder
    Toggle {
        /// Reminder id (1-5)
        id: String,
    },
    /// Change the time of a reminder
    Time {
        id: String,
        /// HH:MM
        time: String,
    },
    /// Restore the default reminders
    Reset,
}

pub fn run(action: NotifyAction) -> CmdResult {
    let store = NotificationStore::new(open()?);

    match action {
        NotifyAction::List => print_json(&store.load())?,
        NotifyAction::Toggle { id } => {
            let enabled = store.toggle(&id)?;
            print_json(&json!({ "id": id, "enabled": enabled }))?;
        }
        NotifyAction::Time { id, time } => {
            let time = store.set_time(&id, &time)?;
            print_json(&json!({ "id": id, "time": time }))?;
        }
        NotifyAction::Reset => print_json(&store.reset()?)?,
    }
    Ok(())
}
