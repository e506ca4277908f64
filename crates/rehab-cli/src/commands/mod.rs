pub mod assess;
pub mod breathe;
pub mod check;
pub mod config;
pub mod data;
pub mod note;
pub mod notify;
pub mod plan;
pub mod stats;

use chrono::NaiveDate;
use rehab_core::{open_store, Clock, Config, SharedStore, SystemClock};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the configured store.
pub fn open() -> Result<SharedStore, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    Ok(open_store(&config.storage)?)
}

/// `--date` if given, otherwise today.
pub fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| SystemClock.today())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
