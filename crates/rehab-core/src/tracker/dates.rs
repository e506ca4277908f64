//! `YYYY-MM-DD` date keys.

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Validate an `HH:MM` time of day and return it normalized to two digits.
///
/// The hour may be one digit; minutes must be two.
pub fn parse_time(s: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidTime(s.to_string());
    let t = s.trim();
    let well_formed = t.split_once(':').is_some_and(|(h, m)| {
        matches!(h.len(), 1 | 2)
            && m.len() == 2
            && h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit())
    });
    if !well_formed {
        return Err(invalid());
    }
    let time = NaiveTime::parse_from_str(t, TIME_FORMAT).map_err(|_| invalid())?;
    Ok(time.format(TIME_FORMAT).to_string())
}
