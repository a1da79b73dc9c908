use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::attendance::error::ConfigError;

/// Calendar-date key of a local instant. `NaiveDate` serializes as
/// `YYYY-MM-DD` (fixed width, zero padded), so lexicographic order on the
/// wire equals date order.
pub fn date_key(instant: &NaiveDateTime) -> NaiveDate {
    instant.date()
}

/// Local hour*60 + minute, in [0, 1439].
pub fn minutes_of_day(instant: &NaiveDateTime) -> u32 {
    instant.hour() * 60 + instant.minute()
}

/// Parses a configured `HH:MM` clock string into minutes of day.
pub fn parse_clock_time(value: &str) -> Result<u32, ConfigError> {
    let invalid = || ConfigError::InvalidClockTime {
        value: value.to_string(),
    };

    let (hh, mm) = value.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hh.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = mm.trim().parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

/// Current local wall-clock instant. No timezone conversion happens past
/// this point; the attached local time is used as-is.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn date_key_is_calendar_date() {
        assert_eq!(
            date_key(&at(23, 59)),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(date_key(&at(23, 59)).to_string(), "2024-03-05");
    }

    #[test]
    fn minutes_of_day_range() {
        assert_eq!(minutes_of_day(&at(0, 0)), 0);
        assert_eq!(minutes_of_day(&at(9, 5)), 545);
        assert_eq!(minutes_of_day(&at(23, 59)), 1439);
    }

    #[test]
    fn parse_clock_time_valid() {
        assert_eq!(parse_clock_time("09:00").unwrap(), 540);
        assert_eq!(parse_clock_time("00:00").unwrap(), 0);
        assert_eq!(parse_clock_time("23:59").unwrap(), 1439);
    }

    #[test]
    fn parse_clock_time_invalid() {
        for bad in ["9", "09:xx", "25:00", "09:60", "", ":", "9:5:0"] {
            assert!(parse_clock_time(bad).is_err(), "accepted {bad:?}");
        }
    }
}
