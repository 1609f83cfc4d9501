//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};

/// Calendar date layout used by the `currentDate` protocol field.
const PROTOCOL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day layout used by the `currentTime` protocol field.
const PROTOCOL_TIME_FORMAT: &str = "%H:%M:%S";

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar date in `YYYY-MM-DD` form.
    pub fn protocol_date(&self) -> String {
        self.0.format(PROTOCOL_DATE_FORMAT).to_string()
    }

    /// Time of day in `HH:MM:SS` form.
    pub fn protocol_time(&self) -> String {
        self.0.format(PROTOCOL_TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 2).unwrap())
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn protocol_date_is_zero_padded_iso_date() {
        assert_eq!(fixed().protocol_date(), "2025-03-07");
    }

    #[test]
    fn protocol_time_is_zero_padded_time_of_day() {
        assert_eq!(fixed().protocol_time(), "09:05:02");
    }
}
