//! Session record models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the post-session integrity check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PassFail {
    /// Device reported the session as passed (sentinel byte 0xFF)
    Pass,
    /// Any other sentinel value
    Fail,
}

impl PassFail {
    /// Sentinel byte value that marks a passed session.
    pub const PASS_SENTINEL: u8 = 0xFF;

    /// Decode the sentinel byte. Only the exact value 0xFF means pass.
    pub fn from_byte(byte: u8) -> Self {
        if byte == Self::PASS_SENTINEL {
            PassFail::Pass
        } else {
            PassFail::Fail
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, PassFail::Pass)
    }

    /// Value of the legacy `prs` CSV column.
    pub fn as_csv_flag(self) -> &'static str {
        match self {
            PassFail::Pass => "true",
            PassFail::Fail => "false",
        }
    }

    /// Parse the legacy `prs` CSV column.
    pub fn from_csv_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "true" => Some(PassFail::Pass),
            "false" => Some(PassFail::Fail),
            _ => None,
        }
    }

    /// Display label ("Pass" / "Fail").
    pub fn label(self) -> &'static str {
        match self {
            PassFail::Pass => "Pass",
            PassFail::Fail => "Fail",
        }
    }
}

impl fmt::Display for PassFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session date exactly as stored by the device.
///
/// Month and day are raw bytes; nothing is checked against a calendar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl SessionDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Whether the stored values name a real calendar day.
    ///
    /// Advisory only; decoded output is never altered based on this.
    pub fn is_calendar_valid(&self) -> bool {
        chrono::NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .is_some()
    }

    /// Parse a `YYYY-MM-DD` string produced by [`Display`](fmt::Display).
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().splitn(3, '-');
        let year = parts.next()?.parse().ok()?;
        let month = parts.next()?.parse().ok()?;
        let day = parts.next()?.parse().ok()?;
        Some(Self { year, month, day })
    }
}

impl fmt::Display for SessionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Session start time exactly as stored by the device.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionTime {
    pub hour: u8,
    pub minute: u8,
}

impl SessionTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Parse an `HH:MM` string produced by [`Display`](fmt::Display).
    pub fn parse(text: &str) -> Option<Self> {
        let (hour, minute) = text.trim().split_once(':')?;
        Some(Self {
            hour: hour.parse().ok()?,
            minute: minute.parse().ok()?,
        })
    }
}

impl fmt::Display for SessionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// One decoded dialysis session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session date
    pub date: SessionDate,
    /// Session start time
    pub time: SessionTime,
    /// Patient identifier (up to 10 characters)
    pub patient_id: String,
    /// Patient name (up to 30 characters)
    pub patient_name: String,
    /// Dialyzer identifier (up to 10 characters)
    pub dialyzer_id: String,
    /// Volume as reported by the device
    pub volume: i32,
    /// Integrity check outcome
    pub pass_fail: PassFail,
}

impl SessionRecord {
    /// Date rendered as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.date.to_string()
    }

    /// Time rendered as `HH:MM`.
    pub fn time_string(&self) -> String {
        self.time.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_exactness() {
        assert_eq!(PassFail::from_byte(0xFF), PassFail::Pass);
        assert_eq!(PassFail::from_byte(0x00), PassFail::Fail);
        assert_eq!(PassFail::from_byte(0xFE), PassFail::Fail);
        assert_eq!(PassFail::from_byte(0x01), PassFail::Fail);
    }

    #[test]
    fn test_date_time_formatting() {
        assert_eq!(SessionDate::new(2024, 3, 5).to_string(), "2024-03-05");
        assert_eq!(SessionTime::new(9, 7).to_string(), "09:07");
        assert_eq!(SessionDate::new(7, 1, 1).to_string(), "0007-01-01");
    }

    #[test]
    fn test_out_of_range_values_are_verbatim() {
        let date = SessionDate::new(2024, 13, 0);
        assert_eq!(date.to_string(), "2024-13-00");
        assert!(!date.is_calendar_valid());
        assert_eq!(SessionTime::new(25, 99).to_string(), "25:99");
        assert_eq!(SessionTime::new(255, 255).to_string(), "255:255");
    }

    #[test]
    fn test_calendar_validity() {
        assert!(SessionDate::new(2024, 2, 29).is_calendar_valid());
        assert!(!SessionDate::new(2023, 2, 29).is_calendar_valid());
    }

    #[test]
    fn test_parse_formatted_values() {
        assert_eq!(
            SessionDate::parse("2024-03-05"),
            Some(SessionDate::new(2024, 3, 5))
        );
        assert_eq!(SessionTime::parse("09:07"), Some(SessionTime::new(9, 7)));
        assert_eq!(SessionDate::parse("garbage"), None);
        assert_eq!(SessionTime::parse("0907"), None);
    }

    #[test]
    fn test_csv_flag() {
        assert_eq!(PassFail::Pass.as_csv_flag(), "true");
        assert_eq!(PassFail::from_csv_flag("false"), Some(PassFail::Fail));
        assert_eq!(PassFail::from_csv_flag("maybe"), None);
    }
}
