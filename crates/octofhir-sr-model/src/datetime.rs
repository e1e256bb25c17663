//! DA, TM, and DT values
//!
//! Values are kept in their dataset form so partial precision (a year-only
//! date, an hour-only time) survives a decode/encode round trip. The
//! `to_chrono` helpers interpret them when a calendar value is needed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DA value, `YYYYMMDD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DicomDate(String);

/// A TM value, `HH[MM[SS[.FFFFFF]]]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DicomTime(String);

/// A DT value, `YYYY[MM[DD[HH[MM[SS[.FFFFFF]]]]]][&ZZXX]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DicomDateTime(String);

impl DicomDate {
    /// Create a new date from its dataset form
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_chrono(date: NaiveDate) -> Self {
        Self(date.format("%Y%m%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret as a calendar date
    pub fn to_chrono(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), "%Y%m%d").ok()
    }
}

impl DicomTime {
    /// Create a new time from its dataset form
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_chrono(time: NaiveTime) -> Self {
        Self(time.format("%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret as a time of day; missing components are zero
    pub fn to_chrono(&self) -> Option<NaiveTime> {
        parse_time(self.0.trim())
    }
}

impl DicomDateTime {
    /// Create a new date-time from its dataset form
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn from_chrono(datetime: NaiveDateTime) -> Self {
        Self(datetime.format("%Y%m%d%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret as a local date-time, ignoring any UTC offset
    pub fn to_chrono(&self) -> Option<NaiveDateTime> {
        let (local, _) = split_offset(self.0.trim());
        parse_datetime(local)
    }

    /// Interpret as a date-time with its UTC offset, if one is present
    pub fn to_chrono_with_offset(&self) -> Option<DateTime<FixedOffset>> {
        let (local, offset) = split_offset(self.0.trim());
        let offset = parse_offset(offset?)?;
        parse_datetime(local)?.and_local_timezone(offset).single()
    }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    if whole.len() < 2 || whole.len() > 6 || whole.len() % 2 != 0 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let field = |i: usize| -> Option<u32> { whole.get(i..i + 2).map_or(Some(0), |v| v.parse().ok()) };
    let micros = match fraction {
        Some(f) if !f.is_empty() && f.len() <= 6 && f.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{:0<6}", f).parse::<u32>().ok()?
        }
        Some(_) => return None,
        None => 0,
    };
    NaiveTime::from_hms_micro_opt(field(0)?, field(2)?, field(4)?, micros)
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let digits_end = s.find('.').unwrap_or(s.len()).min(8);
    let date_part = s.get(..digits_end)?;
    let year: i32 = date_part.get(0..4)?.parse().ok()?;
    let month: u32 = date_part.get(4..6).map_or(Some(1), |v| v.parse().ok())?;
    let day: u32 = date_part.get(6..8).map_or(Some(1), |v| v.parse().ok())?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = match s.get(8..) {
        Some(rest) if !rest.is_empty() => parse_time(rest)?,
        _ => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    Some(date.and_time(time))
}

fn split_offset(s: &str) -> (&str, Option<&str>) {
    match s.rfind(['+', '-']) {
        Some(i) if s.len() - i == 5 => (&s[..i], Some(&s[i..])),
        _ => (s, None),
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let hours: i32 = s.get(1..3)?.parse().ok()?;
    let minutes: i32 = s.get(3..5)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

macro_rules! display_as_str {
    ($($name:ident),+) => {
        $(
            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self::new(s)
                }
            }
        )+
    };
}

display_as_str!(DicomDate, DicomTime, DicomDateTime);
