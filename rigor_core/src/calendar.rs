//! Calendar-day arithmetic for streaks and weekly bucketing.
//!
//! A [`CalendarDay`] is a date with no time-of-day component. Timestamps are
//! mapped onto days through one fixed UTC offset, so the day boundary is
//! exact: 23:59:59 local time always belongs to its own day.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single calendar day (`YYYY-MM-DD`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build a day from year/month/day, returning None for impossible dates
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The local day a timestamp falls on, given a fixed UTC offset
    pub fn from_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(ts.with_timezone(&offset).date_naive())
    }

    /// The current local day for the given offset
    pub fn today(offset: FixedOffset) -> Self {
        Self::from_timestamp(Utc::now(), offset)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous day
    pub fn pred(&self) -> Self {
        self.minus_days(1)
    }

    /// The following day
    pub fn succ(&self) -> Self {
        self.plus_days(1)
    }

    pub fn minus_days(&self, days: u32) -> Self {
        Self(self.0 - Duration::days(i64::from(days)))
    }

    pub fn plus_days(&self, days: u32) -> Self {
        Self(self.0 + Duration::days(i64::from(days)))
    }

    /// Signed number of days from `self` to `other` (positive when `other` is later)
    pub fn days_until(&self, other: CalendarDay) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// The Monday that starts this day's week
    pub fn week_start(&self) -> Self {
        let offset = self.0.weekday().num_days_from_monday();
        self.minus_days(offset)
    }

    /// Saturday or Sunday
    pub fn is_weekend(&self) -> bool {
        self.0.weekday().number_from_monday() >= 6
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

/// Build a fixed offset from minutes east of UTC, falling back to UTC when out of range
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}
