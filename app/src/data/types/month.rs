//! Calendar-month bucket
//!
//! Keyed by the month's first day so ordering is chronological; the
//! `Mon/YYYY` label is for display only.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};

/// Display label layout, e.g. `Jan/2024`
const LABEL_FORMAT: &str = "%b/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket(NaiveDate);

impl MonthBucket {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 exists in every month
        Self(date - chrono::Days::new(u64::from(date.day0())))
    }

    /// Bucket of a timestamp's local calendar date
    pub fn of<Tz: TimeZone>(ts: &DateTime<Tz>) -> Self {
        Self::from_date(ts.date_naive())
    }

    pub fn label(&self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }

    /// Parse `Jan/2024` or `2024-01`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(&format!("01/{}", s), "%d/%b/%Y")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LABEL_FORMAT))
    }
}

/// Serialized as the bucket key (`YYYY-MM-DD`); rows carry the label separately
impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
