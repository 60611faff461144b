//! Calendar types for trading-day series.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DateRange`: An inclusive calendar range with trading-day iteration
//!
//! A trading day is any weekday (Monday to Friday). Holidays are not modelled.
//!
//! # Examples
//!
//! ```
//! use shock_core::types::time::{Date, DateRange};
//!
//! let start = Date::from_ymd(2024, 6, 14).unwrap(); // Friday
//! let end = Date::from_ymd(2024, 6, 18).unwrap(); // Tuesday
//!
//! let days: Vec<Date> = DateRange::new(start, end).trading_days().collect();
//! assert_eq!(days.len(), 3);
//! assert!(days.iter().all(|d| d.is_trading_day()));
//! ```

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::ShockError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// Serialises as an ISO 8601 string (`YYYY-MM-DD`). Ordering is calendar
/// ordering, which coincides with lexicographic ordering of the ISO form.
///
/// # Examples
///
/// ```
/// use shock_core::types::time::Date;
///
/// let date = Date::from_ymd(2020, 2, 15).unwrap();
/// assert_eq!(date.to_string(), "2020-02-15");
/// assert!(!date.is_trading_day()); // Saturday
///
/// let parsed: Date = "2020-02-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let later = date.add_days(10);
/// assert_eq!(later - date, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(ShockError::InvalidDate)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use shock_core::types::time::Date;
    ///
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2024, 2, 30).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ShockError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(ShockError::InvalidDate { year, month, day })
    }

    /// Returns today's date based on local system time.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// # Examples
    ///
    /// ```
    /// use shock_core::types::time::Date;
    ///
    /// assert!(Date::parse("2008-09-15").is_ok());
    /// assert!(Date::parse("15/09/2008").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ShockError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| ShockError::DateParse(format!("{}: {}", s, e)))
    }

    /// Returns the underlying NaiveDate.
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Returns `true` for Monday to Friday.
    pub fn is_trading_day(&self) -> bool {
        !matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Shifts the date by a signed number of calendar days.
    ///
    /// Saturates at chrono's representable bounds.
    pub fn add_days(self, days: i64) -> Self {
        self.0
            .checked_add_signed(Duration::days(days))
            .map(Date)
            .unwrap_or(if days >= 0 {
                Date(NaiveDate::MAX)
            } else {
                Date(NaiveDate::MIN)
            })
    }

    /// Shifts the date back by a number of calendar days.
    pub fn sub_days(self, days: i64) -> Self {
        self.add_days(-days)
    }

    /// Formats the date as "Month YYYY" (e.g., "February 2020").
    pub fn month_year(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of calendar days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = ShockError;

    fn from_str(s: &str) -> Result<Self, ShockError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Inclusive calendar range `[start, end]`.
///
/// A range whose start lies after its end is empty rather than invalid:
/// iterating it yields nothing.
///
/// # Examples
///
/// ```
/// use shock_core::types::time::{Date, DateRange};
///
/// let day = Date::from_ymd(2024, 6, 17).unwrap(); // Monday
/// assert_eq!(DateRange::new(day, day).trading_days().count(), 1);
///
/// let inverted = DateRange::new(day, day.sub_days(1));
/// assert!(inverted.is_empty());
/// assert_eq!(inverted.trading_days().count(), 0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Creates a new inclusive range.
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Range covering `lookback_days` calendar days up to and including `end`.
    pub fn trailing(end: Date, lookback_days: i64) -> Self {
        Self::new(end.sub_days(lookback_days), end)
    }

    /// First calendar day of the range.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last calendar day of the range.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns `true` when the range contains no calendar day.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Returns `true` when `date` falls inside the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every calendar day with its offset from `start`.
    pub fn calendar_days(&self) -> impl Iterator<Item = (usize, Date)> {
        let start = self.start;
        let span = if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        };
        (0..span).map(move |offset| (offset, start.add_days(offset as i64)))
    }

    /// Iterates the weekdays of the range in order.
    pub fn trading_days(&self) -> impl Iterator<Item = Date> {
        self.calendar_days()
            .map(|(_, date)| date)
            .filter(|date| date.is_trading_day())
    }

    /// Iterates every `step`-th calendar day from `start`, keeping weekdays.
    ///
    /// A `step` of zero is treated as one.
    pub fn sampled_trading_days(&self, step: usize) -> impl Iterator<Item = Date> {
        let step = step.max(1);
        self.calendar_days()
            .filter(move |(offset, _)| offset % step == 0)
            .map(|(_, date)| date)
            .filter(|date| date.is_trading_day())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
