//! # Reporting Periods
//!
//! Turns a reference date into the window a report covers.
//!
//! ## Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Daily    [d 00:00, d+1 00:00)                                          │
//! │                                                                         │
//! │  Weekly   [Sunday 00:00, next Sunday 00:00)                             │
//! │           Su Mo Tu We Th Fr Sa   ← 7 daily slots, Sunday first          │
//! │                                                                         │
//! │  Monthly  [1st 00:00, 1st of next month 00:00)                          │
//! │           weeks counted from the 1st, cut at Saturdays:                 │
//! │                                                                         │
//! │             Su Mo Tu We Th Fr Sa                                        │
//! │                         1  2  3  4   week 1 (1-4)                       │
//! │              5  6  7  8  9 10 11    week 2 (5-11)                       │
//! │             ...                                                         │
//! │             26 27 28 29 30 31       week 5 (26-31)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All ranges are half-open so adjacent windows never share an instant.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Time Frame
// =============================================================================

/// Which kind of window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl TimeFrame {
    /// The window containing `date`.
    pub fn range(&self, date: NaiveDate) -> DateRange {
        match self {
            TimeFrame::Daily => day_range(date),
            TimeFrame::Weekly => week_range(date),
            TimeFrame::Monthly => month_range(date),
        }
    }

    /// Reference date of the period immediately before the one containing
    /// `date`.
    ///
    /// ## Rules
    /// - Daily: the day before
    /// - Weekly: seven days earlier
    /// - Monthly: same day of the previous month, clamped to its length
    ///   (March 31 → February 28/29)
    pub fn previous_reference(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TimeFrame::Daily => date - Days::new(1),
            TimeFrame::Weekly => date - Days::new(7),
            TimeFrame::Monthly => date - Months::new(1),
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFrame::Daily => write!(f, "daily"),
            TimeFrame::Weekly => write!(f, "weekly"),
            TimeFrame::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for TimeFrame {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" | "diario" => Ok(TimeFrame::Daily),
            "weekly" | "week" | "semanal" => Ok(TimeFrame::Weekly),
            "monthly" | "month" | "mensual" => Ok(TimeFrame::Monthly),
            _ => Err(ValidationError::NotAllowed {
                field: "timeframe".to_string(),
                allowed: vec![
                    "daily".to_string(),
                    "weekly".to_string(),
                    "monthly".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// A half-open `[start, end)` span of shop-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDateTime,
    #[ts(as = "String")]
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Range covering whole days `[first, last]`.
    pub fn from_dates(first: NaiveDate, last: NaiveDate) -> Self {
        DateRange {
            start: midnight(first),
            end: midnight(last + Days::new(1)),
        }
    }

    /// True when `at` falls inside the range.
    #[inline]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }

    /// First calendar day of the range.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Number of calendar days covered.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[inline]
fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

// =============================================================================
// Window Builders
// =============================================================================

/// The calendar day of `date`.
pub fn day_range(date: NaiveDate) -> DateRange {
    DateRange::from_dates(date, date)
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// The Sunday-to-Saturday week containing `date`.
pub fn week_range(date: NaiveDate) -> DateRange {
    let start = week_start(date);
    DateRange::from_dates(start, start + Days::new(6))
}

/// The seven days of the week containing `date`, Sunday first.
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(date);
    std::array::from_fn(|i| start + Days::new(i as u64))
}

/// The 1st of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = month_start(date);
    let next = first + Months::new(1);
    (next - first).num_days() as u32
}

/// The calendar month containing `date`.
pub fn month_range(date: NaiveDate) -> DateRange {
    let first = month_start(date);
    DateRange {
        start: midnight(first),
        end: midnight(first + Months::new(1)),
    }
}

/// One bucket of the monthly breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonthWeek {
    /// 1-based position within the month.
    pub week_number: u32,
    /// First day (inclusive).
    #[ts(as = "String")]
    pub start: NaiveDate,
    /// Last day (inclusive).
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl MonthWeek {
    /// The bucket as a half-open range.
    pub fn range(&self) -> DateRange {
        DateRange::from_dates(self.start, self.end)
    }
}

/// Splits the month containing `date` into week buckets.
///
/// ## Rules
/// - Week 1 runs from the 1st to the first Saturday
/// - Every later week runs Sunday to Saturday, the last one clipped to
///   month end
/// - Count = `ceil((weekday_of_1st + days_in_month) / 7)` with Sunday = 0
///
/// Buckets never overlap and together cover every day of the month.
pub fn month_weeks(date: NaiveDate) -> Vec<MonthWeek> {
    let first = month_start(date);
    let total_days = days_in_month(date);
    let offset = first.weekday().num_days_from_sunday();
    let count = (offset + total_days).div_ceil(7);

    (0..count)
        .map(|n| {
            let start_day = if n == 0 { 1 } else { 1 + n * 7 - offset };
            let end_day = (7 * (n + 1) - offset).min(total_days);
            MonthWeek {
                week_number: n + 1,
                start: first + Days::new(u64::from(start_day - 1)),
                end: first + Days::new(u64::from(end_day - 1)),
            }
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
