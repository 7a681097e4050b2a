//! Scheduling period and working-day calendar.
//!
//! This module contains the [`SchedulingPeriod`] and [`PublicHoliday`] types and
//! the [`WorkingDayCalendar`] predicate used to decide which demand rows are
//! schedulable.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Represents a public holiday.
///
/// # Example
///
/// ```
/// use front_desk_scheduler::models::PublicHoliday;
/// use chrono::NaiveDate;
///
/// let holiday = PublicHoliday {
///     date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
///     name: "Coming of Age Day".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    /// The date of the public holiday.
    pub date: NaiveDate,
    /// The name of the public holiday.
    #[serde(default)]
    pub name: String,
}

/// The inclusive date range a scheduling run covers.
///
/// # Example
///
/// ```
/// use front_desk_scheduler::models::SchedulingPeriod;
/// use chrono::NaiveDate;
///
/// let period = SchedulingPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())); // after
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPeriod {
    /// The first date of the period (inclusive).
    #[serde(alias = "start")]
    pub start_date: NaiveDate,
    /// The last date of the period (inclusive).
    #[serde(alias = "end")]
    pub end_date: NaiveDate,
}

impl SchedulingPeriod {
    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Decides whether a calendar date is a working day.
///
/// The scheduler never implements holiday rules itself; it asks a calendar.
pub trait WorkingDayCalendar {
    /// Returns true if `date` is a working day.
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// A Monday-to-Friday calendar with a fixed list of public holidays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates a calendar from a list of public holidays.
    pub fn new(holidays: &[PublicHoliday]) -> Self {
        Self {
            holidays: holidays.iter().map(|h| h.date).collect(),
        }
    }

    /// Checks if a given date is a listed public holiday.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}

impl WorkingDayCalendar for HolidayCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_public_holiday(date)
    }
}
