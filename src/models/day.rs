//! Duty periods and per-day slot requirements.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A half-day duty period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    /// Morning duty.
    #[serde(rename = "AM")]
    Am,
    /// Afternoon duty.
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    /// Both periods in chronological order.
    pub const ALL: [Period; 2] = [Period::Am, Period::Pm];

    /// Returns the label used in logs and output files.
    pub fn label(self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The slot demand for one working day.
///
/// The full list of requirements defines the scheduling horizon: a date with
/// no requirement is never scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRequirement {
    /// The working day.
    pub date: NaiveDate,
    /// Number of morning slots to fill.
    pub am_slots: u32,
    /// Number of afternoon slots to fill.
    pub pm_slots: u32,
    /// Informational busy-day marker, carried through to the output.
    #[serde(default)]
    pub busy: bool,
}

impl DayRequirement {
    /// Returns the number of slots required for a period.
    ///
    /// # Examples
    ///
    /// ```
    /// use front_desk_scheduler::models::{DayRequirement, Period};
    /// use chrono::NaiveDate;
    ///
    /// let day = DayRequirement {
    ///     date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
    ///     am_slots: 2,
    ///     pm_slots: 3,
    ///     busy: false,
    /// };
    /// assert_eq!(day.required(Period::Am), 2);
    /// assert_eq!(day.required(Period::Pm), 3);
    /// ```
    pub fn required(&self, period: Period) -> u32 {
        match period {
            Period::Am => self.am_slots,
            Period::Pm => self.pm_slots,
        }
    }

    /// Returns the day of the week.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}
