//! Core data models for the front-desk duty scheduler.
//!
//! This module contains all the domain models used throughout the scheduler.

mod availability_override;
mod calendar;
mod day;
mod schedule;
mod scheduling_input;
mod staff;

pub use availability_override::AvailabilityOverride;
pub use calendar::{HolidayCalendar, PublicHoliday, SchedulingPeriod, WorkingDayCalendar};
pub use day::{DayRequirement, Period};
pub use schedule::{
    Assignment, RiskCode, RiskWarning, Schedule, Shortfall, SolveStatus, StaffAssignmentCount,
};
pub use scheduling_input::SchedulingInput;
pub use staff::{StaffId, StaffMember};
