//! The clean, typed input of one scheduling run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AvailabilityOverride, DayRequirement, StaffId, StaffMember};

/// Everything the scheduler needs from its collaborators.
///
/// `days` must be sorted by date with one entry per working day; it defines
/// the horizon and the working-day order used for rest spacing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingInput {
    /// The duty roster.
    pub staff: Vec<StaffMember>,
    /// Slot demand per working day, in date order.
    pub days: Vec<DayRequirement>,
    /// Date-specific availability exceptions.
    #[serde(default)]
    pub overrides: Vec<AvailabilityOverride>,
}

impl SchedulingInput {
    /// Looks up a staff member by id.
    pub fn staff_member(&self, staff_id: StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.staff_id == staff_id)
    }

    /// Returns the working days of the horizon in order.
    pub fn working_dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|d| d.date).collect()
    }

    /// Returns the largest slot count of any (date, period) in the horizon.
    pub fn max_slots(&self) -> u32 {
        self.days
            .iter()
            .map(|d| d.am_slots.max(d.pm_slots))
            .max()
            .unwrap_or(0)
    }
}
