//! Date-specific availability overrides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Period, StaffId};

/// An exception to a staff member's baseline eligibility on one date.
///
/// Each period is tri-state: `None` falls through to the baseline flag,
/// `Some(true)` or `Some(false)` replaces it for that date only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityOverride {
    /// The staff member the override applies to.
    pub staff_id: StaffId,
    /// The date the override applies to.
    pub date: NaiveDate,
    /// Morning override, if any.
    #[serde(default)]
    pub am_ok: Option<bool>,
    /// Afternoon override, if any.
    #[serde(default)]
    pub pm_ok: Option<bool>,
    /// Free-text note (e.g., "annual leave").
    #[serde(default)]
    pub note: String,
}

impl AvailabilityOverride {
    /// Returns the override value for a period, if one is set.
    pub fn for_period(&self, period: Period) -> Option<bool> {
        match period {
            Period::Am => self.am_ok,
            Period::Pm => self.pm_ok,
        }
    }
}
