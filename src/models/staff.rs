//! Staff member model.
//!
//! This module defines the [`StaffMember`] struct for representing the people
//! who can be rostered onto front-desk duty.

use serde::{Deserialize, Serialize};

use super::Period;

/// Unique identifier for a staff member across the whole system.
pub type StaffId = u32;

/// Represents a staff member on the duty roster.
///
/// Baseline eligibility flags apply to every working day unless an
/// [`AvailabilityOverride`](super::AvailabilityOverride) says otherwise for a
/// specific date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the staff member.
    pub staff_id: StaffId,
    /// Display name.
    pub name: String,
    /// Group label used for per-slot concurrency limits (e.g., "D").
    pub group: String,
    /// Whether the staff member can take morning duty by default.
    pub am_ok: bool,
    /// Whether the staff member can take afternoon duty by default.
    pub pm_ok: bool,
    /// Whether the staff member is a first-year hire.
    #[serde(default)]
    pub rookie: bool,
}

impl StaffMember {
    /// Returns the baseline eligibility flag for a period.
    ///
    /// # Examples
    ///
    /// ```
    /// use front_desk_scheduler::models::{Period, StaffMember};
    ///
    /// let staff = StaffMember {
    ///     staff_id: 1,
    ///     name: "Aoki".to_string(),
    ///     group: "A".to_string(),
    ///     am_ok: false,
    ///     pm_ok: true,
    ///     rookie: false,
    /// };
    /// assert!(!staff.baseline(Period::Am));
    /// assert!(staff.baseline(Period::Pm));
    /// ```
    pub fn baseline(&self, period: Period) -> bool {
        match period {
            Period::Am => self.am_ok,
            Period::Pm => self.pm_ok,
        }
    }

    /// Returns true if the staff member cannot take morning duty by default.
    ///
    /// These staff are held to the afternoon-only assignment band.
    pub fn is_pm_only(&self) -> bool {
        !self.am_ok
    }

    /// Returns true if the staff member can take either period by default.
    pub fn is_flexible(&self) -> bool {
        self.am_ok && self.pm_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_staff(am_ok: bool, pm_ok: bool) -> StaffMember {
        StaffMember {
            staff_id: 7,
            name: "Sato".to_string(),
            group: "B".to_string(),
            am_ok,
            pm_ok,
            rookie: false,
        }
    }

    #[test]
    fn test_deserialize_staff_member() {
        let yaml = r#"
staff_id: 12
name: Tanaka
group: D
am_ok: true
pm_ok: false
rookie: true
"#;
        let staff: StaffMember = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(staff.staff_id, 12);
        assert_eq!(staff.group, "D");
        assert!(staff.am_ok);
        assert!(!staff.pm_ok);
        assert!(staff.rookie);
    }

    #[test]
    fn test_rookie_defaults_to_false() {
        let yaml = "staff_id: 3\nname: Ito\ngroup: A\nam_ok: true\npm_ok: true\n";
        let staff: StaffMember = serde_yaml::from_str(yaml).unwrap();
        assert!(!staff.rookie);
    }

    #[test]
    fn test_pm_only_is_am_ineligible() {
        assert!(create_staff(false, true).is_pm_only());
        assert!(!create_staff(true, true).is_pm_only());
        assert!(!create_staff(true, false).is_pm_only());
    }

    #[test]
    fn test_flexible_requires_both_periods() {
        assert!(create_staff(true, true).is_flexible());
        assert!(!create_staff(false, true).is_flexible());
        assert!(!create_staff(true, false).is_flexible());
    }
}
