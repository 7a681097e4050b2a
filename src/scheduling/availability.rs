//! Effective availability resolution.
//!
//! Merges each staff member's baseline AM/PM eligibility with date-specific
//! overrides into a per-(staff, date, period) lookup. This table is the only
//! eligibility signal the model builder consumes.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::models::{AvailabilityOverride, DayRequirement, Period, StaffId, StaffMember};

/// Resolved availability for every staff member, working day and period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityMap {
    table: BTreeMap<(StaffId, NaiveDate, Period), bool>,
}

impl AvailabilityMap {
    /// Returns whether a staff member can work a period on a date.
    ///
    /// The lookup is total: combinations outside the resolved roster or
    /// horizon are unavailable.
    pub fn is_available(&self, staff_id: StaffId, date: NaiveDate, period: Period) -> bool {
        self.table
            .get(&(staff_id, date, period))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the number of resolved (staff, date, period) entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries that resolved to available.
    pub fn available_count(&self) -> usize {
        self.table.values().filter(|available| **available).count()
    }
}

/// Resolves effective availability for a roster over a horizon.
///
/// For each staff member, working day and period, an override for that
/// (staff, date) wins if it sets a value for the period; otherwise the
/// staff member's baseline flag applies. Periods resolve independently, so an
/// override that only sets AM leaves PM on its baseline. When several
/// overrides share a (staff, date), the last one wins.
///
/// # Example
///
/// ```
/// use front_desk_scheduler::models::{AvailabilityOverride, DayRequirement, Period, StaffMember};
/// use front_desk_scheduler::scheduling::resolve_availability;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
/// let staff = vec![StaffMember {
///     staff_id: 1,
///     name: "Aoki".to_string(),
///     group: "A".to_string(),
///     am_ok: true,
///     pm_ok: true,
///     rookie: false,
/// }];
/// let days = vec![DayRequirement { date, am_slots: 1, pm_slots: 1, busy: false }];
/// let overrides = vec![AvailabilityOverride {
///     staff_id: 1,
///     date,
///     am_ok: Some(false),
///     pm_ok: None,
///     note: "leave".to_string(),
/// }];
///
/// let availability = resolve_availability(&staff, &days, &overrides);
/// assert!(!availability.is_available(1, date, Period::Am));
/// assert!(availability.is_available(1, date, Period::Pm));
/// ```
pub fn resolve_availability(
    staff: &[StaffMember],
    days: &[DayRequirement],
    overrides: &[AvailabilityOverride],
) -> AvailabilityMap {
    let lookup: HashMap<(StaffId, NaiveDate), &AvailabilityOverride> = overrides
        .iter()
        .map(|o| ((o.staff_id, o.date), o))
        .collect();

    let mut table = BTreeMap::new();
    for member in staff {
        for day in days {
            let exception = lookup.get(&(member.staff_id, day.date));
            for period in Period::ALL {
                let available = exception
                    .and_then(|o| o.for_period(period))
                    .unwrap_or_else(|| member.baseline(period));
                table.insert((member.staff_id, day.date, period), available);
            }
        }
    }

    AvailabilityMap { table }
}
