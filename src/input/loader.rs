//! Data directory loading.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    AvailabilityOverride, DayRequirement, SchedulingInput, SchedulingPeriod, StaffMember,
    WorkingDayCalendar,
};

/// Contents of `staff.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffFile {
    /// The duty roster.
    pub staff: Vec<StaffMember>,
}

/// Contents of `schedule_config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandFile {
    /// Slot demand rows, one per date.
    pub days: Vec<DayRequirement>,
}

/// Contents of `special_constraints.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverridesFile {
    /// Date-specific availability exceptions.
    #[serde(default)]
    pub overrides: Vec<AvailabilityOverride>,
}

/// Loads and validates the inputs of a scheduling run.
///
/// # Directory Structure
///
/// ```text
/// data/
/// ├── staff.yaml                # Roster with baseline AM/PM eligibility
/// ├── schedule_config.yaml      # Slot demand per date
/// └── special_constraints.yaml  # Availability overrides (optional)
/// ```
pub struct InputLoader;

impl InputLoader {
    /// Loads inputs from a data directory, using the configured horizon and
    /// holiday calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing or malformed, a staff
    /// id repeats, an override names an unknown staff member, or no working
    /// day remains in the horizon.
    pub fn load<P: AsRef<Path>>(path: P, config: &SchedulerConfig) -> SchedulerResult<SchedulingInput> {
        Self::load_with_calendar(path, config.horizon, &config.calendar())
    }

    /// Loads inputs with an explicit horizon and working-day calendar.
    pub fn load_with_calendar<P, C>(
        path: P,
        horizon: SchedulingPeriod,
        calendar: &C,
    ) -> SchedulerResult<SchedulingInput>
    where
        P: AsRef<Path>,
        C: WorkingDayCalendar + ?Sized,
    {
        let path = path.as_ref();

        let staff_path = path.join("staff.yaml");
        let staff = Self::load_staff(&staff_path)?;

        let demand_path = path.join("schedule_config.yaml");
        let days = Self::load_days(&demand_path, horizon, calendar)?;

        let overrides_path = path.join("special_constraints.yaml");
        let overrides = if overrides_path.exists() {
            Self::load_overrides(&overrides_path, horizon, &staff)?
        } else {
            info!(
                path = %overrides_path.display(),
                "special_constraints.yaml not found, continuing without overrides"
            );
            Vec::new()
        };

        info!(
            staff = staff.len(),
            working_days = days.len(),
            overrides = overrides.len(),
            "Inputs loaded"
        );

        Ok(SchedulingInput {
            staff,
            days,
            overrides,
        })
    }

    fn load_staff(path: &Path) -> SchedulerResult<Vec<StaffMember>> {
        let mut staff = Self::load_yaml::<StaffFile>(path)?.staff;

        let mut seen = HashSet::new();
        let duplicates: BTreeSet<u32> = staff
            .iter()
            .filter(|s| !seen.insert(s.staff_id))
            .map(|s| s.staff_id)
            .collect();
        if !duplicates.is_empty() {
            return Err(SchedulerError::DuplicateStaffId {
                ids: duplicates.into_iter().collect(),
            });
        }

        for member in &mut staff {
            member.group = member.group.trim().to_string();
            if member.group.is_empty() {
                return Err(SchedulerError::InputParseError {
                    path: path.display().to_string(),
                    message: format!("staff_id {} has an empty group", member.staff_id),
                });
            }
        }

        Ok(staff)
    }

    fn load_days<C>(
        path: &Path,
        horizon: SchedulingPeriod,
        calendar: &C,
    ) -> SchedulerResult<Vec<DayRequirement>>
    where
        C: WorkingDayCalendar + ?Sized,
    {
        let rows = Self::load_yaml::<DemandFile>(path)?.days;

        // later rows replace earlier ones for the same date
        let in_horizon: BTreeMap<_, _> = rows
            .into_iter()
            .filter(|d| horizon.contains_date(d.date))
            .map(|d| (d.date, d))
            .collect();
        if in_horizon.is_empty() {
            return Err(SchedulerError::EmptyHorizon {
                path: path.display().to_string(),
            });
        }

        let total = in_horizon.len();
        let days: Vec<DayRequirement> = in_horizon
            .into_values()
            .filter(|d| calendar.is_working_day(d.date))
            .collect();
        debug!(
            rows = total,
            dropped = total - days.len(),
            "Dropped non-working days"
        );

        if days.is_empty() {
            return Err(SchedulerError::NoWorkingDays);
        }
        Ok(days)
    }

    fn load_overrides(
        path: &Path,
        horizon: SchedulingPeriod,
        staff: &[StaffMember],
    ) -> SchedulerResult<Vec<AvailabilityOverride>> {
        let known: HashSet<u32> = staff.iter().map(|s| s.staff_id).collect();
        let overrides: Vec<AvailabilityOverride> = Self::load_yaml::<OverridesFile>(path)?
            .overrides
            .into_iter()
            .filter(|o| horizon.contains_date(o.date))
            .collect();

        if let Some(unknown) = overrides.iter().find(|o| !known.contains(&o.staff_id)) {
            return Err(SchedulerError::UnknownStaff {
                path: path.display().to_string(),
                staff_id: unknown.staff_id,
            });
        }

        Ok(overrides)
    }

    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> SchedulerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| SchedulerError::InputNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| SchedulerError::InputParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}
