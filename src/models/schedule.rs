//! Scheduling result types.
//!
//! This module contains the output of a scheduling run: the [`Assignment`]
//! records, per-slot [`Shortfall`] counts, the [`RiskWarning`]s collected while
//! the model was built, and the [`Schedule`] that bundles them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Period, StaffId};

/// One staff member working one half-day duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The date of the duty.
    pub date: NaiveDate,
    /// The day of the week, for human review.
    pub weekday: Weekday,
    /// The half-day period.
    pub period: Period,
    /// The assigned staff member.
    pub staff_id: StaffId,
    /// The staff member's name.
    pub name: String,
    /// The staff member's group.
    pub group: String,
    /// The day's busy marker.
    pub busy: bool,
}

/// Unfilled slots for one (date, period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    /// The date of the slot.
    pub date: NaiveDate,
    /// The half-day period.
    pub period: Period,
    /// Number of required slots left unassigned.
    pub missing: u32,
}

/// The kind of modelling risk a warning reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCode {
    /// Too few experienced staff are available for a rookie-capped slot.
    RookieSupervision,
    /// Afternoon-only staff may not be able to reach their assignment band.
    PmOnlyBand,
}

/// A non-fatal warning raised while building the model.
///
/// Warnings do not stop the run; they are surfaced again if the solve fails
/// so the operator can see which hard constraints are likely colliding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskWarning {
    /// A code identifying the type of warning.
    pub code: RiskCode,
    /// A human-readable description of the warning.
    pub message: String,
    /// The slot date, when the warning concerns one slot.
    pub date: Option<NaiveDate>,
    /// The slot period, when the warning concerns one slot.
    pub period: Option<Period>,
}

/// How the solver terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// The search finished and proved the incumbent optimal.
    Optimal,
    /// A solution exists but the time budget ran out before proving optimality.
    Feasible,
    /// The hard constraints cannot all hold.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// Any other termination, carrying the solver's own description.
    Unknown(String),
}

impl SolveStatus {
    /// Returns true if the status carries a usable solution.
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Returns the raw status name.
    pub fn name(&self) -> String {
        match self {
            SolveStatus::Optimal => "OPTIMAL".to_string(),
            SolveStatus::Feasible => "FEASIBLE".to_string(),
            SolveStatus::Infeasible => "INFEASIBLE".to_string(),
            SolveStatus::Unbounded => "UNBOUNDED".to_string(),
            SolveStatus::Unknown(detail) => format!("UNKNOWN ({detail})"),
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Number of duties assigned to one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAssignmentCount {
    /// The staff member.
    pub staff_id: StaffId,
    /// The staff member's name.
    pub name: String,
    /// Total duties over the horizon.
    pub assignments: usize,
}

/// The complete result of a scheduling run.
///
/// # Example
///
/// ```
/// use front_desk_scheduler::models::{Schedule, SolveStatus};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let schedule = Schedule {
///     run_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     status: SolveStatus::Optimal,
///     objective_value: 0.0,
///     assignments: vec![],
///     shortfalls: vec![],
///     risk_warnings: vec![],
///     duration_ms: 12,
/// };
/// assert!(schedule.is_fully_covered());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// How the solver terminated.
    pub status: SolveStatus,
    /// The weighted objective of the returned solution.
    pub objective_value: f64,
    /// Assignments sorted by date, period, group and staff id.
    pub assignments: Vec<Assignment>,
    /// Slots with unfilled demand, sorted by date then period.
    pub shortfalls: Vec<Shortfall>,
    /// Warnings collected while building the model.
    pub risk_warnings: Vec<RiskWarning>,
    /// Wall-clock time of the run in milliseconds.
    pub duration_ms: u64,
}

impl Schedule {
    /// Returns the total number of unfilled slots.
    pub fn total_shortfall(&self) -> u32 {
        self.shortfalls.iter().map(|s| s.missing).sum()
    }

    /// Returns true if every required slot was filled.
    pub fn is_fully_covered(&self) -> bool {
        self.total_shortfall() == 0
    }

    /// Returns per-staff duty counts, highest first, ties broken by staff id.
    ///
    /// Only staff with at least one assignment appear.
    pub fn assignment_counts(&self) -> Vec<StaffAssignmentCount> {
        let mut counts: BTreeMap<StaffId, StaffAssignmentCount> = BTreeMap::new();
        for assignment in &self.assignments {
            counts
                .entry(assignment.staff_id)
                .or_insert_with(|| StaffAssignmentCount {
                    staff_id: assignment.staff_id,
                    name: assignment.name.clone(),
                    assignments: 0,
                })
                .assignments += 1;
        }

        let mut ranked: Vec<StaffAssignmentCount> = counts.into_values().collect();
        ranked.sort_by(|a, b| {
            b.assignments
                .cmp(&a.assignments)
                .then(a.staff_id.cmp(&b.staff_id))
        });
        ranked
    }

    /// Returns the assignments of one staff member in date order.
    pub fn assignments_for(&self, staff_id: StaffId) -> impl Iterator<Item = &Assignment> {
        self.assignments
            .iter()
            .filter(move |a| a.staff_id == staff_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn create_assignment(day: u32, period: Period, staff_id: StaffId) -> Assignment {
        let date = NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
        Assignment {
            date,
            weekday: date.weekday(),
            period,
            staff_id,
            name: format!("staff_{staff_id}"),
            group: "A".to_string(),
            busy: false,
        }
    }

    fn create_schedule(assignments: Vec<Assignment>, shortfalls: Vec<Shortfall>) -> Schedule {
        Schedule {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            status: SolveStatus::Optimal,
            objective_value: 0.0,
            assignments,
            shortfalls,
            risk_warnings: vec![],
            duration_ms: 0,
        }
    }

    #[test]
    fn test_total_shortfall_sums_missing_slots() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let schedule = create_schedule(
            vec![],
            vec![
                Shortfall {
                    date,
                    period: Period::Am,
                    missing: 2,
                },
                Shortfall {
                    date,
                    period: Period::Pm,
                    missing: 1,
                },
            ],
        );
        assert_eq!(schedule.total_shortfall(), 3);
        assert!(!schedule.is_fully_covered());
    }

    #[test]
    fn test_assignment_counts_are_ranked() {
        let schedule = create_schedule(
            vec![
                create_assignment(5, Period::Am, 2),
                create_assignment(5, Period::Pm, 1),
                create_assignment(8, Period::Am, 1),
                create_assignment(8, Period::Pm, 3),
            ],
            vec![],
        );

        let counts = schedule.assignment_counts();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].staff_id, 1);
        assert_eq!(counts[0].assignments, 2);
        // ties ordered by staff id
        assert_eq!(counts[1].staff_id, 2);
        assert_eq!(counts[2].staff_id, 3);
    }

    #[test]
    fn test_assignments_for_filters_by_staff() {
        let schedule = create_schedule(
            vec![
                create_assignment(5, Period::Am, 2),
                create_assignment(8, Period::Pm, 2),
                create_assignment(8, Period::Am, 4),
            ],
            vec![],
        );
        assert_eq!(schedule.assignments_for(2).count(), 2);
        assert_eq!(schedule.assignments_for(9).count(), 0);
    }

    #[test]
    fn test_solve_status_names() {
        assert_eq!(SolveStatus::Optimal.name(), "OPTIMAL");
        assert_eq!(SolveStatus::Infeasible.to_string(), "INFEASIBLE");
        assert_eq!(
            SolveStatus::Unknown("time limit".to_string()).name(),
            "UNKNOWN (time limit)"
        );
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Unbounded.has_solution());
    }

    #[test]
    fn test_risk_code_serialization() {
        assert_eq!(
            serde_json::to_string(&RiskCode::RookieSupervision).unwrap(),
            "\"rookie_supervision\""
        );
        assert_eq!(
            serde_json::to_string(&RiskCode::PmOnlyBand).unwrap(),
            "\"pm_only_band\""
        );
    }
}
