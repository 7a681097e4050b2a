//! Reading a solved model back into a [`Schedule`].

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{Assignment, Period, Schedule, SchedulingInput, Shortfall, SolveStatus};

use super::model::SlotKey;
use super::solve::SolvedModel;

const TOP_COUNTS: usize = 5;

/// Builds the schedule from a solved model.
///
/// Every slot is re-checked so that assigned staff plus shortfall equals the
/// required count. The returned schedule carries a fresh run id and zero
/// duration; [`run_scheduler`](super::run_scheduler) stamps both.
///
/// # Errors
///
/// Returns [`SchedulerError::SolveFailed`] with status `UNKNOWN` when the
/// incumbent does not add up, or references a staff member or date missing
/// from the input.
pub fn extract_schedule(solved: &SolvedModel, input: &SchedulingInput) -> SchedulerResult<Schedule> {
    let days: BTreeMap<_, _> = input.days.iter().map(|d| (d.date, d)).collect();

    let mut covered: BTreeMap<SlotKey, u32> = BTreeMap::new();
    let mut assignments = Vec::with_capacity(solved.assigned.len());
    for &(staff_id, date, period) in &solved.assigned {
        let member = input
            .staff_member(staff_id)
            .ok_or_else(|| inconsistent(format!("assignment references unknown staff {staff_id}")))?;
        let day = days
            .get(&date)
            .ok_or_else(|| inconsistent(format!("assignment on {date} is outside the horizon")))?;

        *covered.entry((date, period)).or_default() += 1;
        assignments.push(Assignment {
            date,
            weekday: day.weekday(),
            period,
            staff_id,
            name: member.name.clone(),
            group: member.group.clone(),
            busy: day.busy,
        });
    }

    let mut shortfalls = Vec::new();
    for day in &input.days {
        for period in Period::ALL {
            let slot = (day.date, period);
            let assigned = covered.get(&slot).copied().unwrap_or(0);
            let missing = solved.shortfalls.get(&slot).copied().unwrap_or(0);
            let required = day.required(period);
            if assigned + missing != required {
                return Err(inconsistent(format!(
                    "slot {} {period}: {assigned} assigned + {missing} missing != {required} required",
                    day.date
                )));
            }
            if missing > 0 {
                shortfalls.push(Shortfall {
                    date: day.date,
                    period,
                    missing,
                });
            }
        }
    }

    assignments.sort_by(|a, b| {
        (a.date, a.period, &a.group, a.staff_id).cmp(&(b.date, b.period, &b.group, b.staff_id))
    });

    let schedule = Schedule {
        run_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        status: solved.status.clone(),
        objective_value: solved.objective_value,
        assignments,
        shortfalls,
        risk_warnings: solved.risk_warnings.clone(),
        duration_ms: 0,
    };

    summarize_assignments(&schedule);
    log_shortfalls(&schedule);

    Ok(schedule)
}

fn inconsistent(detail: String) -> SchedulerError {
    warn!(detail = %detail, "Solver incumbent failed verification");
    SchedulerError::SolveFailed {
        status: SolveStatus::Unknown(detail).name(),
        warnings: Vec::new(),
    }
}

/// Logs the busiest staff members.
fn summarize_assignments(schedule: &Schedule) {
    for count in schedule.assignment_counts().into_iter().take(TOP_COUNTS) {
        info!(
            staff_id = count.staff_id,
            name = %count.name,
            assignments = count.assignments,
            "Assignment count"
        );
    }
}

fn log_shortfalls(schedule: &Schedule) {
    if schedule.shortfalls.is_empty() {
        info!("All slots covered");
        return;
    }
    for shortfall in &schedule.shortfalls {
        warn!(
            date = %shortfall.date,
            period = %shortfall.period,
            missing = shortfall.missing,
            "Slot left uncovered"
        );
    }
}
