//! Solver invocation.
//!
//! Runs HiGHS on a built [`DutyModel`] with a bounded time budget and a fixed
//! thread count, and reads the incumbent back into plain values. A run with no
//! usable solution is fatal: the collected risk warnings are logged together
//! before the error is returned.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use good_lp::solvers::SolutionStatus;
use good_lp::{highs, ResolutionError, Solution, SolverModel};
use tracing::{error, info};

use crate::config::SolverSettings;
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{RiskWarning, SolveStatus, StaffId};

use super::model::{AssignmentKey, DutyModel, SlotKey};

/// Values read back from a successful solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedModel {
    /// How the solver terminated.
    pub status: SolveStatus,
    /// The weighted objective of the incumbent.
    pub objective_value: f64,
    /// Every (staff, date, period) whose assignment variable is set.
    pub assigned: BTreeSet<AssignmentKey>,
    /// Shortfall slack of every slot, including zeros.
    pub shortfalls: BTreeMap<SlotKey, u32>,
    /// Risk warnings carried over from model construction.
    pub risk_warnings: Vec<RiskWarning>,
}

/// Solves a model within the configured time budget.
///
/// A proven optimum is reported as [`SolveStatus::Optimal`]. An incumbent
/// returned at a time, gap, iteration or memory limit is
/// [`SolveStatus::Feasible`].
///
/// # Errors
///
/// Returns [`SchedulerError::SolveFailed`] with the raw status name when the
/// model is infeasible, unbounded, or the solver fails otherwise.
pub fn solve_model(model: DutyModel, settings: &SolverSettings) -> SchedulerResult<SolvedModel> {
    let DutyModel {
        variables,
        constraints,
        objective,
        assignments: assignment_vars,
        shortfalls: shortfall_vars,
        risk_warnings,
        pm_only_staff,
        ..
    } = model;

    info!(
        variables = assignment_vars.len() + shortfall_vars.len(),
        constraints = constraints.len(),
        time_limit_secs = settings.time_limit_secs,
        threads = settings.threads,
        "Starting solver"
    );

    let mut problem = variables
        .minimise(objective.clone())
        .using(highs)
        .set_option("output_flag", false)
        .set_option("time_limit", settings.time_limit_secs)
        .set_option("threads", settings.threads as i32);
    for constraint in constraints {
        problem.add_constraint(constraint);
    }

    let started = Instant::now();
    let outcome = problem.solve();
    let elapsed = started.elapsed();

    let solution = match outcome {
        Ok(solution) => solution,
        Err(err) => {
            let status = match err {
                ResolutionError::Infeasible => SolveStatus::Infeasible,
                ResolutionError::Unbounded => SolveStatus::Unbounded,
                other => SolveStatus::Unknown(other.to_string()),
            };
            return Err(fail(status, &risk_warnings, &pm_only_staff));
        }
    };

    let status = termination_status(solution.status());
    let objective_value = solution.eval(objective);
    info!(
        status = %status,
        objective = objective_value,
        elapsed_ms = elapsed.as_millis() as u64,
        "Solver finished"
    );

    let assigned = assignment_vars
        .iter()
        .filter(|(_, var)| solution.value(**var) > 0.5)
        .map(|(key, _)| *key)
        .collect();
    let shortfalls = shortfall_vars
        .iter()
        .map(|(slot, var)| (*slot, solution.value(*var).round().max(0.0) as u32))
        .collect();

    Ok(SolvedModel {
        status,
        objective_value,
        assigned,
        shortfalls,
        risk_warnings,
    })
}

/// Maps the solver's termination of a solve that produced values.
fn termination_status(status: SolutionStatus) -> SolveStatus {
    match status {
        SolutionStatus::Optimal => SolveStatus::Optimal,
        _ => SolveStatus::Feasible,
    }
}

/// Logs the accumulated diagnosis and builds the failure error.
fn fail(status: SolveStatus, risk_warnings: &[RiskWarning], pm_only_staff: &[StaffId]) -> SchedulerError {
    let warnings: Vec<String> = risk_warnings
        .iter()
        .map(|w| w.message.clone())
        .collect();

    if !warnings.is_empty() {
        error!(
            "Risk warnings prior to failed solve:\n{}",
            warnings.join("\n")
        );
    }
    if !pm_only_staff.is_empty() {
        error!(
            staff = ?pm_only_staff,
            "Afternoon-only staff may not be able to satisfy their assignment band"
        );
    }

    SchedulerError::SolveFailed {
        status: status.name(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proven_optimum_is_optimal() {
        assert_eq!(termination_status(SolutionStatus::Optimal), SolveStatus::Optimal);
    }

    #[test]
    fn test_limited_solves_are_feasible() {
        assert_eq!(termination_status(SolutionStatus::TimeLimit), SolveStatus::Feasible);
        assert_eq!(termination_status(SolutionStatus::GapLimit), SolveStatus::Feasible);
    }

    #[test]
    fn test_failure_carries_status_and_warnings() {
        let warnings = vec![RiskWarning {
            code: crate::models::RiskCode::RookieSupervision,
            message: "Insufficient experienced staff for 2026-01-06 AM: need 1, have 0.".to_string(),
            date: None,
            period: None,
        }];

        match fail(SolveStatus::Infeasible, &warnings, &[6]) {
            SchedulerError::SolveFailed { status, warnings } => {
                assert_eq!(status, "INFEASIBLE");
                assert_eq!(warnings.len(), 1);
                assert!(warnings[0].starts_with("Insufficient experienced staff"));
            }
            other => panic!("Expected SolveFailed, got {:?}", other),
        }
    }
}
