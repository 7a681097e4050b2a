//! The scheduling pipeline.
//!
//! A run resolves availability, builds the constraint model, solves it and
//! reads the incumbent back into a [`Schedule`]. [`run_scheduler`] wires the
//! four steps together; each step is also public for callers that need the
//! intermediate values.

mod availability;
mod extract;
mod model;
mod solve;

use std::time::Instant;

use tracing::info;
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{Schedule, SchedulingInput};

pub use availability::{resolve_availability, AvailabilityMap};
pub use extract::extract_schedule;
pub use model::{AssignmentKey, DutyModel, ModelBuilder, SlotKey};
pub use solve::{solve_model, SolvedModel};

/// Runs one complete scheduling pass.
///
/// # Errors
///
/// Returns [`SchedulerError::NoWorkingDays`] for an empty horizon and
/// [`SchedulerError::SolveFailed`] when no usable solution is found.
///
/// # Example
///
/// ```no_run
/// use front_desk_scheduler::config::ConfigLoader;
/// use front_desk_scheduler::input::InputLoader;
/// use front_desk_scheduler::scheduling::run_scheduler;
///
/// let config = ConfigLoader::load("./config/front_desk").unwrap().into_config();
/// let input = InputLoader::load("./data", &config).unwrap();
/// let schedule = run_scheduler(&config, &input).unwrap();
/// println!("{} assignments, {} uncovered", schedule.assignments.len(), schedule.total_shortfall());
/// ```
pub fn run_scheduler(config: &SchedulerConfig, input: &SchedulingInput) -> SchedulerResult<Schedule> {
    let run_id = Uuid::new_v4();
    if input.days.is_empty() {
        return Err(SchedulerError::NoWorkingDays);
    }

    info!(
        run_id = %run_id,
        staff = input.staff.len(),
        working_days = input.days.len(),
        overrides = input.overrides.len(),
        "Starting scheduling run"
    );
    let start_time = Instant::now();

    let availability = resolve_availability(&input.staff, &input.days, &input.overrides);
    let model = ModelBuilder::new(config).build(input, &availability);
    let solved = solve_model(model, &config.solver)?;
    let mut schedule = extract_schedule(&solved, input)?;

    schedule.run_id = run_id;
    schedule.duration_ms = start_time.elapsed().as_millis() as u64;

    info!(
        run_id = %run_id,
        status = %schedule.status,
        assignments = schedule.assignments.len(),
        total_shortfall = schedule.total_shortfall(),
        duration_ms = schedule.duration_ms,
        "Scheduling run completed"
    );

    Ok(schedule)
}
