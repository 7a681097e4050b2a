//! Error types for the front-desk duty scheduler.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts a scheduling run: bad configuration,
//! invalid input files, solver failure and unrecoverable output errors.

use thiserror::Error;

/// The main error type for the scheduler.
///
/// Validation errors are raised before any model is built. A solve failure
/// carries the solver's raw status name together with the risk warnings that
/// were collected while the model was constructed.
///
/// # Example
///
/// ```
/// use front_desk_scheduler::error::SchedulerError;
///
/// let error = SchedulerError::InputNotFound {
///     path: "data/staff.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Required input file not found: data/staff.yaml");
/// ```
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or is inconsistent.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required input file was not found.
    #[error("Required input file not found: {path}")]
    InputNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An input file could not be parsed or a field was invalid.
    #[error("Failed to parse input file '{path}': {message}")]
    InputParseError {
        /// The path to the offending file.
        path: String,
        /// A description of the problem, naming the field where possible.
        message: String,
    },

    /// The roster contains the same staff identifier more than once.
    #[error("Duplicate staff_id detected: {ids:?}")]
    DuplicateStaffId {
        /// Every identifier that appears more than once.
        ids: Vec<u32>,
    },

    /// An override row refers to a staff member missing from the roster.
    #[error("Unknown staff_id {staff_id} in '{path}'")]
    UnknownStaff {
        /// The path to the override file.
        path: String,
        /// The identifier that was not found in the roster.
        staff_id: u32,
    },

    /// No slot-demand rows fall into the scheduling horizon.
    #[error("No schedule rows in '{path}' fall into the target period")]
    EmptyHorizon {
        /// The path to the slot-demand file.
        path: String,
    },

    /// Slot-demand rows exist, but none of them is a working day.
    #[error("No working days available to schedule")]
    NoWorkingDays,

    /// The solver terminated without a usable solution.
    #[error("Solver failed with status: {status}")]
    SolveFailed {
        /// The raw status name reported by the solver.
        status: String,
        /// Risk warnings recorded while the model was built.
        warnings: Vec<String>,
    },

    /// The schedule could not be written, even to the fallback path.
    #[error("Failed to write schedule to '{path}': {message}")]
    OutputWriteError {
        /// The path that could not be written.
        path: String,
        /// A description of the I/O error.
        message: String,
    },
}

/// A type alias for Results that return SchedulerError.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
