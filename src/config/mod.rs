//! Configuration loading and management for the duty scheduler.
//!
//! This module loads the scheduling horizon, group limits, objective weights,
//! hard-rule parameters, solver limits and public holidays from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use front_desk_scheduler::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/front_desk").unwrap().into_config();
//! println!("Group D limit: {}", config.group_limits.limit_for("D"));
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AssignmentBand, GroupLimits, HolidaysFile, ObjectiveWeights, RuleConfig, SchedulerConfig,
    SchedulerFile, SolverSettings,
};
