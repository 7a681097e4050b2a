//! Front-desk duty scheduler.
//!
//! This crate assigns staff to half-day front-desk duty slots over a
//! scheduling horizon. It resolves each staff member's availability, builds a
//! mixed-integer model with hard rostering rules and a weighted fairness
//! objective, solves it with HiGHS, and writes the resulting roster.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod scheduling;
