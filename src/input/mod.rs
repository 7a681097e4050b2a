//! Input loading for scheduling runs.
//!
//! Reads the staff roster, slot demand and availability overrides from YAML
//! files in a data directory and produces a validated [`SchedulingInput`].
//!
//! [`SchedulingInput`]: crate::models::SchedulingInput

mod loader;

pub use loader::{DemandFile, InputLoader, OverridesFile, StaffFile};
