//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading scheduler
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{SchedulerError, SchedulerResult};

use super::types::{HolidaysFile, SchedulerConfig, SchedulerFile};

/// Loads and validates scheduler configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/front_desk/
/// ├── scheduler.yaml   # Horizon, group limits, weights, rules, solver limits
/// └── holidays.yaml    # Public holidays (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use front_desk_scheduler::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/front_desk").unwrap();
/// println!("Scheduling from {}", loader.config().horizon.start_date);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SchedulerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - scheduler.yaml is missing
    /// - Any file contains invalid YAML
    /// - The horizon ends before it starts, or the PM-only band is inverted
    pub fn load<P: AsRef<Path>>(path: P) -> SchedulerResult<Self> {
        let path = path.as_ref();

        let scheduler_path = path.join("scheduler.yaml");
        let file = Self::load_yaml::<SchedulerFile>(&scheduler_path)?;
        Self::validate(&file, &scheduler_path)?;

        let holidays_path = path.join("holidays.yaml");
        let holidays = if holidays_path.exists() {
            Self::load_yaml::<HolidaysFile>(&holidays_path)?.holidays
        } else {
            info!(
                path = %holidays_path.display(),
                "holidays.yaml not found, continuing without public holidays"
            );
            Vec::new()
        };

        Ok(Self {
            config: SchedulerConfig {
                horizon: file.horizon,
                group_limits: file.group_limits,
                weights: file.weights,
                rules: file.rules,
                solver: file.solver,
                holidays,
            },
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> SchedulerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| SchedulerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| SchedulerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(file: &SchedulerFile, path: &Path) -> SchedulerResult<()> {
        let parse_error = |message: String| SchedulerError::ConfigParseError {
            path: path.display().to_string(),
            message,
        };

        if file.horizon.start_date > file.horizon.end_date {
            return Err(parse_error(format!(
                "horizon start {} is after end {}",
                file.horizon.start_date, file.horizon.end_date
            )));
        }

        let band = file.rules.pm_only_band;
        if band.min > band.max {
            return Err(parse_error(format!(
                "pm_only_band min {} exceeds max {}",
                band.min, band.max
            )));
        }

        if file.solver.time_limit_secs <= 0.0 || file.solver.threads == 0 {
            return Err(parse_error(
                "solver time_limit_secs and threads must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> SchedulerConfig {
        self.config
    }
}
