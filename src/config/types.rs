//! Configuration types for the duty scheduler.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every section except the
//! horizon has defaults matching the front desk's standing rules.

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::models::{HolidayCalendar, PublicHoliday, SchedulingPeriod};

/// Concurrency limits per staff group.
///
/// A group's limit caps how many of its members may share one (date, period).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLimits {
    /// Limit applied to every group without an override.
    #[serde(default = "default_group_limit")]
    pub default: u32,
    /// Map of group label to its explicit limit.
    #[serde(default)]
    pub overrides: BTreeMap<String, u32>,
}

impl GroupLimits {
    /// Returns the limit for a group.
    ///
    /// # Example
    ///
    /// ```
    /// use front_desk_scheduler::config::GroupLimits;
    ///
    /// let mut limits = GroupLimits::default();
    /// limits.overrides.insert("D".to_string(), 2);
    /// assert_eq!(limits.limit_for("D"), 2);
    /// assert_eq!(limits.limit_for("A"), 1);
    /// ```
    pub fn limit_for(&self, group: &str) -> u32 {
        self.overrides.get(group).copied().unwrap_or(self.default)
    }
}

impl Default for GroupLimits {
    fn default() -> Self {
        Self {
            default: default_group_limit(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Weights of the scalarized objective.
///
/// The ordering encodes priority: unfilled demand dominates, then workload
/// fairness, then weekday fairness and AM/PM balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Penalty per unfilled slot.
    #[serde(default = "default_shortfall_weight")]
    pub shortfall: f64,
    /// Penalty per unit of spread between the busiest and idlest staff.
    #[serde(default = "default_fairness_weight")]
    pub fairness: f64,
    /// Penalty per unit of spread in balance-weekday duties.
    #[serde(default = "default_weekday_balance_weight")]
    pub weekday_balance: f64,
    /// Penalty per unit of AM/PM imbalance of flexible staff.
    #[serde(default = "default_am_pm_balance_weight")]
    pub am_pm_balance: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            shortfall: default_shortfall_weight(),
            fairness: default_fairness_weight(),
            weekday_balance: default_weekday_balance_weight(),
            am_pm_balance: default_am_pm_balance_weight(),
        }
    }
}

/// An inclusive band on a staff member's total duties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentBand {
    /// Minimum total duties.
    pub min: u32,
    /// Maximum total duties.
    pub max: u32,
}

impl AssignmentBand {
    /// Returns true if `total` lies inside the band.
    pub fn contains(&self, total: u32) -> bool {
        total >= self.min && total <= self.max
    }
}

/// Organizational rules enforced as hard constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Map of required slot count to the maximum rookies on that slot.
    ///
    /// Slot counts without an entry are uncapped.
    #[serde(default = "default_rookie_caps")]
    pub rookie_caps: BTreeMap<u32, u32>,
    /// Working days blocked after each assignment.
    #[serde(default = "default_rest_days")]
    pub rest_days: usize,
    /// Hard band on total duties for staff who cannot take morning duty.
    #[serde(default = "default_pm_only_band")]
    pub pm_only_band: AssignmentBand,
    /// Weekday whose per-staff duty counts are balanced.
    #[serde(default = "default_balance_weekday")]
    pub balance_weekday: Weekday,
}

impl RuleConfig {
    /// Returns the rookie cap implied by a required slot count.
    ///
    /// # Example
    ///
    /// ```
    /// use front_desk_scheduler::config::RuleConfig;
    ///
    /// let rules = RuleConfig::default();
    /// assert_eq!(rules.rookie_cap(1), None);
    /// assert_eq!(rules.rookie_cap(2), Some(1));
    /// assert_eq!(rules.rookie_cap(3), Some(2));
    /// assert_eq!(rules.rookie_cap(4), Some(2));
    /// assert_eq!(rules.rookie_cap(5), None);
    /// ```
    pub fn rookie_cap(&self, required_slots: u32) -> Option<u32> {
        self.rookie_caps.get(&required_slots).copied()
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            rookie_caps: default_rookie_caps(),
            rest_days: default_rest_days(),
            pm_only_band: default_pm_only_band(),
            balance_weekday: default_balance_weekday(),
        }
    }
}

/// Search limits handed to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Wall-clock budget for one solve, in seconds.
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: f64,
    /// Number of solver worker threads.
    #[serde(default = "default_threads")]
    pub threads: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit_secs(),
            threads: default_threads(),
        }
    }
}

/// The scheduler.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerFile {
    /// The inclusive target period.
    pub horizon: SchedulingPeriod,
    /// Group concurrency limits.
    #[serde(default)]
    pub group_limits: GroupLimits,
    /// Objective weights.
    #[serde(default)]
    pub weights: ObjectiveWeights,
    /// Hard-rule parameters.
    #[serde(default)]
    pub rules: RuleConfig,
    /// Solver limits.
    #[serde(default)]
    pub solver: SolverSettings,
}

/// The holidays.yaml file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HolidaysFile {
    /// Public holidays excluded from the working-day list.
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}

/// The complete scheduler configuration.
///
/// Passed explicitly into the model builder so each run is computed from its
/// own parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerConfig {
    /// The inclusive target period.
    pub horizon: SchedulingPeriod,
    /// Group concurrency limits.
    pub group_limits: GroupLimits,
    /// Objective weights.
    pub weights: ObjectiveWeights,
    /// Hard-rule parameters.
    pub rules: RuleConfig,
    /// Solver limits.
    pub solver: SolverSettings,
    /// Public holidays.
    pub holidays: Vec<PublicHoliday>,
}

impl SchedulerConfig {
    /// Creates a configuration with default rules for the given horizon.
    pub fn default_for(horizon: SchedulingPeriod) -> Self {
        Self {
            horizon,
            group_limits: GroupLimits::default(),
            weights: ObjectiveWeights::default(),
            rules: RuleConfig::default(),
            solver: SolverSettings::default(),
            holidays: Vec::new(),
        }
    }

    /// Builds the working-day calendar from the configured holidays.
    pub fn calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(&self.holidays)
    }
}

fn default_group_limit() -> u32 {
    1
}

fn default_shortfall_weight() -> f64 {
    1000.0
}

fn default_fairness_weight() -> f64 {
    10.0
}

fn default_weekday_balance_weight() -> f64 {
    3.0
}

fn default_am_pm_balance_weight() -> f64 {
    1.0
}

fn default_rookie_caps() -> BTreeMap<u32, u32> {
    BTreeMap::from([(2, 1), (3, 2), (4, 2)])
}

fn default_rest_days() -> usize {
    2
}

fn default_pm_only_band() -> AssignmentBand {
    AssignmentBand { min: 7, max: 8 }
}

fn default_balance_weekday() -> Weekday {
    Weekday::Fri
}

fn default_time_limit_secs() -> f64 {
    60.0
}

fn default_threads() -> u32 {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_file_defaults() {
        let yaml = "horizon:\n  start: 2026-01-05\n  end: 2026-02-28\n";
        let file: SchedulerFile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(file.group_limits.default, 1);
        assert!(file.group_limits.overrides.is_empty());
        assert_eq!(file.weights.shortfall, 1000.0);
        assert_eq!(file.weights.fairness, 10.0);
        assert_eq!(file.weights.weekday_balance, 3.0);
        assert_eq!(file.weights.am_pm_balance, 1.0);
        assert_eq!(file.rules.rest_days, 2);
        assert_eq!(file.rules.pm_only_band, AssignmentBand { min: 7, max: 8 });
        assert_eq!(file.rules.balance_weekday, Weekday::Fri);
        assert_eq!(file.solver.time_limit_secs, 60.0);
        assert_eq!(file.solver.threads, 8);
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let yaml = r#"
horizon:
  start: 2026-01-05
  end: 2026-01-30
group_limits:
  overrides:
    D: 2
weights:
  fairness: 20
rules:
  rookie_caps:
    2: 1
  balance_weekday: Mon
"#;
        let file: SchedulerFile = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(file.group_limits.limit_for("D"), 2);
        assert_eq!(file.group_limits.limit_for("E"), 1);
        assert_eq!(file.weights.fairness, 20.0);
        assert_eq!(file.weights.shortfall, 1000.0);
        assert_eq!(file.rules.rookie_cap(2), Some(1));
        assert_eq!(file.rules.rookie_cap(3), None);
        assert_eq!(file.rules.rest_days, 2);
        assert_eq!(file.rules.balance_weekday, Weekday::Mon);
    }

    #[test]
    fn test_assignment_band_contains() {
        let band = AssignmentBand { min: 7, max: 8 };
        assert!(!band.contains(6));
        assert!(band.contains(7));
        assert!(band.contains(8));
        assert!(!band.contains(9));
    }

    #[test]
    fn test_holidays_file_parses_dates() {
        let yaml = "holidays:\n  - date: 2026-01-12\n    name: Coming of Age Day\n";
        let file: HolidaysFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.holidays.len(), 1);
        assert_eq!(file.holidays[0].name, "Coming of Age Day");
    }
}
