//! Constraint model construction.
//!
//! Builds the mixed-integer model for one scheduling run: decision variables,
//! slot coverage with shortfall slack, rookie and group caps, one duty per
//! day, rest spacing, per-staff totals, and the linearized fairness terms of
//! the weighted objective. Building has no side effects beyond logging risk
//! warnings; the model is handed to [`solve_model`](super::solve_model).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::models::{
    DayRequirement, Period, RiskCode, RiskWarning, SchedulingInput, StaffId, StaffMember,
};

use super::availability::AvailabilityMap;

/// Key of one (date, period) duty slot.
pub type SlotKey = (NaiveDate, Period);

/// Key of one staff member's duty in one slot.
pub type AssignmentKey = (StaffId, NaiveDate, Period);

/// A fully built model, ready to solve.
pub struct DutyModel {
    pub(crate) variables: ProblemVariables,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Expression,
    pub(crate) assignments: BTreeMap<AssignmentKey, Variable>,
    pub(crate) shortfalls: BTreeMap<SlotKey, Variable>,
    pub(crate) worked: BTreeMap<(StaffId, NaiveDate), Variable>,
    pub(crate) totals: BTreeMap<StaffId, Variable>,
    pub(crate) risk_warnings: Vec<RiskWarning>,
    pub(crate) pm_only_staff: Vec<StaffId>,
}

impl DutyModel {
    /// Returns the assignment variable for a staff member and slot.
    ///
    /// `None` means the staff member is unavailable there: no variable is
    /// created, so the assignment is structurally impossible.
    pub fn assignment_var(&self, staff_id: StaffId, date: NaiveDate, period: Period) -> Option<Variable> {
        self.assignments.get(&(staff_id, date, period)).copied()
    }

    /// Returns every assignment variable keyed by (staff, date, period).
    pub fn assignment_vars(&self) -> &BTreeMap<AssignmentKey, Variable> {
        &self.assignments
    }

    /// Returns the shortfall slack variable of every slot.
    pub fn shortfall_vars(&self) -> &BTreeMap<SlotKey, Variable> {
        &self.shortfalls
    }

    /// Returns the "worked that day" variable for a staff member and date.
    pub fn worked_var(&self, staff_id: StaffId, date: NaiveDate) -> Option<Variable> {
        self.worked.get(&(staff_id, date)).copied()
    }

    /// Returns the total-duties variable of a staff member.
    pub fn total_var(&self, staff_id: StaffId) -> Option<Variable> {
        self.totals.get(&staff_id).copied()
    }

    /// Returns the number of constraints in the model.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Returns the risk warnings raised while building.
    pub fn risk_warnings(&self) -> &[RiskWarning] {
        &self.risk_warnings
    }

    /// Returns the staff held to the afternoon-only band.
    pub fn pm_only_staff(&self) -> &[StaffId] {
        &self.pm_only_staff
    }
}

/// Builds a [`DutyModel`] from a configuration.
///
/// # Example
///
/// ```
/// use front_desk_scheduler::config::SchedulerConfig;
/// use front_desk_scheduler::models::{DayRequirement, Period, SchedulingInput, SchedulingPeriod, StaffMember};
/// use front_desk_scheduler::scheduling::{resolve_availability, ModelBuilder};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
/// let config = SchedulerConfig::default_for(SchedulingPeriod { start_date: date, end_date: date });
/// let input = SchedulingInput {
///     staff: vec![StaffMember {
///         staff_id: 1,
///         name: "Aoki".to_string(),
///         group: "A".to_string(),
///         am_ok: true,
///         pm_ok: false,
///         rookie: false,
///     }],
///     days: vec![DayRequirement { date, am_slots: 1, pm_slots: 1, busy: false }],
///     overrides: vec![],
/// };
///
/// let availability = resolve_availability(&input.staff, &input.days, &input.overrides);
/// let model = ModelBuilder::new(&config).build(&input, &availability);
/// assert!(model.assignment_var(1, date, Period::Am).is_some());
/// assert!(model.assignment_var(1, date, Period::Pm).is_none());
/// ```
pub struct ModelBuilder<'a> {
    config: &'a SchedulerConfig,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder for the given configuration.
    pub fn new(config: &'a SchedulerConfig) -> Self {
        Self { config }
    }

    /// Builds the model for an input and its resolved availability.
    pub fn build(&self, input: &SchedulingInput, availability: &AvailabilityMap) -> DutyModel {
        let mut state = BuildState::new(input);

        self.add_coverage(&mut state, input, availability);
        self.add_daily_limits(&mut state, input);
        self.add_group_caps(&mut state, input);
        self.add_rest_spacing(&mut state, input);
        self.add_totals(&mut state, input);

        let fairness_gap = self.add_fairness_gap(&mut state, input);
        let am_pm_imbalance = self.add_am_pm_balance(&mut state, input);
        let weekday_gap = self.add_weekday_balance(&mut state, input);

        let weights = &self.config.weights;
        let total_shortfall: Expression = state.shortfalls.values().copied().sum();
        let mut objective = weights.shortfall * total_shortfall
            + weights.fairness * fairness_gap
            + weights.am_pm_balance * am_pm_imbalance;
        if let Some(gap) = weekday_gap {
            objective += weights.weekday_balance * gap;
        }

        debug!(
            available = availability.available_count(),
            assignment_vars = state.assignments.len(),
            constraints = state.constraints.len(),
            risk_warnings = state.risk_warnings.len(),
            "Model built"
        );

        DutyModel {
            variables: state.variables,
            constraints: state.constraints,
            objective,
            assignments: state.assignments,
            shortfalls: state.shortfalls,
            worked: state.worked,
            totals: state.totals,
            risk_warnings: state.risk_warnings,
            pm_only_staff: state.pm_only_staff,
        }
    }

    /// Assignment variables, coverage equations and rookie caps.
    fn add_coverage(&self, state: &mut BuildState, input: &SchedulingInput, availability: &AvailabilityMap) {
        let slack_cap = input.max_slots();

        for day in &input.days {
            for period in Period::ALL {
                let required = day.required(period);
                let mut covered = Vec::new();
                for member in &input.staff {
                    if !availability.is_available(member.staff_id, day.date, period) {
                        continue;
                    }
                    let var = state.variables.add(
                        variable()
                            .binary()
                            .name(format!("x_s{}_{}_{}", member.staff_id, day.date, period)),
                    );
                    state.assignments.insert((member.staff_id, day.date, period), var);
                    covered.push((member, var));
                }

                let slack = state.variables.add(
                    variable()
                        .integer()
                        .min(0)
                        .max(required.max(slack_cap))
                        .name(format!("slack_{}_{}", day.date, period)),
                );
                state.shortfalls.insert((day.date, period), slack);

                let filled: Expression = covered.iter().map(|(_, var)| *var).sum();
                state
                    .constraints
                    .push(constraint!(filled + slack == f64::from(required)));

                self.add_rookie_cap(state, day, period, &covered);
            }
        }
    }

    fn add_rookie_cap(
        &self,
        state: &mut BuildState,
        day: &DayRequirement,
        period: Period,
        covered: &[(&StaffMember, Variable)],
    ) {
        let required = day.required(period);
        let Some(cap) = self.config.rules.rookie_cap(required) else {
            return;
        };
        if !state.has_rookies {
            return;
        }

        let rookie_vars: Vec<Variable> = covered
            .iter()
            .filter(|(member, _)| member.rookie)
            .map(|(_, var)| *var)
            .collect();
        if !rookie_vars.is_empty() {
            let rookies_on_slot: Expression = rookie_vars.into_iter().sum();
            state
                .constraints
                .push(constraint!(rookies_on_slot <= f64::from(cap)));
        }

        // Coarse check only: staff reserved by other constraints are not considered.
        let experienced_needed = required.saturating_sub(cap) as usize;
        let experienced_available = covered.iter().filter(|(member, _)| !member.rookie).count();
        if experienced_available < experienced_needed {
            let message = format!(
                "Insufficient experienced staff for {} {}: need {}, have {}.",
                day.date, period, experienced_needed, experienced_available
            );
            warn!(date = %day.date, period = %period, "{message}");
            state.risk_warnings.push(RiskWarning {
                code: RiskCode::RookieSupervision,
                message,
                date: Some(day.date),
                period: Some(period),
            });
        }
    }

    /// One duty per staff member per day, tied to the "worked that day" variable.
    fn add_daily_limits(&self, state: &mut BuildState, input: &SchedulingInput) {
        for day in &input.days {
            for member in &input.staff {
                let worked = state.variables.add(
                    variable()
                        .binary()
                        .name(format!("day_s{}_{}", member.staff_id, day.date)),
                );
                state.worked.insert((member.staff_id, day.date), worked);

                let period_vars: Vec<Variable> = Period::ALL
                    .iter()
                    .filter_map(|p| state.assignments.get(&(member.staff_id, day.date, *p)).copied())
                    .collect();
                if period_vars.is_empty() {
                    state.constraints.push(constraint!(worked == 0));
                    continue;
                }

                let duties: Expression = period_vars.into_iter().sum();
                state.constraints.push(constraint!(duties.clone() <= 1));
                state.constraints.push(constraint!(worked == duties));
            }
        }
    }

    /// Per-group concurrency limits on every slot.
    fn add_group_caps(&self, state: &mut BuildState, input: &SchedulingInput) {
        let mut groups: BTreeMap<&str, Vec<StaffId>> = BTreeMap::new();
        for member in &input.staff {
            groups.entry(member.group.as_str()).or_default().push(member.staff_id);
        }

        for day in &input.days {
            for period in Period::ALL {
                for (group, members) in &groups {
                    let in_group: Vec<Variable> = members
                        .iter()
                        .filter_map(|id| state.assignments.get(&(*id, day.date, period)).copied())
                        .collect();
                    if in_group.is_empty() {
                        continue;
                    }
                    let limit = self.config.group_limits.limit_for(group);
                    let on_slot: Expression = in_group.into_iter().sum();
                    state.constraints.push(constraint!(on_slot <= f64::from(limit)));
                }
            }
        }
    }

    /// Blocks the next `rest_days` working days after any duty.
    ///
    /// Spacing follows the order of the working-day list, so weekends and
    /// holidays never count as rest days.
    fn add_rest_spacing(&self, state: &mut BuildState, input: &SchedulingInput) {
        let dates = input.working_dates();
        let rest_days = self.config.rules.rest_days;

        for member in &input.staff {
            for (i, day_i) in dates.iter().enumerate() {
                let Some(worked_i) = state.worked.get(&(member.staff_id, *day_i)).copied() else {
                    continue;
                };
                for day_j in dates.iter().skip(i + 1).take(rest_days) {
                    if let Some(worked_j) = state.worked.get(&(member.staff_id, *day_j)).copied() {
                        state.constraints.push(constraint!(worked_i + worked_j <= 1));
                    }
                }
            }
        }
    }

    /// Per-staff totals and the afternoon-only band.
    fn add_totals(&self, state: &mut BuildState, input: &SchedulingInput) {
        let band = self.config.rules.pm_only_band;
        let max_duties = state.max_duties;

        for member in &input.staff {
            let total = state.variables.add(
                variable()
                    .integer()
                    .min(0)
                    .max(max_duties)
                    .name(format!("total_s{}", member.staff_id)),
            );
            state.totals.insert(member.staff_id, total);

            let duties: Expression = state
                .assignments
                .range((member.staff_id, NaiveDate::MIN, Period::Am)..=(member.staff_id, NaiveDate::MAX, Period::Pm))
                .map(|(_, var)| *var)
                .sum();
            state.constraints.push(constraint!(total == duties));

            if member.is_pm_only() {
                state.pm_only_staff.push(member.staff_id);
                state.constraints.push(constraint!(total >= f64::from(band.min)));
                state.constraints.push(constraint!(total <= f64::from(band.max)));
                self.check_pm_only_reach(state, input, member);
            }
        }
    }

    /// Warns when an afternoon-only staff member obviously cannot reach the band.
    fn check_pm_only_reach(&self, state: &mut BuildState, input: &SchedulingInput, member: &StaffMember) {
        let band = self.config.rules.pm_only_band;
        let workable_days = input
            .days
            .iter()
            .filter(|d| {
                Period::ALL
                    .iter()
                    .any(|p| state.assignments.contains_key(&(member.staff_id, d.date, *p)))
            })
            .count();
        let spacing_cap = input.days.len().div_ceil(self.config.rules.rest_days + 1);
        let reachable = workable_days.min(spacing_cap);

        if reachable < band.min as usize {
            let message = format!(
                "Afternoon-only staff {} ({}) can reach at most {} duties, below the {}-{} band.",
                member.staff_id, member.name, reachable, band.min, band.max
            );
            warn!(staff_id = member.staff_id, "{message}");
            state.risk_warnings.push(RiskWarning {
                code: RiskCode::PmOnlyBand,
                message,
                date: None,
                period: None,
            });
        }
    }

    /// Spread between the busiest and idlest staff member.
    fn add_fairness_gap(&self, state: &mut BuildState, input: &SchedulingInput) -> Variable {
        let max_duties = state.max_duties;
        let max_total = state
            .variables
            .add(variable().integer().min(0).max(max_duties).name("max_assignments"));
        let min_total = state
            .variables
            .add(variable().integer().min(0).max(max_duties).name("min_assignments"));

        for member in &input.staff {
            if let Some(total) = state.totals.get(&member.staff_id).copied() {
                state.constraints.push(constraint!(total <= max_total));
                state.constraints.push(constraint!(total >= min_total));
            }
        }

        let gap = state
            .variables
            .add(variable().integer().min(0).max(max_duties).name("fairness_gap"));
        state.constraints.push(constraint!(gap == max_total - min_total));
        gap
    }

    /// Sum of |AM duties - PM duties| over staff eligible for both periods.
    fn add_am_pm_balance(&self, state: &mut BuildState, input: &SchedulingInput) -> Expression {
        let day_count = input.days.len() as f64;
        let mut imbalance = Expression::from(0.0);

        for member in input.staff.iter().filter(|m| m.is_flexible()) {
            let mut am_duties = Expression::from(0.0);
            let mut pm_duties = Expression::from(0.0);
            for day in &input.days {
                if let Some(var) = state.assignments.get(&(member.staff_id, day.date, Period::Am)) {
                    am_duties += *var;
                }
                if let Some(var) = state.assignments.get(&(member.staff_id, day.date, Period::Pm)) {
                    pm_duties += *var;
                }
            }

            let diff = state.variables.add(
                variable()
                    .integer()
                    .min(0)
                    .max(day_count)
                    .name(format!("ampm_diff_s{}", member.staff_id)),
            );
            state
                .constraints
                .push(constraint!(am_duties.clone() - pm_duties.clone() <= diff));
            state.constraints.push(constraint!(pm_duties - am_duties <= diff));
            imbalance += diff;
        }

        imbalance
    }

    /// Spread of per-staff duties on the balance weekday.
    ///
    /// Returns `None` when the horizon has no such weekday.
    fn add_weekday_balance(&self, state: &mut BuildState, input: &SchedulingInput) -> Option<Variable> {
        let weekday = self.config.rules.balance_weekday;
        let dates: Vec<NaiveDate> = input
            .days
            .iter()
            .map(|d| d.date)
            .filter(|d| d.weekday() == weekday)
            .collect();
        if dates.is_empty() {
            return None;
        }

        let cap = dates.len() as f64;
        let max_count = state
            .variables
            .add(variable().integer().min(0).max(cap).name("max_weekday_assignments"));
        let min_count = state
            .variables
            .add(variable().integer().min(0).max(cap).name("min_weekday_assignments"));

        for member in &input.staff {
            let on_weekday: Expression = dates
                .iter()
                .filter_map(|d| state.worked.get(&(member.staff_id, *d)).copied())
                .sum();
            state
                .constraints
                .push(constraint!(on_weekday.clone() <= max_count));
            state.constraints.push(constraint!(on_weekday >= min_count));
        }

        let gap = state
            .variables
            .add(variable().integer().min(0).max(cap).name("weekday_gap"));
        state.constraints.push(constraint!(gap == max_count - min_count));
        Some(gap)
    }
}

/// Mutable state threaded through the build steps.
struct BuildState {
    variables: ProblemVariables,
    constraints: Vec<Constraint>,
    assignments: BTreeMap<AssignmentKey, Variable>,
    shortfalls: BTreeMap<SlotKey, Variable>,
    worked: BTreeMap<(StaffId, NaiveDate), Variable>,
    totals: BTreeMap<StaffId, Variable>,
    risk_warnings: Vec<RiskWarning>,
    pm_only_staff: Vec<StaffId>,
    has_rookies: bool,
    max_duties: f64,
}

impl BuildState {
    fn new(input: &SchedulingInput) -> Self {
        let rookies: BTreeSet<StaffId> = input
            .staff
            .iter()
            .filter(|m| m.rookie)
            .map(|m| m.staff_id)
            .collect();

        Self {
            variables: ProblemVariables::new(),
            constraints: Vec::new(),
            assignments: BTreeMap::new(),
            shortfalls: BTreeMap::new(),
            worked: BTreeMap::new(),
            totals: BTreeMap::new(),
            risk_warnings: Vec::new(),
            pm_only_staff: Vec::new(),
            has_rookies: !rookies.is_empty(),
            max_duties: (input.days.len() * Period::ALL.len()) as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityOverride, SchedulingPeriod};
    use crate::scheduling::resolve_availability;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn create_config() -> SchedulerConfig {
        SchedulerConfig::default_for(SchedulingPeriod {
            start_date: date(5),
            end_date: date(30),
        })
    }

    fn create_staff(staff_id: StaffId, group: &str, am_ok: bool, pm_ok: bool, rookie: bool) -> StaffMember {
        StaffMember {
            staff_id,
            name: format!("staff_{staff_id}"),
            group: group.to_string(),
            am_ok,
            pm_ok,
            rookie,
        }
    }

    fn create_day(day: u32, am_slots: u32, pm_slots: u32) -> DayRequirement {
        DayRequirement {
            date: date(day),
            am_slots,
            pm_slots,
            busy: false,
        }
    }

    fn build(config: &SchedulerConfig, input: &SchedulingInput) -> DutyModel {
        let availability = resolve_availability(&input.staff, &input.days, &input.overrides);
        ModelBuilder::new(config).build(input, &availability)
    }

    #[test]
    fn test_no_variable_for_unavailable_slot() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", true, true, false)],
            days: vec![create_day(5, 1, 1), create_day(6, 1, 1)],
            overrides: vec![AvailabilityOverride {
                staff_id: 1,
                date: date(6),
                am_ok: Some(false),
                pm_ok: None,
                note: "leave".to_string(),
            }],
        };

        let model = build(&create_config(), &input);

        assert!(model.assignment_var(1, date(5), Period::Am).is_some());
        assert!(model.assignment_var(1, date(6), Period::Am).is_none());
        assert!(model.assignment_var(1, date(6), Period::Pm).is_some());
        assert_eq!(model.assignment_vars().len(), 3);
    }

    #[test]
    fn test_one_slack_and_worked_var_per_slot_and_day() {
        let input = SchedulingInput {
            staff: vec![
                create_staff(1, "A", true, true, false),
                create_staff(2, "B", true, false, false),
            ],
            days: vec![create_day(5, 1, 1), create_day(6, 2, 0), create_day(7, 0, 1)],
            overrides: vec![],
        };

        let model = build(&create_config(), &input);

        assert_eq!(model.shortfall_vars().len(), 6);
        for day in [5, 6, 7] {
            assert!(model.worked_var(1, date(day)).is_some());
            assert!(model.worked_var(2, date(day)).is_some());
        }
        assert!(model.total_var(1).is_some());
        assert!(model.total_var(3).is_none());
    }

    #[test]
    fn test_rookie_warning_when_experienced_staff_short() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", true, false, true)],
            days: vec![create_day(5, 2, 0)],
            overrides: vec![],
        };

        let model = build(&create_config(), &input);

        let warnings = model.risk_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, RiskCode::RookieSupervision);
        assert_eq!(warnings[0].date, Some(date(5)));
        assert_eq!(warnings[0].period, Some(Period::Am));
        assert!(warnings[0].message.contains("need 1, have 0"));
    }

    #[test]
    fn test_no_rookie_warning_without_rookies() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", true, false, false)],
            days: vec![create_day(5, 3, 0)],
            overrides: vec![],
        };

        let model = build(&create_config(), &input);

        assert!(model.risk_warnings().is_empty());
    }

    #[test]
    fn test_no_rookie_warning_for_uncapped_slot_count() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", true, false, true)],
            days: vec![create_day(5, 1, 0)],
            overrides: vec![],
        };

        let model = build(&create_config(), &input);

        assert!(model.risk_warnings().is_empty());
    }

    #[test]
    fn test_pm_only_staff_are_am_ineligible() {
        let input = SchedulingInput {
            staff: vec![
                create_staff(1, "A", false, true, false),
                create_staff(2, "A", true, false, false),
                create_staff(3, "B", true, true, false),
            ],
            days: (5..=9).map(|d| create_day(d, 1, 1)).collect(),
            overrides: vec![],
        };

        let model = build(&create_config(), &input);

        assert_eq!(model.pm_only_staff().to_vec(), vec![1]);
    }

    #[test]
    fn test_pm_only_band_risk_for_short_horizon() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", false, true, false)],
            days: (5..=9).map(|d| create_day(d, 0, 1)).collect(),
            overrides: vec![],
        };

        let model = build(&create_config(), &input);

        let warnings = model.risk_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, RiskCode::PmOnlyBand);
        // five working days with two rest days allow two duties at most
        assert!(warnings[0].message.contains("at most 2 duties"));
    }

    #[test]
    fn test_rest_spacing_constraint_count() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", true, true, false)],
            days: (5..=9).map(|d| create_day(d, 1, 1)).collect(),
            overrides: vec![],
        };
        let mut config = create_config();

        config.rules.rest_days = 0;
        let without_spacing = build(&config, &input).constraint_count();
        config.rules.rest_days = 2;
        let with_spacing = build(&config, &input).constraint_count();

        // pairs (i, i+1) and (i, i+2) over five days: 4 + 3
        assert_eq!(with_spacing - without_spacing, 7);
    }

    #[test]
    fn test_weekday_balance_omitted_without_matching_days() {
        let input = SchedulingInput {
            staff: vec![create_staff(1, "A", true, true, false)],
            // Monday to Thursday
            days: (5..=8).map(|d| create_day(d, 1, 1)).collect(),
            overrides: vec![],
        };
        let config = create_config();

        // per day: 2 coverage + 2 daily + 2 group caps; spacing 3 + 2;
        // totals 1; fairness 3; am/pm balance 2
        assert_eq!(build(&config, &input).constraint_count(), 35);

        let mut with_friday = input.clone();
        with_friday.days.push(create_day(9, 1, 1));

        // one more day (6), two more spacing pairs, weekday balance (2 + 1)
        assert_eq!(build(&config, &with_friday).constraint_count(), 46);
    }
}
