//! Greedy daily shift assignment.
//!
//! Days are processed in order. Each day the available employees are
//! shuffled with the run's seeded generator, then every shift kind is filled
//! in priority order from the candidates who have worked that shift least,
//! then worked least overall, then by a seeded tiebreak value drawn once per
//! candidate before sorting.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::domain::{
    AssignmentState, CapacityWarning, Employee, EmployeeSummary, Rota, RotaConfig, ShiftKind,
    MAX_ROSTER,
};
use crate::error::{Result, RotaError};
use crate::weekly_off::WeeklyOffSchedule;

/// Resolves one cell from what happened to it today.
///
/// Mandatory rest wins over a shift, and a shift wins over the residual
/// Unassigned state.
pub fn resolve_cell(on_rest: bool, assigned: Option<ShiftKind>) -> AssignmentState {
    match (on_rest, assigned) {
        (true, _) => AssignmentState::WeeklyOff,
        (false, Some(kind)) => AssignmentState::Shift(kind),
        (false, None) => AssignmentState::Unassigned,
    }
}

/// Per-employee memory carried from one day to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningCounters {
    /// Most recent state other than Unassigned.
    last_state: Option<AssignmentState>,
    shift_counts: BTreeMap<ShiftKind, usize>,
    total: usize,
    weekly_offs: usize,
}

impl RunningCounters {
    pub fn new(shifts: &[ShiftKind]) -> Self {
        Self {
            last_state: None,
            shift_counts: shifts.iter().map(|kind| (*kind, 0)).collect(),
            total: 0,
            weekly_offs: 0,
        }
    }

    pub fn count(&self, kind: ShiftKind) -> usize {
        self.shift_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn last_state(&self) -> Option<AssignmentState> {
        self.last_state
    }

    /// Whether the continuity rule keeps this employee off `kind` today.
    pub fn blocked_from(&self, kind: ShiftKind, avoid_night_to_morning: bool) -> bool {
        avoid_night_to_morning
            && kind == ShiftKind::Morning
            && self.last_state == Some(AssignmentState::Shift(ShiftKind::Night))
    }

    /// Folds a finalized day into the counters.
    pub fn record(&mut self, state: AssignmentState) {
        match state {
            AssignmentState::Shift(kind) => {
                *self.shift_counts.entry(kind).or_insert(0) += 1;
                self.total += 1;
                self.last_state = Some(state);
            }
            AssignmentState::WeeklyOff => {
                self.weekly_offs += 1;
                self.last_state = Some(state);
            }
            // a gap day leaves the previous shift in memory
            AssignmentState::Unassigned => {}
        }
    }

    pub fn into_summary(self) -> EmployeeSummary {
        EmployeeSummary {
            shift_counts: self.shift_counts,
            total_assignments: self.total,
            weekly_offs: self.weekly_offs,
        }
    }
}

/// A validated rota run: a roster plus its configuration.
#[derive(Debug, Clone)]
pub struct RotaAssigner {
    employees: Vec<Employee>,
    config: RotaConfig,
}

impl RotaAssigner {
    /// Validates inputs. Nothing is allocated for the grid until [`assign`].
    ///
    /// [`assign`]: RotaAssigner::assign
    pub fn new(employees: Vec<Employee>, config: RotaConfig) -> Result<Self> {
        if employees.is_empty() {
            return Err(RotaError::EmptyRoster);
        }
        if employees.len() > MAX_ROSTER {
            return Err(RotaError::invalid(format!(
                "roster must have at most {} employees, got {}",
                MAX_ROSTER,
                employees.len()
            )));
        }
        config.validate()?;
        Ok(Self { employees, config })
    }

    pub fn from_names(
        names: impl IntoIterator<Item = impl Into<String>>,
        config: RotaConfig,
    ) -> Result<Self> {
        Self::new(Employee::roster(names), config)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn config(&self) -> &RotaConfig {
        &self.config
    }

    /// Runs the assignment. Identical inputs always give an identical rota.
    pub fn assign(&self) -> Rota {
        let config = &self.config;
        let n = self.employees.len();
        let dates = config.dates();
        let required = config.slots_per_day();

        let mut rng = StdRng::seed_from_u64(config.seed);
        let offs = WeeklyOffSchedule::compute(n, &dates, &config.weekly_off_mode, &mut rng);

        let mut grid: Vec<Vec<AssignmentState>> = vec![Vec::with_capacity(dates.len()); n];
        let mut counters: Vec<RunningCounters> =
            (0..n).map(|_| RunningCounters::new(&config.shifts)).collect();
        let mut warnings = Vec::new();

        for (day, date) in dates.iter().enumerate() {
            let mut pool = offs.available_on(day);

            if pool.len() < required {
                let warning = CapacityWarning {
                    day,
                    date: *date,
                    available: pool.len(),
                    required,
                };
                debug!(%warning, "Capacity shortfall");
                warnings.push(warning);
            }

            let mut assigned_today: Vec<Option<ShiftKind>> = vec![None; n];

            if !pool.is_empty() {
                pool.shuffle(&mut rng);

                for &kind in &config.shifts {
                    let mut candidates: Vec<((usize, usize, u64), usize)> = pool
                        .iter()
                        .copied()
                        .filter(|&e| assigned_today[e].is_none())
                        .filter(|&e| !counters[e].blocked_from(kind, config.avoid_night_to_morning))
                        .map(|e| {
                            let key = (counters[e].count(kind), counters[e].total(), rng.gen::<u64>());
                            (key, e)
                        })
                        .collect();
                    candidates.sort_by_key(|(key, _)| *key);

                    for (_, e) in candidates.into_iter().take(config.max_per_shift) {
                        assigned_today[e] = Some(kind);
                    }
                }
            }

            for e in 0..n {
                let state = resolve_cell(offs.is_off(e, day), assigned_today[e]);
                grid[e].push(state);
                counters[e].record(state);
            }
        }

        info!(
            employees = n,
            days = dates.len(),
            seed = config.seed,
            warnings = warnings.len(),
            "Rota generated"
        );

        Rota {
            employees: self.employees.clone(),
            dates,
            shifts: config.shifts.clone(),
            grid,
            summaries: counters.into_iter().map(RunningCounters::into_summary).collect(),
            warnings,
        }
    }
}

/// Validates and runs in one step.
pub fn generate(employees: Vec<Employee>, config: RotaConfig) -> Result<Rota> {
    Ok(RotaAssigner::new(employees, config)?.assign())
}
