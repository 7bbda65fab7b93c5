//! Domain model for the shift rota.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{Result, RotaError};

/// Longest horizon a single run accepts.
pub const MAX_DAYS: usize = 731;

/// Largest roster a single run accepts.
pub const MAX_ROSTER: usize = 500;

/// An employee on the roster.
///
/// Names are taken verbatim and are not required to be unique; two rows with
/// the same name are still two distinct rota rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Position of this employee in the roster, matching its grid row.
    pub index: usize,
    pub name: String,
}

impl Employee {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }

    /// Builds a roster from names, preserving their order.
    pub fn roster(names: impl IntoIterator<Item = impl Into<String>>) -> Vec<Employee> {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Employee::new(i, name))
            .collect()
    }
}

/// A kind of shift. Filled each day in the order configured on the rota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShiftKind {
    Morning,
    Afternoon,
    Night,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "Morning",
            ShiftKind::Afternoon => "Afternoon",
            ShiftKind::Night => "Night",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShiftKind {
    type Err = RotaError;

    /// Accepts full names and the single-letter codes used on printed rotas
    /// (`M`, `E`/`A`, `N`). Evening is treated as Afternoon.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MORNING" => Ok(ShiftKind::Morning),
            "A" | "E" | "AFTERNOON" | "EVENING" => Ok(ShiftKind::Afternoon),
            "N" | "NIGHT" => Ok(ShiftKind::Night),
            other => Err(RotaError::invalid(format!("unknown shift kind '{}'", other))),
        }
    }
}

/// The final state of one (employee, day) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentState {
    Shift(ShiftKind),
    WeeklyOff,
    Unassigned,
}

impl AssignmentState {
    pub const WEEKLY_OFF_LABEL: &'static str = "Weekly Off";
    pub const UNASSIGNED_LABEL: &'static str = "Unassigned";

    pub fn label(&self) -> &'static str {
        match self {
            AssignmentState::Shift(kind) => kind.as_str(),
            AssignmentState::WeeklyOff => Self::WEEKLY_OFF_LABEL,
            AssignmentState::Unassigned => Self::UNASSIGNED_LABEL,
        }
    }

    pub fn shift(&self) -> Option<ShiftKind> {
        match self {
            AssignmentState::Shift(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How mandatory rest days are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeeklyOffMode {
    /// One rest day per employee per 7-day block, rotated by a seeded offset.
    Staggered,
    /// Every employee rests on each of these weekdays.
    FixedWeekdays(HashSet<Weekday>),
}

impl WeeklyOffMode {
    pub fn fixed(weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        WeeklyOffMode::FixedWeekdays(weekdays.into_iter().collect())
    }

    /// Saturday and Sunday off for everyone.
    pub fn weekends() -> Self {
        Self::fixed([Weekday::Sat, Weekday::Sun])
    }
}

/// Parameters of one rota run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaConfig {
    pub start_date: NaiveDate,
    pub num_days: usize,
    /// Capacity of each shift on each day.
    pub max_per_shift: usize,
    pub weekly_off_mode: WeeklyOffMode,
    /// Forbid a Morning shift straight after a Night shift.
    pub avoid_night_to_morning: bool,
    pub seed: u64,
    /// Shifts filled each day, in priority order.
    pub shifts: Vec<ShiftKind>,
}

impl RotaConfig {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(start_date: NaiveDate, num_days: usize) -> Self {
        Self {
            start_date,
            num_days,
            max_per_shift: 1,
            weekly_off_mode: WeeklyOffMode::Staggered,
            avoid_night_to_morning: true,
            seed: Self::DEFAULT_SEED,
            shifts: ShiftKind::ALL.to_vec(),
        }
    }

    /// Covers every day of the given calendar month.
    pub fn for_month(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| RotaError::invalid(format!("no such month: {}-{:02}", year, month)))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| RotaError::invalid(format!("month out of range: {}-{:02}", year, month)))?;

        let days = (next - first).num_days() as usize;
        Ok(Self::new(first, days))
    }

    pub fn with_max_per_shift(mut self, max_per_shift: usize) -> Self {
        self.max_per_shift = max_per_shift;
        self
    }

    pub fn with_weekly_off_mode(mut self, mode: WeeklyOffMode) -> Self {
        self.weekly_off_mode = mode;
        self
    }

    pub fn with_avoid_night_to_morning(mut self, enabled: bool) -> Self {
        self.avoid_night_to_morning = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shifts(mut self, shifts: impl IntoIterator<Item = ShiftKind>) -> Self {
        self.shifts = shifts.into_iter().collect();
        self
    }

    /// Checks everything that does not depend on the roster.
    pub fn validate(&self) -> Result<()> {
        if self.num_days == 0 {
            return Err(RotaError::invalid("num_days must be at least 1"));
        }
        if self.num_days > MAX_DAYS {
            return Err(RotaError::invalid(format!(
                "num_days must be at most {}, got {}",
                MAX_DAYS, self.num_days
            )));
        }
        if self.max_per_shift == 0 {
            return Err(RotaError::invalid("max_per_shift must be at least 1"));
        }
        if self.shifts.is_empty() {
            return Err(RotaError::invalid("at least one shift kind is required"));
        }
        let mut seen = HashSet::new();
        for kind in &self.shifts {
            if !seen.insert(*kind) {
                return Err(RotaError::invalid(format!("shift kind {} listed twice", kind)));
            }
        }
        if let WeeklyOffMode::FixedWeekdays(weekdays) = &self.weekly_off_mode {
            if weekdays.is_empty() {
                return Err(RotaError::invalid(
                    "fixed weekday mode needs at least one weekday, otherwise nobody ever rests",
                ));
            }
        }
        if self
            .start_date
            .checked_add_days(Days::new(self.num_days as u64 - 1))
            .is_none()
        {
            return Err(RotaError::invalid("horizon runs past the last representable date"));
        }
        Ok(())
    }

    /// Calendar dates of the horizon, in day order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.num_days as u64)
            .map_while(|offset| self.start_date.checked_add_days(Days::new(offset)))
            .collect()
    }

    /// Shift slots to fill on a day with full attendance.
    pub fn slots_per_day(&self) -> usize {
        self.max_per_shift.saturating_mul(self.shifts.len())
    }
}

/// Per-employee totals over the whole horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub shift_counts: BTreeMap<ShiftKind, usize>,
    pub total_assignments: usize,
    pub weekly_offs: usize,
}

/// A day on which the available staff could not fill every shift slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityWarning {
    pub day: usize,
    pub date: NaiveDate,
    pub available: usize,
    pub required: usize,
}

impl CapacityWarning {
    pub fn shortfall(&self) -> usize {
        self.required.saturating_sub(self.available)
    }
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} staff available for {} shift slots, short by {}",
            self.date.format("%Y-%m-%d"),
            self.date.weekday(),
            self.available,
            self.required,
            self.shortfall()
        )
    }
}

/// A finished rota: the employee x day grid plus summaries and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rota {
    pub employees: Vec<Employee>,
    pub dates: Vec<NaiveDate>,
    pub shifts: Vec<ShiftKind>,
    /// Row-major: `grid[employee][day]`.
    pub grid: Vec<Vec<AssignmentState>>,
    /// Indexed like `employees`.
    pub summaries: Vec<EmployeeSummary>,
    pub warnings: Vec<CapacityWarning>,
}

impl Rota {
    pub fn state(&self, employee: usize, day: usize) -> AssignmentState {
        self.grid[employee][day]
    }

    pub fn row(&self, employee: usize) -> &[AssignmentState] {
        &self.grid[employee]
    }

    pub fn num_days(&self) -> usize {
        self.dates.len()
    }

    /// Number of employees working `shift` on `day`.
    pub fn staffing(&self, day: usize, shift: ShiftKind) -> usize {
        self.grid
            .iter()
            .filter(|row| row[day] == AssignmentState::Shift(shift))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shift_kind_from_str() {
        assert_eq!("morning".parse::<ShiftKind>(), Ok(ShiftKind::Morning));
        assert_eq!("E".parse::<ShiftKind>(), Ok(ShiftKind::Afternoon));
        assert_eq!(" Night ".parse::<ShiftKind>(), Ok(ShiftKind::Night));
        assert!("O".parse::<ShiftKind>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(AssignmentState::Shift(ShiftKind::Night).label(), "Night");
        assert_eq!(AssignmentState::WeeklyOff.to_string(), "Weekly Off");
        assert_eq!(AssignmentState::Unassigned.to_string(), "Unassigned");
    }

    #[test]
    fn test_for_month_lengths() {
        assert_eq!(RotaConfig::for_month(2025, 2).unwrap().num_days, 28);
        assert_eq!(RotaConfig::for_month(2024, 2).unwrap().num_days, 29);
        let december = RotaConfig::for_month(2025, 12).unwrap();
        assert_eq!(december.num_days, 31);
        assert_eq!(december.start_date, date(2025, 12, 1));
        assert!(RotaConfig::for_month(2025, 13).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = RotaConfig::new(date(2025, 1, 1), 7);
        assert!(base.validate().is_ok());

        assert!(matches!(
            RotaConfig::new(date(2025, 1, 1), 0).validate(),
            Err(RotaError::InvalidConfiguration(_))
        ));
        assert!(base.clone().with_max_per_shift(0).validate().is_err());
        assert!(base.clone().with_shifts(Vec::new()).validate().is_err());
        assert!(base
            .clone()
            .with_shifts([ShiftKind::Night, ShiftKind::Night])
            .validate()
            .is_err());
        assert!(base
            .clone()
            .with_weekly_off_mode(WeeklyOffMode::fixed(Vec::new()))
            .validate()
            .is_err());
        assert!(RotaConfig::new(NaiveDate::MAX, 2).validate().is_err());
    }

    #[test]
    fn test_horizon_may_end_on_last_date() {
        let last = RotaConfig::new(NaiveDate::MAX, 1);
        assert!(last.validate().is_ok());
        assert_eq!(last.dates(), vec![NaiveDate::MAX]);
        let two_days = NaiveDate::MAX.pred_opt().unwrap();
        assert!(RotaConfig::new(two_days, 2).validate().is_ok());
        assert!(RotaConfig::new(two_days, 3).validate().is_err());
    }

    #[test]
    fn test_horizon_limit() {
        assert!(RotaConfig::new(date(2025, 1, 1), MAX_DAYS).validate().is_ok());
        let err = RotaConfig::new(date(2025, 1, 1), MAX_DAYS + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RotaError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_slots_per_day_saturates() {
        let config = RotaConfig::new(date(2025, 1, 1), 7).with_max_per_shift(usize::MAX);
        assert!(config.validate().is_ok());
        assert_eq!(config.slots_per_day(), usize::MAX);
    }

    #[test]
    fn test_dates_follow_start() {
        let config = RotaConfig::new(date(2024, 12, 30), 4);
        assert_eq!(
            config.dates(),
            vec![date(2024, 12, 30), date(2024, 12, 31), date(2025, 1, 1), date(2025, 1, 2)]
        );
    }

    #[test]
    fn test_capacity_warning_display() {
        let warning = CapacityWarning {
            day: 0,
            date: date(2025, 1, 4),
            available: 2,
            required: 3,
        };
        assert_eq!(warning.shortfall(), 1);
        assert_eq!(
            warning.to_string(),
            "2025-01-04 (Sat): 2 staff available for 3 shift slots, short by 1"
        );
    }
}
