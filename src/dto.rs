//! DTOs for REST API requests/responses.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::demo_data::{default_roster, MAX_DEFAULT_EMPLOYEES};
use crate::domain::{Employee, Rota, RotaConfig, ShiftKind, WeeklyOffMode, MAX_ROSTER};
use crate::error::{Result, RotaError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeeklyOffModeDto {
    #[default]
    Staggered,
    FixedWeekdays,
}

/// Request body for generating a rota.
///
/// The roster is either an explicit `employees` list or, when that is
/// absent, `employeeCount` placeholder names. The horizon is either
/// `startDate` + `numDays` or a whole `month` of a `year`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaRequestDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_per_shift: Option<i64>,
    #[serde(default)]
    pub weekly_off_mode: WeeklyOffModeDto,
    /// Weekday names, used with `fixedWeekdays`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub off_weekdays: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_night_to_morning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shifts: Option<Vec<String>>,
}

impl RotaRequestDto {
    pub fn from_domain(employees: &[Employee], config: &RotaConfig) -> Self {
        let (weekly_off_mode, mut off_weekdays) = match &config.weekly_off_mode {
            WeeklyOffMode::Staggered => (WeeklyOffModeDto::Staggered, Vec::new()),
            WeeklyOffMode::FixedWeekdays(days) => (
                WeeklyOffModeDto::FixedWeekdays,
                days.iter().copied().collect::<Vec<Weekday>>(),
            ),
        };
        off_weekdays.sort_by_key(|d| d.num_days_from_monday());

        Self {
            employees: Some(employees.iter().map(|e| e.name.clone()).collect()),
            employee_count: None,
            start_date: Some(config.start_date),
            num_days: Some(config.num_days as i64),
            month: None,
            year: None,
            max_per_shift: Some(config.max_per_shift as i64),
            weekly_off_mode,
            off_weekdays: off_weekdays.iter().map(weekday_name).map(String::from).collect(),
            avoid_night_to_morning: Some(config.avoid_night_to_morning),
            seed: Some(config.seed),
            shifts: Some(config.shifts.iter().map(|s| s.as_str().to_string()).collect()),
        }
    }

    /// Builds the roster and configuration, rejecting anything invalid.
    pub fn to_domain(&self) -> Result<(Vec<Employee>, RotaConfig)> {
        let employees = self.roster()?;

        let mut config = match (self.start_date, self.month, self.year) {
            (Some(start), _, _) => {
                let days = self
                    .num_days
                    .ok_or_else(|| RotaError::invalid("numDays is required with startDate"))?;
                RotaConfig::new(start, positive("numDays", days)?)
            }
            (None, Some(month), Some(year)) => RotaConfig::for_month(year, month)?,
            _ => {
                return Err(RotaError::invalid(
                    "either startDate and numDays, or month and year, must be given",
                ))
            }
        };

        if let Some(max) = self.max_per_shift {
            config.max_per_shift = positive("maxPerShift", max)?;
        }
        config.weekly_off_mode = match self.weekly_off_mode {
            WeeklyOffModeDto::Staggered => WeeklyOffMode::Staggered,
            WeeklyOffModeDto::FixedWeekdays => WeeklyOffMode::FixedWeekdays(
                self.off_weekdays
                    .iter()
                    .map(|name| parse_weekday(name))
                    .collect::<Result<_>>()?,
            ),
        };
        if let Some(avoid) = self.avoid_night_to_morning {
            config.avoid_night_to_morning = avoid;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(shifts) = &self.shifts {
            config.shifts = shifts
                .iter()
                .map(|s| s.parse::<ShiftKind>())
                .collect::<Result<_>>()?;
        }

        config.validate()?;
        Ok((employees, config))
    }

    fn roster(&self) -> Result<Vec<Employee>> {
        match (&self.employees, self.employee_count) {
            (Some(names), _) if names.is_empty() => Err(RotaError::EmptyRoster),
            (Some(names), _) if names.len() > MAX_ROSTER => Err(RotaError::invalid(format!(
                "employees must list at most {} names, got {}",
                MAX_ROSTER,
                names.len()
            ))),
            (Some(names), _) => Ok(Employee::roster(names.iter().cloned())),
            (None, Some(count)) if count <= 0 => Err(RotaError::EmptyRoster),
            (None, Some(count)) if (count as usize) > MAX_DEFAULT_EMPLOYEES => {
                Err(RotaError::invalid(format!(
                    "employeeCount must be at most {}",
                    MAX_DEFAULT_EMPLOYEES
                )))
            }
            (None, Some(count)) => Ok(default_roster(count as usize)),
            (None, None) => Err(RotaError::EmptyRoster),
        }
    }
}

fn positive(field: &str, value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(RotaError::invalid(format!("{} must be positive, got {}", field, value)));
    }
    Ok(value as usize)
}

fn parse_weekday(name: &str) -> Result<Weekday> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| RotaError::invalid(format!("unknown weekday '{}'", name)))
}

fn weekday_name(day: &Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One roster row: date string -> cell label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaRowDto {
    pub employee: String,
    pub assignments: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummaryDto {
    pub employee: String,
    pub shift_counts: BTreeMap<String, usize>,
    pub total_assignments: usize,
    pub weekly_offs: usize,
}

/// A generated rota as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaDto {
    pub id: String,
    pub start_date: String,
    pub dates: Vec<String>,
    pub shifts: Vec<String>,
    pub rows: Vec<RotaRowDto>,
    pub summary: Vec<EmployeeSummaryDto>,
    pub warnings: Vec<String>,
}

impl RotaDto {
    pub fn from_rota(id: impl Into<String>, rota: &Rota) -> Self {
        let dates: Vec<String> = rota
            .dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();

        let rows = rota
            .employees
            .iter()
            .zip(&rota.grid)
            .map(|(employee, row)| RotaRowDto {
                employee: employee.name.clone(),
                assignments: dates
                    .iter()
                    .cloned()
                    .zip(row.iter().map(|state| state.label().to_string()))
                    .collect(),
            })
            .collect();

        let summary = rota
            .employees
            .iter()
            .zip(&rota.summaries)
            .map(|(employee, s)| EmployeeSummaryDto {
                employee: employee.name.clone(),
                shift_counts: s
                    .shift_counts
                    .iter()
                    .map(|(kind, count)| (kind.as_str().to_string(), *count))
                    .collect(),
                total_assignments: s.total_assignments,
                weekly_offs: s.weekly_offs,
            })
            .collect();

        Self {
            id: id.into(),
            start_date: dates.first().cloned().unwrap_or_default(),
            dates,
            shifts: rota.shifts.iter().map(|s| s.as_str().to_string()).collect(),
            rows,
            summary,
            warnings: rota.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&RotaError> for ErrorResponse {
    fn from(err: &RotaError) -> Self {
        Self {
            error: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
