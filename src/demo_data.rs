//! Demo rosters and rota settings.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{Employee, RotaConfig, WeeklyOffMode};

/// Roster size used when no names are supplied.
pub const DEFAULT_EMPLOYEE_COUNT: usize = 9;

/// Largest roster the generated default accepts.
pub const MAX_DEFAULT_EMPLOYEES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                employee_count: DEFAULT_EMPLOYEE_COUNT,
                days_in_schedule: 14,
                max_per_shift: 2,
                weekly_off_mode: WeeklyOffMode::Staggered,
            },
            DemoData::Large => DemoDataParameters {
                employee_count: MAX_DEFAULT_EMPLOYEES,
                days_in_schedule: 28,
                max_per_shift: 15,
                weekly_off_mode: WeeklyOffMode::weekends(),
            },
        }
    }
}

struct DemoDataParameters {
    employee_count: usize,
    days_in_schedule: usize,
    max_per_shift: usize,
    weekly_off_mode: WeeklyOffMode,
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a demo roster and rota configuration.
pub fn generate(demo: DemoData) -> (Vec<Employee>, RotaConfig) {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    // First Monday from a reference date
    let start_date = find_next_monday(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default());

    let names = generate_name_permutations(&mut rng);
    let employees = Employee::roster(
        names
            .into_iter()
            .cycle()
            .take(params.employee_count),
    );

    let config = RotaConfig::new(start_date, params.days_in_schedule)
        .with_max_per_shift(params.max_per_shift)
        .with_weekly_off_mode(params.weekly_off_mode);

    (employees, config)
}

/// The placeholder roster `Emp1 .. EmpN`.
pub fn default_roster(count: usize) -> Vec<Employee> {
    Employee::roster((1..=count).map(|i| format!("Emp{}", i)))
}

fn find_next_monday(date: NaiveDate) -> NaiveDate {
    let days_until_monday = match date.weekday() {
        Weekday::Mon => 0,
        Weekday::Tue => 6,
        Weekday::Wed => 5,
        Weekday::Thu => 4,
        Weekday::Fri => 3,
        Weekday::Sat => 2,
        Weekday::Sun => 1,
    };
    date + Duration::days(days_until_monday)
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn generate_name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{} {}", first, last));
        }
    }
    names.shuffle(rng);
    names
}
