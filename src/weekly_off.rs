//! Mandatory rest days, computed once per run before any shift is filled.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::domain::WeeklyOffMode;

/// Length of a staggering block.
pub const BLOCK_DAYS: usize = 7;

/// Which days each employee must rest. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyOffSchedule {
    /// `off[employee][day]`
    off: Vec<Vec<bool>>,
}

impl WeeklyOffSchedule {
    /// Computes rest days for `num_employees` over `dates`.
    ///
    /// Staggered mode draws one offset per block from `rng`, so the caller's
    /// generator must be the one used for the rest of the run.
    pub fn compute<R: Rng>(
        num_employees: usize,
        dates: &[NaiveDate],
        mode: &WeeklyOffMode,
        rng: &mut R,
    ) -> Self {
        let num_days = dates.len();
        let mut off = vec![vec![false; num_days]; num_employees];

        match mode {
            WeeklyOffMode::FixedWeekdays(weekdays) => {
                for (day, date) in dates.iter().enumerate() {
                    if weekdays.contains(&date.weekday()) {
                        for row in off.iter_mut() {
                            row[day] = true;
                        }
                    }
                }
            }
            WeeklyOffMode::Staggered => {
                let mut block_start = 0;
                while block_start < num_days {
                    let block_len = (num_days - block_start).min(BLOCK_DAYS);
                    let offset = rng.gen_range(0..block_len);
                    for (idx, row) in off.iter_mut().enumerate() {
                        row[block_start + (offset + idx) % block_len] = true;
                    }
                    block_start += block_len;
                }
            }
        }

        Self { off }
    }

    pub fn is_off(&self, employee: usize, day: usize) -> bool {
        self.off[employee][day]
    }

    /// Rest days of one employee, ascending.
    pub fn days_off(&self, employee: usize) -> impl Iterator<Item = usize> + '_ {
        self.off[employee]
            .iter()
            .enumerate()
            .filter(|(_, off)| **off)
            .map(|(day, _)| day)
    }

    /// Employees not resting on `day`, in roster order.
    pub fn available_on(&self, day: usize) -> Vec<usize> {
        (0..self.off.len()).filter(|&e| !self.off[e][day]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        start.iter_days().take(n).collect()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_staggered_one_rest_day_per_block() {
        let dates = dates(monday(), 31);
        let mut rng = StdRng::seed_from_u64(7);
        let schedule = WeeklyOffSchedule::compute(10, &dates, &WeeklyOffMode::Staggered, &mut rng);

        for employee in 0..10 {
            let days: Vec<usize> = schedule.days_off(employee).collect();
            // 4 full weeks plus a 3-day tail block
            assert_eq!(days.len(), 5, "employee {} got {:?}", employee, days);
            for (block, day) in days.iter().enumerate() {
                assert_eq!(day / BLOCK_DAYS, block, "employee {} rest days {:?}", employee, days);
            }
        }
    }

    #[test]
    fn test_staggered_spreads_small_roster() {
        let dates = dates(monday(), 7);
        let mut rng = StdRng::seed_from_u64(42);
        let schedule = WeeklyOffSchedule::compute(3, &dates, &WeeklyOffMode::Staggered, &mut rng);

        let rest_days: Vec<usize> = (0..3).flat_map(|e| schedule.days_off(e)).collect();
        assert_eq!(rest_days.len(), 3);
        // distinct rest days, so nobody rests alongside anyone else
        for day in 0..7 {
            assert!(schedule.available_on(day).len() >= 2);
        }
    }

    #[test]
    fn test_fixed_weekdays_marks_everyone() {
        let dates = dates(monday(), 14);
        let mut rng = StdRng::seed_from_u64(0);
        let schedule = WeeklyOffSchedule::compute(4, &dates, &WeeklyOffMode::weekends(), &mut rng);

        for (day, date) in dates.iter().enumerate() {
            let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
            for employee in 0..4 {
                assert_eq!(schedule.is_off(employee, day), weekend, "{}", date);
            }
            assert_eq!(schedule.available_on(day).is_empty(), weekend);
        }
    }

    #[test]
    fn test_same_seed_same_offsets() {
        let dates = dates(monday(), 28);
        let a = WeeklyOffSchedule::compute(
            5,
            &dates,
            &WeeklyOffMode::Staggered,
            &mut StdRng::seed_from_u64(99),
        );
        let b = WeeklyOffSchedule::compute(
            5,
            &dates,
            &WeeklyOffMode::Staggered,
            &mut StdRng::seed_from_u64(99),
        );
        assert_eq!(a, b);
    }
}
