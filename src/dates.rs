// src/dates.rs
// Month arithmetic for the overview portal: inclusive (year, month) ranges
// and the rollover used by the portal's half-open date query.

use crate::error::Error;

/// December rolls into January of the next year.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Inclusive range of calendar months. `Copy`, so it can be iterated as many
/// times as needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthRange {
    start: (i32, u32),
    stop: (i32, u32),
}

impl MonthRange {
    /// Reversed bounds and out-of-range months are rejected up front rather
    /// than producing an empty sequence.
    pub fn new(
        start_year: i32,
        start_month: u32,
        stop_year: i32,
        stop_month: u32,
    ) -> Result<Self, Error> {
        for m in [start_month, stop_month] {
            if !(1..=12).contains(&m) {
                return Err(Error::Month(m));
            }
        }
        if (start_year, start_month) > (stop_year, stop_month) {
            return Err(Error::RangeOrder {
                start_year,
                start_month,
                stop_year,
                stop_month,
            });
        }
        Ok(Self {
            start: (start_year, start_month),
            stop: (stop_year, stop_month),
        })
    }

    /// Number of months covered.
    pub fn count(&self) -> usize {
        let span = (self.stop.0 - self.start.0) * 12 + self.stop.1 as i32 - self.start.1 as i32;
        span as usize + 1
    }
}

impl IntoIterator for MonthRange {
    type Item = (i32, u32);
    type IntoIter = Months;

    fn into_iter(self) -> Months {
        Months {
            next: Some(self.start),
            stop: self.stop,
        }
    }
}

/// Lazy iterator over the months of a `MonthRange`, ascending.
pub struct Months {
    next: Option<(i32, u32)>,
    stop: (i32, u32),
}

impl Iterator for Months {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<(i32, u32)> {
        let cur = self.next?;
        self.next = if cur == self.stop {
            None
        } else {
            Some(next_month(cur.0, cur.1))
        };
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months(r: MonthRange) -> Vec<(i32, u32)> {
        r.into_iter().collect()
    }

    #[test]
    fn single_month() {
        let r = MonthRange::new(2020, 6, 2020, 6).unwrap();
        assert_eq!(months(r), vec![(2020, 6)]);
        assert_eq!(r.count(), 1);
    }

    #[test]
    fn same_year_span() {
        let r = MonthRange::new(2020, 3, 2020, 6).unwrap();
        assert_eq!(months(r), vec![(2020, 3), (2020, 4), (2020, 5), (2020, 6)]);
    }

    #[test]
    fn year_rollover() {
        let r = MonthRange::new(2021, 11, 2022, 2).unwrap();
        assert_eq!(
            months(r),
            vec![(2021, 11), (2021, 12), (2022, 1), (2022, 2)]
        );
        assert_eq!(r.count(), 4);
    }

    #[test]
    fn interior_years_run_full() {
        let r = MonthRange::new(2019, 11, 2021, 2).unwrap();
        let all = months(r);
        assert_eq!(all.len(), 16);
        assert_eq!(all.first(), Some(&(2019, 11)));
        assert_eq!(all.last(), Some(&(2021, 2)));
        // no gaps, no duplicates
        for pair in all.windows(2) {
            assert_eq!(next_month(pair[0].0, pair[0].1), pair[1]);
        }
    }

    #[test]
    fn restartable() {
        let r = MonthRange::new(2020, 1, 2020, 3).unwrap();
        assert_eq!(months(r), months(r));
    }

    #[test]
    fn reversed_bounds_rejected() {
        let err = MonthRange::new(2022, 2, 2021, 11).unwrap_err();
        assert!(matches!(err, Error::RangeOrder { .. }));
        let err = MonthRange::new(2021, 5, 2021, 4).unwrap_err();
        assert!(matches!(err, Error::RangeOrder { .. }));
    }

    #[test]
    fn bad_month_rejected() {
        assert!(matches!(
            MonthRange::new(2021, 13, 2021, 13),
            Err(Error::Month(13))
        ));
        assert!(matches!(
            MonthRange::new(2021, 0, 2021, 5),
            Err(Error::Month(0))
        ));
    }

    #[test]
    fn december_rolls_to_january() {
        assert_eq!(next_month(2021, 12), (2022, 1));
        assert_eq!(next_month(2021, 1), (2021, 2));
    }
}
