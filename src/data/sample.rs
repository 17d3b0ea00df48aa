use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid date range: start ({start}) must be before end ({end})")]
    Empty { start: NaiveDate, end: NaiveDate },
}

//a half-open calendar range [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    //creates a range, rejecting start >= end
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start >= end {
            return Err(RangeError::Empty { start, end });
        }
        Ok(DateRange { start, end })
    }

    //smallest range covering every given date, end exclusive
    pub fn covering(first: NaiveDate, last: NaiveDate) -> Self {
        let end = last.checked_add_days(Days::new(1)).unwrap_or(last);
        DateRange { start: first, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

//one trading day of an instrument: the date with its open and close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl PriceSample {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        PriceSample { date, open, close }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn range_is_half_open() {
        let range = DateRange::new(d(2023, 10, 1), d(2024, 1, 8)).unwrap();
        assert!(range.contains(d(2023, 10, 1)));
        assert!(range.contains(d(2024, 1, 7)));
        assert!(!range.contains(d(2024, 1, 8)));
        assert!(!range.contains(d(2023, 9, 30)));
    }

    #[test]
    fn identical_start_and_end_is_rejected() {
        let err = DateRange::new(d(2023, 10, 1), d(2023, 10, 1)).unwrap_err();
        assert_eq!(
            err,
            RangeError::Empty {
                start: d(2023, 10, 1),
                end: d(2023, 10, 1)
            }
        );
    }

    #[test]
    fn covering_range_includes_last_date() {
        let range = DateRange::covering(d(2023, 12, 1), d(2023, 12, 29));
        assert!(range.contains(d(2023, 12, 29)));
        assert_eq!(range.end, d(2023, 12, 30));
    }
}
