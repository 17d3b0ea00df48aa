use crate::data::{DateRange, PriceSample};
use crate::series::lookup::{Lookup, Unavailability};
use crate::series::return_series::ReturnSeries;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

//lookback used by trailing_30_price, in trading days
pub const TRAILING_WINDOW: usize = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("No data found for {symbol} in {range}")]
    NoData { symbol: String, range: DateRange },
    #[error("Dates for {symbol} are not strictly increasing at {date}")]
    UnsortedDates { symbol: String, date: NaiveDate },
    #[error("Sample for {symbol} on {date} is outside {range}")]
    OutOfRange {
        symbol: String,
        date: NaiveDate,
        range: DateRange,
    },
}

//percent change from old to new, none when old is zero
pub fn percent_change(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 {
        None
    } else {
        Some((new - old) / old * 100.0)
    }
}

//an instrument's daily open/close history with its derived return columns
//immutable once built; every derived column is computed in the constructor
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    symbol: String,
    range: DateRange,
    samples: Vec<PriceSample>,

    //(close - open) / open * 100, none on a zero open
    daily_returns: Vec<Option<f64>>,

    //close-to-close percent change, 0 on the first sample, none after a zero close
    day_changes: Vec<Option<f64>>,

    //running sum of day_changes, none from the first undefined change onward
    cumulative: Vec<Option<f64>>,
}

impl PriceSeries {
    //builds a series from samples already restricted to `range`
    pub fn new(
        symbol: impl Into<String>,
        range: DateRange,
        samples: Vec<PriceSample>,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();

        if samples.is_empty() {
            return Err(SeriesError::NoData { symbol, range });
        }

        if let Some(pair) = samples.windows(2).find(|pair| pair[1].date <= pair[0].date) {
            return Err(SeriesError::UnsortedDates {
                symbol,
                date: pair[1].date,
            });
        }

        if let Some(outside) = samples.iter().find(|sample| !range.contains(sample.date)) {
            return Err(SeriesError::OutOfRange {
                symbol,
                date: outside.date,
                range,
            });
        }

        let daily_returns = samples
            .iter()
            .map(|sample| percent_change(sample.open, sample.close))
            .collect();

        let mut day_changes = Vec::with_capacity(samples.len());
        day_changes.push(Some(0.0));
        day_changes.extend(
            samples
                .windows(2)
                .map(|pair| percent_change(pair[0].close, pair[1].close)),
        );

        let cumulative = day_changes
            .iter()
            .scan(Some(0.0), |total: &mut Option<f64>, change| {
                *total = total.zip(*change).map(|(sum, change)| sum + change);
                Some(*total)
            })
            .collect();

        Ok(PriceSeries {
            symbol,
            range,
            samples,
            daily_returns,
            day_changes,
            cumulative,
        })
    }

    //builds a series whose range is exactly the span of the samples
    pub fn from_samples(
        symbol: impl Into<String>,
        samples: Vec<PriceSample>,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        let range = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => DateRange::covering(first.date, last.date),
            _ => {
                return Err(SeriesError::NoData {
                    symbol,
                    range: DateRange::covering(NaiveDate::MIN, NaiveDate::MIN),
                })
            }
        };
        PriceSeries::new(symbol, range, samples)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    //never true for a constructed series
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.samples.iter().map(|sample| sample.date)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.samples[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.samples[self.samples.len() - 1].date
    }

    //trading-day position of a date
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.samples
            .binary_search_by_key(&date, |sample| sample.date)
            .ok()
    }

    fn locate(&self, date: NaiveDate) -> Result<usize, Unavailability> {
        self.position(date)
            .ok_or(Unavailability::DateNotFound(date))
    }

    //position of `date`, provided at least `n` samples precede it
    fn locate_with_history(&self, n: usize, date: NaiveDate) -> Result<usize, Unavailability> {
        let position = self.locate(date)?;
        if position < n {
            return Err(Unavailability::InsufficientHistory {
                date,
                needed: n,
                available: position,
            });
        }
        Ok(position)
    }

    //closing price on `date`
    pub fn price_at(&self, date: NaiveDate) -> Lookup<f64> {
        match self.locate(date) {
            Ok(position) => Lookup::Available(self.samples[position].close),
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    //percent change between the close on `date` and the close `n` trading days earlier
    pub fn n_day_return(&self, n: usize, date: NaiveDate) -> Lookup<f64> {
        let position = match self.locate_with_history(n, date) {
            Ok(position) => position,
            Err(reason) => return Lookup::Unavailable(reason),
        };
        let base = self.samples[position - n].close;
        let current = self.samples[position].close;
        match percent_change(base, current) {
            Some(change) => Lookup::Available(change),
            None => Lookup::Unavailable(Unavailability::DivisionByZero(date)),
        }
    }

    //open-to-close percent return on `date`
    pub fn daily_return(&self, date: NaiveDate) -> Lookup<f64> {
        match self.locate(date) {
            Ok(position) => match self.daily_returns[position] {
                Some(ret) => Lookup::Available(ret),
                None => Lookup::Unavailable(Unavailability::DivisionByZero(date)),
            },
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    //close exactly TRAILING_WINDOW trading days before `date`
    pub fn trailing_30_price(&self, date: NaiveDate) -> Lookup<f64> {
        match self.locate_with_history(TRAILING_WINDOW, date) {
            Ok(position) => Lookup::Available(self.samples[position - TRAILING_WINDOW].close),
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    //close-to-close percent change into `date` (0 on the first sample)
    pub fn day_change(&self, date: NaiveDate) -> Lookup<f64> {
        match self.locate(date) {
            Ok(position) => match self.day_changes[position] {
                Some(change) => Lookup::Available(change),
                None => Lookup::Unavailable(Unavailability::DivisionByZero(date)),
            },
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    //additive running sum of day changes up to and including `date`
    pub fn cumulative_return(&self, date: NaiveDate) -> Lookup<f64> {
        match self.locate(date) {
            Ok(position) => match self.cumulative[position] {
                Some(total) => Lookup::Available(total),
                None => Lookup::Unavailable(Unavailability::DivisionByZero(date)),
            },
            Err(reason) => Lookup::Unavailable(reason),
        }
    }

    //the defined part of the cumulative return column as a dated series
    pub fn cumulative_series(&self) -> ReturnSeries {
        self.cumulative_series_named(self.symbol.clone())
    }

    //never empty: the first sample's cumulative return is always 0
    pub fn cumulative_series_named(&self, name: impl Into<String>) -> ReturnSeries {
        let (dates, values) = self
            .dates()
            .zip(self.cumulative.iter())
            .filter_map(|(date, total)| total.map(|total| (date, total)))
            .unzip();
        ReturnSeries::new_unchecked(name, dates, values)
    }

    //samples falling in one calendar month, in date order
    pub fn month_slice(&self, year: i32, month: u32) -> &[PriceSample] {
        let start = self
            .samples
            .partition_point(|sample| (sample.date.year(), sample.date.month()) < (year, month));
        let end = self
            .samples
            .partition_point(|sample| (sample.date.year(), sample.date.month()) <= (year, month));
        &self.samples[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, day).unwrap()
    }

    fn series(closes: &[(u32, u32, f64)]) -> PriceSeries {
        let samples = closes
            .iter()
            .map(|&(m, day, close)| PriceSample::new(d(m, day), close - 1.0, close))
            .collect();
        PriceSeries::from_samples("TEST.NS", samples).unwrap()
    }

    #[test]
    fn empty_input_is_no_data() {
        let range = DateRange::new(d(10, 1), d(12, 31)).unwrap();
        let err = PriceSeries::new("EMPTY.NS", range, vec![]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NoData {
                symbol: "EMPTY.NS".to_string(),
                range
            }
        );
    }

    #[test]
    fn rejects_duplicate_dates() {
        let samples = vec![
            PriceSample::new(d(11, 1), 1.0, 1.0),
            PriceSample::new(d(11, 1), 1.0, 2.0),
        ];
        let err = PriceSeries::from_samples("DUP", samples).unwrap_err();
        assert!(matches!(err, SeriesError::UnsortedDates { .. }));
    }

    #[test]
    fn rejects_samples_outside_range() {
        let range = DateRange::new(d(11, 1), d(11, 30)).unwrap();
        let samples = vec![PriceSample::new(d(11, 30), 1.0, 1.0)];
        let err = PriceSeries::new("OUT", range, samples).unwrap_err();
        assert!(matches!(err, SeriesError::OutOfRange { .. }));
    }

    #[test]
    fn zero_close_leaves_other_lookups_available() {
        let samples = vec![
            PriceSample::new(d(11, 1), 9.0, 10.0),
            PriceSample::new(d(11, 2), 1.0, 0.0),
            PriceSample::new(d(11, 3), 10.0, 12.0),
        ];
        let s = PriceSeries::from_samples("ZERO", samples).unwrap();

        assert_eq!(s.price_at(d(11, 1)), Lookup::Available(10.0));
        assert_eq!(s.price_at(d(11, 3)), Lookup::Available(12.0));
        assert_relative_eq!(s.daily_return(d(11, 3)).value().unwrap(), 20.0);
        assert_eq!(s.day_change(d(11, 2)), Lookup::Available(-100.0));
        assert_eq!(s.cumulative_return(d(11, 2)), Lookup::Available(-100.0));

        let undefined = Lookup::Unavailable(Unavailability::DivisionByZero(d(11, 3)));
        assert_eq!(s.day_change(d(11, 3)), undefined);
        assert_eq!(s.cumulative_return(d(11, 3)), undefined);
        assert_eq!(s.n_day_return(1, d(11, 3)), undefined);

        //the curve stops at the last defined day
        let curve = s.cumulative_series();
        assert_eq!(curve.dates(), &[d(11, 1), d(11, 2)]);
        assert_eq!(curve.last_value(), Some(-100.0));
    }

    #[test]
    fn price_at_is_defined_only_on_trading_days() {
        let s = series(&[(11, 1, 100.0), (11, 3, 102.0)]);
        assert_eq!(s.price_at(d(11, 1)), Lookup::Available(100.0));
        assert_eq!(s.price_at(d(11, 3)), Lookup::Available(102.0));
        assert_eq!(
            s.price_at(d(11, 2)),
            Lookup::Unavailable(Unavailability::DateNotFound(d(11, 2)))
        );
        assert!(!s.price_at(d(12, 1)).is_available());
    }

    #[test]
    fn cumulative_return_accumulates_day_changes() {
        let s = series(&[(11, 1, 100.0), (11, 2, 110.0), (11, 3, 99.0), (11, 6, 99.0)]);
        let dates: Vec<_> = s.dates().collect();

        assert_eq!(s.day_change(dates[0]), Lookup::Available(0.0));
        assert_eq!(s.cumulative_return(dates[0]), Lookup::Available(0.0));

        for pair in dates.windows(2) {
            let previous = s.cumulative_return(pair[0]).value().unwrap();
            let change = s.day_change(pair[1]).value().unwrap();
            let current = s.cumulative_return(pair[1]).value().unwrap();
            assert_relative_eq!(current, previous + change, epsilon = 1e-12);
        }

        //additive, not compounded: +10% then -10% sums to 0
        assert_relative_eq!(s.cumulative_return(d(11, 3)).value().unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn n_day_return_is_positional() {
        let s = series(&[(11, 1, 100.0), (11, 2, 104.0), (11, 6, 110.0)]);
        assert_relative_eq!(s.n_day_return(2, d(11, 6)).value().unwrap(), 10.0);
        assert_relative_eq!(s.n_day_return(1, d(11, 6)).value().unwrap(), (110.0 - 104.0) / 104.0 * 100.0);
        assert_eq!(
            s.n_day_return(3, d(11, 6)),
            Lookup::Unavailable(Unavailability::InsufficientHistory {
                date: d(11, 6),
                needed: 3,
                available: 2
            })
        );
        assert_eq!(
            s.n_day_return(1, d(11, 4)),
            Lookup::Unavailable(Unavailability::DateNotFound(d(11, 4)))
        );
    }

    #[test]
    fn daily_return_uses_open_and_close() {
        let samples = vec![
            PriceSample::new(d(11, 1), 200.0, 210.0),
            PriceSample::new(d(11, 2), 0.0, 210.0),
        ];
        let s = PriceSeries::from_samples("OPEN", samples).unwrap();
        assert_relative_eq!(s.daily_return(d(11, 1)).value().unwrap(), 5.0);
        assert_eq!(
            s.daily_return(d(11, 2)),
            Lookup::Unavailable(Unavailability::DivisionByZero(d(11, 2)))
        );
    }

    #[test]
    fn trailing_price_needs_thirty_prior_days() {
        let start = d(1, 2);
        let samples: Vec<_> = (0..40u64)
            .map(|i| {
                let date = start + chrono::Days::new(i);
                PriceSample::new(date, 10.0, 10.0 + i as f64)
            })
            .collect();
        let s = PriceSeries::from_samples("LONG", samples).unwrap();

        let day_30 = start + chrono::Days::new(30);
        let day_29 = start + chrono::Days::new(29);
        assert_eq!(s.trailing_30_price(day_30), Lookup::Available(10.0));
        assert_eq!(
            s.trailing_30_price(day_29).reason(),
            Some(Unavailability::InsufficientHistory {
                date: day_29,
                needed: 30,
                available: 29
            })
        );
    }

    #[test]
    fn month_slice_selects_calendar_month() {
        let s = series(&[(10, 30, 1.0), (11, 1, 2.0), (11, 30, 3.0), (12, 1, 4.0)]);
        let november = s.month_slice(2023, 11);
        assert_eq!(november.len(), 2);
        assert_eq!(november[0].date, d(11, 1));
        assert_eq!(november[1].date, d(11, 30));
        assert!(s.month_slice(2023, 9).is_empty());
    }
}
