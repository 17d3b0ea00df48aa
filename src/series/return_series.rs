use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReturnSeriesError {
    #[error("Return series '{name}' is empty")]
    Empty { name: String },
    #[error("Return series '{name}' length mismatch: {dates} dates vs {values} values")]
    LengthMismatch {
        name: String,
        dates: usize,
        values: usize,
    },
    #[error("Return series '{name}' dates are not strictly increasing at {date}")]
    Unordered { name: String, date: NaiveDate },
}

//a named, date-indexed sequence of values (percent returns or amounts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    //creates a series, rejecting empty, mismatched or unordered input
    pub fn new(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, ReturnSeriesError> {
        let name = name.into();

        if dates.is_empty() || values.is_empty() {
            return Err(ReturnSeriesError::Empty { name });
        }

        if dates.len() != values.len() {
            return Err(ReturnSeriesError::LengthMismatch {
                name,
                dates: dates.len(),
                values: values.len(),
            });
        }

        if let Some(pair) = dates.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(ReturnSeriesError::Unordered {
                name,
                date: pair[1],
            });
        }

        Ok(ReturnSeries {
            name,
            dates,
            values,
        })
    }

    //creates a series without validation; callers guarantee ordered, equal-length input
    pub(crate) fn new_unchecked(
        name: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Self {
        ReturnSeries {
            name: name.into(),
            dates,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|position| self.values[position])
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}
