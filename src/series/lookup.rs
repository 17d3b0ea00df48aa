use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

//why a per-date figure could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unavailability {
    //market closed that day, or the date is outside the record
    DateNotFound(NaiveDate),
    //fewer prior trading days than the lookback needs
    InsufficientHistory {
        date: NaiveDate,
        needed: usize,
        available: usize,
    },
    //the base price of the percent change is zero
    DivisionByZero(NaiveDate),
}

impl fmt::Display for Unavailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailability::DateNotFound(date) => write!(
                f,
                "either the market was closed on {} or the date is not in the record",
                date
            ),
            Unavailability::InsufficientHistory {
                date,
                needed,
                available,
            } => write!(
                f,
                "{} needs {} prior trading days but only {} exist",
                date, needed, available
            ),
            Unavailability::DivisionByZero(date) => {
                write!(f, "base price on {} is zero", date)
            }
        }
    }
}

//result of a per-date lookup; absence is a normal outcome, not an error
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Lookup<T> {
    Available(T),
    Unavailable(Unavailability),
}

impl<T> Lookup<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Lookup::Available(_))
    }

    pub fn value(self) -> Option<T> {
        match self {
            Lookup::Available(value) => Some(value),
            Lookup::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<Unavailability> {
        match self {
            Lookup::Available(_) => None,
            Lookup::Unavailable(reason) => Some(*reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Available(value) => Lookup::Available(f(value)),
            Lookup::Unavailable(reason) => Lookup::Unavailable(reason),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }
}

//renders the value, or the "--" placeholder
impl<T: fmt::Display> fmt::Display for Lookup<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Available(value) => fmt::Display::fmt(value, f),
            Lookup::Unavailable(_) => f.write_str("--"),
        }
    }
}
