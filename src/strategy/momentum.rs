use crate::series::{PriceSeries, ReturnSeries};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::{debug, info, warn};

//name given to the averaged curve of the active set
pub const AGGREGATE_NAME: &str = "Selected stocks";

//(year, month) of the calendar month before the month of `date`
pub fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

//outcome of the prior-month momentum check for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Momentum {
    Rising { first_close: f64, last_close: f64 },
    NotRising { first_close: f64, last_close: f64 },
    //no trading day of the previous month in the series
    NotEvaluable,
}

impl Momentum {
    pub fn is_active(&self) -> bool {
        matches!(self, Momentum::Rising { .. })
    }
}

//compares the last and first close of the previous calendar month
//a flat month is not rising
pub fn prior_month_momentum(series: &PriceSeries, reference_date: NaiveDate) -> Momentum {
    let (year, month) = previous_month(reference_date);
    let slice = series.month_slice(year, month);

    match (slice.first(), slice.last()) {
        (Some(first), Some(last)) => {
            let first_close = first.close;
            let last_close = last.close;
            if last_close > first_close {
                Momentum::Rising {
                    first_close,
                    last_close,
                }
            } else {
                Momentum::NotRising {
                    first_close,
                    last_close,
                }
            }
        }
        _ => Momentum::NotEvaluable,
    }
}

//result of one selection run
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResult {
    pub reference_date: NaiveDate,

    //active instrument ids in universe order
    pub selected: Vec<String>,

    //equal-weighted cumulative return of the active set over their common dates
    //none when nothing was selected or the active series share no date
    pub aggregate: Option<ReturnSeries>,
}

impl StrategyResult {
    fn empty(reference_date: NaiveDate) -> Self {
        StrategyResult {
            reference_date,
            selected: Vec::new(),
            aggregate: None,
        }
    }

    //true when no instrument met the momentum criterion
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }
}

//selects instruments whose previous-month close rose and averages their curves
#[derive(Debug, Clone)]
pub struct StrategySelector {
    aggregate_name: String,
}

impl Default for StrategySelector {
    fn default() -> Self {
        StrategySelector {
            aggregate_name: AGGREGATE_NAME.to_string(),
        }
    }
}

impl StrategySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregate_name(name: impl Into<String>) -> Self {
        StrategySelector {
            aggregate_name: name.into(),
        }
    }

    pub fn aggregate_name(&self) -> &str {
        &self.aggregate_name
    }

    //partitions the universe at `reference_date` and aggregates the active set
    pub fn select(
        &self,
        universe: &IndexMap<String, PriceSeries>,
        reference_date: NaiveDate,
    ) -> StrategyResult {
        let (year, month) = previous_month(reference_date);
        info!(
            "Selecting from {} instruments on {} using {}-{:02} momentum",
            universe.len(),
            reference_date,
            year,
            month
        );

        let mut selected = Vec::new();
        let mut active = Vec::new();

        for (id, series) in universe {
            let momentum = prior_month_momentum(series, reference_date);
            debug!(instrument = %id, ?momentum, "momentum check");

            if momentum.is_active() {
                selected.push(id.clone());
                active.push(series);
            }
        }

        if selected.is_empty() {
            info!("No instrument rose during {}-{:02}", year, month);
            return StrategyResult::empty(reference_date);
        }

        let aggregate = average_cumulative(&active, &self.aggregate_name);
        if aggregate.is_none() {
            warn!(
                "{} active instruments share no common trading day",
                selected.len()
            );
        }

        info!("Selected {} instruments", selected.len());

        StrategyResult {
            reference_date,
            selected,
            aggregate,
        }
    }
}

//mean cumulative return across series, over the dates where all of them have one
fn average_cumulative(active: &[&PriceSeries], name: &str) -> Option<ReturnSeries> {
    let first = active.first()?;

    let mut dates = Vec::with_capacity(first.len());
    let mut averages = Vec::with_capacity(first.len());

    for date in first.dates() {
        //undefined after a zero close, or missing from one of the series
        let column: Option<Vec<f64>> = active
            .iter()
            .map(|series| series.cumulative_return(date).value())
            .collect();

        if let Some(column) = column {
            dates.push(date);
            averages.push(column.iter().mean());
        }
    }

    if dates.is_empty() {
        return None;
    }

    Some(ReturnSeries::new_unchecked(name, dates, averages))
}
