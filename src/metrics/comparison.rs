use crate::series::ReturnSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("Series '{left}' and '{right}' have no date in common")]
    NoOverlap { left: String, right: String },
}

//how an investment amount rescales a percent return series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountTransform {
    //value of the amount invested: v / 100 * amount + amount
    #[default]
    Growth,
    //return magnified by the amount: v * amount + v
    Magnify,
}

impl AmountTransform {
    //parse transform from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "growth" | "invested" => Some(AmountTransform::Growth),
            "magnify" | "magnified" => Some(AmountTransform::Magnify),
            _ => None,
        }
    }

    pub fn apply(&self, value: f64, amount: f64) -> f64 {
        match self {
            AmountTransform::Growth => value / 100.0 * amount + amount,
            AmountTransform::Magnify => value * amount + value,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AmountTransform::Growth => "growth",
            AmountTransform::Magnify => "magnify",
        }
    }

    //image of a zero return: the principal for growth, 0 for magnify
    pub fn baseline(&self, amount: f64) -> f64 {
        self.apply(0.0, amount)
    }

    //only growth yields a currency value; magnify is still a percent figure
    pub fn unit(&self) -> &'static str {
        match self {
            AmountTransform::Growth => "$",
            AmountTransform::Magnify => "%",
        }
    }
}

//amount scaling attached to a view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scaling {
    pub amount: f64,
    pub transform: AmountTransform,
}

impl Scaling {
    pub fn baseline(&self) -> f64 {
        self.transform.baseline(self.amount)
    }
}

//two series restricted to their common dates, ready for pairwise charting
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub benchmark_name: String,
    pub strategy_name: String,
    pub dates: Vec<NaiveDate>,
    pub benchmark: Vec<f64>,
    pub strategy: Vec<f64>,
    pub scaling: Option<Scaling>,
}

impl ComparisonView {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    //(date, benchmark, strategy) rows
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, f64, f64)> + '_ {
        self.dates
            .iter()
            .zip(self.benchmark.iter().zip(self.strategy.iter()))
            .map(|(&date, (&benchmark, &strategy))| (date, benchmark, strategy))
    }

    pub fn last(&self) -> Option<(NaiveDate, f64, f64)> {
        self.rows().last()
    }
}

//sorted-merge intersection of two date indices as position pairs
pub fn common_positions(left: &[NaiveDate], right: &[NaiveDate]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                pairs.push((i, j));
                i += 1;
                j += 1;
            }
        }
    }

    pairs
}

//aligns a benchmark series with a strategy series
#[derive(Debug, Clone, Default)]
pub struct BenchmarkComparator {
    scaling: Option<Scaling>,
}

impl BenchmarkComparator {
    pub fn new() -> Self {
        Self::default()
    }

    //scale both series by `amount` after alignment
    pub fn with_amount(amount: f64, transform: AmountTransform) -> Self {
        BenchmarkComparator {
            scaling: Some(Scaling { amount, transform }),
        }
    }

    pub fn scaling(&self) -> Option<Scaling> {
        self.scaling
    }

    pub fn compare(
        &self,
        benchmark: &ReturnSeries,
        strategy: &ReturnSeries,
    ) -> Result<ComparisonView, ComparisonError> {
        let pairs = common_positions(benchmark.dates(), strategy.dates());
        if pairs.is_empty() {
            return Err(ComparisonError::NoOverlap {
                left: benchmark.name.clone(),
                right: strategy.name.clone(),
            });
        }

        let scale = |value: f64| match self.scaling {
            Some(Scaling { amount, transform }) => transform.apply(value, amount),
            None => value,
        };

        let dates = pairs.iter().map(|&(i, _)| benchmark.dates()[i]).collect();
        let benchmark_values = pairs
            .iter()
            .map(|&(i, _)| scale(benchmark.values()[i]))
            .collect();
        let strategy_values = pairs
            .iter()
            .map(|&(_, j)| scale(strategy.values()[j]))
            .collect();

        Ok(ComparisonView {
            benchmark_name: benchmark.name.clone(),
            strategy_name: strategy.name.clone(),
            dates,
            benchmark: benchmark_values,
            strategy: strategy_values,
            scaling: self.scaling,
        })
    }
}
