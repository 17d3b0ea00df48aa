use crate::metrics::comparison::ComparisonView;
use crate::metrics::timeseries::{max_drawdown, period_changes};
use chrono::NaiveDate;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//statistics of one aligned curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveStats {
    pub start_value: f64,
    pub final_value: f64,
    pub mean_change: f64,
    pub std_change: f64,
    pub best_change: f64,
    pub worst_change: f64,
    pub max_drawdown: f64,
}

impl CurveStats {
    pub fn from_values(values: &[f64]) -> Self {
        let changes = period_changes(values);

        let (mean_change, std_change) = match changes.len() {
            0 => (0.0, 0.0),
            1 => (changes[0], 0.0),
            _ => (changes.iter().mean(), changes.iter().std_dev()),
        };

        //0 only when there is no change at all
        let (best_change, worst_change) = if changes.is_empty() {
            (0.0, 0.0)
        } else {
            (
                changes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                changes.iter().copied().fold(f64::INFINITY, f64::min),
            )
        };

        CurveStats {
            start_value: values.first().copied().unwrap_or(0.0),
            final_value: values.last().copied().unwrap_or(0.0),
            mean_change,
            std_change,
            best_change,
            worst_change,
            max_drawdown: max_drawdown(values),
        }
    }
}

//summary of a benchmark-vs-strategy comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub trading_days: usize,
    pub selected_count: usize,
    pub benchmark: CurveStats,
    pub strategy: CurveStats,
    pub excess: f64,
    pub unit: String,
}

impl ComparisonSummary {
    //returns none for an empty view
    pub fn from_view(view: &ComparisonView, selected_count: usize) -> Option<Self> {
        let first_date = *view.dates.first()?;
        let last_date = *view.dates.last()?;

        let benchmark = CurveStats::from_values(&view.benchmark);
        let strategy = CurveStats::from_values(&view.strategy);

        let unit = view.scaling.map_or("%", |s| s.transform.unit());

        Some(ComparisonSummary {
            first_date,
            last_date,
            trading_days: view.len(),
            selected_count,
            benchmark,
            strategy,
            excess: strategy.final_value - benchmark.final_value,
            unit: unit.to_string(),
        })
    }

    fn fmt_value(&self, value: f64) -> String {
        if self.unit == "$" {
            format!("${:.2}", value)
        } else {
            format!("{:.2}%", value)
        }
    }

    //metric / benchmark / strategy table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![
            Cell::new("Metric"),
            Cell::new("Benchmark"),
            Cell::new("Strategy"),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Period"),
            Cell::new(&format!("{} to {}", self.first_date, self.last_date)),
            Cell::new(&format!("{} trading days", self.trading_days)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Instruments"),
            Cell::new("1"),
            Cell::new(&format!("{}", self.selected_count)),
        ]));

        let rows: [(&str, f64, f64); 6] = [
            ("Start Value", self.benchmark.start_value, self.strategy.start_value),
            ("Final Value", self.benchmark.final_value, self.strategy.final_value),
            ("Mean Daily Change", self.benchmark.mean_change, self.strategy.mean_change),
            ("Best Day", self.benchmark.best_change, self.strategy.best_change),
            ("Worst Day", self.benchmark.worst_change, self.strategy.worst_change),
            ("Max Drawdown", self.benchmark.max_drawdown, self.strategy.max_drawdown),
        ];

        for (label, benchmark, strategy) in rows {
            table.add_row(Row::new(vec![
                Cell::new(label),
                Cell::new(&self.fmt_value(benchmark)),
                Cell::new(&self.fmt_value(strategy)),
            ]));
        }

        table.add_row(Row::new(vec![
            Cell::new("Daily Change Std Dev"),
            Cell::new(&format!("{:.3}", self.benchmark.std_change)),
            Cell::new(&format!("{:.3}", self.strategy.std_change)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Excess (Strategy - Benchmark)"),
            Cell::new(""),
            Cell::new(&self.fmt_value(self.excess)),
        ]));

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::comparison::{AmountTransform, Scaling};
    use approx::assert_relative_eq;

    fn view(scaling: Option<Scaling>) -> ComparisonView {
        let dates = (1..=3)
            .map(|day| NaiveDate::from_ymd_opt(2023, 11, day).unwrap())
            .collect();
        ComparisonView {
            benchmark_name: "Benchmark".to_string(),
            strategy_name: "Selected stocks".to_string(),
            dates,
            benchmark: vec![1000.0, 1010.0, 1005.0],
            strategy: vec![1000.0, 1020.0, 990.0],
            scaling,
        }
    }

    #[test]
    fn summarises_both_curves() {
        let scaling = Some(Scaling {
            amount: 1000.0,
            transform: AmountTransform::Growth,
        });
        let summary = ComparisonSummary::from_view(&view(scaling), 4).unwrap();

        assert_eq!(summary.trading_days, 3);
        assert_eq!(summary.selected_count, 4);
        assert_relative_eq!(summary.excess, -15.0);
        assert_relative_eq!(summary.strategy.best_change, 20.0);
        assert_relative_eq!(summary.strategy.worst_change, -30.0);
        assert_relative_eq!(summary.strategy.max_drawdown, 30.0);
        assert_relative_eq!(summary.benchmark.mean_change, 2.5);
        assert_eq!(summary.unit, "$");
    }

    #[test]
    fn table_has_a_row_per_metric() {
        let summary = ComparisonSummary::from_view(&view(None), 1).unwrap();
        assert_eq!(summary.unit, "%");
        assert_eq!(summary.to_table().len(), 11);
    }

    #[test]
    fn best_and_worst_day_follow_the_curve_sign() {
        let falling = CurveStats::from_values(&[0.0, -1.0, -3.0, -4.0]);
        assert_relative_eq!(falling.best_change, -1.0);
        assert_relative_eq!(falling.worst_change, -2.0);

        let rising = CurveStats::from_values(&[0.0, 1.0, 3.0]);
        assert_relative_eq!(rising.best_change, 2.0);
        assert_relative_eq!(rising.worst_change, 1.0);

        let single = CurveStats::from_values(&[5.0]);
        assert_eq!(single.best_change, 0.0);
        assert_eq!(single.worst_change, 0.0);
    }

    #[test]
    fn magnified_values_keep_percent_unit() {
        let scaling = Some(Scaling {
            amount: 1000.0,
            transform: AmountTransform::Magnify,
        });
        let summary = ComparisonSummary::from_view(&view(scaling), 1).unwrap();
        assert_eq!(summary.unit, "%");
    }
}
