use crate::engine::{AnalysisReport, ComparisonOutcome};
use crate::report::{PresentError, Presenter};
use crate::strategy::previous_month;
use std::fmt::Write;

//prints the selection and the summary table to stdout
#[derive(Debug, Clone, Default)]
pub struct TablePresenter;

impl TablePresenter {
    pub fn new() -> Self {
        TablePresenter
    }

    pub fn render(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();
        let (year, month) = previous_month(report.reference_date);

        let _ = writeln!(
            out,
            "Period: {}  Reference date: {}  Momentum month: {}-{:02}",
            report.range, report.reference_date, year, month
        );
        let _ = writeln!(
            out,
            "Universe: {} instruments, benchmark {} ({} trading days)",
            report.universe_size,
            report.benchmark.symbol(),
            report.benchmark.len()
        );
        if !report.skipped.is_empty() {
            let _ = writeln!(out, "Skipped: {}", report.skipped.join(", "));
        }

        let _ = writeln!(out, "\nStocks selected for the month's strategy:");
        if report.strategy.is_empty() {
            let _ = writeln!(out, "  (none) no instrument met the momentum criterion");
        } else {
            for name in &report.strategy.selected {
                let _ = writeln!(out, "  - {}", name);
            }
        }

        match &report.comparison {
            ComparisonOutcome::Compared(_) => {
                if let Some(summary) = report.summary() {
                    let _ = writeln!(out, "\nComparing benchmark and strategy:");
                    let _ = write!(out, "{}", summary.to_table());
                }
            }
            ComparisonOutcome::NoSelection => {}
            ComparisonOutcome::NoOverlap(e) => {
                let _ = writeln!(out, "\nNo comparison: {}", e);
            }
        }

        out
    }
}

impl Presenter for TablePresenter {
    fn present(&self, report: &AnalysisReport) -> Result<(), PresentError> {
        print!("{}", self.render(report));
        Ok(())
    }
}
