use crate::engine::AnalysisReport;
use crate::metrics::ComparisonView;
use crate::report::{PresentError, Presenter};
use std::path::{Path, PathBuf};
use tracing::info;

//writes the aligned comparison as date,benchmark,strategy rows
#[derive(Debug, Clone)]
pub struct CsvPresenter {
    path: PathBuf,
}

impl CsvPresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvPresenter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_view(&self, view: &ComparisonView) -> Result<(), PresentError> {
        let csv_error = |source| PresentError::Csv {
            path: self.path.clone(),
            source,
        };

        let mut writer = csv::Writer::from_path(&self.path).map_err(csv_error)?;
        writer
            .write_record(["date", "benchmark", "strategy"])
            .map_err(csv_error)?;

        for (date, benchmark, strategy) in view.rows() {
            writer
                .write_record([
                    date.to_string(),
                    benchmark.to_string(),
                    strategy.to_string(),
                ])
                .map_err(csv_error)?;
        }

        writer.flush().map_err(|source| PresentError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl Presenter for CsvPresenter {
    fn present(&self, report: &AnalysisReport) -> Result<(), PresentError> {
        match report.comparison.view() {
            Some(view) => self.write_view(view),
            None => {
                info!("Nothing to write to {:?}", self.path);
                Ok(())
            }
        }
    }
}
