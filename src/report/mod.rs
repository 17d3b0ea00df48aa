pub mod chart;
pub mod csv_output;
pub mod table;

use crate::engine::AnalysisReport;
use std::path::PathBuf;
use thiserror::Error;

pub use chart::{render_chart, SvgChartPresenter};
pub use csv_output::CsvPresenter;
pub use table::TablePresenter;

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Failed to write {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

//renders an analysis report somewhere
pub trait Presenter {
    fn present(&self, report: &AnalysisReport) -> Result<(), PresentError>;
}
