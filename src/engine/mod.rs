pub mod analysis;

pub use analysis::{
    AnalysisEngine, AnalysisError, AnalysisReport, ComparisonOutcome, BENCHMARK_NAME,
};
