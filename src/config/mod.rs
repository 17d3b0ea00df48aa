pub mod analysis_config;

pub use analysis_config::{AnalysisConfig, ConfigError, DEFAULT_BENCHMARK, DEFAULT_SYMBOL_SUFFIX};
