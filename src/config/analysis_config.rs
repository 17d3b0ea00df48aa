use crate::data::{DateRange, RangeError};
use crate::metrics::AmountTransform;
use crate::providers::wikipedia::NIFTY_50_URL;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BENCHMARK: &str = "^NSEI";
pub const DEFAULT_SYMBOL_SUFFIX: &str = ".NS";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("Invalid investment amount: {0}")]
    InvalidAmount(f64),
    #[error("Benchmark symbol must not be empty")]
    EmptyBenchmark,
}

//complete analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    //period, end exclusive
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    //any date in the month whose strategy is wanted
    pub reference_date: NaiveDate,

    //investment amount; none keeps the curves in percent
    pub amount: Option<f64>,
    pub transform: AmountTransform,

    //benchmark and universe
    pub benchmark_symbol: String,
    pub symbol_suffix: String,
    pub constituents_url: String,
    pub skip_failed_constituents: bool,

    //offline sources (csv instead of http)
    pub prices_dir: Option<PathBuf>,
    pub constituents_csv: Option<PathBuf>,

    //optional output paths
    pub output_csv: Option<PathBuf>,
    pub output_svg: Option<PathBuf>,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            start_date: ymd(2023, 10, 1),
            end_date: ymd(2024, 1, 8),
            reference_date: ymd(2023, 12, 1),
            amount: None,
            transform: AmountTransform::Growth,
            benchmark_symbol: DEFAULT_BENCHMARK.to_string(),
            symbol_suffix: DEFAULT_SYMBOL_SUFFIX.to_string(),
            constituents_url: NIFTY_50_URL.to_string(),
            skip_failed_constituents: false,
            prices_dir: None,
            constituents_csv: None,
            output_csv: None,
            output_svg: None,
        }
    }
}

impl AnalysisConfig {
    //the requested period as a half-open range
    pub fn range(&self) -> Result<DateRange, RangeError> {
        DateRange::new(self.start_date, self.end_date)
    }

    //checks the period, the amount and the benchmark
    pub fn validate(&self) -> Result<DateRange, ConfigError> {
        let range = self.range()?;

        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ConfigError::InvalidAmount(amount));
            }
        }

        if self.benchmark_symbol.trim().is_empty() {
            return Err(ConfigError::EmptyBenchmark);
        }

        Ok(range)
    }

    //market symbol for a listed constituent symbol
    pub fn market_symbol(&self, listed: &str) -> String {
        format!("{}{}", listed, self.symbol_suffix)
    }

    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
