//prior-month momentum stock selection compared against a market benchmark

pub mod config;
pub mod data;
pub mod engine;
pub mod metrics;
pub mod providers;
pub mod report;
pub mod series;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AnalysisConfig, ConfigError};
    pub use crate::data::{load_samples, DateRange, PriceSample};
    pub use crate::engine::{AnalysisEngine, AnalysisError, AnalysisReport, ComparisonOutcome};
    pub use crate::metrics::{
        AmountTransform, BenchmarkComparator, ComparisonError, ComparisonSummary, ComparisonView,
    };
    pub use crate::providers::{
        Constituent, ConstituentLister, CsvFetcher, CsvLister, MarketDataFetcher, ProviderError,
        WikipediaLister, YahooFetcher,
    };
    pub use crate::report::{CsvPresenter, Presenter, SvgChartPresenter, TablePresenter};
    pub use crate::series::{Lookup, PriceSeries, ReturnSeries, SeriesError, Unavailability};
    pub use crate::strategy::{Momentum, StrategyResult, StrategySelector};
}
