use crate::config::{AnalysisConfig, ConfigError};
use crate::data::DateRange;
use crate::metrics::{BenchmarkComparator, ComparisonError, ComparisonSummary, ComparisonView};
use crate::providers::{
    Constituent, ConstituentLister, CsvFetcher, CsvLister, MarketDataFetcher, ProviderError,
    WikipediaLister, YahooFetcher,
};
use crate::series::{PriceSeries, SeriesError};
use crate::strategy::{StrategyResult, StrategySelector};
use chrono::NaiveDate;
use indexmap::IndexMap;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

//name of the benchmark curve in comparisons
pub const BENCHMARK_NAME: &str = "Benchmark";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

//how the benchmark-vs-strategy comparison ended
#[derive(Debug, Clone)]
pub enum ComparisonOutcome {
    Compared(ComparisonView),
    //no instrument met the momentum criterion
    NoSelection,
    //the selection has no aggregate curve, or it shares no date with the benchmark
    NoOverlap(ComparisonError),
}

impl ComparisonOutcome {
    pub fn view(&self) -> Option<&ComparisonView> {
        match self {
            ComparisonOutcome::Compared(view) => Some(view),
            _ => None,
        }
    }
}

//everything a presenter needs from one run
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub range: DateRange,
    pub reference_date: NaiveDate,
    pub benchmark: PriceSeries,
    pub universe_size: usize,

    //constituents dropped because their prices could not be loaded
    pub skipped: Vec<String>,

    pub strategy: StrategyResult,
    pub comparison: ComparisonOutcome,
}

impl AnalysisReport {
    pub fn summary(&self) -> Option<ComparisonSummary> {
        let view = self.comparison.view()?;
        ComparisonSummary::from_view(view, self.strategy.len())
    }
}

//wires the sources, the selector and the comparator together
pub struct AnalysisEngine {
    fetcher: Box<dyn MarketDataFetcher>,
    lister: Box<dyn ConstituentLister>,
    selector: StrategySelector,
}

impl AnalysisEngine {
    pub fn new(fetcher: Box<dyn MarketDataFetcher>, lister: Box<dyn ConstituentLister>) -> Self {
        AnalysisEngine {
            fetcher,
            lister,
            selector: StrategySelector::new(),
        }
    }

    //csv sources when configured, otherwise yahoo finance and wikipedia
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let fetcher: Box<dyn MarketDataFetcher> = match &config.prices_dir {
            Some(dir) => Box::new(CsvFetcher::new(dir)),
            None => Box::new(YahooFetcher::new()?),
        };

        let lister: Box<dyn ConstituentLister> = match &config.constituents_csv {
            Some(path) => Box::new(CsvLister::new(path)),
            None => Box::new(WikipediaLister::new(config.constituents_url.clone())?),
        };

        Ok(AnalysisEngine::new(fetcher, lister))
    }

    //fetches one instrument and builds its series
    pub fn load_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, AnalysisError> {
        let samples = self.fetcher.fetch(symbol, range)?;
        debug!(%symbol, samples = samples.len(), "fetched");
        Ok(PriceSeries::new(symbol, range, samples)?)
    }

    //loads every constituent in parallel, keyed by display name in listing order
    pub fn load_universe(
        &self,
        config: &AnalysisConfig,
        range: DateRange,
    ) -> Result<(IndexMap<String, PriceSeries>, Vec<String>), AnalysisError> {
        let constituents = self.lister.list_constituents()?;
        info!("Listed {} constituents", constituents.len());

        let loaded: Vec<(Constituent, Result<PriceSeries, AnalysisError>)> = constituents
            .into_par_iter()
            .map(|constituent| {
                let symbol = config.market_symbol(&constituent.symbol);
                let series = self.load_series(&symbol, range);
                (constituent, series)
            })
            .collect();

        let mut universe = IndexMap::with_capacity(loaded.len());
        let mut skipped = Vec::new();

        for (constituent, series) in loaded {
            match series {
                Ok(series) => {
                    universe.insert(constituent.name, series);
                }
                Err(e) if config.skip_failed_constituents => {
                    warn!("Skipping {} ({}): {}", constituent.name, constituent.symbol, e);
                    skipped.push(constituent.name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok((universe, skipped))
    }

    //runs the full pipeline for one configuration
    pub fn run(&self, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
        let range = config.validate()?;

        info!("Loading benchmark {} for {}", config.benchmark_symbol, range);
        let benchmark = self.load_series(&config.benchmark_symbol, range)?;

        let (universe, skipped) = self.load_universe(config, range)?;
        info!(
            "Loaded {} constituents ({} skipped)",
            universe.len(),
            skipped.len()
        );

        let strategy = self.selector.select(&universe, config.reference_date);

        let comparator = match config.amount {
            Some(amount) => BenchmarkComparator::with_amount(amount, config.transform),
            None => BenchmarkComparator::new(),
        };

        let comparison = match (&strategy.aggregate, strategy.is_empty()) {
            (_, true) => ComparisonOutcome::NoSelection,
            (Some(aggregate), false) => {
                let benchmark_curve = benchmark.cumulative_series_named(BENCHMARK_NAME);
                match comparator.compare(&benchmark_curve, aggregate) {
                    Ok(view) => ComparisonOutcome::Compared(view),
                    Err(e) => {
                        warn!("{}", e);
                        ComparisonOutcome::NoOverlap(e)
                    }
                }
            }
            (None, false) => ComparisonOutcome::NoOverlap(ComparisonError::NoOverlap {
                left: BENCHMARK_NAME.to_string(),
                right: self.selector.aggregate_name().to_string(),
            }),
        };

        Ok(AnalysisReport {
            range,
            reference_date: config.reference_date,
            benchmark,
            universe_size: universe.len(),
            skipped,
            strategy,
            comparison,
        })
    }
}
