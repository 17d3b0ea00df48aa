use crate::data::{load_samples, DateRange, LoadError, PriceSample};
use crate::providers::{Constituent, ConstituentLister, MarketDataFetcher, ProviderError};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};

//reads `<dir>/<symbol>.csv` files with a date,open,close header
#[derive(Debug, Clone)]
pub struct CsvFetcher {
    dir: PathBuf,
}

impl CsvFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvFetcher { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }
}

impl MarketDataFetcher for CsvFetcher {
    fn fetch(&self, symbol: &str, range: DateRange) -> Result<Vec<PriceSample>, ProviderError> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(ProviderError::Fetch {
                target: symbol.to_string(),
                message: format!("no price file at {:?}", path),
            });
        }

        let mut samples = load_samples(&path)?;
        samples.retain(|sample| range.contains(sample.date));
        Ok(samples)
    }
}

//reads constituents from a csv file with a name,symbol header
#[derive(Debug, Clone)]
pub struct CsvLister {
    path: PathBuf,
}

impl CsvLister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvLister { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConstituentLister for CsvLister {
    fn list_constituents(&self) -> Result<Vec<Constituent>, ProviderError> {
        let csv_error = |source| {
            ProviderError::Load(LoadError::Csv {
                path: self.path.clone(),
                source,
            })
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(csv_error)?;

        let mut constituents = Vec::new();
        for result in reader.deserialize() {
            let constituent: Constituent = result.map_err(csv_error)?;
            constituents.push(constituent);
        }

        if constituents.is_empty() {
            return Err(ProviderError::Parse {
                target: self.path.display().to_string(),
                message: "constituent list is empty".to_string(),
            });
        }

        Ok(constituents)
    }
}
