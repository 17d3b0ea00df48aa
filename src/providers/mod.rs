//sources of prices and index membership
//online sources talk to yahoo finance and wikipedia, csv sources read the same shapes from disk

pub mod csv_source;
pub mod errors;
pub mod wikipedia;
pub mod yahoo;

use crate::data::{DateRange, PriceSample};
use serde::{Deserialize, Serialize};

pub use csv_source::{CsvFetcher, CsvLister};
pub use errors::ProviderError;
pub use wikipedia::WikipediaLister;
pub use yahoo::YahooFetcher;

//one member of the index: display name and market symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituent {
    pub name: String,
    pub symbol: String,
}

//daily open/close history for one instrument
//trading days only, ascending, within `range`
pub trait MarketDataFetcher: Send + Sync {
    fn fetch(&self, symbol: &str, range: DateRange) -> Result<Vec<PriceSample>, ProviderError>;
}

//current members of the index, in listing order
pub trait ConstituentLister: Send + Sync {
    fn list_constituents(&self) -> Result<Vec<Constituent>, ProviderError>;
}
