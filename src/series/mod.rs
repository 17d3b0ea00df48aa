pub mod lookup;
pub mod price_series;
pub mod return_series;

pub use lookup::{Lookup, Unavailability};
pub use price_series::{percent_change, PriceSeries, SeriesError, TRAILING_WINDOW};
pub use return_series::{ReturnSeries, ReturnSeriesError};
