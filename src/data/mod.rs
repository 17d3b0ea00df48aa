pub mod loader;
pub mod sample;

pub use loader::{load_samples, sort_and_dedup, LoadError};
pub use sample::{DateRange, PriceSample, RangeError};
