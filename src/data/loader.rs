use crate::data::sample::PriceSample;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read CSV file {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to parse date '{value}' at line {line} of {path:?}")]
    InvalidDate {
        path: PathBuf,
        line: usize,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    open: f64,
    close: f64,
}

//loads daily samples from a csv file with a date,open,close header
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<PriceSample>, LoadError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|_| {
            LoadError::InvalidDate {
                path: path.to_path_buf(),
                line: index + 2,
                value: record.date.clone(),
            }
        })?;

        samples.push(PriceSample::new(date, record.open, record.close));
    }

    sort_and_dedup(&mut samples);

    Ok(samples)
}

//sorts by date and keeps the first sample of any repeated date
pub fn sort_and_dedup(samples: &mut Vec<PriceSample>) {
    samples.sort_by_key(|sample| sample.date);
    samples.dedup_by_key(|sample| sample.date);
}
