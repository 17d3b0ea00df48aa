use crate::data::{sort_and_dedup, DateRange, PriceSample};
use crate::providers::{MarketDataFetcher, ProviderError};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

pub const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

//yahoo rejects requests without a browser-like agent
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    //exchange offset from utc, in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

//daily bars from the yahoo finance chart endpoint
pub struct YahooFetcher {
    client: Client,
    base_url: String,
}

impl YahooFetcher {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(CHART_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ProviderError::Request {
                target: "http client".to_string(),
                source,
            })?;

        Ok(YahooFetcher {
            client,
            base_url: base_url.into(),
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| ProviderError::Parse {
            target: self.base_url.clone(),
            message: e.to_string(),
        })?;

        url.path_segments_mut()
            .map_err(|_| ProviderError::Parse {
                target: self.base_url.clone(),
                message: "base url cannot carry a path".to_string(),
            })?
            .push(symbol);

        Ok(url)
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp()
}

impl MarketDataFetcher for YahooFetcher {
    fn fetch(&self, symbol: &str, range: DateRange) -> Result<Vec<PriceSample>, ProviderError> {
        let url = self.chart_url(symbol)?;
        debug!(%symbol, %range, "fetching daily chart");

        let query = [
            ("period1", unix_midnight(range.start).to_string()),
            ("period2", unix_midnight(range.end).to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .map_err(|source| ProviderError::Request {
                target: symbol.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| ProviderError::Request {
            target: symbol.to_string(),
            source,
        })?;

        if !status.is_success() {
            //unknown symbols come back as 404 with a chart error payload
            let message = match parse_chart(symbol, &body, range) {
                Err(ProviderError::Fetch { message, .. }) => message,
                _ => format!("HTTP {}", status),
            };
            return Err(ProviderError::Fetch {
                target: symbol.to_string(),
                message,
            });
        }

        parse_chart(symbol, &body, range)
    }
}

//decodes a chart payload into samples within `range`, skipping days with no open or close
pub fn parse_chart(
    symbol: &str,
    body: &str,
    range: DateRange,
) -> Result<Vec<PriceSample>, ProviderError> {
    let parse_error = |message: String| ProviderError::Parse {
        target: symbol.to_string(),
        message,
    };

    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| parse_error(e.to_string()))?;

    if let Some(error) = envelope.chart.error {
        return Err(ProviderError::Fetch {
            target: symbol.to_string(),
            message: format!("{}: {}", error.code, error.description),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| parse_error("chart has no result".to_string()))?;

    if result.timestamp.is_empty() {
        return Ok(vec![]);
    }

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| parse_error("chart has no quote block".to_string()))?;

    let rows = result.timestamp.len();
    if quote.open.len() != rows || quote.close.len() != rows {
        return Err(parse_error(format!(
            "{} timestamps but {} opens and {} closes",
            rows,
            quote.open.len(),
            quote.close.len()
        )));
    }

    let mut samples = Vec::with_capacity(rows);

    for (i, &timestamp) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(close)) = (quote.open[i], quote.close[i]) else {
            continue;
        };

        let date = DateTime::from_timestamp(timestamp + result.meta.gmtoffset, 0)
            .ok_or_else(|| parse_error(format!("timestamp {} out of range", timestamp)))?
            .date_naive();

        if range.contains(date) {
            samples.push(PriceSample::new(date, open, close));
        }
    }

    sort_and_dedup(&mut samples);

    Ok(samples)
}
