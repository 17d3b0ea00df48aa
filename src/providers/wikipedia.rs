use crate::providers::yahoo::USER_AGENT;
use crate::providers::{Constituent, ConstituentLister, ProviderError};
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub const NIFTY_50_URL: &str = "https://en.wikipedia.org/wiki/NIFTY_50";

const NAME_HEADER: &str = "Company Name";
const SYMBOL_HEADER: &str = "Symbol";

//index members scraped from the first sortable wikitable of a wikipedia page
pub struct WikipediaLister {
    client: Client,
    url: String,
}

impl WikipediaLister {
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ProviderError::Request {
                target: "http client".to_string(),
                source,
            })?;

        Ok(WikipediaLister {
            client,
            url: url.into(),
        })
    }

    pub fn nifty_50() -> Result<Self, ProviderError> {
        Self::new(NIFTY_50_URL)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ConstituentLister for WikipediaLister {
    fn list_constituents(&self) -> Result<Vec<Constituent>, ProviderError> {
        debug!(url = %self.url, "fetching constituents page");

        let request_error = |source| ProviderError::Request {
            target: self.url.clone(),
            source,
        };

        let response = self.client.get(&self.url).send().map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Fetch {
                target: self.url.clone(),
                message: format!("HTTP {}", status),
            });
        }

        let html = response.text().map_err(request_error)?;
        parse_constituents_table(&html, &self.url)
    }
}

fn selector(css: &str, source: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| ProviderError::Parse {
        target: source.to_string(),
        message: format!("bad selector '{}': {}", css, e),
    })
}

//cell text with whitespace collapsed and trailing footnote marks like "[1]" removed
fn cell_text(cell: ElementRef<'_>) -> String {
    let mut text = cell.text().collect::<Vec<_>>().join(" ");
    text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    while text.ends_with(']') {
        match text.rfind('[') {
            Some(open) => text.truncate(open),
            None => break,
        }
        text = text.trim_end().to_string();
    }

    text
}

//reads (Company Name, Symbol) rows from the first `table.wikitable.sortable`
pub fn parse_constituents_table(html: &str, source: &str) -> Result<Vec<Constituent>, ProviderError> {
    let parse_error = |message: &str| ProviderError::Parse {
        target: source.to_string(),
        message: message.to_string(),
    };

    let document = Html::parse_document(html);
    let table_selector = selector("table.wikitable.sortable", source)?;
    let row_selector = selector("tr", source)?;
    let cell_selector = selector("th, td", source)?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| parse_error("no sortable wikitable on the page"))?;

    let mut rows = table.select(&row_selector);

    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| parse_error("constituents table has no rows"))?
        .select(&cell_selector)
        .map(cell_text)
        .collect();

    let column = |name: &str| {
        header
            .iter()
            .position(|title| title.eq_ignore_ascii_case(name))
            .ok_or_else(|| parse_error(&format!("constituents table has no '{}' column", name)))
    };
    let name_column = column(NAME_HEADER)?;
    let symbol_column = column(SYMBOL_HEADER)?;

    let mut constituents = Vec::new();

    for row in rows {
        let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
        let (Some(name), Some(symbol)) = (cells.get(name_column), cells.get(symbol_column)) else {
            continue;
        };
        if name.is_empty() || symbol.is_empty() {
            continue;
        }

        constituents.push(Constituent {
            name: name.clone(),
            symbol: symbol.clone(),
        });
    }

    if constituents.is_empty() {
        return Err(parse_error("constituents table has no data rows"));
    }

    Ok(constituents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table class="wikitable"><tr><th>Other</th></tr><tr><td>x</td></tr></table>
        <table class="wikitable sortable">
          <tbody>
            <tr><th>Company Name</th><th>Symbol</th><th>Sector<sup>[1]</sup></th></tr>
            <tr><td><a href="/wiki/Adani">Adani Enterprises</a></td><td>ADANIENT</td><td>Metals</td></tr>
            <tr><td>Bajaj   Auto<sup>[a]</sup></td><td>BAJAJ-AUTO</td><td>Automobile</td></tr>
            <tr><td></td><td></td><td></td></tr>
            <tr><td>Mahindra &amp; Mahindra</td><td>M&amp;M</td><td>Automobile</td></tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn reads_names_and_symbols_in_page_order() {
        let constituents = parse_constituents_table(PAGE, NIFTY_50_URL).unwrap();
        assert_eq!(constituents.len(), 3);
        assert_eq!(
            constituents[0],
            Constituent {
                name: "Adani Enterprises".to_string(),
                symbol: "ADANIENT".to_string()
            }
        );
        assert_eq!(constituents[1].name, "Bajaj Auto");
        assert_eq!(constituents[2].symbol, "M&M");
    }

    #[test]
    fn missing_table_is_a_parse_error() {
        let err = parse_constituents_table("<html><p>moved</p></html>", NIFTY_50_URL).unwrap_err();
        match err {
            ProviderError::Parse { target, message } => {
                assert_eq!(target, NIFTY_50_URL);
                assert!(message.contains("wikitable"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn renamed_column_is_a_parse_error() {
        let page = r#"<table class="wikitable sortable">
            <tr><th>Company</th><th>Symbol</th></tr>
            <tr><td>A</td><td>B</td></tr></table>"#;
        let err = parse_constituents_table(page, NIFTY_50_URL).unwrap_err();
        assert!(err.to_string().contains(NIFTY_50_URL));
    }
}
