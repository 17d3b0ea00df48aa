use crate::data::LoadError;
use thiserror::Error;

//errors raised by market-data and constituent sources
//every variant names the failing instrument id, url or file
#[derive(Debug, Error)]
pub enum ProviderError {
    //the http request itself failed
    #[error("Request for {target} failed")]
    Request {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    //the source answered but refused the lookup
    #[error("Failed to fetch {target}: {message}")]
    Fetch { target: String, message: String },

    //the response did not have the expected shape
    #[error("Unexpected data from {target}: {message}")]
    Parse { target: String, message: String },

    #[error(transparent)]
    Load(#[from] LoadError),
}
