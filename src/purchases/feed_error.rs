use thiserror::Error;

#[derive(Debug, Error)]
pub enum PurchaseFeedError {
    #[error("Failed to fetch purchase feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Purchase feed {url} answered HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed purchase XML: {0}")]
    Xml(#[from] quick_xml::Error),
}
