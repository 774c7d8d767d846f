// feed.rs
use crate::config::SigpcConfig;
use crate::purchases::PurchaseFeedError;
use reqwest::blocking::Client;
use tracing::info;

/// Download the purchase XML as text.
pub fn fetch_feed(config: &SigpcConfig) -> Result<String, PurchaseFeedError> {
    let fetch_error = |source: reqwest::Error| PurchaseFeedError::Fetch {
        url: config.url.clone(),
        source,
    };

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .build()
        .map_err(fetch_error)?;

    info!("Downloading purchase feed {}", config.url);
    let resp = client.get(&config.url).send().map_err(fetch_error)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PurchaseFeedError::Status {
            url: config.url.clone(),
            status,
        });
    }

    resp.text().map_err(fetch_error)
}
