// geocoder.rs
use crate::config::GeocoderConfig;
use crate::errors::ConfigError;
use crate::geo::{Coordinate, GeocodeError};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Address lookup capability. Implementations may block and may fail;
/// rate limiting is the resolver's job, not the backend's.
pub trait Geocoder {
    fn geocode(&self, address: &str, postal_code: Option<&str>)
        -> Result<Coordinate, GeocodeError>;
}

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeConfigError> {
        let mut base = config.parsed_base_url()?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let search_url = base
            .join("search")
            .map_err(|source| ConfigError::BaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(GeocodeError::from)?;

        Ok(Self { client, search_url })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

/// Building the client can fail on bad config or TLS setup.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeConfigError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] GeocodeError),
}

/// "address, postal_code" with blank parts dropped.
pub fn query_text(address: &str, postal_code: Option<&str>) -> String {
    [Some(address), postal_code]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Geocoder for NominatimGeocoder {
    fn geocode(
        &self,
        address: &str,
        postal_code: Option<&str>,
    ) -> Result<Coordinate, GeocodeError> {
        let query = query_text(address, postal_code);

        let resp = self
            .client
            .get(self.search_url.clone())
            .query(&[("q", query.as_str()), ("format", "jsonv2"), ("limit", "1")])
            .send()?;

        let status = resp.status();
        if let Err(e) = classify(status) {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            debug!("Geocoder answered HTTP {status} for '{query}': {text}");
            return Err(e);
        }

        let hits: Vec<SearchHit> = resp.json()?;
        let hit = hits.into_iter().next().ok_or(GeocodeError::NoMatch)?;

        parse_hit(&hit)
    }
}

/// Server errors and throttling are `Unavailable`; any other non-2xx is `BadResponse`.
fn classify(status: StatusCode) -> Result<(), GeocodeError> {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Err(GeocodeError::Unavailable(format!("HTTP {status}")))
    } else if !status.is_success() {
        Err(GeocodeError::BadResponse(format!("HTTP {status}")))
    } else {
        Ok(())
    }
}

fn parse_hit(hit: &SearchHit) -> Result<Coordinate, GeocodeError> {
    let lat: f64 = hit
        .lat
        .trim()
        .parse()
        .map_err(|_| GeocodeError::BadResponse(format!("latitude '{}'", hit.lat)))?;
    let lon: f64 = hit
        .lon
        .trim()
        .parse()
        .map_err(|_| GeocodeError::BadResponse(format!("longitude '{}'", hit.lon)))?;

    Coordinate::new(lat, lon)
        .ok_or_else(|| GeocodeError::BadResponse(format!("out of range: {lat}, {lon}")))
}
