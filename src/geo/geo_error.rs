use thiserror::Error;

/// Failures reported by a geocoding backend.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Geocoder timed out")]
    Timeout,

    #[error("Geocoder unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected geocoder response: {0}")]
    BadResponse(String),

    #[error("No match for query")]
    NoMatch,
}

impl From<reqwest::Error> for GeocodeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeocodeError::Timeout
        } else if e.is_connect() {
            GeocodeError::Unavailable(e.to_string())
        } else if e.is_decode() {
            GeocodeError::BadResponse(e.to_string())
        } else {
            GeocodeError::Network(e.to_string())
        }
    }
}

/// Why a location could not be turned into a coordinate.
/// Always recoverable: callers continue without geo context.
#[derive(Debug, Error)]
pub enum ResolutionFailure {
    #[error("no coordinates or address on record")]
    NoLocation,

    #[error("geocoder disabled")]
    GeocoderDisabled,

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}
