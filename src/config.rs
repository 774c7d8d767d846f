// config.rs
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = "surplus-match/0.1 (food donation matching)";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_SIGPC_URL: &str = "https://s3.amazonaws.com/sigpc-data/ultimos_90_dias.xml";

/// Top-level settings, loaded from an optional TOML file.
/// Every section falls back to its defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    pub matching: MatchingConfig,
    pub geocoder: GeocoderConfig,
    pub sigpc: SigpcConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub offers_file: String,
    pub schools_file: String,
    pub entities_file: String,
    pub history_file: String,
    /// Purchase lots from the SIGPC feed that may expire before use.
    pub expiring_stock_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("_data"),
            offers_file: "offers.json".to_string(),
            schools_file: "schools.json".to_string(),
            entities_file: "entities.json".to_string(),
            history_file: "collection_history.csv".to_string(),
            expiring_stock_file: "expiring_stock.json".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn offers_path(&self) -> PathBuf {
        self.data_dir.join(&self.offers_file)
    }

    pub fn schools_path(&self) -> PathBuf {
        self.data_dir.join(&self.schools_file)
    }

    pub fn entities_path(&self) -> PathBuf {
        self.data_dir.join(&self.entities_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn expiring_stock_path(&self) -> PathBuf {
        self.data_dir.join(&self.expiring_stock_file)
    }
}

/// Ranking parameters handed to the distance ranker.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub max_recommendations: usize,
    pub earth_radius_km: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 3,
            earth_radius_km: 6371.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// When false, address fallback always fails (offline mode).
    pub enabled: bool,
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Minimum spacing between two geocoder requests.
    pub rate_limit_seconds: f64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            rate_limit_seconds: 1.0,
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Negative or NaN values collapse to "no spacing".
    pub fn rate_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.rate_limit_seconds).unwrap_or(Duration::ZERO)
    }

    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }
}

/// Where the school-purchase XML feed is downloaded from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SigpcConfig {
    pub url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for SigpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SIGPC_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 60,
        }
    }
}

impl SigpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
