//! TOML configuration with environment overrides for credentials.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const GOOGLE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const JSONBIN_BASE_URL: &str = "https://api.jsonbin.io/v3";

/// Key value shipped in sample configs; treated as "no key".
const PLACEHOLDER_KEY: &str = "YOUR_JSONBIN_API_KEY";

pub const ENV_GEOCODER_KEY: &str = "TOPO_GEOCODER_KEY";
pub const ENV_STORAGE_KEY: &str = "TOPO_STORAGE_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub geocoder: GeocoderConfig,
    pub storage: StorageConfig,
}

/// Which geocoding service answers lookups
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Google,
    #[default]
    Nominatim,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub backend: BackendKind,
    pub api_key: Option<String>,
    /// Overrides the backend's public endpoint
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    /// Delay between consecutive lookups; defaults per backend
    pub throttle_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            api_key: None,
            endpoint: None,
            timeout_secs: 10,
            throttle_ms: None,
            user_agent: format!("topo/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GeocoderConfig {
    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.backend) {
            (Some(url), _) => url,
            (None, BackendKind::Google) => GOOGLE_ENDPOINT,
            (None, BackendKind::Nominatim) => NOMINATIM_ENDPOINT,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Nominatim's usage policy allows one request per second.
    pub fn throttle(&self) -> Duration {
        let ms = self.throttle_ms.unwrap_or(match self.backend {
            BackendKind::Google => 0,
            BackendKind::Nominatim => 1000,
        });
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub collection_id: Option<String>,
    /// Page that opens shared lists
    pub share_base_url: String,
    /// Query parameter carrying the list id
    pub share_param: String,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: JSONBIN_BASE_URL.to_string(),
            collection_id: None,
            share_base_url: "http://localhost:8080/".to_string(),
            share_param: "lijst".to_string(),
            timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    /// The access key, if one is actually set.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_KEY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load from `path` if given (defaults otherwise), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)
                .with_context(|| format!("Loading {}", path.display()))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_GEOCODER_KEY) {
            self.geocoder.api_key = Some(key);
        }
        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            self.storage.api_key = Some(key);
        }
    }
}
