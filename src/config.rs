//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default, so a partial file (or none at all) is
//! valid. Secrets are never stored in the config; it only names the
//! environment variables and key files they are read from.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::credentials::CredentialSources;
use crate::types::{Coordinate, ProviderKind};

pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const HERE_DISCOVER_URL: &str = "https://places.cit.api.here.com/places/v1/discover/search";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub geocoding: GeocodingConfig,
    pub google: GoogleConfig,
    pub here: HereConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Providers in fallback order.
    pub providers: Vec<ProviderKind>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            providers: ProviderKind::DEFAULT_ORDER.to_vec(),
            timeout_secs: 10,
            user_agent: format!("geolocate/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleConfig {
    pub endpoint: String,
    pub api_key_env: String,
    pub key_file: Option<PathBuf>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: GOOGLE_GEOCODE_URL.to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            key_file: Some(PathBuf::from("google_dev_key.txt")),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HereConfig {
    pub endpoint: String,
    pub app_id_env: String,
    pub app_code_env: String,
    pub key_file: Option<PathBuf>,
    /// Search anchor as `[lat, lng]`.
    pub anchor: [f64; 2],
}

impl Default for HereConfig {
    fn default() -> Self {
        Self {
            endpoint: HERE_DISCOVER_URL.to_string(),
            app_id_env: "HERE_APP_ID".to_string(),
            app_code_env: "HERE_APP_CODE".to_string(),
            key_file: Some(PathBuf::from("here_dev_key.txt")),
            anchor: [0.0, 0.0],
        }
    }
}

/// The subset of configuration a `GeocodingClient` is built from.
#[derive(Debug, Clone)]
pub struct GeocodingSettings {
    pub providers: Vec<ProviderKind>,
    pub timeout: Duration,
    pub user_agent: String,
    pub google_endpoint: String,
    pub here_endpoint: String,
    pub here_anchor: Coordinate,
}

impl Default for GeocodingSettings {
    fn default() -> Self {
        AppConfig::default().settings()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn settings(&self) -> GeocodingSettings {
        GeocodingSettings {
            providers: self.geocoding.providers.clone(),
            timeout: Duration::from_secs(self.geocoding.timeout_secs),
            user_agent: self.geocoding.user_agent.clone(),
            google_endpoint: self.google.endpoint.clone(),
            here_endpoint: self.here.endpoint.clone(),
            here_anchor: Coordinate::new(self.here.anchor[0], self.here.anchor[1]),
        }
    }

    pub fn credential_sources(&self) -> CredentialSources {
        CredentialSources {
            google_key_env: Some(self.google.api_key_env.clone()),
            google_key_file: self.google.key_file.clone(),
            here_id_env: Some(self.here.app_id_env.clone()),
            here_code_env: Some(self.here.app_code_env.clone()),
            here_key_file: self.here.key_file.clone(),
        }
    }
}
