use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub lookup: LookupConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load configuration from `SHOECART_*` environment variables
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = Config {
            lookup: LookupConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.lookup.api_base_url).map_err(|e| {
            ConfigError::ValidationError {
                message: format!("Invalid API base URL {}: {}", self.lookup.api_base_url, e),
            }
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                message: format!("API base URL must be http or https, got {}", url.scheme()),
            });
        }

        if self.lookup.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.storage.storage_key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Storage key cannot be empty".to_string(),
            });
        }

        if self.storage.storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Storage directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn load_section<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("SHOECART"))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl LookupConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("lookup")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("storage")
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("observability")
    }

    /// Configured OTLP endpoint, treating an empty value as unset
    pub fn otlp_endpoint(&self) -> Option<&str> {
        self.otlp_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

// Default value functions
pub(crate) fn default_api_base_url() -> String {
    "http://localhost:3333".to_string()
}

pub(crate) fn default_timeout() -> u64 {
    10
}

pub(crate) fn default_storage_dir() -> PathBuf {
    PathBuf::from(".shoecart")
}

pub(crate) fn default_storage_key() -> String {
    "@RocketShoes:cart".to_string()
}

pub(crate) fn default_service_name() -> String {
    "shoecart-rs".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
