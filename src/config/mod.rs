use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Environment variable missing: {name}")]
    MissingEnvironmentVariable { name: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reviews: ReviewsConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Configuration for the review aggregation upstream. The API credential is
/// injected here at construction time rather than read ad hoc by the
/// aggregator; a missing credential is a valid state that yields fallback
/// review data.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsConfig {
    #[serde(default)]
    pub reviews_api_key: Option<String>,
    #[serde(default = "default_reviews_endpoint")]
    pub reviews_endpoint: String,
    #[serde(default = "default_reviews_timeout")]
    pub reviews_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default = "default_otlp_endpoint_option")]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let server = ServerConfig::from_env()?;
        let database = DatabaseConfig::from_env()?;
        let reviews = ReviewsConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;

        let config = Config {
            server,
            database,
            reviews,
            observability,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating configuration");

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.database.database_url.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Database URL cannot be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError {
                message: "Database pool must allow at least one connection".to_string(),
            });
        }

        if self.reviews.reviews_endpoint.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Reviews endpoint cannot be empty".to_string(),
            });
        }

        if self.reviews.reviews_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Reviews timeout cannot be 0".to_string(),
            });
        }

        info!("Configuration validation completed");
        Ok(())
    }
}

fn from_env_section<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("BISTRO"))
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

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env_section("server")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env_section("database")
    }
}

impl ReviewsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env_section("reviews")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.reviews_timeout_seconds)
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        from_env_section("observability")
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> usize {
    1024 * 1024 // 1MB
}

pub(crate) fn default_database_url() -> String {
    "postgres://localhost:5432/bistro".to_string()
}

pub(crate) fn default_max_connections() -> u32 {
    5
}

pub(crate) fn default_reviews_endpoint() -> String {
    "https://maps.googleapis.com/maps/api/place/details/json".to_string()
}

pub(crate) fn default_reviews_timeout() -> u64 {
    10
}

pub(crate) fn default_service_name() -> String {
    "bistro-rs".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_otlp_endpoint_option() -> Option<String> {
    std::env::var("BISTRO_OTLP_ENDPOINT").ok()
}

pub(crate) fn default_enable_json_logging() -> bool {
    std::env::var("BISTRO_ENABLE_JSON_LOGGING")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

pub(crate) fn default_metrics_port() -> u16 {
    9090
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests;
