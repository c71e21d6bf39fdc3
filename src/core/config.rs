//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Default data.gov.my catalogue endpoint.
pub const DEFAULT_API_URL: &str = "https://api.data.gov.my/data-catalogue";

/// Default location of the car registration transactions CSV.
pub const DEFAULT_CARS_CSV_URL: &str = "https://storage.data.gov.my/transportation/cars_2025.csv";

/// Default per-request timeout. The cars CSV is tens of megabytes.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Remote data.gov.my endpoints.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for the remote data.gov.my endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the data catalogue API (`?id=<dataset>&filter=...`).
    pub base_url: String,

    /// URL of the car registration transactions CSV.
    pub cars_csv_url: String,

    /// Timeout applied to every outbound request, in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// `DATAGOVMY_TIMEOUT_SECS` value that did not parse, rejected by `validate`.
    #[serde(skip)]
    pub invalid_timeout: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            cars_csv_url: DEFAULT_CARS_CSV_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("datagovmy-mcp-server/{}", env!("CARGO_PKG_VERSION")),
            invalid_timeout: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "data.gov.my".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...), remote endpoints use the
    /// `DATAGOVMY_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(url) = std::env::var("DATAGOVMY_API_URL") {
            config.api.base_url = url;
        }

        if let Ok(url) = std::env::var("DATAGOVMY_CARS_CSV_URL") {
            config.api.cars_csv_url = url;
        }

        if let Ok(timeout) = std::env::var("DATAGOVMY_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.api.timeout_secs = secs,
                Err(_) => config.api.invalid_timeout = Some(timeout),
            }
        }

        config
    }

    /// Check that the remote endpoints are usable before serving.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("DATAGOVMY_API_URL", &self.api.base_url),
            ("DATAGOVMY_CARS_CSV_URL", &self.api.cars_csv_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| Error::config(format!("{} is not a valid URL ({}): {}", name, url, e)))?;
        }

        if let Some(raw) = &self.api.invalid_timeout {
            return Err(Error::config(format!(
                "DATAGOVMY_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                raw
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config("DATAGOVMY_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_endpoints() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.data.gov.my/data-catalogue");
        assert_eq!(
            config.api.cars_csv_url,
            "https://storage.data.gov.my/transportation/cars_2025.csv"
        );
        assert_eq!(config.server.name, "data.gov.my");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_overrides_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DATAGOVMY_API_URL", "http://127.0.0.1:9999/data-catalogue");
            std::env::set_var("DATAGOVMY_TIMEOUT_SECS", "5");
        }
        let config = Config::from_env();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9999/data-catalogue");
        assert_eq!(config.api.timeout_secs, 5);
        unsafe {
            std::env::remove_var("DATAGOVMY_API_URL");
            std::env::remove_var("DATAGOVMY_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_timeout_is_rejected_by_validate() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("DATAGOVMY_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api.invalid_timeout.as_deref(), Some("soon"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("\"soon\""));
        unsafe {
            std::env::remove_var("DATAGOVMY_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DATAGOVMY_API_URL"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
