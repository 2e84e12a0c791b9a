//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Sonarr (TV series manager) backend configuration
    #[validate]
    pub sonarr: ServiceConfig,

    /// Radarr (movie manager) backend configuration
    #[validate]
    pub radarr: ServiceConfig,

    /// Shared outbound request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub request_timeout_seconds: u64,

    /// HTTP transport configuration
    #[validate]
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sonarr: ServiceConfig::default(),
            radarr: ServiceConfig::default(),
            request_timeout_seconds: 30,
            http: HttpConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Config {
    /// Validate the whole configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

/// Configuration for one backend
///
/// A backend is considered configured only when both the URL and the API key
/// are non-empty; otherwise no client is ever created for it and every
/// operation against it is rejected before any network call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServiceConfig {
    /// Backend base URL (e.g., "http://localhost:8989")
    pub url: String,

    /// API key sent in the X-Api-Key header
    pub api_key: String,
}

impl ServiceConfig {
    /// Whether this backend has everything it needs to build a client
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.api_key.is_empty()
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HttpConfig {
    /// Port the REST surface listens on
    #[validate(range(min = 1, message = "Port must be non-zero"))]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter (e.g., "info", "debug")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(!config.sonarr.is_configured());
        assert!(!config.radarr.is_configured());
    }

    #[test]
    fn test_service_configured_requires_both_fields() {
        let mut service = ServiceConfig::default();
        assert!(!service.is_configured());

        service.url = "http://localhost:8989".to_string();
        assert!(!service.is_configured());

        service.api_key = "abc123".to_string();
        assert!(service.is_configured());

        service.url.clear();
        assert!(!service.is_configured());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = Config {
            request_timeout_seconds: 0,
            ..Config::default()
        };
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
sonarr:
  url: "http://localhost:8989"
  api_key: "abc"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.sonarr.is_configured());
        assert!(!config.radarr.is_configured());
        assert_eq!(config.request_timeout_seconds, 30);
    }
}
