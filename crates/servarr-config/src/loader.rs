//! Configuration loading utilities

use crate::Config;
use servarr_common::Result as ServarrResult;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for servarr_common::ServarrError {
    fn from(err: ConfigError) -> Self {
        servarr_common::ServarrError::configuration(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables and files
    ///
    /// Resolution order: `SERVARR_CONFIG_PATH`, then `config.yaml`/`config.yml`
    /// in the working directory, then built-in defaults. Environment variables
    /// override whatever the file provided.
    pub fn load() -> ServarrResult<Config> {
        let config = if let Ok(config_path) = env::var("SERVARR_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            debug!("No configuration file found, using defaults with env overrides");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::from)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ServarrResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // Sonarr overrides
        if let Ok(url) = env::var("SONARR_URL") {
            config.sonarr.url = url.trim_end_matches('/').to_string();
        }
        if let Ok(api_key) = env::var("SONARR_API_KEY") {
            config.sonarr.api_key = api_key;
        }

        // Radarr overrides
        if let Ok(url) = env::var("RADARR_URL") {
            config.radarr.url = url.trim_end_matches('/').to_string();
        }
        if let Ok(api_key) = env::var("RADARR_API_KEY") {
            config.radarr.api_key = api_key;
        }

        // Shared overrides
        if let Ok(timeout) = env::var("REQUEST_TIMEOUT") {
            config.request_timeout_seconds =
                timeout.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "REQUEST_TIMEOUT".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Ok(port) = env::var("PORT") {
            config.http.port = port.parse().map_err(|e| ConfigError::EnvParseError {
                var: "PORT".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(level) = env::var("SERVARR_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
