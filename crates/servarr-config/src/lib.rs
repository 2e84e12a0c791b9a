//! Configuration management for the Servarr bridge

pub mod loader;
pub mod settings;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{Config, HttpConfig, LoggingSettings, ServiceConfig};
