//! Common utilities and types for the Servarr bridge

pub mod client;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use client::ArrClient;
pub use error::{Result, ServarrError};
pub use logging::{init_logging, LoggingConfig};
