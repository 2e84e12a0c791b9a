//! Error types and utilities for the Servarr bridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, ServarrError>;

/// Main error type for bridge operations
#[derive(Error, Debug)]
pub enum ServarrError {
    /// A backend (or the application itself) is not configured
    #[error("{message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing or malformed caller-supplied argument, raised before any network call
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Connection or timeout failure talking to a backend
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Backend answered with a non-2xx status
    #[error("API request failed: {status_code}")]
    Remote {
        status_code: u16,
        body: String,
    },

    /// Backend answered 2xx but the body was not valid JSON
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Dispatch miss: the operation name is not known
    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors outside of response decoding
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServarrError {
    /// Create a configuration error with a custom message
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The fixed "not configured" error for a backend, matching the text
    /// returned through both transports
    pub fn not_configured(service: impl std::fmt::Display) -> Self {
        Self::configuration(format!("{} is not configured", service))
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a transport error with source
    pub fn transport_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a remote error carrying the backend status code and a body excerpt
    pub fn remote(status_code: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            status_code,
            body: body.into(),
        }
    }

    /// Create a decode error with source
    pub fn decode_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown-operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }
}
