//! Error types for the DDNS client
//!
//! Only [`Error::Config`] is fatal, and only at startup. Every other variant is
//! absorbed at the run boundary by the reconciler.

use crate::config::RecordType;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (unreadable, malformed or incomplete)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every candidate lookup service failed for the requested family
    #[error("No IP lookup service available for {record_type} record ({attempted} tried)")]
    NoServiceAvailable {
        /// Record type the address was requested for
        record_type: RecordType,
        /// Number of endpoints that were attempted
        attempted: usize,
    },

    /// Transport-level HTTP failure (connect, timeout, unreadable body)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered but reported an unsuccessful response
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Record not found at the provider
    #[error("Record not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors (configuration loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this is a fatal configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether the provider had no matching record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the request never got a usable answer from the remote side
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
