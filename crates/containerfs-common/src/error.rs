//! Unified error types for the containerfs workspace.
//!
//! Higher-level crates define their own error enums (filesystem statuses,
//! mount failures) that wrap these variants when appropriate.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ContainerFsError {
    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// The container daemon answered with an error status.
    #[error("daemon returned {status}: {message}")]
    Daemon {
        /// HTTP status code of the response.
        status: u16,
        /// Error message reported by the daemon.
        message: String,
    },

    /// The container daemon could not be reached.
    #[error("cannot reach container daemon at {endpoint}: {message}")]
    Transport {
        /// Endpoint the connection was attempted against.
        endpoint: String,
        /// Description of the transport failure.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ContainerFsError>;
