//! Error types for index administration.

use thiserror::Error;

/// Client error type.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid configuration or argument.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Index already exists.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// The engine rejected the request.
    #[error("Engine error ({status}): {reason}")]
    Engine {
        /// HTTP status returned by the engine.
        status: u16,
        /// Reason reported by the engine.
        reason: String,
    },

    /// Malformed JSON payload or response.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The local node did not become reachable in time.
    #[error("Node did not answer within {timeout_secs}s")]
    NodeStartup {
        /// Startup timeout in seconds.
        timeout_secs: u64,
    },

    /// Local node process error.
    #[error("Node error: {0}")]
    Node(#[from] std::io::Error),

    /// The client was closed.
    #[error("Client is closed")]
    Closed,

    /// Transport error from the opensearch crate.
    #[error("Transport error: {0}")]
    Transport(#[from] opensearch::Error),
}

impl ClientError {
    /// Create an engine error.
    pub fn engine(status: u16, reason: impl Into<String>) -> Self {
        ClientError::Engine {
            status,
            reason: reason.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
