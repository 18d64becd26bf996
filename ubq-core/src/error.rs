//! Error types for the Ubiquity client.
//!
//! Every failure the client can surface is folded into a single `UbqError`
//! enum with conversions from the underlying library errors.

use std::time::Duration;

use thiserror::Error;

/// Convenience type alias for Results using UbqError.
pub type UbqResult<T> = Result<T, UbqError>;

/// HTTP statuses from gateways and load balancers that are worth probing again.
pub const TRANSIENT_STATUSES: &[u16] = &[502, 503, 504];

/// Snapshot of a non-success HTTP response, kept for inspection by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// The URL that produced the response.
    pub url: String,
    /// Response body as text (may be empty).
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Unified error type for the Ubiquity client.
#[derive(Error, Debug)]
pub enum UbqError {
    // -- Request errors --
    /// The server answered with a non-success status.
    #[error("ubiquity api error (status {}): {message}", response.status)]
    Api {
        /// Human-readable summary.
        message: String,
        /// The offending response.
        response: ApiResponse,
    },

    /// The server could not be reached (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// A request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A URL could not be built or parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// No usable credentials for an operation that needs them.
    #[error("authentication error: {0}")]
    Auth(String),

    // -- Polling errors --
    /// A polled resource reached a terminal failure state.
    #[error("{operation} failed")]
    OperationFailed {
        /// Name of the awaited operation.
        operation: String,
        /// Last observed state of the resource.
        snapshot: Box<serde_json::Value>,
    },

    /// A polled resource did not settle within the configured bounds.
    #[error("{operation} still pending after {attempts} attempts ({elapsed:?})")]
    WaitExhausted {
        /// Name of the awaited operation.
        operation: String,
        /// Number of probes issued.
        attempts: u32,
        /// Time spent waiting.
        elapsed: Duration,
    },

    /// The wait was cancelled by the caller.
    #[error("{0} cancelled")]
    Cancelled(String),

    // -- Configuration errors --
    /// Failed to load or parse configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Generic --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UbqError {
    /// Build an `Api` error from its parts.
    pub fn api(message: impl Into<String>, response: ApiResponse) -> Self {
        UbqError::Api {
            message: message.into(),
            response,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            UbqError::Api { response, .. } => Some(response.status),
            _ => None,
        }
    }

    /// Whether the error is a passing transport hiccup rather than a verdict.
    ///
    /// Used by the waiter to keep polling through flaky connections.
    pub fn is_transient(&self) -> bool {
        match self {
            UbqError::Network(_) => true,
            UbqError::Api { response, .. } => TRANSIENT_STATUSES.contains(&response.status),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for UbqError {
    fn from(e: serde_json::Error) -> Self {
        UbqError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for UbqError {
    fn from(e: toml::de::Error) -> Self {
        UbqError::Config(e.to_string())
    }
}

impl From<url::ParseError> for UbqError {
    fn from(e: url::ParseError) -> Self {
        UbqError::InvalidUrl(e.to_string())
    }
}
