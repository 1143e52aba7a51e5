//! Error types for the roster orchestration core.
//!
//! Two layers of errors live here:
//!
//! - [`ApiError`]: the runtime-visible failure of a gateway call. It is stored in
//!   status fields, surfaced in snapshots, and compared in tests, so it is `Clone`,
//!   `PartialEq` and `Serialize`.
//! - [`RosterError`]: crate-level failures (configuration, fixtures, invalid filter
//!   input). Returned from fallible setup and mutator entry points.
//!
//! [`GatewayFailure`] is the gateway-normalized error object the transport layer
//! hands back; it is converted into an [`ApiError`] at the core boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No response was received.
    Network,
    /// A response arrived with a failure status or an unusable shape.
    Server,
    /// A single-entity fetch found nothing.
    NotFound,
}

/// Failure of a gateway operation as seen by the orchestration core.
///
/// # Examples
///
/// ```
/// use roster::domain::{ApiError, ErrorKind};
///
/// let err = ApiError::network("connection refused");
/// assert_eq!(err.kind(), ErrorKind::Network);
/// assert_eq!(err.message(), "connection refused");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, timeout).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered, but with `success: false` or a malformed payload.
    #[error("Server error: {message}")]
    Server {
        code: Option<String>,
        message: String,
    },

    /// The requested entity does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            code: None,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Server { .. } => ErrorKind::Server,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message } | Self::Server { message, .. } | Self::NotFound { message } => {
                message
            }
        }
    }
}

/// Error object produced by the transport layer after its own normalization.
///
/// Mirrors the `{code, message, isNetworkError}` shape the HTTP client's
/// interceptors emit, so it can be deserialized straight from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayFailure {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub is_network_error: bool,
}

impl GatewayFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            is_network_error: true,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            is_network_error: false,
        }
    }
}

impl From<GatewayFailure> for ApiError {
    fn from(failure: GatewayFailure) -> Self {
        if failure.is_network_error {
            return Self::Network {
                message: failure.message,
            };
        }

        match failure.code.as_deref() {
            Some("NOT_FOUND" | "404") => Self::NotFound {
                message: failure.message,
            },
            _ => Self::Server {
                code: failure.code,
                message: failure.message,
            },
        }
    }
}

/// The main error type for crate-level operations.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A filter update was rejected before reaching the search controller.
    ///
    /// The current filters are left untouched when this is returned.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A fixture file could not be turned into entities.
    #[error("Fixture error: {0}")]
    Fixture(String),

    /// A gateway call failed and the caller asked for the raw result.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A specialized `Result` type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
