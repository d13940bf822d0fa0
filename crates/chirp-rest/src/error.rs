//! Error types for chirp-rest.
//!
//! Transport and decode failures keep their original kind so callers can
//! still match on the full taxonomy (API errors, unknown payloads, timeouts)
//! through one level of wrapping.

use chirp_client::ApiError;

/// Result type alias for chirp-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chirp-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Structured API errors carried by this error, if any.
    pub fn api_errors(&self) -> Option<&[ApiError]> {
        match &self.kind {
            ErrorKind::Client(chirp_client::ErrorKind::Api { errors }) => Some(errors),
            _ => None,
        }
    }

    /// Whether this is a transport-level failure (connection, timeout)
    /// rather than a server-reported one.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            &self.kind,
            ErrorKind::Client(
                chirp_client::ErrorKind::Connection(_) | chirp_client::ErrorKind::Timeout
            )
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Transport or decode failure from the HTTP layer.
    #[error("{0}")]
    Client(chirp_client::ErrorKind),

    /// Authentication failure (signing, refresh, missing user context).
    #[error("{0}")]
    Auth(chirp_auth::ErrorKind),

    /// Caller-supplied input rejected before any network I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<chirp_client::Error> for Error {
    fn from(err: chirp_client::Error) -> Self {
        Self {
            kind: ErrorKind::Client(err.kind),
            source: err.source,
        }
    }
}

impl From<chirp_auth::Error> for Error {
    fn from(err: chirp_auth::Error) -> Self {
        Self {
            kind: ErrorKind::Auth(err.kind),
            source: err.source,
        }
    }
}
