//! Error types for chirp-auth.
//!
//! Error messages are designed to avoid exposing credential data.

/// Result type alias for chirp-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chirp-auth operations.
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

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The operation needs user context but the held credentials are
    /// app-only. Surfaced before any network I/O, never silently
    /// downgraded to app-only auth.
    #[error("Operation requires user context but the client holds app-only credentials")]
    MissingUserContext,

    /// The access token is stale and no refresh token is available.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The token refresh exchange was rejected.
    #[error("Token refresh failed: {error} - {description}")]
    RefreshFailed { error: String, description: String },

    /// HTTP error during a token exchange.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid credentials configuration.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Token exchange URLs never carry credentials, but stay on the safe
        // side the way the rest of this crate does.
        let message = err.to_string();
        let sanitized = if message.contains("token=") || message.contains("access_token") {
            "HTTP request failed (details redacted)".to_string()
        } else {
            message
        };
        Error::with_source(ErrorKind::Http(sanitized), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
