//! Error types for chirp-client.

use crate::response::ApiError;

/// Result type alias for chirp-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chirp-client operations.
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

    /// Returns true if this is a network-level error (connection, timeout).
    pub fn is_transport_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Connection(_) | ErrorKind::Timeout)
    }

    /// Returns the server-reported errors if this is a structured API error.
    pub fn api_errors(&self) -> Option<&[ApiError]> {
        match &self.kind {
            ErrorKind::Api { errors } => Some(errors),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Network-level failure (DNS, TLS, connection reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Non-2xx response whose body did not carry a decodable API error.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// One or more structured errors reported by the API.
    #[error("API error: {}{}", errors.first().map(|e| e.title.as_str()).unwrap_or("unknown"),
        if errors.len() > 1 { format!(" (+{} more)", errors.len() - 1) } else { String::new() })]
    Api { errors: Vec<ApiError> },

    /// Response bytes matched neither the expected envelope nor the error shape.
    #[error("Unknown payload{}: {body_prefix}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    UnknownPayload {
        status: Option<u16>,
        body_prefix: String,
    },

    /// Failed to decode a single record from a live stream.
    #[error("Malformed stream record: {0}")]
    StreamRecord(String),

    /// Caller-supplied value rejected before any network I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_builder() {
            ErrorKind::Config(err.to_string())
        } else {
            ErrorKind::Connection(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_counts_extras() {
        let err = Error::new(ErrorKind::Api {
            errors: vec![
                ApiError::new("Not Found Error"),
                ApiError::new("Forbidden"),
            ],
        });
        let msg = err.to_string();
        assert!(msg.contains("Not Found Error"));
        assert!(msg.contains("+1 more"));
    }

    #[test]
    fn test_is_transport_error() {
        assert!(Error::new(ErrorKind::Timeout).is_transport_error());
        assert!(Error::new(ErrorKind::Connection("reset".into())).is_transport_error());
        assert!(!Error::new(ErrorKind::InvalidInput("max_results".into())).is_transport_error());
    }

    #[test]
    fn test_api_errors_accessor() {
        let err = Error::new(ErrorKind::Api {
            errors: vec![ApiError::new("Unauthorized")],
        });
        assert_eq!(err.api_errors().map(|e| e.len()), Some(1));

        let err = Error::new(ErrorKind::Timeout);
        assert!(err.api_errors().is_none());
    }

    #[test]
    fn test_unknown_payload_display() {
        let err = Error::new(ErrorKind::UnknownPayload {
            status: Some(502),
            body_prefix: "<html>".into(),
        });
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("<html>"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err.kind, ErrorKind::Json(_)));
        assert!(err.source.is_some());
    }
}
