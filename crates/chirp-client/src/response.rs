//! Envelope and error-shape decoding.
//!
//! Every v2 payload is one of: data alone, data + non-fatal errors, or a
//! hard failure carrying only errors. Decoding resolves which one, never
//! producing default-valued partial results: either the whole expected
//! shape parses or the call fails.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Longest body prefix carried in an unknown-payload error.
const MAX_BODY_PREFIX: usize = 256;

/// A structured error reported by the API.
///
/// May appear on its own (hard failure) or alongside valid data (partial
/// success, e.g. one id of a bulk lookup was not found).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Short human-readable summary.
    pub title: String,
    /// Longer explanation, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// URL identifying the problem type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Identifier of the resource the error refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Type of the resource the error refers to (e.g. "tweet", "user").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl ApiError {
    /// Create an error with just a title. Mostly useful in tests.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: None,
            kind: None,
            resource_id: None,
            resource_type: None,
        }
    }
}

/// Pagination metadata returned by collection endpoints.
///
/// Absence of a token means there is no further page in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub previous_token: Option<String>,
    #[serde(default)]
    pub newest_id: Option<String>,
    #[serde(default)]
    pub oldest_id: Option<String>,
}

/// Decoded wrapper around single-shot response data.
///
/// `errors`, when present, is non-empty and accompanies valid data (partial
/// success). Callers must inspect it even on nominal success.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<D, I = serde_json::Value> {
    pub data: D,
    #[serde(default = "Option::default")]
    pub includes: Option<I>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default = "Option::default")]
    pub errors: Option<Vec<ApiError>>,
}

impl<D, I> Envelope<D, I> {
    /// Pagination token for the next page, if the server reported one.
    pub fn next_token(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.next_token.as_deref())
    }

    /// Pagination token for the previous page, if the server reported one.
    pub fn previous_token(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.previous_token.as_deref())
    }
}

/// One decoded line of a continuous stream. Same data/includes shape as the
/// single-shot envelope, but never carries pagination metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamRecord<D, I = serde_json::Value> {
    pub data: D,
    #[serde(default = "Option::default")]
    pub includes: Option<I>,
    #[serde(default = "Option::default")]
    pub errors: Option<Vec<ApiError>>,
}

/// Hard-failure body: a non-empty list of structured errors.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    errors: Vec<ApiError>,
}

/// Decode a single-shot response body into the expected envelope shape.
///
/// Resolution order:
/// 1. the expected shape: embedded `errors` stay embedded (partial success);
/// 2. the structured error shape: the call fails with those errors;
/// 3. neither: an unknown-payload error carrying a bounded body prefix.
pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    decode(Some(status), body)
}

/// Decode one stream record. Identical precedence to [`decode_envelope`],
/// without an HTTP status (stream lines have none).
pub fn decode_stream_record<T: DeserializeOwned>(line: &[u8]) -> Result<T> {
    decode(None, line)
}

/// Classify a body already known to be a failure (e.g. a rejected streaming
/// connect). Applies the error branches of the decode precedence without
/// trying an expected shape first.
pub fn decode_failure(status: u16, body: &[u8]) -> Error {
    match classify_failure(body) {
        Some(error) => error,
        None => Error::new(ErrorKind::UnknownPayload {
            status: Some(status),
            body_prefix: body_prefix(body),
        }),
    }
}

fn decode<T: DeserializeOwned>(status: Option<u16>, body: &[u8]) -> Result<T> {
    let primary = match serde_json::from_slice::<T>(body) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    // The expected shape failed; the body may still be a decodable API error.
    if let Some(error) = classify_failure(body) {
        return Err(error);
    }

    Err(Error::with_source(
        ErrorKind::UnknownPayload {
            status,
            body_prefix: body_prefix(body),
        },
        primary,
    ))
}

fn classify_failure(body: &[u8]) -> Option<Error> {
    if let Ok(response) = serde_json::from_slice::<ErrorResponse>(body) {
        if !response.errors.is_empty() {
            return Some(Error::new(ErrorKind::Api {
                errors: response.errors,
            }));
        }
    }

    // Some hard failures are a single bare problem object.
    if let Ok(single) = serde_json::from_slice::<ApiError>(body) {
        return Some(Error::new(ErrorKind::Api {
            errors: vec![single],
        }));
    }

    None
}

fn body_prefix(body: &[u8]) -> String {
    let end = body.len().min(MAX_BODY_PREFIX);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    type TweetEnvelope = Envelope<serde_json::Value>;

    #[test]
    fn test_decode_data_alone() {
        let body = br#"{"data":{"id":"1","text":"hello"}}"#;
        let env: TweetEnvelope = decode_envelope(200, body).unwrap();
        assert_eq!(env.data["id"], "1");
        assert!(env.errors.is_none());
        assert!(env.meta.is_none());
    }

    #[test]
    fn test_decode_partial_success_keeps_errors_embedded() {
        let body = br#"{
            "data": [{"id": "1", "text": "found"}],
            "errors": [{"title": "Not Found Error", "type": "https://api.twitter.com/2/problems/resource-not-found", "resource_id": "2", "resource_type": "tweet"}]
        }"#;
        let env: Envelope<Vec<serde_json::Value>> = decode_envelope(200, body).unwrap();
        assert_eq!(env.data.len(), 1);
        let errors = env.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].resource_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_decode_meta_tokens() {
        let body = br#"{
            "data": [{"id": "1"}],
            "meta": {"result_count": 1, "next_token": "T1"}
        }"#;
        let env: Envelope<Vec<serde_json::Value>> = decode_envelope(200, body).unwrap();
        assert_eq!(env.next_token(), Some("T1"));
        assert_eq!(env.previous_token(), None);
        assert_eq!(env.meta.unwrap().result_count, Some(1));
    }

    #[test]
    fn test_error_shape_takes_precedence_over_unknown_payload() {
        // Parses as the error shape but not as the expected envelope: the
        // call must fail with the structured error.
        let body = br#"{"errors":[{"title":"Unauthorized","type":"about:blank"}]}"#;
        let err = decode_envelope::<TweetEnvelope>(401, body).unwrap_err();
        match err.kind {
            ErrorKind::Api { errors } => assert_eq!(errors[0].title, "Unauthorized"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_problem_object_decodes_as_api_error() {
        let body = br#"{"title":"Too Many Requests","detail":"Rate limit exceeded","type":"about:blank"}"#;
        let err = decode_envelope::<TweetEnvelope>(429, body).unwrap_err();
        match err.kind {
            ErrorKind::Api { errors } => {
                assert_eq!(errors[0].title, "Too Many Requests");
                assert_eq!(errors[0].detail.as_deref(), Some("Rate limit exceeded"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_undecodable_payload_carries_bounded_prefix() {
        let body = vec![b'x'; 1000];
        let err = decode_envelope::<TweetEnvelope>(502, &body).unwrap_err();
        match err.kind {
            ErrorKind::UnknownPayload {
                status,
                body_prefix,
            } => {
                assert_eq!(status, Some(502));
                assert_eq!(body_prefix.len(), MAX_BODY_PREFIX);
            }
            other => panic!("expected UnknownPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_errors_array_is_not_a_structured_error() {
        let body = br#"{"errors":[]}"#;
        let err = decode_envelope::<TweetEnvelope>(500, body).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownPayload { .. }));
    }

    #[test]
    fn test_decode_failure_classifies_error_bodies() {
        let body = br#"{"errors":[{"title":"Forbidden","type":"about:blank"}]}"#;
        let err = decode_failure(403, body);
        match err.kind {
            ErrorKind::Api { errors } => assert_eq!(errors[0].title, "Forbidden"),
            other => panic!("expected Api error, got {other:?}"),
        }

        let err = decode_failure(503, b"<html>gateway</html>");
        assert!(matches!(err.kind, ErrorKind::UnknownPayload { .. }));
    }

    #[test]
    fn test_stream_record_never_has_meta() {
        let body = br#"{"data":{"id":"9","text":"live"},"includes":{"users":[]}}"#;
        let rec: StreamRecord<serde_json::Value> = decode_stream_record(body).unwrap();
        assert_eq!(rec.data["id"], "9");
        assert!(rec.includes.is_some());
    }
}
