//! Request descriptor with ordered query items and upstream-safe encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::error::Result;

/// Characters percent-encoded in query strings.
///
/// Starts from everything a generic query string must encode, then adds
/// `:`, `(`, and `)`, which are legal in a query per RFC 3986, but the upstream
/// parser rejects them unescaped. Preserved literally; do not generalize.
pub(crate) const QUERY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'+')
    .add(b'=')
    .add(b'&')
    .add(b'?')
    .add(b':')
    .add(b'(')
    .add(b')');

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    /// Uppercase name, as used in the OAuth 1.0a signature base string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Request body content.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// JSON body, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Form body, sent with `Content-Type: application/x-www-form-urlencoded`.
    /// Form parameters participate in OAuth 1.0a signing; JSON bodies do not.
    Form(Vec<(String, String)>),
}

/// A fully described HTTP exchange: method, resolved URL, ordered query
/// items, optional body.
///
/// Immutable once built in the sense that signing only appends: the signer
/// adds an `Authorization` header and never rewrites existing entries.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Scheme + host + path. Query items are kept separate so the signer
    /// sees them unencoded.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    /// Create a new request descriptor.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a query item.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append multiple query items, preserving their order.
    pub fn queries(mut self, items: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(items);
        self
    }

    /// Append a header. Existing headers are never replaced.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Set a form-encoded body.
    pub fn form(mut self, params: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(params));
        self
    }

    /// Form parameters, if the body is form-encoded. Used by the OAuth 1.0a
    /// signer, which must cover them in the signature base string.
    pub fn form_params(&self) -> &[(String, String)] {
        match &self.body {
            Some(RequestBody::Form(params)) => params,
            _ => &[],
        }
    }

    /// Full URL with the percent-encoded query string appended.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_query(k), encode_query(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.url, query)
    }
}

/// Percent-encode one query key or value against the upstream's allowed set.
pub fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}
