//! OAuth 1.0a HMAC-SHA1 request signing.
//!
//! The signature base string is built deterministically from the method,
//! the normalized URL (scheme + host + path), and a canonical parameter
//! string covering the oauth_* parameters plus all query and form
//! parameters. Given a fixed nonce and timestamp the output is
//! byte-identical across runs; that determinism is what the tests pin.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986: only unreserved characters stay literal, everything else is
/// percent-encoded. Stricter than query encoding; the signature base
/// string requires it.
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// OAuth 1.0a credential pair: application (consumer) plus, usually, a
/// user token obtained through the three-legged flow.
#[derive(Clone)]
pub struct Oauth1Credentials {
    consumer_key: String,
    consumer_secret: String,
    token: Option<String>,
    token_secret: Option<String>,
}

impl std::fmt::Debug for Oauth1Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oauth1Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Oauth1Credentials {
    /// Create consumer-only credentials (no user token yet).
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            token_secret: None,
        }
    }

    /// Attach a user token/secret pair.
    pub fn with_token(
        mut self,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        self.token = Some(token.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Whether these credentials carry a user token.
    pub fn has_user_token(&self) -> bool {
        self.token.is_some()
    }
}

/// Percent-encode per RFC 3986 (unreserved set only).
pub(crate) fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986_ENCODE_SET).to_string()
}

/// Produce the `Authorization` header value for one request, generating a
/// fresh nonce and timestamp.
///
/// `params` must cover every non-oauth parameter the request carries: all
/// query items plus, for form-encoded bodies, all form fields. JSON bodies
/// contribute nothing.
pub fn authorization_header(
    credentials: &Oauth1Credentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    authorization_header_with(credentials, method, url, params, &nonce, &timestamp)
}

/// Deterministic core of [`authorization_header`]: fixed nonce/timestamp in,
/// byte-identical header out.
pub(crate) fn authorization_header_with(
    credentials: &Oauth1Credentials,
    method: &str,
    url: &str,
    params: &[(String, String)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params: Vec<(&str, &str)> = vec![
        ("oauth_consumer_key", &credentials.consumer_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_version", "1.0"),
    ];
    if let Some(token) = &credentials.token {
        oauth_params.push(("oauth_token", token));
    }

    // Canonical parameter string: every key and value encoded, then sorted
    // by encoded key, ties broken by encoded value.
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .chain(
            oauth_params
                .iter()
                .map(|(k, v)| (percent_encode(k), percent_encode(v))),
        )
        .collect();
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method,
        percent_encode(url),
        percent_encode(&param_string)
    );

    let signing_key = format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(credentials.token_secret.as_deref().unwrap_or(""))
    );

    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base_string.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    // Header carries only the oauth_* parameters plus the signature, sorted
    // by key, each value encoded and quoted.
    let mut header_params: Vec<(&str, String)> = oauth_params
        .iter()
        .map(|(k, v)| (*k, percent_encode(v)))
        .collect();
    header_params.push(("oauth_signature", percent_encode(&signature)));
    header_params.sort();

    let joined = header_params
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {joined}")
}
