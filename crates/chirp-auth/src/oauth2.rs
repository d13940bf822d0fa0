//! OAuth 2.0 user tokens with in-place refresh.
//!
//! The refresh exchange itself is not signed through either the bearer or
//! the HMAC path: it authenticates with HTTP Basic client credentials (when
//! a client secret exists) against the token endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};

/// An OAuth 2.0 user-context token set.
///
/// Mutated in place by [`refresh`](OAuth2Token::refresh); never replaced
/// wholesale, so a client's authentication variant is stable for its
/// lifetime.
#[derive(Clone)]
pub struct OAuth2Token {
    client_id: String,
    client_secret: Option<String>,
    access_token: String,
    refresh_token: Option<String>,
    /// Instant after which the access token is considered stale.
    pub expires_at: DateTime<Utc>,
    /// Scopes granted with the token.
    pub scopes: Vec<String>,
    /// When true (the default), signing only refreshes a stale token.
    /// When false, every signing call refreshes first.
    pub refresh_only_if_expired: bool,
}

impl std::fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl OAuth2Token {
    /// Create a token set from an already-granted access token.
    pub fn new(
        client_id: impl Into<String>,
        access_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            access_token: access_token.into(),
            refresh_token: None,
            expires_at,
            scopes: Vec::new(),
            refresh_only_if_expired: true,
        }
    }

    /// Set the client secret (confidential clients).
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Attach a refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set the granted scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Refresh on every signing call instead of only when stale.
    pub fn with_forced_refresh(mut self) -> Self {
        self.refresh_only_if_expired = false;
        self
    }

    /// The current access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The current refresh token, if any.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Whether the access token is stale at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Freshness policy: should a signing call refresh before using the
    /// token?
    pub fn should_refresh(&self, now: DateTime<Utc>) -> bool {
        !self.refresh_only_if_expired || self.is_expired(now)
    }

    /// Exchange the refresh token for a new access token at `token_url`,
    /// replacing the stored token in place.
    ///
    /// Fails with [`ErrorKind::MissingRefreshToken`] when no refresh token
    /// is held and with [`ErrorKind::RefreshFailed`] when the endpoint
    /// rejects the exchange; never falls through to a stale token.
    #[instrument(skip(self, http), fields(client_id = %self.client_id))]
    pub async fn refresh(&mut self, http: &reqwest::Client, token_url: &str) -> Result<()> {
        let refresh_token = self
            .refresh_token
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::MissingRefreshToken))?;

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", &refresh_token),
            ("client_id", &self.client_id),
        ];

        let mut request = http.post(token_url).form(&params);
        if let Some(secret) = &self.client_secret {
            request = request.basic_auth(&self.client_id, Some(secret));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let failure: RefreshErrorResponse = response.json().await.unwrap_or_default();
            return Err(Error::new(ErrorKind::RefreshFailed {
                error: if failure.error.is_empty() {
                    format!("http_{status}")
                } else {
                    failure.error
                },
                description: failure.error_description.unwrap_or_default(),
            }));
        }

        let granted: TokenResponse = response.json().await?;
        self.apply(granted, Utc::now());
        debug!("access token refreshed");
        Ok(())
    }

    /// Fold a token-endpoint response into this token set.
    fn apply(&mut self, granted: TokenResponse, now: DateTime<Utc>) {
        self.access_token = granted.access_token;
        self.expires_at = now + Duration::seconds(granted.expires_in);
        // Refresh tokens rotate; keep the old one only if none came back.
        if let Some(rotated) = granted.refresh_token {
            self.refresh_token = Some(rotated);
        }
        if let Some(scope) = granted.scope {
            self.scopes = scope.split(' ').map(str::to_string).collect();
        }
    }
}

/// Token endpoint response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// New access token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Rotated refresh token, if the server issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// Token type (always "bearer").
    #[serde(default)]
    pub token_type: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Token endpoint failure body.
#[derive(Debug, Default, Deserialize)]
struct RefreshErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}
