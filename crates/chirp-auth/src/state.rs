//! Authentication state held by a client.

use tokio::sync::Mutex;

use crate::error::{Error, ErrorKind, Result};
use crate::oauth1::{self, Oauth1Credentials};
use crate::oauth2::OAuth2Token;

/// The authentication a client was constructed with.
///
/// A closed set: exactly one variant per client instance, for its lifetime.
/// Refresh mutates the OAuth 2.0 token in place but never changes variant.
/// Requests that need user context fail fast on `AppOnly` instead of
/// silently downgrading.
pub enum AuthState {
    /// Application-only bearer token. No user context.
    AppOnly { bearer_token: String },
    /// OAuth 1.0a user context: every request is HMAC-signed.
    UserSigned(Oauth1Credentials),
    /// OAuth 2.0 user context with transparent refresh. The mutex makes
    /// refresh-then-sign one critical section: concurrent signing calls
    /// never observe a half-updated token, and an expired token is
    /// refreshed exactly once.
    OAuth2User(Mutex<OAuth2Token>),
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthState::AppOnly { .. } => f
                .debug_struct("AppOnly")
                .field("bearer_token", &"[REDACTED]")
                .finish(),
            AuthState::UserSigned(creds) => f.debug_tuple("UserSigned").field(creds).finish(),
            AuthState::OAuth2User(_) => f.debug_tuple("OAuth2User").field(&"[REDACTED]").finish(),
        }
    }
}

impl AuthState {
    /// App-only bearer authentication.
    pub fn app_only(bearer_token: impl Into<String>) -> Self {
        AuthState::AppOnly {
            bearer_token: bearer_token.into(),
        }
    }

    /// OAuth 1.0a user-signed authentication.
    pub fn user_signed(credentials: Oauth1Credentials) -> Self {
        AuthState::UserSigned(credentials)
    }

    /// OAuth 2.0 user-context authentication.
    pub fn oauth2_user(token: OAuth2Token) -> Self {
        AuthState::OAuth2User(Mutex::new(token))
    }

    /// Whether this state can satisfy a user-context operation.
    pub fn has_user_context(&self) -> bool {
        match self {
            AuthState::AppOnly { .. } => false,
            AuthState::UserSigned(creds) => creds.has_user_token(),
            AuthState::OAuth2User(_) => true,
        }
    }

    /// Fail fast when a user-context operation would otherwise run with
    /// app-only credentials.
    pub fn require_user_context(&self) -> Result<()> {
        if self.has_user_context() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::MissingUserContext))
        }
    }

    /// Produce the `Authorization` header value for one request, refreshing
    /// first when the held variant calls for it.
    ///
    /// `params` must carry the request's query items plus any form fields
    /// (the HMAC path covers them in the signature; the bearer paths ignore
    /// them). `http` and `token_url` are only touched by the refresh
    /// exchange.
    pub async fn authorization_header(
        &self,
        http: &reqwest::Client,
        token_url: &str,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> Result<String> {
        match self {
            AuthState::AppOnly { bearer_token } => Ok(format!("Bearer {bearer_token}")),
            AuthState::UserSigned(creds) => {
                Ok(oauth1::authorization_header(creds, method, url, params))
            }
            AuthState::OAuth2User(token) => {
                // Critical section: freshness check, refresh, and read of
                // the resulting token happen under one lock.
                let mut guard = token.lock().await;
                if guard.should_refresh(chrono::Utc::now()) {
                    guard.refresh(http, token_url).await?;
                }
                Ok(format!("Bearer {}", guard.access_token()))
            }
        }
    }
}
