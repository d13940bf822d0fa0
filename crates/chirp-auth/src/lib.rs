//! # chirp-auth
//!
//! Authentication for the Twitter/X v2 API.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets) is redacted in Debug output
//! - Tracing skips credential parameters
//! - Error messages never include credential values
//!
//! ## Supported authentication methods
//!
//! - **App-only bearer token**: stateless header injection
//! - **OAuth 1.0a user context**: per-request HMAC-SHA1 signing
//! - **OAuth 2.0 user context**: bearer token with transparent refresh
//!
//! A client holds exactly one [`AuthState`] variant for its lifetime. Token
//! refresh mutates the held OAuth 2.0 token in place and is serialized with
//! respect to concurrent signing calls: refresh-then-sign is one critical
//! section, so racing requests never observe a half-updated token.

mod error;
mod oauth1;
mod oauth2;
mod state;

pub use error::{Error, ErrorKind, Result};
pub use oauth1::{authorization_header as oauth1_authorization_header, Oauth1Credentials};
pub use oauth2::{OAuth2Token, TokenResponse};
pub use state::AuthState;
