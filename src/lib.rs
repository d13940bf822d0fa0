//! # chirp-api
//!
//! A typed, async client core for the Twitter/X v2 REST and streaming APIs.
//!
//! ## Security
//!
//! This library is designed with security in mind:
//! - Sensitive data (tokens, secrets) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **chirp-client** - HTTP transport, query encoding, envelope decoding,
//!   CRLF record streaming
//! - **chirp-auth** - Authentication: app-only bearer, OAuth 1.0a signing,
//!   OAuth 2.0 user tokens with transparent refresh
//! - **chirp-rest** - Typed operations: tweets, users, search, timelines,
//!   streams, rules, media upload
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chirp_api::auth::AuthState;
//! use chirp_api::rest::{ChirpClient, FieldSet, TweetField};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChirpClient::with_auth(AuthState::app_only(
//!         std::env::var("BEARER_TOKEN")?,
//!     ))?;
//!
//!     let fields = FieldSet::new()
//!         .with(TweetField::CreatedAt)
//!         .with(TweetField::PublicMetrics);
//!
//!     let envelope = client.tweet("20", &fields, &[]).await?;
//!     println!("{}", envelope.data.text);
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
pub use chirp_auth as auth;
pub use chirp_client as client;
pub use chirp_rest as rest;

// Re-export commonly used types at the top level
pub use chirp_auth::{AuthState, OAuth2Token, Oauth1Credentials};
pub use chirp_client::{ClientConfig, Envelope, MalformedRecordPolicy};
pub use chirp_rest::{ChirpClient, FieldSet, Page};
