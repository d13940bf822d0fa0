//! # chirp-rest
//!
//! Typed client for the Twitter/X v2 API, built on `chirp-client` transport
//! and `chirp-auth` signing.
//!
//! ## Features
//!
//! - **Tweet lookup** - single and bulk (up to 100), with partial success
//! - **Tweet management** - post and delete on behalf of a user
//! - **User lookup** - by ID, bulk, handle, or the authenticated user
//! - **Timelines and search** - cursor-paginated collection endpoints
//! - **Filtered and sampled streams** - typed records off long-lived
//!   connections, plus rule management
//! - **Media upload** - legacy chunked INIT/APPEND/FINALIZE flow
//!
//! ## Example
//!
//! ```rust,ignore
//! use chirp_auth::AuthState;
//! use chirp_rest::{ChirpClient, FieldSet, TweetExpansion, TweetField, UserField};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chirp_rest::Error> {
//!     let client = ChirpClient::with_auth(AuthState::app_only(
//!         std::env::var("BEARER_TOKEN").unwrap(),
//!     ))?;
//!
//!     let fields = FieldSet::new()
//!         .with(TweetField::CreatedAt)
//!         .with(TweetField::PublicMetrics);
//!     let author = TweetExpansion::AuthorId(FieldSet::new().with(UserField::Verified));
//!
//!     let envelope = client.tweet("20", &fields, &[author]).await?;
//!     println!("{}", envelope.data.text);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod expansions;
mod fields;
mod media;
mod models;
mod routes;

// Main client
pub use client::{ChirpClient, Page};

// Query composition
pub use expansions::{compose, Expansion, TweetExpansion, UserExpansion};
pub use fields::{Field, FieldSet, MediaField, TweetField, UserField};

// Error types
pub use error::{Error, ErrorKind, Result};

// Media upload
pub use media::{MediaUpload, ProcessingInfo};

// Resource models
pub use models::{
    Attachments, CreatedTweet, DeletedTweet, Includes, Media, NewStreamRule, NewTweet,
    ReferencedTweet, Reply, RuleChanges, RuleDeletions, StreamRule, Tweet, TweetMedia,
    TweetPublicMetrics, User, UserPublicMetrics,
};

// Routes (useful for instrumentation and tests)
pub use routes::Route;
