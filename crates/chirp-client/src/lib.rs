//! # chirp-client
//!
//! Core HTTP transport and decoding infrastructure for the Twitter/X v2 API.
//!
//! This crate provides the pieces every higher-level operation is built from:
//! - A request descriptor ([`ApiRequest`]) with ordered query items and the
//!   upstream's non-standard query percent-encoding
//! - A thin transport seam ([`HttpClient`]) that returns raw bytes + status
//!   for single-shot calls and a byte stream for long-lived connections
//! - Envelope decoding ([`decode_envelope`]) resolving success, partial
//!   success (data + errors), or a structured API failure
//! - A CRLF line-stream decoder ([`RecordStream`]) turning an unbounded byte
//!   stream into typed records
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  Application layer                   │
//! │                     (chirp-rest)                     │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │   ApiRequest ──► HttpClient ──► (status, bytes)      │
//! │                      │                               │
//! │                      └──► byte stream ──► records    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Transport never retries and never interprets a non-2xx status by itself;
//! the response body may still carry a decodable structured API error, which
//! the envelope decoder resolves.

mod client;
mod config;
mod error;
mod request;
mod response;
mod stream;

pub use client::{ByteStream, HttpClient};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{ApiRequest, Method, RequestBody};
pub use response::{
    decode_envelope, decode_failure, decode_stream_record, ApiError, Envelope, Meta, StreamRecord,
};
pub use stream::{LineDecoder, MalformedRecordPolicy, RecordStream};

/// Default API host.
pub const API_BASE_URL: &str = "https://api.twitter.com";

/// Default host for the legacy media upload endpoints.
pub const UPLOAD_BASE_URL: &str = "https://upload.twitter.com";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("chirp-api/", env!("CARGO_PKG_VERSION"));
