//! HTTP transport seam.
//!
//! One round trip per call, no retries (retry policy is a caller concern),
//! no decoding. A non-2xx status is not an error at this layer; the body
//! may still carry a decodable structured API error for the layer above.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{ApiRequest, RequestBody};

/// A lazily produced body: the long-lived byte channel behind a stream call.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Thin transport over reqwest. Owns the connection pool; everything else
/// (signing, decoding, retries) happens in the layers around it.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new transport from the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a transport with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute one buffered HTTP exchange: raw bytes + status, nothing else.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<(u16, Bytes)> {
        let response = self
            .build(request)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, body_len = body.len(), "response received");

        Ok((status, body))
    }

    /// Open a long-lived exchange and return the response status plus the
    /// unbuffered byte channel. No timeout is applied; streams are expected
    /// to stay open indefinitely. Dropping the returned stream closes the
    /// underlying connection.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    pub async fn execute_streaming(&self, request: &ApiRequest) -> Result<(u16, ByteStream)> {
        let response = self.build(request).send().await?;

        let status = response.status().as_u16();
        debug!(status, "streaming connection established");

        let stream = response.bytes_stream().map_err(Error::from).boxed();
        Ok((status, stream))
    }

    fn build(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        // The query is pre-encoded into the URL against the upstream's
        // allowed set; reqwest must not re-encode it.
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.full_url());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        match &request.body {
            Some(RequestBody::Json(value)) => req = req.json(value),
            Some(RequestBody::Form(params)) => req = req.form(params),
            None => {}
        }

        req
    }
}
