//! Client configuration.
//!
//! Hosts are explicit values rather than ambient environment lookups; tests
//! and staging setups construct a config pointing at a different base URL.

use std::time::Duration;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the v2 REST and streaming endpoints.
    pub api_base_url: String,
    /// Base URL for the legacy media upload endpoints.
    pub upload_base_url: String,
    /// Per-request timeout for single-shot calls. Never applied to
    /// streaming connections, which are expected to stay open indefinitely.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Pool idle timeout.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: crate::API_BASE_URL.to_string(),
            upload_base_url: crate::UPLOAD_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: crate::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// URL of the OAuth 2.0 token endpoint for this API host.
    pub fn token_url(&self) -> String {
        format!("{}/2/oauth2/token", self.api_base_url.trim_end_matches('/'))
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API base URL (v2 REST and streaming endpoints).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    /// Set the upload base URL (legacy media endpoints).
    pub fn with_upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.upload_base_url = url.into();
        self
    }

    /// Set the single-shot request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the pool idle timeout.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "https://api.twitter.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.contains("chirp-api"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .with_api_base_url("http://127.0.0.1:9999")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("custom/1.0")
            .build();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "custom/1.0");
    }

    #[test]
    fn test_token_url() {
        let config = ClientConfig::builder()
            .with_api_base_url("http://localhost:8080/")
            .build();
        assert_eq!(config.token_url(), "http://localhost:8080/2/oauth2/token");
    }
}
