//! HTTP client for cron endpoints
//!
//! A thin wrapper over `reqwest` that handles:
//! - Joining endpoint paths onto the configured base URL
//! - The cron secret on every request
//! - A per-call timeout
//!
//! Requests are never retried. Non-2xx responses are handed back to the
//! caller unless strict status checking is enabled.

use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::StringMap;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout applied to every call unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Turn non-2xx responses into `Error::HttpStatus`
    pub error_for_status: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("cron-refresh/{}", env!("CARGO_PKG_VERSION")),
            error_for_status: false,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Fail on non-2xx responses
    pub fn error_for_status(mut self, strict: bool) -> Self {
        self.config.error_for_status = strict;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request body (JSON)
    pub body: Option<Value>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Replace all query parameters
    #[must_use]
    pub fn query_map(mut self, query: StringMap) -> Self {
        self.query = query;
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client used by the call runner
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_authenticator(auth_config);
        Ok(client)
    }

    /// Set the authenticator
    pub fn set_authenticator(&mut self, auth_config: AuthConfig) {
        self.authenticator = Authenticator::new(auth_config);
    }

    /// Make a GET request with config
    pub async fn get_with_config(&self, url: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::GET, url, config).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        self.request(Method::POST, url, RequestConfig::default().json(body))
            .await
    }

    /// Send exactly one request
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let full_url = self.build_url(url);
        let mut req = self.client.request(method.clone(), &full_url);

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        req = self.authenticator.apply(req);

        let response = req.send().await?;
        let status = response.status();

        if status.is_success() {
            debug!("Request succeeded: {} {}", method, full_url);
        } else {
            if self.config.error_for_status {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::http_status(status.as_u16(), body));
            }
            warn!(status = status.as_u16(), %method, url = %full_url, "non-success response");
        }

        Ok(response)
    }

    /// Make a GET request and parse the body as JSON
    ///
    /// The body is read as text first so a non-JSON reply surfaces as
    /// `Error::JsonParse` rather than a transport error.
    pub async fn get_json_with_config(&self, url: &str, config: RequestConfig) -> Result<Value> {
        let response = self.get_with_config(url, config).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Build full URL from path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("auth", self.authenticator.config())
            .finish_non_exhaustive()
    }
}
