//! Authenticator implementation
//!
//! Applies the configured cron secret to request builders.

use super::types::AuthConfig;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// The underlying auth configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,
            AuthConfig::Bearer { token } => req.bearer_auth(token),
            AuthConfig::QuerySecret { param, value } => {
                req.query(&[(param.as_str(), value.as_str())])
            }
        }
    }
}
