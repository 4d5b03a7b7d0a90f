//! HTTP client module
//!
//! Single-shot requests against the cron endpoints: base URL joining,
//! default headers, the cron secret and a per-call timeout.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, DEFAULT_TIMEOUT};

#[cfg(test)]
mod tests;
