//! Engine types
//!
//! Messages emitted while calling endpoints, run configuration, and the
//! per-job outcomes handed back to callers.

use crate::config::DEFAULT_PAGE_DELAY;
use crate::pagination::{StopReason, DEFAULT_CONCURRENCY, DEFAULT_LIMIT};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// A message emitted while running jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// A request is about to be sent
    Request {
        /// HTTP method
        method: String,
        /// Full request URL (without query)
        url: String,
        /// Page offset, for paginated calls
        #[serde(skip_serializing_if = "Option::is_none")]
        offset: Option<u64>,
    },
    /// One page of a paginated run came back
    PageResult {
        /// Endpoint path
        endpoint: String,
        /// Offset the page was requested at
        offset: u64,
        /// Response message, or the whole body when there is none
        summary: String,
    },
    /// An action call came back
    ActionResult {
        /// Endpoint path
        endpoint: String,
        /// HTTP status
        status: u16,
        /// Raw response text
        body: String,
    },
    /// A paginated run ended
    Finished {
        /// Endpoint path
        endpoint: String,
        /// Last total reported by the endpoint
        total: Option<u64>,
        /// Requests issued
        pages: u32,
    },
    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
}

/// Log level for engine messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// General information
    Info,
    /// Warning
    Warn,
}

impl Message {
    /// Create a request message
    pub fn request(method: impl Into<String>, url: impl Into<String>, offset: Option<u64>) -> Self {
        Self::Request {
            method: method.into(),
            url: url.into(),
            offset,
        }
    }

    /// Create a page result message
    pub fn page_result(endpoint: impl Into<String>, offset: u64, summary: impl Into<String>) -> Self {
        Self::PageResult {
            endpoint: endpoint.into(),
            offset,
            summary: summary.into(),
        }
    }

    /// Create an action result message
    pub fn action_result(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::ActionResult {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a finished message
    pub fn finished(endpoint: impl Into<String>, total: Option<u64>, pages: u32) -> Self {
        Self::Finished {
            endpoint: endpoint.into(),
            total,
            pages,
        }
    }

    /// Create an info log
    pub fn info(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    /// Create a warning log
    pub fn warn(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Warn,
            message: message.into(),
        }
    }
}

/// Configuration for the call runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Pause between pages of one paginated run
    pub page_delay: Duration,
    /// `limit` sent when the job doesn't set one
    pub default_limit: u32,
    /// `concurrency` sent when the job doesn't set one
    pub default_concurrency: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            page_delay: DEFAULT_PAGE_DELAY,
            default_limit: DEFAULT_LIMIT,
            default_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Outcome of a paginated run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    /// Endpoint path
    pub endpoint: String,
    /// Requests issued
    pub pages: u32,
    /// Offset of the last request
    pub last_offset: u64,
    /// Last total reported by a page with results
    pub total: Option<u64>,
    /// What ended the run
    pub stop_reason: StopReason,
    /// When the first request was sent
    pub started_at: DateTime<Utc>,
    /// When the last response was processed
    pub finished_at: DateTime<Utc>,
}

/// Outcome of an action call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    /// Endpoint path
    pub endpoint: String,
    /// HTTP status
    pub status: u16,
    /// Raw response text
    pub body: String,
}

/// Outcome of one job in a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobOutcome {
    /// A paginated job
    Paginated(PaginationSummary),
    /// An action job
    Action(ActionOutcome),
}
