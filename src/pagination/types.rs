//! Pagination types
//!
//! The cursor carried between requests, the parsed page response, and the
//! continue/stop decision.

use crate::types::{field_truthy, truthy, JsonValue, StringMap};
use serde::Serialize;

/// Default page size sent as `limit`
pub const DEFAULT_LIMIT: u32 = 20;

/// Default server-side fan-out hint sent as `concurrency`
pub const DEFAULT_CONCURRENCY: u32 = 4;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the concurrency hint
pub const CONCURRENCY_PARAM: &str = "concurrency";

/// Query parameter carrying the current offset
pub const OFFSET_PARAM: &str = "offset";

/// Why a pagination run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The response carried a truthy `done`
    DoneFlag,
    /// The response had no (or empty) `results`
    NoResults,
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch another page at this offset
    Continue {
        /// Offset for the next request
        offset: u64,
    },
    /// No more pages
    Done {
        /// What ended the run
        reason: StopReason,
    },
}

/// Completion fields read from one page response
///
/// Only `done`, `results`, `offset`, `total` and `message` are inspected;
/// the rest of the body is kept verbatim for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Truthy `done`
    pub done: bool,
    /// Truthy `results`
    pub has_results: bool,
    /// Next offset, when the field is a non-negative integer
    pub offset: Option<u64>,
    /// Total item count, when the field is a non-negative integer
    pub total: Option<u64>,
    /// Human readable status, when present and truthy
    pub message: Option<String>,
    /// Full response body
    pub body: JsonValue,
}

impl PageResponse {
    /// Read the completion fields out of a response body
    pub fn from_value(body: JsonValue) -> Self {
        let message = body.get("message").filter(|m| truthy(m)).map(|m| match m {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        });

        Self {
            done: field_truthy(&body, "done"),
            has_results: field_truthy(&body, "results"),
            offset: body.get("offset").and_then(JsonValue::as_u64),
            total: body.get("total").and_then(JsonValue::as_u64),
            message,
            body,
        }
    }

    /// Whether this page ends the run, and why
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.done {
            Some(StopReason::DoneFlag)
        } else if !self.has_results {
            Some(StopReason::NoResults)
        } else {
            None
        }
    }

    /// One-line summary: the message if set, else the whole body
    pub fn summary(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => self.body.to_string(),
        }
    }
}

/// Pagination cursor carried across iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Current offset
    pub offset: u64,
    /// Page size
    pub limit: u32,
    /// Concurrency hint forwarded to the endpoint
    pub concurrency: u32,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl PageCursor {
    /// Query parameters for the request at this cursor, merged over `base`
    pub fn query(&self, base: &StringMap) -> StringMap {
        let mut params = base.clone();
        params.insert(LIMIT_PARAM.to_string(), self.limit.to_string());
        params.insert(CONCURRENCY_PARAM.to_string(), self.concurrency.to_string());
        params.insert(OFFSET_PARAM.to_string(), self.offset.to_string());
        params
    }

    /// Offset to fall back to when the response does not supply one.
    ///
    /// `None` when `offset + limit` does not fit in a `u64`.
    pub fn fallback_offset(&self) -> Option<u64> {
        self.offset.checked_add(u64::from(self.limit))
    }
}

/// Tracks pagination state during one run
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor for the next request
    pub cursor: PageCursor,
    /// Requests issued so far
    pub pages: u32,
    /// Last total reported by a non-terminal page
    pub total: Option<u64>,
}

impl PaginationState {
    /// Create state starting at the given cursor
    pub fn new(cursor: PageCursor) -> Self {
        Self {
            cursor,
            ..Default::default()
        }
    }

    /// Count an issued request
    pub fn record_page(&mut self) {
        self.pages += 1;
    }

    /// Remember a reported total, keeping the previous one when absent
    pub fn observe_total(&mut self, total: Option<u64>) {
        if total.is_some() {
            self.total = total;
        }
    }
}
