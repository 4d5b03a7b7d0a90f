//! Offset paginator
//!
//! Sends `limit`, `concurrency` and `offset` with each request and advances
//! the offset the way the endpoint tells it to.

use super::types::{
    NextPage, PageCursor, PageResponse, PaginationState, CONCURRENCY_PARAM, LIMIT_PARAM,
    OFFSET_PARAM,
};
use crate::error::{Error, Result};
use crate::types::StringMap;
use tracing::warn;

/// Offset-based pagination for batch cron endpoints
///
/// Common pattern: `?limit=20&concurrency=4&offset=40`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Extra query parameters sent with every page
    pub base_params: StringMap,
    /// Page size
    pub limit: u32,
    /// Concurrency hint
    pub concurrency: u32,
}

impl OffsetPaginator {
    /// Create a paginator from base params and defaults.
    ///
    /// `limit` and `concurrency` in `base_params` win over the defaults. An
    /// `offset` in `base_params` is ignored since the paginator owns it.
    pub fn new(base_params: StringMap, default_limit: u32, default_concurrency: u32) -> Result<Self> {
        let mut base_params = base_params;
        let limit = take_count(&mut base_params, LIMIT_PARAM)?.unwrap_or(default_limit);
        let concurrency =
            take_count(&mut base_params, CONCURRENCY_PARAM)?.unwrap_or(default_concurrency);
        if base_params.remove(OFFSET_PARAM).is_some() {
            warn!("ignoring 'offset' in base params, pagination always starts at 0");
        }

        if limit == 0 {
            return Err(Error::invalid_value(LIMIT_PARAM, "must be greater than zero"));
        }

        Ok(Self {
            base_params,
            limit,
            concurrency,
        })
    }

    /// Cursor for the first request
    pub fn initial_cursor(&self) -> PageCursor {
        PageCursor {
            offset: 0,
            limit: self.limit,
            concurrency: self.concurrency,
        }
    }

    /// Query parameters for the request at `cursor`
    pub fn params(&self, cursor: &PageCursor) -> StringMap {
        cursor.query(&self.base_params)
    }

    /// Process a response and decide whether there's a next page.
    ///
    /// A terminal page ends the run before its `total` is read, so the
    /// reported total is the one from the last page that had results.
    pub fn process_response(
        &self,
        page: &PageResponse,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        if let Some(reason) = page.stop_reason() {
            return Ok(NextPage::Done { reason });
        }

        state.observe_total(page.total);

        let current = state.cursor.offset;
        let next = match page.offset {
            Some(reported) if reported >= current => reported,
            reported => {
                if let Some(reported) = reported {
                    warn!(
                        reported,
                        current, "endpoint reported a smaller offset, advancing by limit instead"
                    );
                }
                state.cursor.fallback_offset().ok_or_else(|| {
                    Error::invalid_value(
                        OFFSET_PARAM,
                        format!("{current} + limit {} overflows", state.cursor.limit),
                    )
                })?
            }
        };

        state.cursor.offset = next;
        Ok(NextPage::Continue { offset: next })
    }
}

fn take_count(params: &mut StringMap, key: &str) -> Result<Option<u32>> {
    params
        .remove(key)
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|e| Error::invalid_value(key, format!("'{raw}': {e}")))
        })
        .transpose()
}
