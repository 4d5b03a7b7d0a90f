//! Pagination module
//!
//! Offset pagination for batch cron endpoints. Each response either ends the
//! run (truthy `done`, or no `results`) or names the next offset. When it
//! doesn't, the paginator advances by `limit`.

mod paginator;
mod types;

pub use paginator::OffsetPaginator;
pub use types::{
    NextPage, PageCursor, PageResponse, PaginationState, StopReason, CONCURRENCY_PARAM,
    DEFAULT_CONCURRENCY, DEFAULT_LIMIT, LIMIT_PARAM, OFFSET_PARAM,
};
