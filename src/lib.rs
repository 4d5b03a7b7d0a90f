//! # cron-refresh
//!
//! Sequential runner for cron-triggered maintenance endpoints.
//!
//! ## Features
//!
//! - **Paginated jobs**: GET a batch endpoint with `limit`/`concurrency`/`offset`
//!   until it reports `done` or returns no `results`, pausing between pages
//! - **Action jobs**: a single authenticated POST with a JSON body
//! - **Job plans**: run a YAML list of jobs in order (built-in default plan included)
//! - **Shared secret auth**: bearer header or `secret` query parameter
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cron_refresh::config::RunnerSettingsParams;
//! use cron_refresh::{CallRunner, JobPlan, Result, RunnerSettings};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let settings = RunnerSettings::new(RunnerSettingsParams {
//!         base_url: Some("https://app.example.com".to_string()),
//!         secret: Some("s3cret".to_string()),
//!         ..Default::default()
//!     })?;
//!     let runner = CallRunner::from_settings(&settings)?;
//!
//!     runner
//!         .run_plan(&JobPlan::default(), &mut |msg| println!("{msg:?}"))
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Cron secret placement
pub mod auth;

/// HTTP client for the cron endpoints
pub mod http;

/// Offset pagination
pub mod pagination;

/// Call runner
pub mod engine;

/// Settings and job plans
pub mod config;

/// Console rendering of engine messages
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{JobDefinition, JobPlan, RunnerSettings};
pub use engine::{CallRunner, JobOutcome, Message};
pub use error::{Error, Result};
