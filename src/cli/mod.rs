//! CLI module
//!
//! Command-line interface for running cron jobs.
//!
//! # Commands
//!
//! - `run` - Run the job plan (default when no command is given)
//! - `paginate` - Page through one batch endpoint
//! - `post` - POST once to an action endpoint
//! - `plan` - Print the resolved job plan

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
