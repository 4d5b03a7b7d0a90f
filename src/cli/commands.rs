//! CLI commands and argument parsing

use crate::auth::Location;
use crate::config::{BASE_URL_ENV, SECRET_ENV};
use crate::output::OutputFormat;
use crate::pagination::{DEFAULT_CONCURRENCY, DEFAULT_LIMIT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Calls cron-triggered refresh and backfill endpoints, one request at a time
#[derive(Parser, Debug)]
#[command(name = "cron-refresh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Deployment base URL
    #[arg(long, global = true, env = BASE_URL_ENV)]
    pub base_url: Option<String>,

    /// Shared cron secret
    #[arg(long, global = true, env = SECRET_ENV, hide_env_values = true)]
    pub secret: Option<String>,

    /// Where to send the secret
    #[arg(long, global = true, value_enum, default_value_t = Location::Header)]
    pub secret_in: Location,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Pause between pages in seconds
    #[arg(long, global = true, default_value_t = 2)]
    pub delay_secs: u64,

    /// Default page size for paginated jobs
    #[arg(long, global = true, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Default concurrency hint for paginated jobs
    #[arg(long, global = true, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: u32,

    /// Treat non-2xx responses as errors
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `run` with the built-in plan
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run every job in the plan, in order
    Run {
        /// Job plan file (YAML); the built-in plan when omitted
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Page through one batch endpoint
    Paginate {
        /// Endpoint path, e.g. /api/cron/instagram-refresh
        path: String,

        /// Extra query parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// POST once to an action endpoint
    Post {
        /// Endpoint path, e.g. /api/cron/backfill-accrual
        path: String,

        /// Inline JSON body (defaults to `{}`)
        #[arg(long)]
        payload: Option<String>,
    },

    /// Print the resolved job plan as YAML
    Plan {
        /// Job plan file (YAML); the built-in plan when omitted
        #[arg(long)]
        plan: Option<PathBuf>,
    },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
