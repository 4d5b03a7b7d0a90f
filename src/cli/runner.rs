//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{JobPlan, RunnerSettings, RunnerSettingsParams};
use crate::engine::{CallRunner, JobOutcome};
use crate::error::{Result, ResultExt};
use crate::output::ConsoleOutput;
use crate::types::{JsonValue, StringMap};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            None => self.run_plan(None).await,
            Some(Commands::Run { plan }) => self.run_plan(plan.as_deref()).await,
            Some(Commands::Paginate { path, params }) => self.paginate(path, params).await,
            Some(Commands::Post { path, payload }) => self.post(path, payload.as_deref()).await,
            Some(Commands::Plan { plan }) => self.show_plan(plan.as_deref()),
        }
    }

    /// Validate settings from flags and environment
    pub fn settings(&self) -> Result<RunnerSettings> {
        RunnerSettings::new(RunnerSettingsParams {
            base_url: self.cli.base_url.clone(),
            secret: self.cli.secret.clone(),
            secret_location: self.cli.secret_in,
            timeout: Duration::from_secs(self.cli.timeout_secs),
            page_delay: Duration::from_secs(self.cli.delay_secs),
            default_limit: self.cli.limit,
            default_concurrency: self.cli.concurrency,
            strict: self.cli.strict,
        })
    }

    fn call_runner(&self) -> Result<CallRunner> {
        let settings = self.settings()?;
        info!(?settings, "resolved settings");
        CallRunner::from_settings(&settings)
    }

    fn output(&self) -> ConsoleOutput {
        ConsoleOutput::new(self.cli.format)
    }

    fn load_plan(path: Option<&Path>) -> Result<JobPlan> {
        match path {
            Some(path) => JobPlan::load(path),
            None => Ok(JobPlan::default()),
        }
    }

    async fn run_plan(&self, plan: Option<&Path>) -> Result<()> {
        let plan = Self::load_plan(plan)?;
        let runner = self.call_runner()?;
        let output = self.output();

        let outcomes = runner
            .run_plan(&plan, &mut |msg| output.emit(&msg))
            .await?;

        let pages: u32 = outcomes
            .iter()
            .map(|o| match o {
                JobOutcome::Paginated(summary) => summary.pages,
                JobOutcome::Action(_) => 1,
            })
            .sum();
        info!(jobs = outcomes.len(), requests = pages, "plan complete");
        Ok(())
    }

    async fn paginate(&self, path: &str, params: &[(String, String)]) -> Result<()> {
        let runner = self.call_runner()?;
        let output = self.output();
        let params: StringMap = params.iter().cloned().collect();

        runner
            .run_paginated(path, &params, &mut |msg| output.emit(&msg))
            .await?;
        Ok(())
    }

    async fn post(&self, path: &str, payload: Option<&str>) -> Result<()> {
        let payload: JsonValue = match payload {
            Some(raw) => serde_json::from_str(raw).context("--payload")?,
            None => serde_json::json!({}),
        };
        let runner = self.call_runner()?;
        let output = self.output();

        runner
            .run_simple_action(path, &payload, &mut |msg| output.emit(&msg))
            .await?;
        Ok(())
    }

    fn show_plan(&self, plan: Option<&Path>) -> Result<()> {
        let plan = Self::load_plan(plan)?;
        print!("{}", plan.to_yaml()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crate::auth::Location;
    use crate::error::Error;

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_settings_from_flags() {
        let runner = runner(&[
            "cron-refresh",
            "--base-url",
            "https://app.example.com",
            "--secret",
            "s3cret",
            "--secret-in",
            "query",
            "--delay-secs",
            "0",
            "--limit",
            "10",
        ]);
        let settings = runner.settings().unwrap();

        assert_eq!(settings.base_url(), "https://app.example.com");
        assert_eq!(settings.secret_location(), Location::Query);
        assert_eq!(settings.page_delay(), Duration::ZERO);
        assert_eq!(settings.default_limit(), 10);
    }

    #[test]
    fn test_settings_reject_blank_secret() {
        let runner = runner(&[
            "cron-refresh",
            "--base-url",
            "https://app.example.com",
            "--secret",
            "",
        ]);
        assert!(matches!(
            runner.settings().unwrap_err(),
            Error::MissingConfigField { .. }
        ));
    }

    #[tokio::test]
    async fn test_post_rejects_bad_payload() {
        let runner = runner(&[
            "cron-refresh",
            "--base-url",
            "https://app.example.com",
            "--secret",
            "s3cret",
            "post",
            "/api/cron/backfill-accrual",
            "--payload",
            "{days: 28",
        ]);
        let err = runner.run().await.unwrap_err();
        assert!(err.to_string().contains("--payload"));
    }
}
