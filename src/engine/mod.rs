//! Execution engine module
//!
//! The call runner: drives paginated endpoints page by page and fires single
//! POSTs at action endpoints, strictly one request at a time.
//!
//! # Overview
//!
//! - `CallRunner` - runs one job, or a whole `JobPlan` in order
//! - `RunnerConfig` - page delay and pagination defaults
//! - `Message` - progress events handed to the caller's sink

mod types;

pub use types::{
    ActionOutcome, JobOutcome, LogLevel, Message, PaginationSummary, RunnerConfig,
};

use crate::config::{JobDefinition, JobPlan, RunnerSettings};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{NextPage, OffsetPaginator, PageResponse, PaginationState};
use crate::types::{JsonValue, StringMap};
use chrono::Utc;
use tracing::{debug, info};

/// Runs cron jobs against one deployment
#[derive(Debug)]
pub struct CallRunner {
    client: HttpClient,
    config: RunnerConfig,
}

impl CallRunner {
    /// Create a runner over an already configured client
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            config: RunnerConfig::default(),
        }
    }

    /// Build a runner from validated settings
    pub fn from_settings(settings: &RunnerSettings) -> Result<Self> {
        let client = HttpClient::with_auth(settings.http_config(), settings.auth_config())?;
        Ok(Self::new(client).with_config(RunnerConfig {
            page_delay: settings.page_delay(),
            default_limit: settings.default_limit(),
            default_concurrency: settings.default_concurrency(),
        }))
    }

    /// Set runner configuration
    #[must_use]
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Page through a batch endpoint until it reports completion.
    ///
    /// Every request carries `base_params` plus `limit`, `concurrency` and the
    /// current `offset`. The run ends on a truthy `done` or missing/empty
    /// `results`; otherwise the offset moves to the reported one (or
    /// `offset + limit`) and the runner sleeps `page_delay` before the next page.
    /// The summary's total comes from the last page that had results.
    pub async fn run_paginated(
        &self,
        endpoint: &str,
        base_params: &StringMap,
        emit: &mut dyn FnMut(Message),
    ) -> Result<PaginationSummary> {
        let paginator = OffsetPaginator::new(
            base_params.clone(),
            self.config.default_limit,
            self.config.default_concurrency,
        )?;
        let mut state = PaginationState::new(paginator.initial_cursor());
        let url = self.client.build_url(endpoint);
        let started_at = Utc::now();

        info!(
            endpoint,
            limit = paginator.limit,
            concurrency = paginator.concurrency,
            "starting paginated run"
        );

        let (last_offset, stop_reason) = loop {
            let offset = state.cursor.offset;
            emit(Message::request("GET", &url, Some(offset)));

            let request = RequestConfig::new().query_map(paginator.params(&state.cursor));
            let body = self.client.get_json_with_config(endpoint, request).await?;
            state.record_page();

            let page = PageResponse::from_value(body);
            emit(Message::page_result(endpoint, offset, page.summary()));

            match paginator.process_response(&page, &mut state)? {
                NextPage::Done { reason } => break (offset, reason),
                NextPage::Continue { offset: next } => {
                    debug!(endpoint, from = offset, to = next, "advancing offset");
                    if !self.config.page_delay.is_zero() {
                        tokio::time::sleep(self.config.page_delay).await;
                    }
                }
            }
        };

        info!(endpoint, pages = state.pages, total = ?state.total, reason = ?stop_reason, "paginated run finished");
        emit(Message::finished(endpoint, state.total, state.pages));

        Ok(PaginationSummary {
            endpoint: endpoint.to_string(),
            pages: state.pages,
            last_offset,
            total: state.total,
            stop_reason,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Send one POST with `payload` as JSON and hand back the raw response text
    pub async fn run_simple_action(
        &self,
        endpoint: &str,
        payload: &JsonValue,
        emit: &mut dyn FnMut(Message),
    ) -> Result<ActionOutcome> {
        let url = self.client.build_url(endpoint);
        emit(Message::request("POST", &url, None));

        let response = self.client.post(endpoint, payload.clone()).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            emit(Message::warn(format!("{endpoint} answered HTTP {status}")));
        }
        let status = status.as_u16();

        info!(endpoint, status, bytes = body.len(), "action finished");
        emit(Message::action_result(endpoint, status, body.clone()));

        Ok(ActionOutcome {
            endpoint: endpoint.to_string(),
            status,
            body,
        })
    }

    /// Run a single job definition
    pub async fn run_job(
        &self,
        job: &JobDefinition,
        emit: &mut dyn FnMut(Message),
    ) -> Result<JobOutcome> {
        match job {
            JobDefinition::Paginated { path, params } => self
                .run_paginated(path, params, emit)
                .await
                .map(JobOutcome::Paginated),
            JobDefinition::Action { path, payload } => self
                .run_simple_action(path, payload, emit)
                .await
                .map(JobOutcome::Action),
        }
    }

    /// Run every job in the plan, in order, stopping at the first error
    pub async fn run_plan(
        &self,
        plan: &JobPlan,
        emit: &mut dyn FnMut(Message),
    ) -> Result<Vec<JobOutcome>> {
        plan.validate()?;

        let count = plan.jobs.len();
        let mut outcomes = Vec::with_capacity(count);
        for (idx, job) in plan.jobs.iter().enumerate() {
            emit(Message::info(format!(
                "Job {}/{count}: {}",
                idx + 1,
                job.path()
            )));
            outcomes.push(self.run_job(job, emit).await?);
        }
        Ok(outcomes)
    }
}
