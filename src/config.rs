//! Runtime settings and job plans
//!
//! `RunnerSettings` holds everything needed to reach the cron endpoints
//! (base URL, secret, timeouts, pagination defaults). `JobPlan` is the ordered
//! list of endpoints one invocation calls, either the built-in default plan
//! or one loaded from YAML.

use crate::auth::{AuthConfig, Location};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, DEFAULT_TIMEOUT};
use crate::pagination::{DEFAULT_CONCURRENCY, DEFAULT_LIMIT};
use crate::types::{JsonValue, StringMap};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the deployment base URL
pub const BASE_URL_ENV: &str = "REFRESH_BASE_URL";

/// Environment variable holding the shared cron secret
pub const SECRET_ENV: &str = "CRON_SECRET";

/// Pause between two pages of the same run
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

// ============================================================================
// Runner Settings
// ============================================================================

/// Validated settings for one invocation
#[derive(Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    base_url: String,
    secret: String,
    secret_location: Location,
    timeout: Duration,
    page_delay: Duration,
    default_limit: u32,
    default_concurrency: u32,
    strict: bool,
}

/// Raw values used to build [`RunnerSettings`]
#[derive(Debug, Clone)]
pub struct RunnerSettingsParams {
    pub base_url: Option<String>,
    pub secret: Option<String>,
    pub secret_location: Location,
    pub timeout: Duration,
    pub page_delay: Duration,
    pub default_limit: u32,
    pub default_concurrency: u32,
    pub strict: bool,
}

impl Default for RunnerSettingsParams {
    fn default() -> Self {
        Self {
            base_url: None,
            secret: None,
            secret_location: Location::Header,
            timeout: DEFAULT_TIMEOUT,
            page_delay: DEFAULT_PAGE_DELAY,
            default_limit: DEFAULT_LIMIT,
            default_concurrency: DEFAULT_CONCURRENCY,
            strict: false,
        }
    }
}

impl RunnerSettings {
    /// Validate raw values into settings
    pub fn new(params: RunnerSettingsParams) -> Result<Self> {
        let RunnerSettingsParams {
            base_url,
            secret,
            secret_location,
            timeout,
            page_delay,
            default_limit,
            default_concurrency,
            strict,
        } = params;

        let base_url = base_url
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_field(BASE_URL_ENV))?;
        let parsed = Url::parse(&base_url).context(format!("{BASE_URL_ENV}='{base_url}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                BASE_URL_ENV,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let secret = secret
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::missing_field(SECRET_ENV))?;

        if default_limit == 0 {
            return Err(Error::invalid_value("limit", "must be greater than zero"));
        }
        if timeout.is_zero() {
            return Err(Error::invalid_value("timeout", "must be greater than zero"));
        }

        Ok(Self {
            base_url,
            secret,
            secret_location,
            timeout,
            page_delay,
            default_limit,
            default_concurrency,
            strict,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn secret_location(&self) -> Location {
        self.secret_location
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub fn default_concurrency(&self) -> u32 {
        self.default_concurrency
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// HTTP client configuration for these settings
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(self.base_url())
            .timeout(self.timeout())
            .error_for_status(self.strict())
            .build()
    }

    /// Auth configuration carrying the secret
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::from_secret(self.secret.clone(), self.secret_location())
    }
}

impl fmt::Debug for RunnerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerSettings")
            .field("base_url", &self.base_url)
            .field("secret", &"***")
            .field("secret_location", &self.secret_location)
            .field("timeout", &self.timeout)
            .field("page_delay", &self.page_delay)
            .field("default_limit", &self.default_limit)
            .field("default_concurrency", &self.default_concurrency)
            .field("strict", &self.strict)
            .finish()
    }
}

// ============================================================================
// Job Plan
// ============================================================================

/// One endpoint call in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobDefinition {
    /// Batch endpoint driven page by page with GET
    Paginated {
        /// Endpoint path, joined onto the base URL
        path: String,
        /// Extra query parameters; `limit` and `concurrency` override defaults
        #[serde(default, deserialize_with = "scalar_map")]
        params: StringMap,
    },

    /// Single POST with a JSON body
    Action {
        /// Endpoint path, joined onto the base URL
        path: String,
        /// JSON body
        #[serde(default = "empty_payload")]
        payload: JsonValue,
    },
}

impl JobDefinition {
    /// Create a paginated job without extra params
    pub fn paginated(path: impl Into<String>) -> Self {
        Self::Paginated {
            path: path.into(),
            params: StringMap::new(),
        }
    }

    /// Create an action job
    pub fn action(path: impl Into<String>, payload: JsonValue) -> Self {
        Self::Action {
            path: path.into(),
            payload,
        }
    }

    /// Endpoint path of the job
    pub fn path(&self) -> &str {
        match self {
            Self::Paginated { path, .. } | Self::Action { path, .. } => path,
        }
    }
}

fn empty_payload() -> JsonValue {
    JsonValue::Object(serde_json::Map::new())
}

// Query values may be written as YAML numbers or booleans.
fn scalar_map<'de, D>(deserializer: D) -> std::result::Result<StringMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, JsonValue>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| match value {
            JsonValue::String(s) => Ok((key, s)),
            JsonValue::Number(n) => Ok((key, n.to_string())),
            JsonValue::Bool(b) => Ok((key, b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "query param '{key}' must be a scalar, got {other}"
            ))),
        })
        .collect()
}

/// Ordered list of jobs run by one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    pub jobs: Vec<JobDefinition>,
}

impl Default for JobPlan {
    /// Instagram refresh (paginated), then a 28-day accrual backfill
    fn default() -> Self {
        Self {
            jobs: vec![
                JobDefinition::paginated("/api/cron/instagram-refresh"),
                JobDefinition::action(
                    "/api/cron/backfill-accrual",
                    serde_json::json!({ "days": 28 }),
                ),
            ],
        }
    }
}

impl JobPlan {
    /// Parse a plan from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        let plan: Self = serde_yaml::from_str(content)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a plan from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).with_context(|| format!("plan '{}'", path.display()))
    }

    /// Check the plan can be run
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(Error::config("job plan has no jobs"));
        }
        if let Some(job) = self.jobs.iter().find(|j| j.path().trim().is_empty()) {
            return Err(Error::config(format!("job has an empty path: {job:?}")));
        }
        Ok(())
    }

    /// Render the plan as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
