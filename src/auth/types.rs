//! Auth configuration types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter the cron endpoints accept the secret under
pub const DEFAULT_SECRET_PARAM: &str = "secret";

/// Where the cron secret is placed on outgoing requests
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// `Authorization: Bearer <secret>` header
    #[default]
    Header,
    /// `?secret=<secret>` query parameter
    Query,
}

/// Authentication applied to every call
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// Bearer token in the Authorization header
    Bearer {
        /// The shared cron secret
        token: String,
    },

    /// Secret passed as a query parameter
    QuerySecret {
        /// Query parameter name
        param: String,
        /// The shared cron secret
        value: String,
    },
}

impl AuthConfig {
    /// Build the auth config for a secret at the given location
    pub fn from_secret(secret: impl Into<String>, location: Location) -> Self {
        match location {
            Location::Header => Self::Bearer {
                token: secret.into(),
            },
            Location::Query => Self::QuerySecret {
                param: DEFAULT_SECRET_PARAM.to_string(),
                value: secret.into(),
            },
        }
    }
}

// Secrets never reach logs through Debug.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            Self::QuerySecret { param, .. } => f
                .debug_struct("QuerySecret")
                .field("param", param)
                .field("value", &"***")
                .finish(),
        }
    }
}
