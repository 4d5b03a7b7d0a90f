//! Authentication module
//!
//! The cron endpoints accept a shared secret either as a bearer token or as
//! a `secret` query parameter. `Authenticator` applies whichever is configured.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location, DEFAULT_SECRET_PARAM};
