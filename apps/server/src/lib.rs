//! Contacts search server
//!
//! Serves the same contact search through every query construction variant,
//! once with the inputs spliced into a `$where` script (`/insecure/...`) and
//! once with the inputs bound as field values (`/secure/...`). Callers
//! authenticate with HTTP Basic; the authenticated name is the identity the
//! search is scoped to.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
