//! Request handlers for API endpoints

pub mod index;
pub mod metrics;
pub mod search;

pub use metrics::*;
pub use search::*;
