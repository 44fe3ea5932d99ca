pub mod contacts;
pub mod metrics;
