//! Logging setup for applications and tests built on the marketplace SDK.

pub mod config;
pub mod tracing;

pub use config::{Config, Format};
