//! Command-line front end for the refund estimator.
//!
//! Everything the binary does is reachable from here so it can be driven
//! from tests with in-memory readers and writers.

pub mod app;
pub mod cli;
pub mod config;
pub mod form_file;
pub mod logging;
pub mod render;
pub mod session;
pub mod validation;

pub use app::{App, BatchEntry, Estimate};
pub use config::{AppConfig, ConfigError, DisplayConfig};
