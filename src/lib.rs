//! Binscout: a PrivateBin instance census
//!
//! This crate reads the public PrivateBin directory, probes every listed instance,
//! and sorts the ones that support permanent storage into reliability tiers.

pub mod census;
pub mod config;
pub mod directory;
pub mod headers;
pub mod output;
pub mod state;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Binscout runs
///
/// Every variant here is fatal to a run. Failures of individual instance probes
/// are carried as [`FetchError`] inside the outcomes and never abort the run.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize browser headers: {0}")]
    Headers(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Directory fetch failed: {0}")]
    Directory(#[source] FetchError),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure of a single HTTP fetch
///
/// Sources are kept as strings so the error can be cloned into the error map
/// and compared in tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("body from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

impl FetchError {
    /// Returns true if the request never completed within its time budget
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for Binscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use census::run_census;
pub use config::Config;
pub use output::CensusSummary;
pub use state::{Category, Disposition, Instance, Outcome};
