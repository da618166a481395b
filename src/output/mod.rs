//! Output module for census results
//!
//! This module handles:
//! - Writing the JSON report of verified instances
//! - Reading a report back
//! - Summarizing a finished run in the log

mod report;
mod summary;

pub use report::{read_report, write_report, Report};
pub use summary::CensusSummary;

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
