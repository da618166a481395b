//! Run summary
//!
//! Counts and failures from a finished census, rendered as the closing log
//! lines of a run.

use crate::FetchError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

/// Summary of a completed census
#[derive(Debug, Clone)]
pub struct CensusSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Candidates read from the directory
    pub candidates: usize,

    pub reliable: usize,
    pub low_uptime: usize,
    pub unreliable: usize,

    /// Probed fine but no permanent storage
    pub discarded: usize,

    /// Probe failures keyed by address
    pub errors: HashMap<String, FetchError>,

    /// Where the report was (or will be) written
    pub report_path: PathBuf,
}

impl CensusSummary {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Instances that made it into the report
    pub fn reported(&self) -> usize {
        self.reliable + self.low_uptime + self.unreliable
    }

    /// Failed addresses sorted for stable output
    pub fn sorted_errors(&self) -> Vec<(&str, &FetchError)> {
        let mut errors: Vec<_> = self
            .errors
            .iter()
            .map(|(address, error)| (address.as_str(), error))
            .collect();
        errors.sort_by(|a, b| a.0.cmp(b.0));
        errors
    }

    /// One-line rendering of the counts and the report destination
    pub fn totals(&self) -> String {
        format!(
            "Totals: reliable: {} | low_uptime: {} | unreliable: {} | discarded: {} | failed: {} -> {}",
            self.reliable,
            self.low_uptime,
            self.unreliable,
            self.discarded,
            self.errors.len(),
            self.report_path.display()
        )
    }

    /// Logs the totals line followed by one line per failed address
    pub fn log(&self) {
        tracing::info!(
            "Verification finished in {:.1}s",
            self.duration().num_milliseconds() as f64 / 1000.0
        );
        tracing::info!("{}", self.totals());

        if !self.errors.is_empty() {
            tracing::warn!("Failed to reach {} instances", self.errors.len());
            for (address, error) in self.sorted_errors() {
                tracing::warn!("FAILED [{}]: {}", address, error);
            }
        }
    }
}
