//! Result aggregator
//!
//! The single owner of the report buckets and the error map. Drains outcomes
//! from the pool as they arrive and routes each one:
//!
//! | Outcome                  | Goes to                         |
//! |--------------------------|---------------------------------|
//! | `Err(FetchError)`        | error map, keyed by address     |
//! | `Ok(Report(category))`   | matching report bucket          |
//! | `Ok(Discard)`            | discard counter only            |

use crate::output::Report;
use crate::state::{Disposition, Outcome};
use crate::FetchError;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Everything collected from one pool run
#[derive(Debug, Default)]
pub struct Aggregation {
    pub report: Report,
    pub errors: HashMap<String, FetchError>,
    pub discarded: usize,
    pub completed: usize,
}

/// Incremental outcome collector with progress logging
#[derive(Debug)]
pub struct Aggregator {
    collected: Aggregation,
    total: usize,
    progress_every: usize,
}

impl Aggregator {
    /// Creates an aggregator expecting `total` outcomes
    ///
    /// Progress is logged every `progress_every` completions and on the last one.
    pub fn new(total: usize, progress_every: usize) -> Self {
        Self {
            collected: Aggregation::default(),
            total,
            progress_every: progress_every.max(1),
        }
    }

    /// Routes a single outcome
    pub fn record(&mut self, outcome: Outcome) {
        self.collected.completed += 1;
        self.log_progress();

        let Outcome { instance, result } = outcome;
        match result {
            Err(error) => {
                // Last write wins for repeated addresses
                self.collected.errors.insert(instance.address, error);
            }
            Ok(Disposition::Report(category)) => {
                self.collected.report.push(category, instance);
            }
            Ok(Disposition::Discard) => {
                self.collected.discarded += 1;
            }
        }
    }

    /// Records outcomes until the channel closes
    pub async fn drain(&mut self, outcomes: &mut mpsc::UnboundedReceiver<Outcome>) {
        while let Some(outcome) = outcomes.recv().await {
            self.record(outcome);
        }

        if self.collected.completed != self.total {
            tracing::warn!(
                "Expected {} outcomes but received {}",
                self.total,
                self.collected.completed
            );
        }
    }

    pub fn completed(&self) -> usize {
        self.collected.completed
    }

    pub fn finish(self) -> Aggregation {
        self.collected
    }

    fn log_progress(&self) {
        let done = self.collected.completed;
        if done % self.progress_every == 0 || done == self.total {
            tracing::info!("Checked: {}/{}", done, self.total);
        }
    }
}
