//! Census module: verification of directory instances
//!
//! This module contains the core census logic, including:
//! - HTTP fetching under a per-request timeout
//! - Classification of instance front pages
//! - The bounded worker pool
//! - Aggregation of outcomes into the report
//! - Overall run coordination

mod aggregator;
mod classifier;
mod fetcher;
mod pool;
mod probe;

pub use aggregator::{Aggregation, Aggregator};
pub use classifier::Classifier;
pub(crate) use classifier::compile_selector;
pub use fetcher::{build_http_client, Fetcher};
pub use pool::{spawn_pool, PoolRun};
pub use probe::{InstanceProber, Probe};

use crate::config::Config;
use crate::directory::fetch_directory;
use crate::headers::{BrowserHeaders, HeaderSource};
use crate::output::{write_report, CensusSummary};
use crate::state::Instance;
use crate::ScoutError;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// Census coordinator
///
/// Owns the shared fetcher and classifier for one run.
pub struct Census {
    config: Config,
    fetcher: Fetcher,
    classifier: Arc<Classifier>,
}

impl Census {
    /// Creates a census with the default browser header profile
    ///
    /// # Returns
    ///
    /// * `Ok(Census)` - Ready to run
    /// * `Err(ScoutError::Headers)` - The header profile could not be built
    /// * `Err(ScoutError)` - The HTTP client or selectors could not be built
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let headers = Arc::new(BrowserHeaders::new(&config.headers)?);
        Self::with_headers(config, headers)
    }

    /// Creates a census using a custom header source
    pub fn with_headers(config: Config, headers: Arc<dyn HeaderSource>) -> Result<Self, ScoutError> {
        let fetcher = Fetcher::new(&config.probe, headers)?;
        let classifier = Arc::new(Classifier::new(&config.classifier)?);

        Ok(Self {
            config,
            fetcher,
            classifier,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads the candidate list from the directory
    pub async fn discover(&self) -> Result<Vec<Instance>, ScoutError> {
        fetch_directory(&self.fetcher, &self.config.directory).await
    }

    /// Probes every candidate and collects the results
    ///
    /// Never fails: individual probe failures end up in the error map.
    pub async fn verify(&self, candidates: Vec<Instance>) -> Aggregation {
        let total = candidates.len();
        let prober = Arc::new(InstanceProber::new(
            self.fetcher.clone(),
            Arc::clone(&self.classifier),
        ));

        let mut run = spawn_pool(prober, candidates, self.config.probe.concurrency);
        tracing::info!(
            "Verifying {} instances with {} workers",
            total,
            run.worker_count()
        );

        let mut aggregator = Aggregator::new(total, self.config.output.progress_every);
        aggregator.drain(&mut run.outcomes).await;
        run.join().await;

        aggregator.finish()
    }

    /// Runs a full census: discover, verify, summarize, write the report
    ///
    /// The summary is logged before the report is written, so a failed write
    /// still leaves the verification results in the log.
    pub async fn run(&self) -> crate::Result<CensusSummary> {
        let started_at = Utc::now();

        let candidates = self.discover().await?;
        let candidate_count = candidates.len();
        let aggregation = self.verify(candidates).await;

        let report_path = PathBuf::from(&self.config.output.report_path);
        let summary = CensusSummary {
            started_at,
            finished_at: Utc::now(),
            candidates: candidate_count,
            reliable: aggregation.report.reliable.len(),
            low_uptime: aggregation.report.low_uptime.len(),
            unreliable: aggregation.report.unreliable.len(),
            discarded: aggregation.discarded,
            errors: aggregation.errors,
            report_path: report_path.clone(),
        };
        summary.log();

        write_report(&aggregation.report, &report_path)?;
        tracing::info!("Report saved to {}", report_path.display());

        Ok(summary)
    }
}

/// Runs a complete census with the given configuration
///
/// # Example
///
/// ```no_run
/// use binscout::config::Config;
/// use binscout::census::run_census;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_census(Config::default()).await?;
/// println!("{} reliable instances", summary.reliable);
/// # Ok(())
/// # }
/// ```
pub async fn run_census(config: Config) -> crate::Result<CensusSummary> {
    Census::new(config)?.run().await
}
