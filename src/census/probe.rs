//! Per-instance probe
//!
//! One probe turns one candidate into exactly one [`Outcome`]: fetch the
//! instance's front page, then classify it. Fetch failures become failed
//! outcomes; classification itself cannot fail.

use crate::census::classifier::Classifier;
use crate::census::fetcher::Fetcher;
use crate::state::{Instance, Outcome};
use std::future::Future;
use std::sync::Arc;

/// Something that can verify a single candidate
///
/// Shared by every worker in the pool.
pub trait Probe: Send + Sync + 'static {
    fn probe(&self, instance: Instance) -> impl Future<Output = Outcome> + Send;
}

/// Fetch-then-classify probe used for real runs
pub struct InstanceProber {
    fetcher: Fetcher,
    classifier: Arc<Classifier>,
}

impl InstanceProber {
    pub fn new(fetcher: Fetcher, classifier: Arc<Classifier>) -> Self {
        Self {
            fetcher,
            classifier,
        }
    }
}

impl Probe for InstanceProber {
    async fn probe(&self, instance: Instance) -> Outcome {
        match self.fetcher.fetch(&instance.address).await {
            Ok(body) => {
                // The parsed document is not Send; it is built and dropped here
                let disposition = self.classifier.classify_page(&body, instance.uptime);
                tracing::debug!("{} classified as {}", instance.address, disposition);
                Outcome::classified(instance, disposition)
            }
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", instance.address, e);
                Outcome::failed(instance, e)
            }
        }
    }
}
