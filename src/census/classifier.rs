//! Instance classifier
//!
//! Decides, from an instance's front page, which report bucket it belongs in.
//! The checks run in strict priority order:
//!
//! 1. No `never` expiration option → `Discard`
//! 2. An info alert mentions a suspicious phrase → `Unreliable`
//! 3. Disclosed uptime below threshold → `LowUptime`
//! 4. Otherwise → `Reliable`

use crate::config::ClassifierConfig;
use crate::state::Disposition;
use crate::ScoutError;
use scraper::{Html, Selector};

const EXPIRATION_OPTION_SELECTOR: &str = "select#pasteExpiration option";
const INFO_ALERT_SELECTOR: &str = "div.alert.alert-info[role='alert']";

/// Compiles a CSS selector, reporting the offending selector on failure
pub(crate) fn compile_selector(css: &str) -> Result<Selector, ScoutError> {
    Selector::parse(css).map_err(|e| ScoutError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Page classifier with pre-compiled selectors
///
/// Built once per run and shared across workers.
#[derive(Debug)]
pub struct Classifier {
    expiration_options: Selector,
    info_alerts: Selector,
    suspicious_phrases: Vec<String>,
    uptime_threshold: f64,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ScoutError> {
        Ok(Self {
            expiration_options: compile_selector(EXPIRATION_OPTION_SELECTOR)?,
            info_alerts: compile_selector(INFO_ALERT_SELECTOR)?,
            suspicious_phrases: config
                .suspicious_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            uptime_threshold: config.uptime_threshold,
        })
    }

    /// Parses a fetched page body and classifies it
    pub fn classify_page(&self, body: &str, uptime: f64) -> Disposition {
        let document = Html::parse_document(body);
        self.classify(&document, uptime)
    }

    /// Classifies an already parsed document
    ///
    /// Never fails: a page missing the expected markup is simply discarded.
    pub fn classify(&self, document: &Html, uptime: f64) -> Disposition {
        if !self.supports_permanent_storage(document) {
            return Disposition::Discard;
        }

        if self.has_suspicious_alert(document) {
            return Disposition::UNRELIABLE;
        }

        if uptime < self.uptime_threshold {
            return Disposition::LOW_UPTIME;
        }

        Disposition::RELIABLE
    }

    fn supports_permanent_storage(&self, document: &Html) -> bool {
        document
            .select(&self.expiration_options)
            .any(|option| option.value().attr("value") == Some("never"))
    }

    fn has_suspicious_alert(&self, document: &Html) -> bool {
        document.select(&self.info_alerts).any(|alert| {
            let text = alert.text().collect::<String>().to_lowercase();
            self.suspicious_phrases
                .iter()
                .any(|phrase| text.contains(phrase.as_str()))
        })
    }
}
