//! Browser-like request headers
//!
//! Some instances sit behind bot filters that reject obvious HTTP clients, so
//! every request carries the headers a desktop browser would send on a direct
//! navigation. The user agent is picked at random per request.

use crate::config::HeadersConfig;
use crate::ScoutError;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Produces request headers for a target URL
///
/// Shared by every worker in the pool, so implementations must be safe to call
/// concurrently.
pub trait HeaderSource: Send + Sync {
    fn headers_for(&self, url: &Url) -> HeaderMap;
}

/// Rotating desktop browser profile
#[derive(Debug, Clone)]
pub struct BrowserHeaders {
    user_agents: Vec<HeaderValue>,
    accept_language: HeaderValue,
}

impl BrowserHeaders {
    /// Builds the profile, checking every configured value is a legal header
    ///
    /// # Returns
    ///
    /// * `Ok(BrowserHeaders)` - Profile ready for use
    /// * `Err(ScoutError::Headers)` - No user agents, or a value is not a valid header
    pub fn new(config: &HeadersConfig) -> Result<Self, ScoutError> {
        if config.user_agents.is_empty() {
            return Err(ScoutError::Headers("no user agents configured".to_string()));
        }

        let user_agents = config
            .user_agents
            .iter()
            .map(|ua| {
                HeaderValue::from_str(ua)
                    .map_err(|e| ScoutError::Headers(format!("invalid user agent '{}': {}", ua, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
            ScoutError::Headers(format!(
                "invalid accept-language '{}': {}",
                config.accept_language, e
            ))
        })?;

        Ok(Self {
            user_agents,
            accept_language,
        })
    }

    fn pick_user_agent(&self) -> HeaderValue {
        let idx = rand::thread_rng().gen_range(0..self.user_agents.len());
        self.user_agents[idx].clone()
    }
}

impl HeaderSource for BrowserHeaders {
    fn headers_for(&self, url: &Url) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.pick_user_agent());
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, self.accept_language.clone());
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        // Browsers only send fetch metadata to secure origins
        if url.scheme() == "https" {
            for (name, value) in [
                ("sec-fetch-dest", "document"),
                ("sec-fetch-mode", "navigate"),
                ("sec-fetch-site", "none"),
                ("sec-fetch-user", "?1"),
            ] {
                headers.insert(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                );
            }
        }

        headers
    }
}
