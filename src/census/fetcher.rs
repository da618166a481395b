//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a census, including:
//! - Building the shared HTTP client
//! - Attaching browser-like headers per request
//! - Bounding each request by the configured timeout
//! - Error classification
//!
//! There is deliberately no retry: a failed fetch drops the instance for this run.

use crate::config::ProbeConfig;
use crate::headers::HeaderSource;
use crate::FetchError;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// No default user agent is set; every request carries headers from the
/// [`HeaderSource`] instead.
///
/// # Arguments
///
/// * `config` - The probe configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ProbeConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.request_timeout_ms);

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(config.max_redirects))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared page fetcher
///
/// Cheap to clone: the client and header source are both reference counted.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    headers: Arc<dyn HeaderSource>,
    timeout: Duration,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &ProbeConfig, headers: Arc<dyn HeaderSource>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            headers,
            timeout: Duration::from_millis(config.request_timeout_ms),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// The per-request time budget
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches a page and returns its body
    ///
    /// # Request Flow
    ///
    /// 1. Parse the address and build browser headers for it
    /// 2. Send GET, following redirects up to the configured cap
    /// 3. Anything other than HTTP 200 is a failure
    /// 4. Read the body chunk by chunk, up to `max_body_bytes`
    ///
    /// The whole sequence, body included, must finish within the timeout.
    /// Invalid UTF-8 in the body is replaced rather than rejected.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The page body
    /// * `Err(FetchError)` - Invalid URL, network error, timeout, bad status,
    ///   unreadable or oversized body
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match tokio::time::timeout(self.timeout, self.fetch_inner(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }),
        }
    }

    async fn fetch_inner(&self, url: &str) -> Result<String, FetchError> {
        let target = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let headers = self.headers.headers_for(&target);

        let mut response = self
            .client
            .get(target)
            .headers(headers)
            .send()
            .await
            .map_err(|e| self.classify_error(url, e, false))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.classify_error(url, e, true))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn classify_error(&self, url: &str, error: reqwest::Error, reading_body: bool) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }
        } else if reading_body {
            FetchError::Body {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}
