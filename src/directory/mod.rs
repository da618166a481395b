//! Directory fetcher
//!
//! Retrieves the public instance directory and turns it into a flat list of
//! candidates for the census.

mod parser;

pub use parser::{parse_directory, parse_uptime, MIN_COLUMNS};

use crate::census::Fetcher;
use crate::config::DirectoryConfig;
use crate::state::Instance;
use crate::ScoutError;

/// Fetches and parses the directory page
///
/// # Returns
///
/// * `Ok(Vec<Instance>)` - All candidates with a numeric uptime
/// * `Err(ScoutError::Directory)` - The page could not be fetched
/// * `Err(ScoutError)` - The page could not be parsed
pub async fn fetch_directory(
    fetcher: &Fetcher,
    config: &DirectoryConfig,
) -> Result<Vec<Instance>, ScoutError> {
    tracing::info!("Fetching instance directory from {}", config.url);

    let body = fetcher
        .fetch(&config.url)
        .await
        .map_err(ScoutError::Directory)?;

    let instances = parse_directory(&body, &config.version_prefix)?;
    tracing::info!("Found {} candidate instances", instances.len());

    Ok(instances)
}
