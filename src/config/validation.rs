use crate::config::types::{
    ClassifierConfig, Config, DirectoryConfig, HeadersConfig, OutputConfig, ProbeConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_directory_config(&config.directory)?;
    validate_probe_config(&config.probe)?;
    validate_classifier_config(&config.classifier)?;
    validate_headers_config(&config.headers)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_directory_config(config: &DirectoryConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid directory url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Directory url '{}' must use http or https",
            config.url
        )));
    }

    Ok(())
}

fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 500 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 500, got {}",
            config.concurrency
        )));
    }

    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    // Policy::limited(0) turns every redirect into an error
    if config.max_redirects < 1 || config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be between 1 and 50, got {}",
            config.max_redirects
        )));
    }

    if config.max_body_bytes < 1024 {
        return Err(ConfigError::Validation(format!(
            "max_body_bytes must be >= 1024, got {}",
            config.max_body_bytes
        )));
    }

    Ok(())
}

fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&config.uptime_threshold) {
        return Err(ConfigError::Validation(format!(
            "uptime_threshold must be a percentage between 0 and 100, got {}",
            config.uptime_threshold
        )));
    }

    if config.suspicious_phrases.is_empty() {
        return Err(ConfigError::Validation(
            "suspicious_phrases cannot be empty".to_string(),
        ));
    }

    // A blank phrase would be contained in every alert
    if config.suspicious_phrases.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "suspicious_phrases cannot contain blank entries".to_string(),
        ));
    }

    Ok(())
}

fn validate_headers_config(config: &HeadersConfig) -> Result<(), ConfigError> {
    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user_agents cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    if config.progress_every < 1 {
        return Err(ConfigError::Validation(
            "progress_every must be >= 1".to_string(),
        ));
    }

    Ok(())
}
