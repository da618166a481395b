//! Configuration module for Binscout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All settings have defaults, so a config file is optional.
//!
//! # Example
//!
//! ```no_run
//! use binscout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("binscout.toml")).unwrap();
//! println!("Probing with {} workers", config.probe.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClassifierConfig, Config, DirectoryConfig, HeadersConfig, OutputConfig, ProbeConfig,
    DEFAULT_DIRECTORY_URL, DEFAULT_SUSPICIOUS_PHRASES, DEFAULT_USER_AGENTS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
