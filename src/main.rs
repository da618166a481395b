//! Binscout main entry point
//!
//! This is the command-line interface for the Binscout instance census.

use binscout::census::Census;
use binscout::config::{load_config_with_hash, Config};
use binscout::state::Instance;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Binscout: a PrivateBin instance census
///
/// Reads the public PrivateBin directory, checks every listed instance for
/// permanent storage and deletion warnings, and writes the trustworthy ones
/// to a JSON report grouped by reliability.
#[derive(Parser, Debug)]
#[command(name = "binscout")]
#[command(version = "1.0.0")]
#[command(about = "A PrivateBin instance census", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the report here instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List the directory's candidates without probing them or writing a report
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(output) = cli.output {
        config.output.report_path = output.display().to_string();
    }

    let census = match Census::new(config) {
        Ok(census) => census,
        Err(e) => {
            tracing::error!("Initialization failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if cli.dry_run {
        handle_dry_run(&census).await
    } else {
        handle_census(&census).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("binscout=info,warn"),
            1 => EnvFilter::new("binscout=debug,info"),
            2 => EnvFilter::new("binscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, otherwise the defaults
fn load_configuration(path: Option<&std::path::Path>) -> Result<Config, binscout::ConfigError> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok(Config::default())
        }
    }
}

/// Handles the --dry-run mode: shows what would be probed
async fn handle_dry_run(census: &Census) -> Result<(), binscout::ScoutError> {
    let candidates = census.discover().await?;

    println!("=== Binscout Dry Run ===\n");
    println!("Directory: {}", census.config().directory.url);
    println!("Workers: {}", census.config().probe.concurrency);
    println!(
        "Timeout per instance: {}ms",
        census.config().probe.request_timeout_ms
    );
    println!();

    let mut by_version: BTreeMap<&str, Vec<&Instance>> = BTreeMap::new();
    for instance in &candidates {
        by_version
            .entry(instance.version.as_str())
            .or_default()
            .push(instance);
    }

    for (version, instances) in by_version.iter().rev() {
        println!("Version {} ({} instances):", version, instances.len());
        for instance in instances {
            println!("  - {} ({:.2}%)", instance.address, instance.uptime);
        }
    }

    println!("\n✓ Would verify {} candidate instances", candidates.len());
    Ok(())
}

/// Handles the main census run
async fn handle_census(census: &Census) -> Result<(), binscout::ScoutError> {
    let summary = census.run().await?;
    tracing::info!(
        "Census completed: {} of {} candidates reported",
        summary.reported(),
        summary.candidates
    );
    Ok(())
}
