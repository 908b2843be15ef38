//! # CLI — Logging Setup and the Sieve Run
//!
//! Everything between argument parsing and process exit: tracing subscriber
//! initialization, building the engine, timing the single compute call and
//! printing the report to stdout.

use anyhow::Result;
use clap::ValueEnum;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parsieve::report::{time_call, SieveReport};
use parsieve::{Sieve, SieveConfig};

/// Output rendering for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Initialize structured logging on stderr: LOG_FORMAT=json for machine
/// consumption, human-readable otherwise. Level comes from RUST_LOG.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}

/// Sieve up to `limit` and print the report. Only the compute call is timed;
/// pool construction happens before the clock starts.
pub fn run_sieve(limit: u64, config: &SieveConfig, show: usize, format: OutputFormat) -> Result<()> {
    let sieve = Sieve::new(config)?;
    info!(
        limit,
        threads = sieve.threads(),
        min_parallel_len = config.min_parallel_len,
        "Starting sieve"
    );

    let (primes, elapsed) = time_call(|| sieve.compute_primes(limit));
    info!(count = primes.len(), elapsed_ms = elapsed.as_millis() as u64, "Sieve finished");

    let report = SieveReport::new(limit, &primes, elapsed, sieve.threads(), show);
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
