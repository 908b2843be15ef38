//! # Main — CLI Entry Point
//!
//! Parses the optional bound and tuning flags, then hands off to [`cli`].
//!
//! ## Options
//!
//! - `N` (positional): upper bound, default 1,000,000. Must be a non-negative
//!   integer; anything else is a parse error with a non-zero exit.
//! - `--threads` / `PARSIEVE_THREADS`: worker count (0 = all cores).
//! - `--min-parallel-len` / `PARSIEVE_MIN_PARALLEL_LEN`: smallest region that fans out.
//! - `--show K`: also print the first K primes.
//! - `--format text|json`: report rendering.

mod cli;

use anyhow::Result;
use clap::Parser;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use cli::OutputFormat;
use parsieve::config::DEFAULT_MIN_PARALLEL_LEN;
use parsieve::{SieveConfig, DEFAULT_LIMIT};

#[derive(Parser)]
#[command(name = "parsieve", about = "Count primes up to N with a parallel sieve of Eratosthenes")]
struct Cli {
    /// Upper bound of the sieve (inclusive)
    #[arg(default_value_t = DEFAULT_LIMIT)]
    limit: u64,

    /// Number of worker threads (defaults to all logical cores)
    #[arg(long, env = "PARSIEVE_THREADS", default_value_t = 0)]
    threads: usize,

    /// Marking/collection regions smaller than this run on one worker
    #[arg(long, env = "PARSIEVE_MIN_PARALLEL_LEN", default_value_t = DEFAULT_MIN_PARALLEL_LEN)]
    min_parallel_len: usize,

    /// Also print the first K primes found
    #[arg(long, default_value_t = 0)]
    show: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    cli::init_logging();

    let cli = Cli::parse();
    let config = SieveConfig {
        threads: cli.threads,
        min_parallel_len: cli.min_parallel_len,
    };
    cli::run_sieve(cli.limit, &config, cli.show, cli.format)
}
