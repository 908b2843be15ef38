//! # parsieve — Parallel Sieve of Eratosthenes
//!
//! Computes all primes up to a bound with a fork-join sieve on rayon.
//!
//! - [`sieve`]: the engine ([`compute_primes`], [`Sieve`], [`PrimalityTable`]).
//! - [`partition`]: explicit per-worker block splits for both parallel regions.
//! - [`config`]: worker count and parallel threshold.
//! - [`report`]: timing and text/JSON output used by the binary.
//!
//! ```
//! assert_eq!(parsieve::compute_primes(10), vec![2, 3, 5, 7]);
//! ```

pub mod config;
pub mod partition;
pub mod report;
pub mod sieve;

pub use config::SieveConfig;
pub use sieve::{compute_primes, compute_primes_with, PrimalityTable, Sieve};

/// Default upper bound when none is given on the command line.
pub const DEFAULT_LIMIT: u64 = 1_000_000;
