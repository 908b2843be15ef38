//! Sieve engine configuration.

use anyhow::{Context, Result};
use serde::Serialize;

/// Regions touching fewer slots than this run on a single worker.
pub const DEFAULT_MIN_PARALLEL_LEN: usize = 32_768;

/// Tuning for one [`Sieve`](crate::sieve::Sieve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SieveConfig {
    /// Worker threads in the pool. 0 = all logical cores.
    pub threads: usize,
    /// Minimum slots a parallel region must touch before it fans out.
    pub min_parallel_len: usize,
}

impl Default for SieveConfig {
    fn default() -> Self {
        SieveConfig {
            threads: 0,
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
        }
    }
}

impl SieveConfig {
    /// Config with an explicit worker count and the default threshold.
    pub fn with_threads(threads: usize) -> Self {
        SieveConfig {
            threads,
            ..Self::default()
        }
    }

    /// Build the rayon pool the engine forks its workers from.
    pub fn build_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("parsieve-{i}"))
            .build()
            .with_context(|| format!("building sieve pool with {} threads", self.threads))
    }
}
