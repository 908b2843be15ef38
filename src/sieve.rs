//! # Sieve — Parallel Sieve of Eratosthenes
//!
//! Computes every prime in `[2, limit]` with a byte-per-slot primality table and
//! two fork-join regions on a rayon pool.
//!
//! ## Phase 1: Marking
//!
//! Bases `2..=⌊√limit⌋` are visited in increasing order on the calling thread.
//! A base whose flag is still set is prime, and its multiples from `base²` to
//! `limit` are cleared. That inner loop is split by [`Partition::strided`] into
//! disjoint `&mut` sub-slices, one per worker, so concurrent writers cannot
//! alias. The outer loop stays sequential: skipping composite bases is only
//! valid once every smaller prime has finished marking.
//!
//! ## Phase 2: Collection
//!
//! `[2, limit]` is split by [`Partition::contiguous`]. Each worker scans its
//! block into a private `Vec`, then takes the shared merge lock once to append
//! it. Append order follows completion order, so the merged vector is sorted
//! before it is returned.
//!
//! Complexity: O(n log log n) time, O(n) space.
//!
//! ## References
//!
//! - Eratosthenes of Cyrene, ~240 BCE (sieve algorithm).
//! - OEIS A000720: pi(n), the prime counting function.

use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use rayon::prelude::*;
use tracing::debug;

use crate::config::{SieveConfig, DEFAULT_MIN_PARALLEL_LEN};
use crate::partition::{effective_workers, Partition};

/// Generate all primes up to `limit` on the current rayon pool.
///
/// Outside of any pool this is rayon's global pool, so the worker count is the
/// host's available parallelism unless the global pool was configured
/// otherwise. Returns an empty vector for `limit < 2`.
pub fn compute_primes(limit: u64) -> Vec<u64> {
    sieve_in_current_pool(limit, DEFAULT_MIN_PARALLEL_LEN)
}

/// Generate all primes up to `limit` on a dedicated pool built from `config`.
pub fn compute_primes_with(limit: u64, config: &SieveConfig) -> Result<Vec<u64>> {
    Ok(Sieve::new(config)?.compute_primes(limit))
}

/// A sieve engine bound to its own worker pool.
///
/// Building the pool is the only fallible step; every computation after that
/// is infallible and deterministic.
pub struct Sieve {
    pool: rayon::ThreadPool,
    min_parallel_len: usize,
}

impl Sieve {
    pub fn new(config: &SieveConfig) -> Result<Self> {
        Ok(Sieve {
            pool: config.build_pool()?,
            min_parallel_len: config.min_parallel_len,
        })
    }

    /// Worker threads available to each parallel region.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn compute_primes(&self, limit: u64) -> Vec<u64> {
        self.pool
            .install(|| sieve_in_current_pool(limit, self.min_parallel_len))
    }
}

fn sieve_in_current_pool(limit: u64, min_parallel_len: usize) -> Vec<u64> {
    if limit < 2 {
        return vec![];
    }
    let workers = rayon::current_num_threads();
    let mut table = PrimalityTable::new(limit as usize);
    table.mark_composites(workers, min_parallel_len);
    let primes = table.collect_primes(workers, min_parallel_len);
    debug!(limit, workers, count = primes.len(), "sieve complete");
    primes
}

/// Flags for slots `0..=limit`; `true` means "not yet shown composite".
///
/// Flags only ever go from `true` to `false`.
#[derive(Debug, Clone)]
pub struct PrimalityTable {
    flags: Vec<bool>,
}

impl PrimalityTable {
    /// Table with 0 and 1 cleared and every other slot set.
    pub fn new(limit: usize) -> Self {
        let mut flags = vec![true; limit + 1];
        for flag in flags.iter_mut().take(2) {
            *flag = false;
        }
        PrimalityTable { flags }
    }

    /// Largest slot in the table.
    #[inline]
    pub fn limit(&self) -> usize {
        self.flags.len() - 1
    }

    /// Current flag for `n`; `false` for slots outside the table.
    #[inline]
    pub fn is_marked_prime(&self, n: usize) -> bool {
        self.flags.get(n).copied().unwrap_or(false)
    }

    /// Phase 1: clear every composite slot.
    ///
    /// After this returns, a slot in `[2, limit]` is set iff it is prime,
    /// independent of `workers`.
    pub fn mark_composites(&mut self, workers: usize, min_parallel_len: usize) {
        for base in 2..=integer_sqrt(self.limit()) {
            if self.flags[base] {
                self.mark_multiples(base, workers, min_parallel_len);
            }
        }
    }

    /// Clear `base², base² + base, …` up to the limit, fanning out over
    /// disjoint stride-blocks.
    pub fn mark_multiples(&mut self, base: usize, workers: usize, min_parallel_len: usize) {
        let limit = self.limit();
        let Some(probe) = Partition::strided(base, limit, 1) else {
            return;
        };
        let workers = effective_workers(probe.len(), workers, min_parallel_len);
        let Some(partition) = Partition::strided(base, limit, workers) else {
            return;
        };

        // Each chunk is one block and starts on a multiple of `base`.
        self.flags[partition.start()..partition.end()]
            .par_chunks_mut(partition.chunk_len())
            .for_each(|block| {
                for flag in block.iter_mut().step_by(partition.step()) {
                    *flag = false;
                }
            });
    }

    /// Phase 2: gather the set slots of `[2, limit]` in ascending order.
    pub fn collect_primes(&self, workers: usize, min_parallel_len: usize) -> Vec<u64> {
        let limit = self.limit();
        let Some(probe) = Partition::contiguous(2, limit, 1) else {
            return vec![];
        };
        let workers = effective_workers(probe.len(), workers, min_parallel_len);
        let Some(partition) = Partition::contiguous(2, limit, workers) else {
            return vec![];
        };

        let merged = Mutex::new(Vec::with_capacity(estimate_prime_count(limit)));
        self.flags[partition.start()..partition.end()]
            .par_chunks(partition.chunk_len())
            .enumerate()
            .for_each(|(block, flags)| {
                let offset = partition.start() + block * partition.chunk_len();
                let local: Vec<u64> = flags
                    .iter()
                    .enumerate()
                    .filter(|&(_, &set)| set)
                    .map(|(i, _)| (offset + i) as u64)
                    .collect();
                // Critical section: one bulk append per worker.
                merged
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend_from_slice(&local);
            });

        let mut primes = merged.into_inner().unwrap_or_else(PoisonError::into_inner);
        primes.sort_unstable();
        primes
    }
}

/// Floor of the square root of `n`, exact for every `usize`.
pub fn integer_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    // f64 has 53 bits of mantissa; nudge the estimate onto the exact root.
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= n) {
        r += 1;
    }
    r
}

/// Upper-biased estimate of pi(n), used to presize the merged result.
fn estimate_prime_count(n: usize) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (1.3 * nf / nf.ln()) as usize
}

#[cfg(test)]
mod tests {
    //! # Sieve Engine Tests
    //!
    //! - Known prefixes and pi(x) values (OEIS A000720): pi(100)=25,
    //!   pi(1000)=168, pi(10000)=1229, pi(100000)=9592, pi(10^6)=78498.
    //! - Degenerate bounds 0 and 1 produce an empty result without touching
    //!   out-of-range slots.
    //! - Worker-count independence: 1, 2 and 8 workers with the parallel
    //!   threshold forced to 1, across small, perfect-square and large limits.
    //! - Cross-check against trial division.

    use super::*;

    fn trial_division(n: u64) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    fn forced_parallel(threads: usize) -> Sieve {
        Sieve::new(&SieveConfig {
            threads,
            min_parallel_len: 1,
        })
        .unwrap()
    }

    #[test]
    fn degenerate_limits_are_empty() {
        assert!(compute_primes(0).is_empty());
        assert!(compute_primes(1).is_empty());
    }

    #[test]
    fn small_known_prefixes() {
        assert_eq!(compute_primes(2), vec![2]);
        assert_eq!(compute_primes(3), vec![2, 3]);
        assert_eq!(compute_primes(10), vec![2, 3, 5, 7]);
        assert_eq!(
            compute_primes(30),
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
    }

    #[test]
    fn known_prime_counts() {
        assert_eq!(compute_primes(100).len(), 25);
        assert_eq!(compute_primes(1_000).len(), 168);
        assert_eq!(compute_primes(10_000).len(), 1229);
        assert_eq!(compute_primes(100_000).len(), 9592);
    }

    #[test]
    fn one_million_regression() {
        assert_eq!(compute_primes(1_000_000).len(), 78_498);
    }

    #[test]
    fn perfect_square_limits_exclude_the_square() {
        for root in [2u64, 3, 5, 7, 11, 31, 97] {
            let sq = root * root;
            let primes = compute_primes(sq);
            assert!(!primes.contains(&sq), "{sq} reported prime");
            assert_eq!(primes.last().copied(), compute_primes(sq - 1).last().copied());
        }
    }

    #[test]
    fn matches_trial_division() {
        let primes = compute_primes(5_000);
        let expected: Vec<u64> = (0..=5_000).filter(|&n| trial_division(n)).collect();
        assert_eq!(primes, expected);
    }

    #[test]
    fn strictly_increasing_and_in_range() {
        let limit = 50_000;
        let primes = forced_parallel(8).compute_primes(limit);
        assert!(primes.windows(2).all(|w| w[0] < w[1]));
        assert!(primes.iter().all(|&p| (2..=limit).contains(&p)));
    }

    #[test]
    fn worker_count_does_not_change_result() {
        let single = forced_parallel(1);
        let pools = [forced_parallel(2), forced_parallel(8)];
        for limit in [2u64, 3, 4, 25, 49, 100, 121, 997, 1024, 9_409, 65_536, 200_003] {
            let reference = single.compute_primes(limit);
            for sieve in &pools {
                assert_eq!(
                    sieve.compute_primes(limit),
                    reference,
                    "limit {limit} differs with {} threads",
                    sieve.threads()
                );
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let sieve = forced_parallel(8);
        let first = sieve.compute_primes(123_457);
        for _ in 0..5 {
            assert_eq!(sieve.compute_primes(123_457), first);
        }
    }

    #[test]
    fn compute_primes_with_default_config() {
        let primes = compute_primes_with(1_000, &SieveConfig::default()).unwrap();
        assert_eq!(primes.len(), 168);
    }

    #[test]
    fn table_after_marking_flags_exactly_the_primes() {
        let mut table = PrimalityTable::new(500);
        table.mark_composites(4, 1);
        for n in 0..=500 {
            assert_eq!(table.is_marked_prime(n), trial_division(n as u64), "slot {n}");
        }
        assert!(!table.is_marked_prime(501));
    }

    #[test]
    fn mark_multiples_skips_base_itself() {
        let mut table = PrimalityTable::new(60);
        table.mark_multiples(7, 3, 1);
        assert!(table.is_marked_prime(7));
        assert!(table.is_marked_prime(14), "below base² must be untouched");
        assert!(!table.is_marked_prime(49));
        assert!(!table.is_marked_prime(56));
    }

    #[test]
    fn table_for_limit_one() {
        let table = PrimalityTable::new(1);
        assert_eq!(table.limit(), 1);
        assert!(table.collect_primes(4, 1).is_empty());
    }

    #[test]
    fn integer_sqrt_exact_around_squares() {
        assert_eq!(integer_sqrt(0), 0);
        assert_eq!(integer_sqrt(1), 1);
        assert_eq!(integer_sqrt(3), 1);
        assert_eq!(integer_sqrt(4), 2);
        assert_eq!(integer_sqrt(99), 9);
        assert_eq!(integer_sqrt(100), 10);
        assert_eq!(integer_sqrt(1_000_000), 1_000);
        let big = (1usize << 32) - 1;
        assert_eq!(integer_sqrt(big * big), big);
        assert_eq!(integer_sqrt(big * big - 1), big - 1);
        assert_eq!(integer_sqrt(usize::MAX), (1usize << (usize::BITS / 2)) - 1);
    }

    #[test]
    fn estimate_prime_count_is_upper_bound() {
        for &(n, pi) in &[(100usize, 25usize), (10_000, 1229), (1_000_000, 78_498)] {
            assert!(estimate_prime_count(n) >= pi);
        }
    }
}
