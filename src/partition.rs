//! # Partition — Explicit Work Split for Parallel Regions
//!
//! Both parallel regions of the sieve hand each worker one contiguous block of
//! the primality table. The split is computed here, up front, instead of being
//! left to the scheduler, so the disjointness of worker writes is a property of
//! a value that can be inspected and tested.
//!
//! ## Strided partitions (marking)
//!
//! Marking the multiples of a base `p` touches `p², p² + p, …` up to the limit.
//! [`Partition::strided`] divides those multiples into at most `workers` runs of
//! consecutive multiples. Each block spans `chunk_len = per_worker · p` table
//! slots, so every block begins on a multiple of `p` and a worker only has to
//! step through its own slice by `p`.
//!
//! ## Contiguous partitions (collection)
//!
//! [`Partition::contiguous`] divides `[start, limit]` into at most `workers`
//! equal runs (the last one may be shorter). Scanning the blocks in order and
//! concatenating yields ascending output; the engine does not rely on that and
//! sorts after merging.

use std::ops::Range;

/// A split of the table slots `[start, end)` into contiguous blocks of
/// `chunk_len` slots, the last block possibly shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    start: usize,
    end: usize,
    step: usize,
    chunk_len: usize,
}

impl Partition {
    /// Partition the multiples of `base` in `[base², limit]` across `workers`.
    ///
    /// Returns `None` when there is nothing to mark (`base < 2` or `base² > limit`).
    pub fn strided(base: usize, limit: usize, workers: usize) -> Option<Self> {
        if base < 2 {
            return None;
        }
        let first = base.checked_mul(base)?;
        if first > limit {
            return None;
        }
        let multiples = multiple_count(base, limit)?;
        let per_worker = multiples.div_ceil(workers.max(1));
        Some(Partition {
            start: first,
            end: limit + 1,
            step: base,
            chunk_len: per_worker * base,
        })
    }

    /// Partition the slots `[start, limit]` across `workers`.
    ///
    /// Returns `None` when the range is empty.
    pub fn contiguous(start: usize, limit: usize, workers: usize) -> Option<Self> {
        if start > limit {
            return None;
        }
        let len = limit - start + 1;
        Some(Partition {
            start,
            end: limit + 1,
            step: 1,
            chunk_len: len.div_ceil(workers.max(1)),
        })
    }

    /// First table slot covered.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last table slot covered.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Distance between slots a worker touches inside its block.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Slots per block. Always a multiple of [`step`](Self::step).
    #[inline]
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Number of slots actually touched (multiples for strided, all slots for contiguous).
    pub fn len(&self) -> usize {
        (self.end - self.start).div_ceil(self.step)
    }

    /// Never true for a constructed partition; both constructors reject empty ranges.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of blocks, i.e. workers that actually receive work.
    pub fn block_count(&self) -> usize {
        (self.end - self.start).div_ceil(self.chunk_len)
    }

    /// Half-open slot ranges of each block, in ascending order.
    pub fn blocks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.block_count()).map(move |i| {
            let lo = self.start + i * self.chunk_len;
            lo..(lo + self.chunk_len).min(self.end)
        })
    }
}

/// Count of multiples `base², base² + base, …` not exceeding `limit`.
fn multiple_count(base: usize, limit: usize) -> Option<usize> {
    let first = base.checked_mul(base)?;
    (first <= limit).then(|| (limit - first) / base + 1)
}

/// Workers to fan out over for a region touching `items` slots.
///
/// Regions smaller than `min_parallel_len` stay on one worker: spawning tasks
/// for a few hundred writes costs more than the writes.
pub fn effective_workers(items: usize, workers: usize, min_parallel_len: usize) -> usize {
    if items < min_parallel_len {
        1
    } else {
        workers.max(1)
    }
}
