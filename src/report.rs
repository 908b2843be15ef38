//! # Report — Timing and Output Formatting
//!
//! Wraps a single sieve call with a monotonic timer and renders the result
//! either as the two-line text summary or as one JSON object.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;

/// Run `f` and return its value together with the wall-clock time it took.
pub fn time_call<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Outcome of one sieve run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SieveReport {
    pub limit: u64,
    pub count: usize,
    pub elapsed_seconds: f64,
    pub threads: usize,
    /// Leading primes to echo back; empty unless requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub first: Vec<u64>,
}

impl SieveReport {
    /// Summarize `primes`, keeping the first `show` of them for display.
    pub fn new(limit: u64, primes: &[u64], elapsed: Duration, threads: usize, show: usize) -> Self {
        SieveReport {
            limit,
            count: primes.len(),
            elapsed_seconds: elapsed.as_secs_f64(),
            threads,
            first: primes.iter().take(show).copied().collect(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Found {} primes up to {}\nTime taken: {} seconds\n",
            self.count, self.limit, self.elapsed_seconds
        );
        if !self.first.is_empty() {
            out.push_str("First few primes:");
            for p in &self.first {
                let _ = write!(out, " {p}");
            }
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serializing sieve report")
    }
}
