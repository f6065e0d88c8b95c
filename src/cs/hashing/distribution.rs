//! # Bucket Distribution Analysis
//!
//! Measures how evenly a [`HashFunction`] spreads a key set over a fixed number of buckets.
//! Benchmark drivers use the report to compare hash functions independently of any table engine.

use super::hash_function::HashFunction;
use crate::{Error, Result};

/// Per-bucket key counts and summary statistics for one hash function.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionReport {
    /// Number of keys that landed in each bucket.
    pub counts: Vec<usize>,
    /// Mean keys per bucket.
    pub mean: f64,
    /// Population standard deviation of the per-bucket counts.
    pub std_dev: f64,
    /// Largest bucket.
    pub max_bucket_len: usize,
    /// Buckets that received no key.
    pub empty_buckets: usize,
}

/// Hashes every key into `capacity` buckets and summarizes the resulting counts.
///
/// # Errors
/// `InvalidCapacity` if `capacity` is 0.
pub fn bucket_distribution<H, I, K>(
    hash_function: &H,
    keys: I,
    capacity: usize,
) -> Result<DistributionReport>
where
    H: HashFunction + ?Sized,
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    if capacity == 0 {
        return Err(Error::InvalidCapacity {
            capacity,
            minimum: 1,
        });
    }

    let mut counts = vec![0usize; capacity];
    for key in keys {
        counts[hash_function.bucket_index(key.as_ref(), capacity)] += 1;
    }

    let total: usize = counts.iter().sum();
    let mean = total as f64 / capacity as f64;
    let variance = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / capacity as f64;

    Ok(DistributionReport {
        max_bucket_len: counts.iter().copied().max().unwrap_or(0),
        empty_buckets: counts.iter().filter(|&&c| c == 0).count(),
        mean,
        std_dev: variance.sqrt(),
        counts,
    })
}
