//! Error types shared by the hash table engines.

use thiserror::Error;

/// Errors produced while configuring or operating a hash table.
///
/// A missing key is never an error: lookups return `Option` and deletions return `bool`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The requested capacity is below what the table (or its probing strategy) can work with.
    #[error("invalid capacity {capacity}: must be at least {minimum}")]
    InvalidCapacity { capacity: usize, minimum: usize },

    /// The maximum load factor must lie in `(0, 1]`.
    #[error("invalid max load factor {0}: must be in (0, 1]")]
    InvalidLoadFactor(f64),

    /// The tombstone purge threshold must lie in `(0, 1)`.
    #[error("invalid tombstone threshold {0}: must be in (0, 1)")]
    InvalidTombstoneThreshold(f64),

    /// Open addressing walked a full probe sequence without finding a usable slot.
    /// The table treats this as a signal to grow, not as a failure.
    #[error("probe sequence exhausted at capacity {capacity}")]
    ExhaustedProbe { capacity: usize },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
