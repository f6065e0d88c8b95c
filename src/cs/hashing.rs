pub mod distribution;
pub mod hash_function;
pub mod open_addressing;
pub mod separate;

// Re-export the table engines and hash functions with descriptive names
pub use distribution::{bucket_distribution, DistributionReport};
pub use hash_function::{Djb2, HashAlgorithm, HashFunction, Polynomial, SumOfCodes};
pub use open_addressing::{
    OpenAddressingBuilder, OpenAddressingHashTable, ProbeStatistics, ProbeStrategy,
};
pub use separate::{ChainedHashTable, ChainedHashTableBuilder, CollisionStatistics};

/// Default number of buckets/slots a table starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Default maximum ratio of live entries to capacity before a table grows.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Checks a `(capacity, max_load_factor)` pair shared by both table engines.
pub(crate) fn validate_config(capacity: usize, max_load_factor: f64) -> crate::Result<()> {
    if capacity < 1 {
        return Err(crate::Error::InvalidCapacity {
            capacity,
            minimum: 1,
        });
    }
    // Written so that NaN is rejected too.
    if !(max_load_factor > 0.0 && max_load_factor <= 1.0) {
        return Err(crate::Error::InvalidLoadFactor(max_load_factor));
    }
    Ok(())
}
