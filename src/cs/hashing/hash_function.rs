//! # String Hash Functions
//!
//! Pluggable hash functions mapping a string key and a table capacity to a bucket index.
//! The table engines in this module tree are generic over [`HashFunction`], so any of the
//! variants below (or a plain closure) can be selected when a table is constructed.
//!
//! ## Variants
//! - [`SumOfCodes`]: sum of Unicode code points, reduced mod capacity. Anagrams always collide.
//! - [`Polynomial`]: Horner evaluation with a configurable base (31 by default), reducing mod
//!   capacity at every step.
//! - [`Djb2`]: Bernstein's `hash * 33 + c` seeded at 5381. The running hash is kept in 32 bits
//!   (wrapping after every step) and reduced mod capacity once at the end.
//!
//! All variants are deterministic, side-effect free, and total for every string and every
//! capacity `>= 1`. Passing a capacity of zero is a caller bug.
//!
//! ## Example
//! ```rust
//! use hashlab::cs::hashing::hash_function::{Djb2, HashFunction, Polynomial, SumOfCodes};
//!
//! assert_eq!(SumOfCodes.bucket_index("ab", 100), (97 + 98) % 100);
//! assert_eq!(Polynomial::default().bucket_index("", 7), 0);
//! assert_eq!(Djb2.bucket_index("", 100), 5381 % 100);
//! ```

/// Default multiplier for [`Polynomial`].
pub const DEFAULT_POLYNOMIAL_BASE: u64 = 31;

/// Seed of the DJB2 running hash.
pub const DJB2_SEED: u32 = 5381;

/// Maps a key to an index in `[0, capacity)`.
pub trait HashFunction {
    /// Returns the bucket index of `key` in a table with `capacity` buckets.
    ///
    /// `capacity` must be at least 1.
    fn bucket_index(&self, key: &str, capacity: usize) -> usize;
}

impl<F> HashFunction for F
where
    F: Fn(&str, usize) -> usize,
{
    fn bucket_index(&self, key: &str, capacity: usize) -> usize {
        self(key, capacity) % capacity
    }
}

/// Sum of character codes mod capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SumOfCodes;

impl HashFunction for SumOfCodes {
    fn bucket_index(&self, key: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0, "capacity must be >= 1");
        let modulus = capacity as u128;
        // Reducing every step gives the same residue as reducing the full sum.
        let sum = key
            .chars()
            .fold(0u128, |acc, c| (acc + u128::from(c as u32)) % modulus);
        sum as usize
    }
}

/// Polynomial (Horner) hash: `h = (h * base + c) mod capacity` for every character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polynomial {
    base: u64,
}

impl Default for Polynomial {
    fn default() -> Self {
        Self {
            base: DEFAULT_POLYNOMIAL_BASE,
        }
    }
}

impl Polynomial {
    /// Creates a polynomial hash with the given base (multiplier).
    pub fn with_base(base: u64) -> Self {
        Self { base }
    }

    /// The multiplier applied at every step.
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl HashFunction for Polynomial {
    fn bucket_index(&self, key: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0, "capacity must be >= 1");
        let modulus = capacity as u128;
        let base = u128::from(self.base);
        let hash = key
            .chars()
            .fold(0u128, |h, c| (h * base + u128::from(c as u32)) % modulus);
        hash as usize
    }
}

/// DJB2 with a 32-bit running hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Djb2;

impl Djb2 {
    /// The full 32-bit DJB2 value of `key`, before reduction to a capacity.
    pub fn raw(key: &str) -> u32 {
        key.chars().fold(DJB2_SEED, |hash, c| {
            // (hash << 5) + hash == hash * 33
            hash.wrapping_shl(5)
                .wrapping_add(hash)
                .wrapping_add(c as u32)
        })
    }
}

impl HashFunction for Djb2 {
    fn bucket_index(&self, key: &str, capacity: usize) -> usize {
        debug_assert!(capacity > 0, "capacity must be >= 1");
        (u64::from(Self::raw(key)) % capacity as u64) as usize
    }
}

/// Runtime selection among the built-in hash functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// [`SumOfCodes`]
    SumOfCodes,
    /// [`Polynomial`] with the default base
    #[default]
    Polynomial,
    /// [`Djb2`]
    Djb2,
}

impl HashAlgorithm {
    /// Every built-in algorithm, in a fixed order.
    pub const ALL: [HashAlgorithm; 3] = [
        HashAlgorithm::SumOfCodes,
        HashAlgorithm::Polynomial,
        HashAlgorithm::Djb2,
    ];

    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::SumOfCodes => "sum-of-codes",
            HashAlgorithm::Polynomial => "polynomial",
            HashAlgorithm::Djb2 => "djb2",
        }
    }
}

impl HashFunction for HashAlgorithm {
    fn bucket_index(&self, key: &str, capacity: usize) -> usize {
        match self {
            HashAlgorithm::SumOfCodes => SumOfCodes.bucket_index(key, capacity),
            HashAlgorithm::Polynomial => Polynomial::default().bucket_index(key, capacity),
            HashAlgorithm::Djb2 => Djb2.bucket_index(key, capacity),
        }
    }
}
