//! # Separate Chaining Hash Table
//!
//! This module implements a string-keyed **hash table** using **separate chaining**.
//! It supports:
//! - **Generic** values (`V`) under owned `String` keys compared by exact equality.
//! - **Pluggable** hash function via the [`HashFunction`] trait (sum-of-codes, polynomial,
//!   DJB2, or a closure).
//! - **Configurable** initial capacity and load factor threshold, validated at construction.
//! - **Insert**, **find**, **delete** with expected **O(1)** cost and **O(chain length)**
//!   worst case.
//! - **Collision statistics** for benchmarking collaborators.
//!
//! Each bucket keeps its entries in insertion order. Overwriting a key keeps its position in the
//! chain, and deleting a key preserves the order of the remaining entries. The table only grows:
//! when the load factor measured *before* an insertion exceeds the threshold, the bucket array
//! doubles and every entry is rehashed against the new capacity.
//!
//! ## Example
//! ```rust
//! use hashlab::cs::hashing::{ChainedHashTable, Polynomial};
//!
//! let mut table = ChainedHashTable::new(8, 0.75, Polynomial::default()).unwrap();
//! table.insert("apple", "red");
//! assert_eq!(table.find("apple"), Some(&"red"));
//! assert!(table.delete("apple"));
//! assert_eq!(table.find("apple"), None);
//! ```

use log::debug;

use super::hash_function::{HashFunction, Polynomial};
use super::{validate_config, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
use crate::Result;

/// A single entry in a chain.
#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// A "bucket" is a vector of entries for separate chaining, in insertion order.
type Bucket<V> = Vec<Entry<V>>;

/// Collision counts over the current bucket array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionStatistics {
    /// Sum over buckets of `max(0, bucket_len - 1)`.
    pub total_collisions: usize,
    /// `total_collisions` divided by the number of non-empty buckets (0.0 when all are empty).
    pub average_per_nonempty_bucket: f64,
}

/// A separate-chaining hash table from `String` keys to `V`.
#[derive(Debug, Clone)]
pub struct ChainedHashTable<V, H = Polynomial> {
    buckets: Vec<Bucket<V>>,
    /// The number of stored key-value pairs.
    len: usize,
    /// The maximum load factor (ratio = len / capacity).
    max_load_factor: f64,
    hash_function: H,
}

/// A builder for the `ChainedHashTable`.
/// Typically you'll call `.with_hash_function(...)`, `.with_capacity(...)`, etc., then `.build()`.
#[derive(Debug, Clone)]
pub struct ChainedHashTableBuilder<H> {
    capacity: usize,
    max_load_factor: f64,
    hash_function: H,
}

impl Default for ChainedHashTableBuilder<Polynomial> {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hash_function: Polynomial::default(),
        }
    }
}

impl ChainedHashTableBuilder<Polynomial> {
    /// Creates a new builder with default capacity, load factor, and the polynomial hash.
    pub fn new() -> Self {
        Default::default()
    }
}

impl<H: HashFunction> ChainedHashTableBuilder<H> {
    /// Sets the initial number of buckets. Must be at least 1.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the maximum load factor, in `(0, 1]`.
    pub fn with_max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    /// Sets the hash function.
    pub fn with_hash_function<T: HashFunction>(
        self,
        hash_function: T,
    ) -> ChainedHashTableBuilder<T> {
        ChainedHashTableBuilder {
            capacity: self.capacity,
            max_load_factor: self.max_load_factor,
            hash_function,
        }
    }

    /// Validates the configuration and builds the table.
    pub fn build<V>(self) -> Result<ChainedHashTable<V, H>> {
        validate_config(self.capacity, self.max_load_factor)?;
        Ok(ChainedHashTable {
            buckets: empty_buckets(self.capacity),
            len: 0,
            max_load_factor: self.max_load_factor,
            hash_function: self.hash_function,
        })
    }
}

impl<V> ChainedHashTable<V> {
    /// Creates a table with 16 buckets, load factor 0.75 and the polynomial hash.
    pub fn with_defaults() -> Self {
        ChainedHashTable {
            buckets: empty_buckets(DEFAULT_INITIAL_CAPACITY),
            len: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hash_function: Polynomial::default(),
        }
    }
}

impl<V> Default for ChainedHashTable<V> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<V, H: HashFunction> ChainedHashTable<V, H> {
    /// Creates a table with `initial_capacity` buckets.
    ///
    /// Fails with `InvalidCapacity` when `initial_capacity` is 0 and with `InvalidLoadFactor`
    /// when `max_load_factor` is outside `(0, 1]`.
    pub fn new(initial_capacity: usize, max_load_factor: f64, hash_function: H) -> Result<Self> {
        ChainedHashTableBuilder::new()
            .with_capacity(initial_capacity)
            .with_max_load_factor(max_load_factor)
            .with_hash_function(hash_function)
            .build()
    }

    /// Returns the number of key-value pairs in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Load factor above which the next insert doubles the bucket array.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// The hash function used to pick buckets.
    pub fn hash_function(&self) -> &H {
        &self.hash_function
    }

    /// Inserts a key-value pair into the table.
    /// If the key already exists, its value is replaced in place and the old value returned.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();

        // Checked before the new entry counts, so a resize always precedes the insert.
        if self.load_factor() > self.max_load_factor {
            self.resize(self.capacity() * 2);
        }

        let bucket_index = self.bucket_index(&key);
        let bucket = &mut self.buckets[bucket_index];

        if let Some(entry) = bucket.iter_mut().find(|entry| entry.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }
        bucket.push(Entry { key, value });
        self.len += 1;
        None
    }

    /// Returns a reference to the value corresponding to the key, if present.
    pub fn find(&self, key: &str) -> Option<&V> {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Returns a mutable reference to the value corresponding to the key, if present.
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    /// Returns true if the table holds an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Removes the entry for `key`. Returns `false` when the key was absent.
    /// The remaining entries of the bucket keep their order.
    pub fn delete(&mut self, key: &str) -> bool {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        match bucket.iter().position(|entry| entry.key == key) {
            Some(pos) => {
                bucket.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Clears the table, removing all key-value pairs. Capacity is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Collision counts over the current bucket array.
    pub fn collision_statistics(&self) -> CollisionStatistics {
        let (total_collisions, nonempty) = self
            .buckets
            .iter()
            .filter(|bucket| !bucket.is_empty())
            .fold((0, 0), |(total, nonempty), bucket| {
                (total + bucket.len() - 1, nonempty + 1)
            });

        let average_per_nonempty_bucket = if nonempty > 0 {
            total_collisions as f64 / nonempty as f64
        } else {
            0.0
        };
        CollisionStatistics {
            total_collisions,
            average_per_nonempty_bucket,
        }
    }

    /// Length of every bucket, in bucket order.
    pub fn bucket_lengths(&self) -> Vec<usize> {
        self.buckets.iter().map(Vec::len).collect()
    }

    /// Internal function computing the bucket index for a given key.
    fn bucket_index(&self, key: &str) -> usize {
        self.hash_function.bucket_index(key, self.capacity())
    }

    /// Resize the table to `new_capacity` buckets and re-insert existing entries.
    fn resize(&mut self, new_capacity: usize) {
        debug!(
            "chained table resize: {} -> {} buckets ({} entries)",
            self.capacity(),
            new_capacity,
            self.len
        );
        let mut new_buckets = empty_buckets(new_capacity);

        // Old buckets in order, each chain in stored order.
        for bucket in self.buckets.drain(..) {
            for entry in bucket {
                let idx = self.hash_function.bucket_index(&entry.key, new_capacity);
                new_buckets[idx].push(entry);
            }
        }
        self.buckets = new_buckets;
        // len remains the same
    }
}

impl<V: Clone, H: HashFunction> ChainedHashTable<V, H> {
    /// Snapshot of every `(key, value)` pair, in bucket order then chain order.
    pub fn entries(&self) -> Vec<(String, V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| {
                bucket
                    .iter()
                    .map(|entry| (entry.key.clone(), entry.value.clone()))
            })
            .collect()
    }
}

fn empty_buckets<V>(capacity: usize) -> Vec<Bucket<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Default::default);
    buckets
}
