//! # Open Addressing Hash Table
//!
//! This module provides a string-keyed **hash table** using *open addressing*. Every entry lives
//! in a single flat array of slots; collisions are resolved by walking a deterministic probe
//! sequence.
//!
//! ## Key Features
//! - **Generic** values (`V`) under owned `String` keys.
//! - **Configurable Probing**: linear probing or double hashing via [`ProbeStrategy`], fixed at
//!   construction.
//! - **Automatic Growth**: if the load factor measured before an insertion exceeds the threshold,
//!   the table doubles and re-places every live entry. Tombstones are dropped on the way.
//! - **Forced Growth**: if an insertion walks its whole probe sequence without finding a usable
//!   slot, the table doubles and retries. This can happen below the load threshold, e.g. when a
//!   double hashing step shares a factor with the capacity.
//! - **Tombstones**: removal leaves a marker so probes for other keys continue past the freed slot.
//!   If too many tombstones accumulate, the table is rehashed in place to clear them.
//! - **Pluggable** hash function via [`HashFunction`].
//!
//! ## Probe sequences
//! For attempt `a` in `0..capacity`:
//! - linear: `(h(key) + a) mod capacity`
//! - double: `(h(key) + a * s(key)) mod capacity`,
//!   with `s(key) = 1 + sum_of_codes(key, capacity - 2)`.
//!
//! Double hashing needs `capacity >= 4` so that the step is always in `1..capacity`; smaller
//! capacities are rejected when the table is built.

use log::{debug, trace};

use super::hash_function::{HashFunction, Polynomial, SumOfCodes};
use super::{validate_config, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
use crate::{Error, Result};

/// Default fraction of tombstone slots above which an insertion first rehashes in place.
pub const DEFAULT_TOMBSTONE_THRESHOLD: f64 = 0.25;

/// Smallest capacity double hashing accepts.
pub const MIN_DOUBLE_HASH_CAPACITY: usize = 4;

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// A slot can be `Empty`, `Tombstone` (used to be occupied but removed), or `Occupied`.
#[derive(Debug, Clone)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied(Entry<V>),
}

impl<V> Slot<V> {
    fn into_entry(self) -> Option<Entry<V>> {
        match self {
            Slot::Occupied(entry) => Some(entry),
            _ => None,
        }
    }
}

/// The strategy used for collision resolution in open addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStrategy {
    /// Linear probing: `(hash + attempt) mod capacity`
    #[default]
    Linear,
    /// Double hashing: `(hash + attempt * step) mod capacity` with a key-dependent step.
    Double,
}

impl ProbeStrategy {
    /// Smallest capacity a table using this strategy can be built with.
    pub fn minimum_capacity(&self) -> usize {
        match self {
            ProbeStrategy::Linear => 1,
            ProbeStrategy::Double => MIN_DOUBLE_HASH_CAPACITY,
        }
    }
}

/// Probe counts needed to reach every live entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeStatistics {
    /// Sum over live entries of the attempts (starting at 1) needed to reach the entry's slot.
    pub total_probes: usize,
    /// `total_probes` divided by the number of live entries (0.0 when the table is empty).
    pub average: f64,
}

/// Slot indices visited for one key, in attempt order.
#[derive(Debug, Clone)]
struct ProbeSequence {
    index: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSequence {
    fn new<H: HashFunction>(
        strategy: ProbeStrategy,
        hash_function: &H,
        key: &str,
        capacity: usize,
    ) -> Self {
        let index = hash_function.bucket_index(key, capacity);
        let step = match strategy {
            ProbeStrategy::Linear => 1,
            // capacity >= 4 here, so the step lies in 1..=capacity-2.
            ProbeStrategy::Double => 1 + SumOfCodes.bucket_index(key, capacity - 2),
        };
        Self {
            index,
            step,
            capacity,
            remaining: capacity,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.index;
        self.index = (self.index + self.step) % self.capacity;
        Some(current)
    }
}

/// A builder for the `OpenAddressingHashTable`, allowing you to specify capacity, load factor,
/// probing strategy, etc.
#[derive(Debug, Clone)]
pub struct OpenAddressingBuilder<H> {
    capacity: usize,
    max_load_factor: f64,
    tombstone_threshold: Option<f64>,
    strategy: ProbeStrategy,
    hash_function: H,
}

impl Default for OpenAddressingBuilder<Polynomial> {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            tombstone_threshold: Some(DEFAULT_TOMBSTONE_THRESHOLD),
            strategy: ProbeStrategy::Linear,
            hash_function: Polynomial::default(),
        }
    }
}

impl OpenAddressingBuilder<Polynomial> {
    /// Create a new builder with default parameters, linear probing and the polynomial hash.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: HashFunction> OpenAddressingBuilder<H> {
    /// Sets the initial number of slots.
    pub fn with_capacity(mut self, cap: usize) -> Self {
        self.capacity = cap;
        self
    }

    /// Sets the maximum load factor.
    /// If `len / capacity > max_load_factor` before an insert, the table grows.
    pub fn with_max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    /// Sets the tombstone ratio above which an insertion first rehashes in place.
    /// `None` disables the purge.
    pub fn with_tombstone_threshold(mut self, ratio: Option<f64>) -> Self {
        self.tombstone_threshold = ratio;
        self
    }

    /// Sets the collision resolution strategy.
    pub fn with_probe_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the primary hash function.
    pub fn with_hash_function<T: HashFunction>(
        self,
        hash_function: T,
    ) -> OpenAddressingBuilder<T> {
        OpenAddressingBuilder {
            capacity: self.capacity,
            max_load_factor: self.max_load_factor,
            tombstone_threshold: self.tombstone_threshold,
            strategy: self.strategy,
            hash_function,
        }
    }

    /// Validates the configuration and builds the table.
    pub fn build<V>(self) -> Result<OpenAddressingHashTable<V, H>> {
        validate_config(self.capacity, self.max_load_factor)?;
        let minimum = self.strategy.minimum_capacity();
        if self.capacity < minimum {
            return Err(Error::InvalidCapacity {
                capacity: self.capacity,
                minimum,
            });
        }
        if let Some(ratio) = self.tombstone_threshold {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(Error::InvalidTombstoneThreshold(ratio));
            }
        }

        Ok(OpenAddressingHashTable {
            slots: empty_slots(self.capacity),
            len: 0,
            tombstones: 0,
            strategy: self.strategy,
            max_load_factor: self.max_load_factor,
            tombstone_threshold: self.tombstone_threshold,
            hash_function: self.hash_function,
        })
    }
}

/// The main open addressing hash table with user-chosen probing strategy.
#[derive(Debug, Clone)]
pub struct OpenAddressingHashTable<V, H = Polynomial> {
    slots: Vec<Slot<V>>,
    len: usize,
    tombstones: usize,

    strategy: ProbeStrategy,
    max_load_factor: f64,
    tombstone_threshold: Option<f64>,
    hash_function: H,
}

impl<V> OpenAddressingHashTable<V> {
    /// Creates a table with 16 slots, load factor 0.75, linear probing and the polynomial hash.
    pub fn with_defaults() -> Self {
        OpenAddressingHashTable {
            slots: empty_slots(DEFAULT_INITIAL_CAPACITY),
            len: 0,
            tombstones: 0,
            strategy: ProbeStrategy::Linear,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            tombstone_threshold: Some(DEFAULT_TOMBSTONE_THRESHOLD),
            hash_function: Polynomial::default(),
        }
    }
}

impl<V> Default for OpenAddressingHashTable<V> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<V, H: HashFunction> OpenAddressingHashTable<V, H> {
    /// Creates a table with `initial_capacity` slots.
    ///
    /// Fails with `InvalidCapacity` when the capacity is 0, or below 4 for double hashing, and with
    /// `InvalidLoadFactor` when `max_load_factor` is outside `(0, 1]`.
    pub fn new(
        initial_capacity: usize,
        max_load_factor: f64,
        hash_function: H,
        probe_strategy: ProbeStrategy,
    ) -> Result<Self> {
        OpenAddressingBuilder::new()
            .with_capacity(initial_capacity)
            .with_max_load_factor(max_load_factor)
            .with_probe_strategy(probe_strategy)
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

    /// Current number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently holding a tombstone.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Collision resolution strategy chosen at construction.
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// Load factor above which the next insert doubles the slot array.
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// `len / capacity`. Tombstones do not count.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// The primary hash function.
    pub fn hash_function(&self) -> &H {
        &self.hash_function
    }

    /// Insert a key-value pair. Returns the old value if the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();

        if self.load_factor() > self.max_load_factor {
            debug!(
                "open addressing grow: load factor {:.3}",
                self.load_factor()
            );
            self.rehash(self.capacity() * 2);
        } else if self.tombstone_threshold_exceeded() {
            debug!("open addressing purge: {} tombstones", self.tombstones);
            self.rehash(self.capacity());
        }

        loop {
            match self.locate_for_insert(&key) {
                Ok(idx) => {
                    return match &mut self.slots[idx] {
                        Slot::Occupied(entry) => Some(std::mem::replace(&mut entry.value, value)),
                        slot => {
                            if matches!(slot, Slot::Tombstone) {
                                self.tombstones -= 1;
                            }
                            *slot = Slot::Occupied(Entry { key, value });
                            self.len += 1;
                            None
                        }
                    };
                }
                Err(err) => {
                    debug!("open addressing forced grow: {}", err);
                    self.rehash(self.capacity() * 2);
                }
            }
        }
    }

    /// Retrieve a reference to the value for `key`.
    pub fn find(&self, key: &str) -> Option<&V> {
        match &self.slots[self.locate(key)?] {
            Slot::Occupied(entry) => Some(&entry.value),
            _ => None,
        }
    }

    /// Retrieve a mutable reference to the value for `key`.
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.locate(key)?;
        match &mut self.slots[idx] {
            Slot::Occupied(entry) => Some(&mut entry.value),
            _ => None,
        }
    }

    /// Returns true if the table holds a live entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    /// Removes `key`, leaving a tombstone in its slot. Returns `false` when the key was absent.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.locate(key) {
            Some(idx) => {
                self.slots[idx] = Slot::Tombstone;
                self.len -= 1;
                self.tombstones += 1;
                true
            }
            None => false,
        }
    }

    /// Clears the table of all key-value pairs and tombstones. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
    }

    /// Probes needed to reach every live entry from attempt 0.
    pub fn probe_statistics(&self) -> ProbeStatistics {
        let mut total_probes = 0;
        for (slot_idx, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(entry) = slot {
                total_probes += self
                    .probe_sequence(&entry.key)
                    .position(|idx| idx == slot_idx)
                    .map_or(self.capacity(), |attempt| attempt + 1);
            }
        }

        let average = if self.len > 0 {
            total_probes as f64 / self.len as f64
        } else {
            0.0
        };
        ProbeStatistics {
            total_probes,
            average,
        }
    }

    fn probe_sequence(&self, key: &str) -> ProbeSequence {
        ProbeSequence::new(self.strategy, &self.hash_function, key, self.capacity())
    }

    /// Slot currently holding `key`. Stops at the first empty slot; skips tombstones.
    fn locate(&self, key: &str) -> Option<usize> {
        for idx in self.probe_sequence(key) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(idx),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Slot an insert of `key` should write to: the key's own slot if present, otherwise the first
    /// tombstone on its probe sequence, otherwise the first empty slot.
    fn locate_for_insert(&self, key: &str) -> Result<usize> {
        let mut first_tombstone = None;
        for idx in self.probe_sequence(key) {
            match &self.slots[idx] {
                Slot::Empty => return Ok(first_tombstone.unwrap_or(idx)),
                Slot::Occupied(entry) if entry.key == key => return Ok(idx),
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(idx);
                }
                Slot::Occupied(_) => {}
            }
        }
        first_tombstone.ok_or(Error::ExhaustedProbe {
            capacity: self.capacity(),
        })
    }

    fn tombstone_threshold_exceeded(&self) -> bool {
        let ratio = self.tombstones as f64 / self.capacity() as f64;
        self.tombstone_threshold.is_some_and(|limit| ratio > limit)
    }

    /// Rebuild the slot array with `new_capacity` slots, re-placing every live entry in slot
    /// order. If an entry's probe sequence finds no empty slot, capacity doubles again and
    /// placement restarts.
    fn rehash(&mut self, new_capacity: usize) {
        debug!(
            "open addressing rehash: {} -> {} slots ({} entries, {} tombstones dropped)",
            self.capacity(),
            new_capacity,
            self.len,
            self.tombstones
        );
        let mut capacity = new_capacity;
        let mut pending: Vec<Entry<V>> = std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(Slot::into_entry)
            .collect();

        'grow: loop {
            let mut slots = empty_slots(capacity);
            let mut remaining = pending.into_iter();
            while let Some(entry) = remaining.next() {
                let mut sequence =
                    ProbeSequence::new(self.strategy, &self.hash_function, &entry.key, capacity);
                let vacant = sequence.find(|&idx| matches!(slots[idx], Slot::Empty));
                match vacant {
                    Some(idx) => slots[idx] = Slot::Occupied(entry),
                    None => {
                        trace!(
                            "probe sequence for {:?} exhausted during rehash at {} slots",
                            entry.key,
                            capacity
                        );
                        pending = slots
                            .into_iter()
                            .filter_map(Slot::into_entry)
                            .chain(std::iter::once(entry))
                            .chain(remaining)
                            .collect();
                        capacity *= 2;
                        continue 'grow;
                    }
                }
            }
            self.slots = slots;
            self.tombstones = 0;
            return;
        }
    }
}

impl<V: Clone, H: HashFunction> OpenAddressingHashTable<V, H> {
    /// Snapshot of every `(key, value)` pair in slot order.
    pub fn entries(&self) -> Vec<(String, V)> {
        self.slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Occupied(entry) => Some((entry.key.clone(), entry.value.clone())),
                _ => None,
            })
            .collect()
    }
}

fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}
