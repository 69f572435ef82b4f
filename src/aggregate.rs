//! Per-key running statistics and the table that holds them.

use crate::measurement::Measurement;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Running statistics for one key
///
/// Built from the first observation, so `count` is always at least one and
/// `min`/`max` never hold placeholder extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub min: Measurement,
    pub max: Measurement,
    /// Exact total in micro-units
    pub sum: i128,
    pub count: u64,
}

impl Aggregate {
    pub fn first(value: Measurement) -> Self {
        Self {
            min: value,
            max: value,
            sum: value.micros(),
            count: 1,
        }
    }

    pub fn observe(&mut self, value: Measurement) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value.micros();
        self.count += 1;
    }

    pub fn merge(&mut self, other: &Aggregate) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }
}

/// Mapping from key to [`Aggregate`]
///
/// Keys borrow from the input buffer. The table only grows; partial tables
/// built over disjoint parts of the input combine with [`merge`](Self::merge).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationTable<'a> {
    entries: HashMap<&'a [u8], Aggregate>,
    rejected: u64,
}

impl<'a> AggregationTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the table
    pub fn observe(&mut self, key: &'a [u8], value: Measurement) {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().observe(value),
            Entry::Vacant(entry) => {
                entry.insert(Aggregate::first(value));
            }
        }
    }

    /// Count a record skipped under the lenient policy
    pub fn reject(&mut self) {
        self.rejected += 1;
    }

    /// Combine another partial table into this one
    pub fn merge(&mut self, other: AggregationTable<'a>) {
        for (key, aggregate) in other.entries {
            match self.entries.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(&aggregate),
                Entry::Vacant(entry) => {
                    entry.insert(aggregate);
                }
            }
        }
        self.rejected += other.rejected;
    }

    pub fn get(&self, key: &[u8]) -> Option<&Aggregate> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records skipped under the lenient policy
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Total number of observations folded in
    pub fn records(&self) -> u64 {
        self.entries.values().map(|a| a.count).sum()
    }

    /// Entries in ascending byte order of their keys
    pub fn into_sorted(self) -> Vec<(&'a [u8], Aggregate)> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_unstable_by_key(|(key, _)| *key);
        entries
    }
}
