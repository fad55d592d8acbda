//! Visit counting for visitrank.
//!
//! [`DailyDepartmentCounter`] maps each (date, department) key to the number
//! of visits seen for it. Counts only ever grow by addition, so partial
//! counters built over disjoint slices of the input merge into the same
//! totals a single pass would produce.
//!
//! The counter also remembers the order in which keys were first seen. Rank
//! ties downstream are broken by that order.

use std::collections::HashMap;
use visitrank_schema::tally::CountEntry;
use visitrank_schema::visit::VisitKey;

/// Counts keyed by (date, department), in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyDepartmentCounter {
    index: HashMap<VisitKey, usize>,
    entries: Vec<CountEntry>,
}

impl DailyDepartmentCounter {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one visit for `key`
    pub fn inc(&mut self, key: VisitKey) {
        self.inc_by(key, 1);
    }

    /// Record `amount` visits for `key`.
    ///
    /// A zero amount never creates a key.
    pub fn inc_by(&mut self, key: VisitKey, amount: u64) {
        if amount == 0 {
            return;
        }
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].count += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(CountEntry::new(key, amount));
            }
        }
    }

    /// Count for `key`, zero if never seen
    pub fn get(&self, key: &VisitKey) -> u64 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].count)
            .unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[CountEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CountEntry> {
        self.entries
    }

    /// Add another counter's totals into this one.
    ///
    /// Keys already present keep their position; keys new to `self` are
    /// appended in `other`'s order. Merging partial counters in input order
    /// therefore reproduces the first-seen order of a single pass.
    pub fn merge(&mut self, other: DailyDepartmentCounter) {
        for entry in other.entries {
            self.inc_by(entry.key, entry.count);
        }
    }
}

impl FromIterator<VisitKey> for DailyDepartmentCounter {
    fn from_iter<T: IntoIterator<Item = VisitKey>>(iter: T) -> Self {
        let mut counter = Self::new();
        counter.extend(iter);
        counter
    }
}

impl Extend<VisitKey> for DailyDepartmentCounter {
    fn extend<T: IntoIterator<Item = VisitKey>>(&mut self, iter: T) {
        for key in iter {
            self.inc(key);
        }
    }
}
