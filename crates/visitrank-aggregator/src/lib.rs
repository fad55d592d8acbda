//! Date grouping for visitrank.
//!
//! Re-keys count entries by date and collects every tally for a date into a
//! single [`DailyGroup`]. Dates come out in calendar order; tallies inside a
//! group keep the order they were added in.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use visitrank_schema::tally::{CountEntry, DailyGroup, DepartmentTally};

/// Collects department tallies under their date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateGrouper {
    groups: BTreeMap<NaiveDate, Vec<DepartmentTally>>,
}

impl DateGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, tally: DepartmentTally) {
        self.groups.entry(date).or_default().push(tally);
    }

    /// Add a counted (date, department) entry under its date.
    pub fn add_entry(&mut self, entry: CountEntry) {
        let (date, tally) = entry.into_dated_tally();
        self.insert(date, tally);
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&[DepartmentTally]> {
        self.groups.get(date).map(Vec::as_slice)
    }

    /// Number of distinct dates
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Finished groups in ascending date order.
    pub fn into_groups(self) -> Vec<DailyGroup> {
        self.groups
            .into_iter()
            .map(|(date, tallies)| DailyGroup::new(date, tallies))
            .collect()
    }
}

impl FromIterator<CountEntry> for DateGrouper {
    fn from_iter<T: IntoIterator<Item = CountEntry>>(iter: T) -> Self {
        let mut grouper = Self::new();
        for entry in iter {
            grouper.add_entry(entry);
        }
        grouper
    }
}

/// Group count entries by date in one call.
pub fn group_by_date<I>(entries: I) -> Vec<DailyGroup>
where
    I: IntoIterator<Item = CountEntry>,
{
    entries.into_iter().collect::<DateGrouper>().into_groups()
}
