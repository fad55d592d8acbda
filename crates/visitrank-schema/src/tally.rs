use crate::visit::VisitKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Final count for one (date, department) key. Always at least 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountEntry {
    pub key: VisitKey,
    pub count: u64,
}

impl CountEntry {
    pub fn new(key: VisitKey, count: u64) -> Self {
        Self { key, count }
    }

    /// Re-key by date alone: the grouping step's input.
    pub fn into_dated_tally(self) -> (NaiveDate, DepartmentTally) {
        (
            self.key.date,
            DepartmentTally::new(self.key.department, self.count),
        )
    }
}

/// Visit count for one department on one day.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentTally {
    pub department: String,
    pub count: u64,
}

impl DepartmentTally {
    pub fn new(department: impl Into<String>, count: u64) -> Self {
        Self {
            department: department.into(),
            count,
        }
    }
}

/// All tallies that share one canonical date.
///
/// Never empty: a date only exists here if at least one valid visit was counted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGroup {
    pub date: NaiveDate,
    pub tallies: Vec<DepartmentTally>,
}

impl DailyGroup {
    pub fn new(date: NaiveDate, tallies: Vec<DepartmentTally>) -> Self {
        Self { date, tallies }
    }

    pub fn department_count(&self) -> usize {
        self.tallies.len()
    }

    pub fn total_visits(&self) -> u64 {
        self.tallies.iter().map(|t| t.count).sum()
    }
}

/// Ranked departments for one day, highest count first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTop {
    pub date: NaiveDate,
    pub top: Vec<DepartmentTally>,
}

impl DailyTop {
    pub fn new(date: NaiveDate, top: Vec<DepartmentTally>) -> Self {
        Self { date, top }
    }

    pub fn len(&self) -> usize {
        self.top.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }
}
