use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `YYYY-MM-DD`, the only date shape that leaves the normalizer.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a date in canonical `YYYY-MM-DD` form.
pub fn canonical_date(date: NaiveDate) -> String {
    date.format(CANONICAL_DATE_FORMAT).to_string()
}

/// One input line split into positional fields.
///
/// Borrowed from the source line; dropped as soon as the two fields of
/// interest have been pulled out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// 1-based line number in the source, header included.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl<'a> RawRecord<'a> {
    pub fn new(line: usize, fields: Vec<&'a str>) -> Self {
        Self { line, fields }
    }

    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A visit after date normalization, before the validity filter.
///
/// `date` is `None` when no known format matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedVisit {
    pub date: Option<NaiveDate>,
    pub department: String,
}

impl NormalizedVisit {
    pub fn new(date: Option<NaiveDate>, department: impl Into<String>) -> Self {
        Self {
            date,
            department: department.into(),
        }
    }

    pub fn has_date(&self) -> bool {
        self.date.is_some()
    }

    /// Drop the visit if it has no date, otherwise turn it into a counting key.
    pub fn into_key(self) -> Option<VisitKey> {
        let date = self.date?;
        Some(VisitKey {
            date,
            department: self.department,
        })
    }
}

/// Composite counting key: one calendar day, one department.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitKey {
    pub date: NaiveDate,
    pub department: String,
}

impl VisitKey {
    pub fn new(date: NaiveDate, department: impl Into<String>) -> Self {
        Self {
            date,
            department: department.into(),
        }
    }
}

impl fmt::Display for VisitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", canonical_date(self.date), self.department)
    }
}
