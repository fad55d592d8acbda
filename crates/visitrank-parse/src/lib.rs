//! Line parsing for visitrank.
//!
//! Splits one line of delimited text into positional fields and pulls out the
//! department and date columns. There is no quoting or escaping: a delimiter
//! inside a value splits the value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use visitrank_schema::visit::RawRecord;

pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_DEPARTMENT_COLUMN: usize = 3;
pub const DEFAULT_DATE_COLUMN: usize = 4;

/// Row-level parse failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: no value in column {column}, row has {fields} field(s)")]
    MissingColumn {
        line: usize,
        column: usize,
        fields: usize,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            ParseError::MissingColumn { line, .. } => *line,
        }
    }
}

/// What to do with a row that has too few columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Abort the run on the first short row.
    #[default]
    Fail,
    /// Drop the row and keep going.
    Skip,
}

impl fmt::Display for MalformedRowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRowPolicy::Fail => write!(f, "fail"),
            MalformedRowPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Ok(MalformedRowPolicy::Fail),
            "skip" => Ok(MalformedRowPolicy::Skip),
            other => Err(format!("unknown malformed-row policy: {other} (expected fail or skip)")),
        }
    }
}

/// Zero-based positions of the two columns the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    #[serde(default = "default_department_column")]
    pub department: usize,
    #[serde(default = "default_date_column")]
    pub date: usize,
}

fn default_department_column() -> usize {
    DEFAULT_DEPARTMENT_COLUMN
}

fn default_date_column() -> usize {
    DEFAULT_DATE_COLUMN
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            department: DEFAULT_DEPARTMENT_COLUMN,
            date: DEFAULT_DATE_COLUMN,
        }
    }
}

impl ColumnLayout {
    /// Fewest fields a row needs for both columns to exist.
    pub fn min_fields(&self) -> usize {
        self.department.max(self.date) + 1
    }
}

/// The two raw values of interest from one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitFields<'a> {
    pub department: &'a str,
    pub date: &'a str,
}

/// Splits a line on `delimiter`.
///
/// A trailing carriage return is dropped first so CRLF files split the same
/// as LF files. Nothing else is trimmed.
pub fn split_line(line: &str, delimiter: char) -> Vec<&str> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split(delimiter).collect()
}

/// Splits a numbered line into a [`RawRecord`].
pub fn parse_record(number: usize, line: &str, delimiter: char) -> RawRecord<'_> {
    RawRecord::new(number, split_line(line, delimiter))
}

/// Pulls the department and date out of a record.
pub fn extract_fields<'a>(
    record: &RawRecord<'a>,
    layout: &ColumnLayout,
) -> Result<VisitFields<'a>, ParseError> {
    let missing = |column: usize| ParseError::MissingColumn {
        line: record.line,
        column,
        fields: record.len(),
    };
    let department = record
        .field(layout.department)
        .ok_or_else(|| missing(layout.department))?;
    let date = record.field(layout.date).ok_or_else(|| missing(layout.date))?;
    Ok(VisitFields { department, date })
}

/// Delimiter plus column layout, applied line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParser {
    pub delimiter: char,
    pub layout: ColumnLayout,
}

impl Default for LineParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            layout: ColumnLayout::default(),
        }
    }
}

impl LineParser {
    pub fn new(delimiter: char, layout: ColumnLayout) -> Self {
        Self { delimiter, layout }
    }

    pub fn parse<'a>(&self, number: usize, line: &'a str) -> Result<VisitFields<'a>, ParseError> {
        let record = parse_record(number, line, self.delimiter);
        extract_fields(&record, &self.layout)
    }
}
