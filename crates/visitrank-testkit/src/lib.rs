use anyhow::Result;
use chrono::NaiveDate;
use visitrank_ports::{RecordSource, ResultSink, SinkReport, SourceLine};
use visitrank_schema::tally::{DailyTop, DepartmentTally};

pub mod proptest;

/// Header line of the fixture visit logs.
pub const VISIT_HEADER: &str = "visit_id,patient,age,department,date";

/// Small helpers for building fixtures in tests.
///
/// Keeping these in a microcrate avoids copy-paste across counter, engine and
/// CLI tests.
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn tally(department: &str, count: u64) -> DepartmentTally {
    DepartmentTally::new(department, count)
}

/// One five-column data row with the given department and raw date text.
pub fn visit_line(department: &str, raw_date: &str) -> String {
    format!(",,,{department},{raw_date}")
}

/// A full visit log: header plus one row per `(department, raw_date)`.
pub fn visit_log(rows: &[(&str, &str)]) -> String {
    let mut out = String::from(VISIT_HEADER);
    out.push('\n');
    for (i, (department, raw_date)) in rows.iter().enumerate() {
        out.push_str(&format!("{},patient{},40,{department},{raw_date}\n", i + 1, i + 1));
    }
    out
}

/// Data rows as the reader would hand them over: numbered from 2, after the header.
pub fn source_lines(rows: &[(&str, &str)]) -> Vec<SourceLine> {
    rows.iter()
        .enumerate()
        .map(|(i, (department, raw_date))| SourceLine::new(i + 2, visit_line(department, raw_date)))
        .collect()
}

/// In-memory record source.
#[derive(Clone, Debug, Default)]
pub struct VecSource {
    pub lines: Vec<SourceLine>,
}

impl VecSource {
    pub fn new(lines: Vec<SourceLine>) -> Self {
        Self { lines }
    }

    pub fn from_rows(rows: &[(&str, &str)]) -> Self {
        Self::new(source_lines(rows))
    }
}

impl RecordSource for VecSource {
    fn read_lines(&self) -> Result<Vec<SourceLine>> {
        Ok(self.lines.clone())
    }
}

/// Sink that keeps every result it is given.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    pub results: Vec<DailyTop>,
}

impl ResultSink for VecSink {
    fn write_results(&mut self, results: &[DailyTop]) -> Result<SinkReport> {
        self.results.extend_from_slice(results);
        Ok(SinkReport {
            files: vec![],
            lines_written: results.len() as u64,
        })
    }
}
