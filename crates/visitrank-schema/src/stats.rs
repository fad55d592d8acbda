use serde::{Deserialize, Serialize};

/// Counters describing what one pipeline run saw and dropped.
///
/// Map-phase fields are additive, so per-worker stats merge by summation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Data lines handed to the parser (header excluded).
    pub lines_read: u64,
    /// Rows skipped for having too few columns.
    pub malformed_rows: u64,
    /// Rows dropped because no date format matched.
    pub invalid_dates: u64,
    /// Rows that reached the counter.
    pub valid_records: u64,
    /// Distinct (date, department) keys.
    pub distinct_keys: u64,
    /// Distinct valid dates.
    pub distinct_dates: u64,
    /// Days written to the sink.
    pub days_emitted: u64,
    /// Days dropped for having too few departments.
    pub days_incomplete: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another worker's map-phase counters into this one.
    pub fn merge(&mut self, other: &PipelineStats) {
        self.lines_read += other.lines_read;
        self.malformed_rows += other.malformed_rows;
        self.invalid_dates += other.invalid_dates;
        self.valid_records += other.valid_records;
        self.distinct_keys += other.distinct_keys;
        self.distinct_dates += other.distinct_dates;
        self.days_emitted += other.days_emitted;
        self.days_incomplete += other.days_incomplete;
    }

    /// Rows that never reached the counter.
    pub fn dropped_rows(&self) -> u64 {
        self.malformed_rows + self.invalid_dates
    }
}
