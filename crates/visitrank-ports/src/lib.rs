use anyhow::Result;
use std::path::PathBuf;
use visitrank_schema::tally::DailyTop;

/// One data line from a record source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based position in the underlying text, header lines included.
    pub number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Supplies raw data lines with header lines already skipped.
///
/// Adapters live in `visitrank-ingest-*` crates.
pub trait RecordSource {
    fn read_lines(&self) -> Result<Vec<SourceLine>>;
}

/// Turns one ranked day into one line of text.
///
/// Renderers should be pure: result in, string out, no trailing newline.
pub trait LineRenderer {
    fn render_line(&self, top: &DailyTop) -> Result<String>;
}

/// What a sink did with the results it was handed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkReport {
    pub files: Vec<PathBuf>,
    pub lines_written: u64,
}

/// Final consumer of ranked results.
pub trait ResultSink {
    fn write_results(&mut self, results: &[DailyTop]) -> Result<SinkReport>;
}
