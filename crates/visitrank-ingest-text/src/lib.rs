use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use visitrank_ports::{RecordSource, SourceLine};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Reads a delimited text file line by line.
///
/// The first `skip_header_lines` lines are dropped. Every other line,
/// blank or not, is handed on with its 1-based line number; the parser and
/// the malformed-row policy decide what a blank line means.
pub struct TextFileSource {
    pub path: PathBuf,
    pub skip_header_lines: usize,
}

impl TextFileSource {
    pub fn new(path: impl Into<PathBuf>, skip_header_lines: usize) -> Self {
        Self {
            path: path.into(),
            skip_header_lines,
        }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }
}

impl RecordSource for TextFileSource {
    fn read_lines(&self) -> Result<Vec<SourceLine>> {
        if self.is_stdin() {
            let stdin = std::io::stdin();
            return read_source_lines(stdin.lock(), self.skip_header_lines)
                .context("read visit log from stdin");
        }
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("open {:?}", self.path))?;
        let lines = read_source_lines(BufReader::new(file), self.skip_header_lines)
            .with_context(|| format!("read {:?}", self.path))?;
        tracing::debug!(path = ?self.path, lines = lines.len(), "read visit log");
        Ok(lines)
    }
}

/// Collect numbered data lines from any buffered reader.
pub fn read_source_lines<R: BufRead>(reader: R, skip_header_lines: usize) -> Result<Vec<SourceLine>> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", i + 1))?;
        if i < skip_header_lines {
            continue;
        }
        out.push(SourceLine::new(i + 1, line));
    }
    Ok(out)
}
