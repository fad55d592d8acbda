//! Result sinks for visitrank.
//!
//! [`ShardedTextSink`] writes rendered lines into `num_shards` files named
//! `<prefix>-SSSSS-of-NNNNN<suffix>`. [`StreamSink`] writes them to any
//! `Write`, typically stdout.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use visitrank_ports::{LineRenderer, ResultSink, SinkReport};
use visitrank_schema::tally::DailyTop;

/// Path of shard `index` out of `count`.
///
/// `shard_path("out/top", 0, 2, ".csv")` is `out/top-00000-of-00002.csv`.
pub fn shard_path(prefix: &Path, index: usize, count: usize, suffix: &str) -> PathBuf {
    let mut name: OsString = prefix.as_os_str().to_owned();
    name.push(format!("-{index:05}-of-{count:05}{suffix}"));
    PathBuf::from(name)
}

/// A writer that terminates every line with `\n` and counts them.
pub struct LineWriter<W: Write> {
    inner: W,
    lines: u64,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Writes results round-robin across a fixed number of shard files.
///
/// Every shard file is created, even when there are fewer results than
/// shards, so the `-of-NNNNN` set is always complete.
pub struct ShardedTextSink {
    pub prefix: PathBuf,
    pub suffix: String,
    pub num_shards: usize,
    renderer: Box<dyn LineRenderer + Send + Sync>,
}

impl ShardedTextSink {
    pub fn new(
        prefix: impl Into<PathBuf>,
        suffix: impl Into<String>,
        num_shards: usize,
        renderer: Box<dyn LineRenderer + Send + Sync>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            num_shards: num_shards.max(1),
            renderer,
        }
    }

    /// Every path this sink writes, in shard order.
    pub fn shard_paths(&self) -> Vec<PathBuf> {
        (0..self.num_shards)
            .map(|i| shard_path(&self.prefix, i, self.num_shards, &self.suffix))
            .collect()
    }
}

impl ResultSink for ShardedTextSink {
    fn write_results(&mut self, results: &[DailyTop]) -> Result<SinkReport> {
        if let Some(parent) = self.prefix.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create {parent:?}"))?;
        }

        let paths = self.shard_paths();
        let mut writers = Vec::with_capacity(paths.len());
        for path in &paths {
            let f = File::create(path).with_context(|| format!("create {path:?}"))?;
            writers.push(LineWriter::new(BufWriter::new(f)));
        }

        for (i, top) in results.iter().enumerate() {
            let line = self.renderer.render_line(top)?;
            let shard = i % writers.len();
            writers[shard]
                .write_line(&line)
                .with_context(|| format!("write {:?}", paths[shard]))?;
        }

        let mut lines_written = 0;
        for (w, path) in writers.iter_mut().zip(&paths) {
            w.flush().with_context(|| format!("flush {path:?}"))?;
            lines_written += w.lines_written();
            tracing::debug!(path = ?path, lines = w.lines_written(), "wrote shard");
        }

        Ok(SinkReport {
            files: paths,
            lines_written,
        })
    }
}

/// Writes every result to one stream.
pub struct StreamSink<W: Write> {
    writer: LineWriter<W>,
    renderer: Box<dyn LineRenderer + Send + Sync>,
}

impl<W: Write> StreamSink<W> {
    pub fn new(inner: W, renderer: Box<dyn LineRenderer + Send + Sync>) -> Self {
        Self {
            writer: LineWriter::new(inner),
            renderer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> ResultSink for StreamSink<W> {
    fn write_results(&mut self, results: &[DailyTop]) -> Result<SinkReport> {
        let before = self.writer.lines_written();
        for top in results {
            let line = self.renderer.render_line(top)?;
            self.writer.write_line(&line).context("write result line")?;
        }
        self.writer.flush().context("flush output stream")?;
        Ok(SinkReport {
            files: vec![],
            lines_written: self.writer.lines_written() - before,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn shard_names() {
        assert_eq!(
            shard_path(Path::new("out/top"), 0, 1, ""),
            PathBuf::from("out/top-00000-of-00001")
        );
        assert_eq!(
            shard_path(Path::new("top"), 3, 12, ".jsonl"),
            PathBuf::from("top-00003-of-00012.jsonl")
        );
    }

    #[test]
    fn line_writer_counts_lines() {
        let mut w = LineWriter::new(Cursor::new(Vec::new()));
        w.write_line("hello").unwrap();
        w.write_line("world").unwrap();
        assert_eq!(w.lines_written(), 2);
        assert_eq!(w.get_ref().get_ref(), b"hello\nworld\n");
    }
}
