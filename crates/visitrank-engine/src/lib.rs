//! Orchestration engine for the visitrank pipeline.
//!
//! The map phase (parse, normalize, validity filter, local count) runs over
//! contiguous chunks of the input on scoped threads. The reduce phase merges
//! the partial counters in chunk order, then groups by date, ranks each day
//! and drops incomplete days. Output does not depend on the worker count.

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use visitrank_aggregator::group_by_date;
use visitrank_config::VisitrankConfig;
use visitrank_counter::DailyDepartmentCounter;
use visitrank_filter::{CompletenessFilter, DEFAULT_MIN_DEPARTMENTS, is_valid, valid_keys};
use visitrank_normalize::DateNormalizer;
use visitrank_parse::{LineParser, MalformedRowPolicy, ParseError};
use visitrank_ports::{RecordSource, ResultSink, SinkReport, SourceLine};
use visitrank_ranker::{DEFAULT_TOP_N, TopNRanker};
use visitrank_schema::stats::PipelineStats;
use visitrank_schema::tally::DailyTop;
use visitrank_schema::visit::NormalizedVisit;

/// Everything the pure pipeline needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub parser: LineParser,
    pub normalizer: DateNormalizer,
    pub top_n: usize,
    pub min_departments: usize,
    pub on_malformed: MalformedRowPolicy,
    pub workers: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parser: LineParser::default(),
            normalizer: DateNormalizer::default(),
            top_n: DEFAULT_TOP_N,
            min_departments: DEFAULT_MIN_DEPARTMENTS,
            on_malformed: MalformedRowPolicy::default(),
            workers: 1,
        }
    }
}

impl From<&VisitrankConfig> for PipelineOptions {
    fn from(config: &VisitrankConfig) -> Self {
        Self {
            parser: LineParser::new(config.delimiter, config.columns),
            normalizer: DateNormalizer::with_formats(config.date_formats.iter()),
            top_n: config.top_n,
            min_departments: config.min_departments,
            on_malformed: config.on_malformed,
            workers: config.workers,
        }
    }
}

impl PipelineOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.on_malformed = policy;
        self
    }
}

/// Ranked days plus what the run saw along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Complete days in ascending date order.
    pub results: Vec<DailyTop>,
    pub stats: PipelineStats,
}

struct ChunkOutput {
    counter: DailyDepartmentCounter,
    stats: PipelineStats,
}

/// Lines per chunk so that `workers` chunks cover `len` lines.
pub fn chunk_size(len: usize, workers: usize) -> usize {
    len.div_ceil(workers.max(1)).max(1)
}

fn map_chunk(lines: &[SourceLine], options: &PipelineOptions) -> Result<ChunkOutput, ParseError> {
    let mut stats = PipelineStats::new();
    let mut visits = Vec::with_capacity(lines.len());

    for line in lines {
        stats.lines_read += 1;
        let fields = match options.parser.parse(line.number, &line.text) {
            Ok(fields) => fields,
            Err(err) => match options.on_malformed {
                MalformedRowPolicy::Fail => return Err(err),
                MalformedRowPolicy::Skip => {
                    tracing::warn!(line = line.number, error = %err, "skipping malformed row");
                    stats.malformed_rows += 1;
                    continue;
                }
            },
        };

        let visit = NormalizedVisit::new(options.normalizer.normalize(fields.date), fields.department);
        if !is_valid(&visit) {
            tracing::debug!(line = line.number, date = fields.date, "dropping row with unrecognised date");
            stats.invalid_dates += 1;
        }
        visits.push(visit);
    }

    let counter: DailyDepartmentCounter = valid_keys(visits).collect();
    stats.valid_records = counter.total();
    Ok(ChunkOutput { counter, stats })
}

fn map_phase(lines: &[SourceLine], options: &PipelineOptions) -> Result<Vec<ChunkOutput>> {
    if options.workers <= 1 || lines.len() <= 1 {
        return Ok(vec![map_chunk(lines, options)?]);
    }

    let size = chunk_size(lines.len(), options.workers);
    let joined: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = lines
            .chunks(size)
            .map(|chunk| scope.spawn(move || map_chunk(chunk, options)))
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    // Chunk order, so a failing run reports the earliest bad line.
    let mut outputs = Vec::with_capacity(joined.len());
    for result in joined {
        let output = result.map_err(|_| anyhow!("map worker panicked"))??;
        outputs.push(output);
    }
    Ok(outputs)
}

/// Run the pure pipeline over already-read lines.
///
/// Fails with a [`ParseError`] (inside the `anyhow::Error`) on the first short
/// row when the policy is [`MalformedRowPolicy::Fail`].
pub fn run_pipeline(lines: &[SourceLine], options: &PipelineOptions) -> Result<PipelineOutput> {
    let chunks = map_phase(lines, options)?;
    tracing::debug!(chunks = chunks.len(), lines = lines.len(), "map phase done");

    let mut counter = DailyDepartmentCounter::new();
    let mut stats = PipelineStats::new();
    for chunk in chunks {
        stats.merge(&chunk.stats);
        counter.merge(chunk.counter);
    }
    stats.distinct_keys = counter.len() as u64;

    let groups = group_by_date(counter.into_entries());
    stats.distinct_dates = groups.len() as u64;
    for group in &groups {
        tracing::trace!(
            date = %group.date,
            departments = group.department_count(),
            visits = group.total_visits(),
            "grouped day"
        );
    }

    let ranked = TopNRanker::new(options.top_n).rank_all(groups);
    let (results, dropped) = CompletenessFilter::new(options.min_departments).apply(ranked);
    stats.days_emitted = results.len() as u64;
    stats.days_incomplete = dropped as u64;

    Ok(PipelineOutput { results, stats })
}

/// Write run statistics as pretty JSON.
pub fn write_stats(path: &Path, stats: &PipelineStats) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent:?}"))?;
    }
    let json = serde_json::to_string_pretty(stats).context("serialize stats")?;
    std::fs::write(path, json).with_context(|| format!("write {path:?}"))?;
    Ok(())
}

/// What one end-to-end run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: PipelineStats,
    pub report: SinkReport,
}

/// Drives a source through the pipeline into a sink.
pub struct Engine {
    pub options: PipelineOptions,
}

impl Engine {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, source: &dyn RecordSource, sink: &mut dyn ResultSink) -> Result<RunSummary> {
        let lines = source.read_lines()?;
        tracing::info!(lines = lines.len(), workers = self.options.workers, "read visit log");

        let output = run_pipeline(&lines, &self.options)?;
        let stats = output.stats;
        tracing::info!(
            valid = stats.valid_records,
            invalid_dates = stats.invalid_dates,
            malformed = stats.malformed_rows,
            dates = stats.distinct_dates,
            emitted = stats.days_emitted,
            incomplete = stats.days_incomplete,
            "pipeline finished"
        );

        let report = sink.write_results(&output.results)?;
        tracing::info!(files = report.files.len(), lines = report.lines_written, "wrote results");
        Ok(RunSummary { stats, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(rows: &[&str]) -> Vec<SourceLine> {
        rows.iter()
            .enumerate()
            .map(|(i, r)| SourceLine::new(i + 2, *r))
            .collect()
    }

    #[test]
    fn chunk_sizes_cover_input() {
        assert_eq!(chunk_size(10, 3), 4);
        assert_eq!(chunk_size(9, 3), 3);
        assert_eq!(chunk_size(2, 8), 1);
        assert_eq!(chunk_size(0, 4), 1);
        assert_eq!(chunk_size(5, 0), 5);
    }

    #[test]
    fn map_chunk_counts_and_tracks_drops() {
        let input = lines(&[
            ",,,ER,05-03-2024",
            ",,,ER,05/03/2024",
            ",,,ICU,2024-03-05",
            ",,,ICU",
        ]);
        let options = PipelineOptions::default().with_policy(MalformedRowPolicy::Skip);
        let out = map_chunk(&input, &options).unwrap();
        assert_eq!(out.stats.lines_read, 4);
        assert_eq!(out.stats.valid_records, 2);
        assert_eq!(out.stats.invalid_dates, 1);
        assert_eq!(out.stats.malformed_rows, 1);
        assert_eq!(out.counter.len(), 1);
        assert_eq!(out.counter.total(), 2);
    }

    #[test]
    fn map_chunk_fails_on_short_row_by_default() {
        let input = lines(&[",,,ER,05-03-2024", "short"]);
        let err = map_chunk(&input, &PipelineOptions::default()).err().unwrap();
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn options_from_config() {
        let config = VisitrankConfig {
            delimiter: ';',
            top_n: 2,
            min_departments: 1,
            workers: 4,
            date_formats: vec!["%Y%m%d".into()],
            ..VisitrankConfig::default()
        };
        let options = PipelineOptions::from(&config);
        assert_eq!(options.parser.delimiter, ';');
        assert_eq!(options.top_n, 2);
        assert_eq!(options.min_departments, 1);
        assert_eq!(options.workers, 4);
        assert_eq!(options.normalizer.formats(), ["%Y%m%d".to_string()]);
    }
}
