//! Tests for visitrank-ports crate.

use chrono::NaiveDate;
use visitrank_ports::{LineRenderer, RecordSource, ResultSink, SinkReport, SourceLine};
use visitrank_schema::tally::{DailyTop, DepartmentTally};

/// Mock source that serves a fixed set of lines.
struct MockSource {
    lines: Vec<&'static str>,
}

impl RecordSource for MockSource {
    fn read_lines(&self) -> anyhow::Result<Vec<SourceLine>> {
        Ok(self
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| SourceLine::new(i + 2, *l))
            .collect())
    }
}

/// Mock renderer that prints the date and the number of ranked departments.
struct MockRenderer;

impl LineRenderer for MockRenderer {
    fn render_line(&self, top: &DailyTop) -> anyhow::Result<String> {
        Ok(format!("{} {}", top.date, top.len()))
    }
}

/// Mock sink that renders into memory.
struct MockSink {
    out: Vec<String>,
}

impl ResultSink for MockSink {
    fn write_results(&mut self, results: &[DailyTop]) -> anyhow::Result<SinkReport> {
        for r in results {
            self.out.push(MockRenderer.render_line(r)?);
        }
        Ok(SinkReport {
            files: vec![],
            lines_written: results.len() as u64,
        })
    }
}

fn sample_top() -> DailyTop {
    DailyTop::new(
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        vec![
            DepartmentTally::new("A", 3),
            DepartmentTally::new("B", 2),
            DepartmentTally::new("C", 1),
        ],
    )
}

#[test]
fn mock_source_numbers_lines_after_header() {
    let source = MockSource {
        lines: vec![",,,A,05-03-2024", ",,,B,05-03-2024"],
    };
    let lines = source.read_lines().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].number, 2);
    assert_eq!(lines[1].text, ",,,B,05-03-2024");
}

#[test]
fn mock_renderer_is_pure() {
    let top = sample_top();
    let first = MockRenderer.render_line(&top).unwrap();
    let second = MockRenderer.render_line(&top).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "2024-03-05 3");
}

#[test]
fn mock_sink_reports_lines_written() {
    let mut sink = MockSink { out: vec![] };
    let report = sink.write_results(&[sample_top(), sample_top()]).unwrap();
    assert_eq!(report.lines_written, 2);
    assert!(report.files.is_empty());
    assert_eq!(sink.out.len(), 2);
}

#[test]
fn sinks_are_object_safe() {
    let mut sink = MockSink { out: vec![] };
    let dyn_sink: &mut dyn ResultSink = &mut sink;
    let report = dyn_sink.write_results(&[]).unwrap();
    assert_eq!(report, SinkReport::default());
}
