//! Snapshot tests for visitrank-render.

use chrono::NaiveDate;
use visitrank_render::{CsvRenderer, JsonlRenderer, OutputFormat, TupleRenderer, renderer_for};
use visitrank_ports::LineRenderer;
use visitrank_schema::tally::{DailyTop, DepartmentTally};

fn sample() -> DailyTop {
    DailyTop::new(
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        vec![
            DepartmentTally::new("Cardiology", 2),
            DepartmentTally::new("Emergency", 1),
            DepartmentTally::new("Neurology", 1),
        ],
    )
}

#[test]
fn tuple_line() {
    insta::assert_snapshot!(
        TupleRenderer.render_line(&sample()).unwrap(),
        @"('2024-03-05', [('Cardiology', 2), ('Emergency', 1), ('Neurology', 1)])"
    );
}

#[test]
fn csv_line() {
    insta::assert_snapshot!(
        CsvRenderer::default().render_line(&sample()).unwrap(),
        @"2024-03-05,Cardiology,2,Emergency,1,Neurology,1"
    );
}

#[test]
fn csv_line_custom_delimiter() {
    let r = CsvRenderer { delimiter: '\t' };
    assert_eq!(
        r.render_line(&sample()).unwrap(),
        "2024-03-05\tCardiology\t2\tEmergency\t1\tNeurology\t1"
    );
}

#[test]
fn jsonl_line() {
    insta::assert_snapshot!(
        JsonlRenderer.render_line(&sample()).unwrap(),
        @r#"{"date":"2024-03-05","top":[{"department":"Cardiology","count":2},{"department":"Emergency","count":1},{"department":"Neurology","count":1}]}"#
    );
}

#[test]
fn jsonl_line_parses_back() {
    let line = JsonlRenderer.render_line(&sample()).unwrap();
    let back: DailyTop = serde_json::from_str(&line).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn renderer_for_dispatches() {
    for format in [OutputFormat::Tuple, OutputFormat::Csv, OutputFormat::Jsonl] {
        let line = renderer_for(format).render_line(&sample()).unwrap();
        assert!(line.contains("2024-03-05"), "{format}: {line}");
        assert!(!line.contains('\n'));
    }
}

#[test]
fn empty_top_renders() {
    let top = DailyTop::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), vec![]);
    assert_eq!(TupleRenderer.render_line(&top).unwrap(), "('2024-01-01', [])");
    assert_eq!(CsvRenderer::default().render_line(&top).unwrap(), "2024-01-01");
}
