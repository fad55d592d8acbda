//! Fuzz harness for the whole pipeline over arbitrary line sets.

#![no_main]

use libfuzzer_sys::fuzz_target;
use visitrank_engine::{PipelineOptions, run_pipeline};
use visitrank_parse::MalformedRowPolicy;
use visitrank_ports::SourceLine;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let lines: Vec<SourceLine> = input
        .lines()
        .enumerate()
        .map(|(i, l)| SourceLine::new(i + 2, l))
        .collect();
    let options = PipelineOptions::default().with_policy(MalformedRowPolicy::Skip);

    let single = run_pipeline(&lines, &options).expect("skip policy never fails");
    let parallel = run_pipeline(&lines, &options.clone().with_workers(3))
        .expect("skip policy never fails");
    assert_eq!(single, parallel);
    for day in &single.results {
        assert!(day.top.len() >= 3);
    }
});
