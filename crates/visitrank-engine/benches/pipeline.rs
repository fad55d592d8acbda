use criterion::{Criterion, black_box, criterion_group, criterion_main};
use visitrank_engine::{PipelineOptions, run_pipeline};
use visitrank_ports::SourceLine;

const DEPARTMENTS: [&str; 8] = [
    "Cardiology",
    "ER",
    "ICU",
    "Neurology",
    "Oncology",
    "Pediatrics",
    "Radiology",
    "Surgery",
];

fn synthetic_lines(n: usize) -> Vec<SourceLine> {
    (0..n)
        .map(|i| {
            let dept = DEPARTMENTS[(i * 7) % DEPARTMENTS.len()];
            let day = i % 28 + 1;
            let text = if i % 2 == 0 {
                format!("{i},p{i},40,{dept},{day:02}-03-2024")
            } else {
                format!("{i},p{i},40,{dept},{day:02}/03/2024")
            };
            SourceLine::new(i + 2, text)
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let lines = synthetic_lines(100_000);
    for workers in [1, 4] {
        let options = PipelineOptions::default().with_workers(workers);
        c.bench_function(&format!("run_pipeline_100k_w{workers}"), |b| {
            b.iter(|| run_pipeline(black_box(&lines), &options))
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
