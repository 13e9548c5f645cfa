use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fairprompt::{highlight, BiasDetector};

const SHORT_PROMPT: &str = "He is chairman";
const MIXED_PROMPT: &str = r#"
    Summarize the memo: "The chairman said the housewife blacklist was crazy."
    She replied that native manpower should come first, and he agreed.
"#;

fn long_prompt() -> String {
    // Mostly clean prose with occasional flagged terms
    let paragraph = "Please summarize the following report for the whole team. \
                     The committee met on Tuesday and reviewed the budget. \
                     Afterwards the chairman thanked everyone for their time.\n";
    paragraph.repeat(200)
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("bias_detection");

    group.bench_function("detector_compilation", |b| {
        b.iter(|| {
            black_box(BiasDetector::with_builtin_catalog().unwrap());
        })
    });

    let detector = BiasDetector::with_builtin_catalog().unwrap();
    let long = long_prompt();

    group.bench_function("detect_short", |b| {
        b.iter(|| detector.detect(black_box(SHORT_PROMPT)))
    });

    group.bench_function("detect_mixed", |b| {
        b.iter(|| detector.detect(black_box(MIXED_PROMPT)))
    });

    group.throughput(Throughput::Bytes(long.len() as u64));
    group.bench_function("detect_long", |b| {
        b.iter(|| detector.detect(black_box(&long)))
    });

    group.bench_function("occurrences_long", |b| {
        b.iter(|| detector.occurrences(black_box(&long)))
    });

    let matches = detector.detect(&long);
    group.bench_function("highlight_long", |b| {
        b.iter(|| highlight(black_box(&long), black_box(&matches)))
    });

    group.finish();
}

criterion_group!(benches, bench_detection);
criterion_main!(benches);
