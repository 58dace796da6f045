use std::num::NonZeroUsize;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use keysieve::{Keywords, NullSink, RuleSet};

fn build_inputs() -> (RuleSet, Keywords) {
    let rules: Vec<String> = (0..20)
        .map(|i| format!("词{i}<尾{i}>|培训{i}"))
        .collect();
    let (ruleset, errors) = RuleSet::compile(&rules, &NullSink).unwrap();
    assert!(errors.is_empty());

    let raw: Vec<String> = (0..20_000)
        .map(|i| format!("词{}培训{}后缀{i}", i % 23, i % 7))
        .collect();
    let keywords = Keywords::new(&raw, &NullSink).unwrap();
    (ruleset, keywords)
}

fn bench_throughput(c: &mut Criterion) {
    let worker_counts = [1, 2, 4, 8];

    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(5));

    let (ruleset, keywords) = build_inputs();

    group.bench_function("sequential", |b| {
        b.iter(|| ruleset.classify(&keywords, &NullSink));
    });

    for &workers in &worker_counts {
        group.bench_function(format!("{workers}_workers"), |b| {
            b.iter(|| {
                ruleset.classify_parallel(&keywords, NonZeroUsize::new(workers), &NullSink)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
