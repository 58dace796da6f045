use std::num::NonZeroUsize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use crate::types::CompiledRule;
use crate::{Classification, Diagnostic, DiagnosticSink, Keywords};

/// Below this many keywords the parallel path runs sequentially; the batch
/// overhead isn't worth it.
const SEQUENTIAL_CUTOFF: usize = 10;

pub(crate) fn classify(
    rules: &[CompiledRule],
    keywords: &Keywords,
    sink: &dyn DiagnosticSink,
) -> Vec<Classification> {
    keywords
        .iter()
        .map(|keyword| classify_one(rules, keyword, sink))
        .collect()
}

/// Evaluate one keyword against every rule. A predicate that panics for this
/// keyword is reported and counts as no-match for that pair only.
pub(crate) fn classify_one(
    rules: &[CompiledRule],
    keyword: &str,
    sink: &dyn DiagnosticSink,
) -> Classification {
    let mut matched = Vec::new();
    for rule in rules {
        match catch_unwind(AssertUnwindSafe(|| rule.predicate().matches(keyword))) {
            Ok(true) => matched.push(rule.text().to_owned()),
            Ok(false) => {}
            Err(_) => sink.report(&Diagnostic::EvaluationFailed {
                rule: rule.text().to_owned(),
                keyword: keyword.to_owned(),
            }),
        }
    }
    Classification::new(keyword.to_owned(), matched)
}

pub(crate) fn classify_parallel(
    rules: &[CompiledRule],
    keywords: &Keywords,
    workers: Option<NonZeroUsize>,
    sink: &dyn DiagnosticSink,
) -> Vec<Classification> {
    let available = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let requested = workers.map_or(available, NonZeroUsize::get);
    let worker_count = requested.min(available).min(keywords.len());

    if keywords.len() < SEQUENTIAL_CUTOFF || worker_count <= 1 {
        return classify(rules, keywords, sink);
    }

    let batch_size = keywords.len().div_ceil(worker_count);
    let mut results = Vec::with_capacity(keywords.len());
    thread::scope(|scope| {
        let handles: Vec<_> = keywords
            .as_slice()
            .chunks(batch_size)
            .map(|batch| {
                scope.spawn(move || {
                    batch
                        .iter()
                        .map(|keyword| classify_one(rules, keyword, sink))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        // Batches rejoin in spawn order, so the merged output keeps the
        // original keyword order.
        for handle in handles {
            results.extend(handle.join().expect("classification worker panicked"));
        }
    });
    results
}
