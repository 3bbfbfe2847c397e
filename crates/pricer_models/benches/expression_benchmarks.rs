//! Criterion benchmarks for payoff compilation and evaluation.
//!
//! Compilation happens once per pricing request; evaluation runs once per
//! simulated path, so the latter dominates Monte Carlo cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_models::expression::compile_payoff;

const PAYOFFS: [(&str, &str); 4] = [
    ("vanilla_call", "max(price - 100, 0)"),
    ("asian_call", "max(sum(path) / len(path) - 100, 0)"),
    ("lookback", "max(path) - min(path)"),
    ("digital_barrier", "1 if min(path[1:]) > 90 and price > 100 else 0"),
];

/// Generate a deterministic path of the given length.
fn generate_path(steps: usize) -> Vec<f64> {
    (0..=steps)
        .map(|i| 100.0 + 10.0 * (i as f64 * 0.1).sin())
        .collect()
}

/// Benchmark lex + parse + validate.
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("payoff_compile");

    for (name, source) in PAYOFFS {
        group.bench_with_input(BenchmarkId::new("compile", name), source, |b, source| {
            b.iter(|| compile_payoff(black_box(source)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark evaluation against paths of increasing length.
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("payoff_evaluate");

    for steps in [1, 50, 252] {
        let path = generate_path(steps);
        let terminal = path[path.len() - 1];

        for (name, source) in PAYOFFS {
            let payoff = compile_payoff(source).unwrap();
            group.bench_with_input(BenchmarkId::new(name, steps), &path, |b, path| {
                b.iter(|| payoff.evaluate(black_box(terminal), black_box(path)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_evaluate);
criterion_main!(benches);
