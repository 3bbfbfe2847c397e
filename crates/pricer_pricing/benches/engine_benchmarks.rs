//! Criterion benchmarks for the lattice and Monte Carlo engines.
//!
//! Benchmarks:
//! - CRR lattice valuation for increasing step counts
//! - Sequential vs parallel chunked simulation
//! - Full result vs streaming summary

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::{OptionType, PricingParameters};
use pricer_models::compile_payoff;
use pricer_pricing::lattice::price_binomial;
use pricer_pricing::mc::{MonteCarloConfig, MonteCarloPricer};

/// Benchmark European and American lattices.
fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("binomial_lattice");

    for steps in [50, 200, 1_000] {
        let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, steps).with_strike(100.0);

        group.bench_with_input(BenchmarkId::new("european_call", steps), &params, |b, p| {
            b.iter(|| price_binomial(black_box(p), OptionType::Call, false, 0.0).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("american_put", steps), &params, |b, p| {
            b.iter(|| price_binomial(black_box(p), OptionType::Put, true, 0.0).unwrap());
        });
    }

    group.finish();
}

fn pricer(parallel: bool) -> MonteCarloPricer {
    let config = MonteCarloConfig::builder()
        .seed(42)
        .chunk_size(4_096)
        .parallel(parallel)
        .build()
        .unwrap();
    MonteCarloPricer::new(config).unwrap()
}

/// Benchmark sequential and parallel simulation of a compiled payoff.
fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);

    let payoff = compile_payoff("max(sum(path) / len(path) - 100, 0)").unwrap();
    let params = PricingParameters::new(100.0, 1.0, 0.05, 0.2, 50).with_paths(50_000);

    for parallel in [false, true] {
        let pricer = pricer(parallel);
        let label = if parallel { "parallel" } else { "sequential" };

        group.bench_function(BenchmarkId::new("summary", label), |b| {
            b.iter(|| pricer.price_summary(black_box(&params), &payoff).unwrap());
        });
        group.bench_function(BenchmarkId::new("full_result", label), |b| {
            b.iter(|| pricer.price(black_box(&params), &payoff).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lattice, bench_monte_carlo);
criterion_main!(benches);
