//! Canonicalization and Expansion Benchmark
//!
//! Measures construction of wide canonical sums and products, multinomial
//! expansion of powers of sums, and distribution of products of sums.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symb_canon::{Expr, make_power, make_product, make_sum, multinomial_coefficients};

// =============================================================================
// Expression Generators
// =============================================================================

fn variables(n: usize) -> Vec<Expr> {
    (0..n).map(|i| Expr::symbol(format!("x{i}"))).collect()
}

/// `Σ (i+1)·x_(i mod v)^(i mod 4 + 1)`, with many like terms to combine
fn mixed_terms(n: usize, v: usize) -> Vec<Expr> {
    let vars = variables(v);
    (0..n)
        .map(|i| {
            let exp = Expr::integer((i % 4 + 1) as i64);
            make_product([Expr::integer(i as i64 + 1), make_power(&vars[i % v], &exp)])
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical");

    for n in [100, 1000] {
        let terms = mixed_terms(n, 10);
        group.bench_with_input(BenchmarkId::new("make_sum", n), &terms, |b, terms| {
            b.iter(|| make_sum(black_box(terms.iter().cloned())));
        });

        let factors = variables(n);
        group.bench_with_input(BenchmarkId::new("make_product", n), &factors, |b, factors| {
            b.iter(|| make_product(black_box(factors.iter().cloned())));
        });
    }

    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");
    group.sample_size(20);

    for (m, n) in [(2, 10), (3, 8), (4, 6)] {
        let base = make_sum(variables(m));
        let e = make_power(&base, &Expr::integer(n));
        group.bench_function(format!("power_of_sum/{m}_vars_pow_{n}"), |b| {
            b.iter(|| black_box(&e).expand());
        });
    }

    let vars = variables(6);
    let product = make_product(
        vars.windows(2)
            .map(|w| make_sum([w[0].clone(), w[1].clone(), Expr::integer(1)])),
    );
    group.bench_function("product_of_sums/5_factors", |b| {
        b.iter(|| black_box(&product).expand());
    });

    group.bench_function("multinomial_coefficients/4_10", |b| {
        b.iter(|| multinomial_coefficients(black_box(4), black_box(10)));
    });

    group.finish();
}

criterion_group!(benches, bench_canonical, bench_expand);

criterion_main!(benches);
