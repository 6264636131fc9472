use criterion::{black_box, criterion_group, criterion_main, Criterion};
use margin_sim::core::params::{ContractType, SimulationParameters};
use margin_sim::core::series::quantize_price;
use margin_sim::simulation::margin::MarginEngine;
use margin_sim::simulation::path::generate_spot_path_with_seed;
use rust_decimal_macros::dec;

fn params(days: u32) -> SimulationParameters {
    SimulationParameters::new(100.0, 0.01, days, 0.0001, 100, dec!(1000), dec!(800)).unwrap()
}

fn bench_path_generation(c: &mut Criterion) {
    let p = params(252);

    c.bench_function("path_252_days", |b| {
        b.iter(|| generate_spot_path_with_seed(black_box(&p), black_box(42)))
    });
}

fn bench_margin_roll_1y(c: &mut Criterion) {
    let p = params(252);
    let series = generate_spot_path_with_seed(&p, 42);
    let inception = quantize_price(p.initial_spot());

    c.bench_function("margin_roll_252_days", |b| {
        b.iter(|| {
            MarginEngine::simulate(
                ContractType::Futures,
                black_box(inception),
                black_box(&series),
                black_box(&p),
            )
        })
    });
}

fn bench_margin_roll_20y(c: &mut Criterion) {
    let p = params(5040);
    let series = generate_spot_path_with_seed(&p, 42);
    let inception = quantize_price(p.initial_spot());

    c.bench_function("margin_roll_5040_days", |b| {
        b.iter(|| {
            MarginEngine::simulate(
                ContractType::Futures,
                black_box(inception),
                black_box(&series),
                black_box(&p),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_path_generation,
    bench_margin_roll_1y,
    bench_margin_roll_20y
);
criterion_main!(benches);
