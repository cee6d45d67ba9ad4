//! Benchmarks for pallet packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use palletpack_engine::{BoxSpec, Config, Packer, PalletSpec, Solver, Strategy};

fn euro_pallet() -> PalletSpec {
    PalletSpec::new(1.2, 0.8, 2.0, 1000.0).with_base_height(0.15)
}

fn mixed_load() -> Vec<BoxSpec> {
    vec![
        BoxSpec::new("A", 0.4, 0.3, 0.2).with_weight(5.0).with_quantity(20),
        BoxSpec::new("B", 0.6, 0.4, 0.3).with_weight(12.0).with_quantity(8),
        BoxSpec::new("C", 0.2, 0.2, 0.2).with_weight(2.0).with_quantity(15),
    ]
}

fn packer_benchmark(c: &mut Criterion) {
    let uniform = vec![BoxSpec::new("A", 0.4, 0.3, 0.2)
        .with_weight(5.0)
        .with_quantity(24)];
    let mixed = mixed_load();

    let mut packer = Packer::new(euro_pallet()).unwrap();
    c.bench_function("pack_24_uniform_boxes", |b| {
        b.iter(|| black_box(packer.solve(black_box(&uniform))))
    });
    c.bench_function("pack_43_mixed_boxes", |b| {
        b.iter(|| black_box(packer.solve(black_box(&mixed))))
    });

    let mut group = c.benchmark_group("strategy");
    for strategy in Strategy::standard_order() {
        let config = Config::default().with_strategy(strategy);
        let mut packer = Packer::with_config(euro_pallet(), config).unwrap();
        group.bench_function(strategy.name(), |b| {
            b.iter(|| black_box(packer.solve(black_box(&mixed))))
        });
    }
    group.finish();
}

criterion_group!(benches, packer_benchmark);
criterion_main!(benches);
