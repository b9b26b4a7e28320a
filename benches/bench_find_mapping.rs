mod utils;

use criterion::{criterion_group, criterion_main, Criterion};
use splicemap::{Mappings, Position};
use utils::generate_mappings;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn benchmark_find_mapping(c: &mut Criterion) {
    let input = generate_mappings(50, 4000);
    let mappings = Mappings::parse(&input, 3, 11).unwrap();

    let samples: Vec<Position> = (0..64).map(|i| Position::new(17, 9000 + i * 5)).collect();

    {
        let mut bg = c.benchmark_group("find_mapping(one)");
        let pos = samples[0];
        bg.bench_function("stateless", |b| {
            b.iter(|| {
                assert!(mappings.find_mapping(pos).is_some());
            })
        });
        bg.bench_function("finder", |b| {
            b.iter(|| {
                assert!(mappings.finder().find_mapping(pos).is_some());
            })
        });
    }
    {
        let mut bg = c.benchmark_group("find_mapping(sequential)");
        bg.bench_function("stateless", |b| {
            b.iter(|| {
                for &pos in &samples {
                    assert!(mappings.find_mapping(pos).is_some());
                }
            })
        });
        bg.bench_function("finder", |b| {
            b.iter(|| {
                let finder = mappings.finder();
                for &pos in &samples {
                    assert!(finder.find_mapping(pos).is_some());
                }
            })
        });
    }
}

criterion_group!(find_mapping, benchmark_find_mapping);
criterion_main!(find_mapping);
