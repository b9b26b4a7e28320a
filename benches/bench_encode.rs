mod utils;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use splicemap::SourceMap;
use utils::generate_mappings;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn benchmark_encode(c: &mut Criterion) {
    let cases = [
        ("small", generate_mappings(20, 40)),
        ("large", generate_mappings(50, 4000)),
    ];
    for (name, input) in &cases {
        let mut bg = c.benchmark_group(format!("encode({name})"));
        bg.bench_with_input("raw", input, |b, input| {
            b.iter(|| {
                let sm = SourceMap::new(input.as_str(), 3, 11);
                black_box(sm.to_vec().unwrap());
            })
        });
        bg.bench_with_input("decode+encode", input, |b, input| {
            b.iter(|| {
                let sm = SourceMap::new(input.as_str(), 3, 11);
                let mappings = sm.into_mappings().unwrap();
                black_box(mappings.to_string().unwrap());
            })
        });
        bg.bench_with_input("merge", input, |b, input| {
            b.iter(|| {
                let mut sm = SourceMap::new(input.as_str(), 3, 11);
                sm.add_mappings(input, 3, 11, (1000, 0)).unwrap();
                black_box(sm.to_vec().unwrap());
            })
        });
    }
}

criterion_group!(encode, benchmark_encode);
criterion_main!(encode);
