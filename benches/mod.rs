use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    price_index::register_benchmarks,
    level2_view::register_benchmarks
);
criterion_main!(benches);
