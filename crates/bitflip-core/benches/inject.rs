use bitflip_core::{FaultInjector, InjectorConfig, StopPolicy};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use num_bigint::BigUint;
use num_traits::One;

fn bench_inject(c: &mut Criterion) {
    let value = (BigUint::one() << 256u32) - BigUint::one();
    let mut group = c.benchmark_group("inject_u256");
    for rate in [0.001, 0.01, 0.5] {
        let cfg =
            InjectorConfig::new(StopPolicy::IterationLimit(u64::MAX), vec![rate]).with_seed(1);
        group.bench_with_input(BenchmarkId::from_parameter(rate), &cfg, |b, cfg| {
            // Fresh injector per call so recorded events don't pile up.
            b.iter_batched(
                || FaultInjector::with_config(cfg.clone()).unwrap(),
                |mut inj| {
                    let mut flips = 0u64;
                    let out = inj.inject(black_box(&value), &mut flips).unwrap();
                    black_box(out.into_value())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_inject);
criterion_main!(benches);
