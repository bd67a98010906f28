use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kvcache::LruCache;

fn bench_cached_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_hit", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for key in 0..100i64 {
            cache.set(key, key).unwrap();
        }

        let mut counter = 0i64;
        b.iter(|| {
            black_box(cache.get(counter % 100));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("50_get_50_set", |b| {
        let mut cache = LruCache::new(1000).unwrap();
        for key in 0..100i64 {
            cache.set(key, key).unwrap();
        }

        let mut counter = 0i64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(cache.get(counter % 100));
            } else {
                black_box(cache.set(counter % 2_000, counter).ok());
            }
            counter += 1;
        });
    });

    group.finish();
}

fn bench_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_evicting", |b| {
        let mut cache = LruCache::new(10).unwrap(); // Small cache
        let mut counter = 0i64;
        b.iter(|| {
            // Every set is a new key, so every set evicts
            black_box(cache.set(counter, counter).ok());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cached_get, bench_mixed_50_50, bench_eviction);
criterion_main!(benches);
