use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kvtable::{ChainingTable, OpenAddressingTable};

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("open_addressing_1k", |b| {
        b.iter(|| {
            let mut table = OpenAddressingTable::new();
            for key in 0..1_000i64 {
                table.insert(key, "value").unwrap();
            }
            black_box(table.len());
        });
    });

    group.bench_function("chaining_1k", |b| {
        b.iter(|| {
            let mut table = ChainingTable::new();
            for key in 0..1_000i64 {
                table.insert(key, "value").unwrap();
            }
            black_box(table.len());
        });
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    let mut open = OpenAddressingTable::new();
    let mut chained = ChainingTable::new();
    for key in 0..10_000i64 {
        open.insert(key * 13, "value").unwrap();
        chained.insert(key * 13, "value").unwrap();
    }

    group.bench_function("open_addressing_hit", |b| {
        let mut counter = 0i64;
        b.iter(|| {
            black_box(open.search((counter % 10_000) * 13));
            counter += 1;
        });
    });

    group.bench_function("chaining_hit", |b| {
        let mut counter = 0i64;
        b.iter(|| {
            black_box(chained.search((counter % 10_000) * 13));
            counter += 1;
        });
    });

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("open_addressing_insert_remove", |b| {
        let mut table = OpenAddressingTable::new();
        for key in 0..100i64 {
            table.insert(key, "value").unwrap();
        }

        let mut counter = 0i64;
        b.iter(|| {
            if counter % 2 == 0 {
                black_box(table.remove(counter % 100));
            } else {
                black_box(table.insert(counter % 100, "value").ok());
            }
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_churn);
criterion_main!(benches);
