//! Insert and lookup benchmarks against the standard library collections.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ordhash_rs::{AvlTree, HashIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashMap};

fn generate_keys(n: usize) -> Vec<String> {
    let mut keys: Vec<String> = (0..n).map(|i| format!("book:{:08}", i)).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), size, |b, _| {
            b.iter(|| {
                let mut set: BTreeSet<String> = BTreeSet::new();
                for key in keys.iter() {
                    set.insert(key.clone());
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("AvlTree", size), size, |b, _| {
            b.iter(|| {
                let mut tree: AvlTree<String, _> = AvlTree::natural();
                for key in keys.iter() {
                    tree.insert(key.clone());
                }
                black_box(tree)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap", size), size, |b, _| {
            b.iter(|| {
                let mut map: HashMap<String, u64> = HashMap::new();
                for (i, key) in keys.iter().enumerate() {
                    map.insert(key.clone(), i as u64);
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashIndex", size), size, |b, _| {
            b.iter(|| {
                let mut index: HashIndex<String, u64> = HashIndex::new();
                for (i, key) in keys.iter().enumerate() {
                    index.put(key.clone(), i as u64);
                }
                black_box(index)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 100_000].iter() {
        let keys = generate_keys(*size);

        let set: BTreeSet<String> = keys.iter().cloned().collect();
        let mut tree: AvlTree<String, _> = AvlTree::natural();
        tree.bulk_load(keys.iter().cloned());
        let map: HashMap<String, u64> = keys.iter().cloned().zip(0..).collect();
        let index: HashIndex<String, u64> = keys.iter().cloned().zip(0..).collect();

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), size, |b, _| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys.iter() {
                    hits += usize::from(set.contains(key));
                }
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("AvlTree", size), size, |b, _| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys.iter() {
                    hits += usize::from(tree.contains(key));
                }
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashMap", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in keys.iter() {
                    if let Some(v) = map.get(key) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("HashIndex", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                for key in keys.iter() {
                    if let Some(v) = index.get(key.as_str()) {
                        sum += v;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    let keys = generate_keys(10_000);

    group.bench_function("AvlTree", |b| {
        b.iter_batched(
            || {
                let mut tree: AvlTree<String, _> = AvlTree::natural();
                tree.bulk_load(keys.iter().cloned());
                tree
            },
            |mut tree| {
                for key in keys.iter() {
                    tree.delete(key);
                }
                black_box(tree)
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("HashIndex", |b| {
        b.iter_batched(
            || keys.iter().cloned().zip(0u64..).collect::<HashIndex<String, u64>>(),
            |mut index| {
                for key in keys.iter() {
                    index.remove(key.as_str());
                }
                black_box(index)
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_delete);
criterion_main!(benches);
