//! Criterion micro-benchmarks for the index-linked containers.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tessera_bench::key_sequence;
use tessera_collections::{GrowableArray, IndexedList, IndexedQueue, IntKeyHashMap};

/// Insert 10K well-spread keys into an empty map, growing as needed.
fn bench_hashmap_insert_10k(c: &mut Criterion) {
    let keys = key_sequence(42, 10_000);
    c.bench_function("hashmap_insert_10k", |b| {
        b.iter(|| {
            let mut map: IntKeyHashMap<u64, u64> = IntKeyHashMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            black_box(map.len());
        });
    });
}

/// Look up 10K present keys.
fn bench_hashmap_get_10k(c: &mut Criterion) {
    let keys = key_sequence(42, 10_000);
    let map: IntKeyHashMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    c.bench_function("hashmap_get_10k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &k in &keys {
                sum = sum.wrapping_add(*map.get(k).unwrap());
            }
            black_box(sum);
        });
    });
}

/// Remove every key of a 10K map, exercising chain compaction.
fn bench_hashmap_remove_10k(c: &mut Criterion) {
    let keys = key_sequence(7, 10_000);
    let full: IntKeyHashMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
    c.bench_function("hashmap_remove_10k", |b| {
        b.iter(|| {
            let mut map = full.clone();
            for &k in &keys {
                black_box(map.remove(k));
            }
        });
    });
}

/// Push 10K values onto a growable array.
fn bench_growable_push_10k(c: &mut Criterion) {
    c.bench_function("growable_push_10k", |b| {
        b.iter(|| {
            let mut array = GrowableArray::new();
            for i in 0..10_000u32 {
                array.push_back(i);
            }
            black_box(array.len());
        });
    });
}

/// Interleave erase-in-the-middle and push on a 1K list so freed nodes
/// are recycled.
fn bench_list_recycle_1k(c: &mut Criterion) {
    c.bench_function("list_recycle_1k", |b| {
        let mut list: IndexedList<u32> = (0..1_000).fold(IndexedList::new(), |mut l, i| {
            l.push_back(i);
            l
        });
        b.iter(|| {
            for i in 0..100u32 {
                let value = list.erase_index(500);
                list.push_back(value.wrapping_add(i));
            }
            black_box(list.len());
        });
    });
}

/// Steady-state push/pop on a queue.
fn bench_queue_push_pop_10k(c: &mut Criterion) {
    c.bench_function("queue_push_pop_10k", |b| {
        let mut queue = IndexedQueue::with_capacity(64);
        b.iter(|| {
            for i in 0..10_000u32 {
                queue.push(i);
                if i % 2 == 1 {
                    black_box(queue.pop());
                    black_box(queue.pop());
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_hashmap_insert_10k,
    bench_hashmap_get_10k,
    bench_hashmap_remove_10k,
    bench_growable_push_10k,
    bench_list_recycle_1k,
    bench_queue_push_pop_10k
);
criterion_main!(benches);
