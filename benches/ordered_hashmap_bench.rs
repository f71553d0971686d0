use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ordered_hashmap::OrderedHashMap;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(n: usize, seed: u64) -> (OrderedHashMap<u64>, Vec<String>) {
    let mut m = OrderedHashMap::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        m.append(Some(k.as_str()), i as u64).unwrap();
    }
    (m, keys)
}

fn bench_append_100k(c: &mut Criterion) {
    c.bench_function("ordered::append_100k", |b| {
        b.iter_batched(
            || lcg(1).take(100_000).map(key).collect::<Vec<_>>(),
            |keys| {
                let mut m = OrderedHashMap::new();
                for (i, k) in keys.iter().enumerate() {
                    let _ = m.append(Some(k.as_str()), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_append_generated_100k(c: &mut Criterion) {
    c.bench_function("ordered::append_generated_100k", |b| {
        b.iter_batched(
            OrderedHashMap::<u64>::new,
            |mut m| {
                for i in 0..100_000u64 {
                    let _ = m.append(None, i).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_prepend_5k(c: &mut Criterion) {
    c.bench_function("ordered::prepend_5k", |b| {
        b.iter_batched(
            || lcg(2).take(5_000).map(key).collect::<Vec<_>>(),
            |keys| {
                let mut m = OrderedHashMap::new();
                for (i, k) in keys.iter().enumerate() {
                    let _ = m.prepend(Some(k.as_str()), i as u64).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_middle_1k_of_10k(c: &mut Criterion) {
    c.bench_function("ordered::insert_middle_1k_of_10k", |b| {
        b.iter_batched(
            || filled(10_000, 3),
            |(mut m, _)| {
                for (i, x) in lcg(4).take(1_000).enumerate() {
                    let at = (x as usize) % (m.len() + 1);
                    let _ = m.insert_at(at, i as u64, Some(key(x).as_str()));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_by_key_hit_100k(c: &mut Criterion) {
    let (m, keys) = filled(100_000, 5);
    c.bench_function("ordered::get_by_key_hit_100k", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(m.get_by_key(k));
            }
        })
    });
}

fn bench_get_by_index_100k(c: &mut Criterion) {
    let (m, _) = filled(100_000, 6);
    c.bench_function("ordered::get_by_index_100k", |b| {
        b.iter(|| {
            for i in 0..m.len() {
                black_box(m.get_by_index(i));
            }
        })
    });
}

fn bench_delete_random_1k_of_10k(c: &mut Criterion) {
    c.bench_function("ordered::delete_random_1k_of_10k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = filled(10_000, 7);
                let n = keys.len();
                let mut s = 0x9e3779b97f4a7c15u64;
                let to_delete: Vec<String> = (0..1_000)
                    .map(|_| {
                        s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                        keys[(s as usize) % n].clone()
                    })
                    .collect();
                (m, to_delete)
            },
            |(mut m, to_delete)| {
                for k in &to_delete {
                    black_box(m.delete_by_key(k));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn configure() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
}

criterion_group! {
    name = benches;
    config = configure();
    targets = bench_append_100k,
        bench_append_generated_100k,
        bench_prepend_5k,
        bench_insert_middle_1k_of_10k,
        bench_get_by_key_hit_100k,
        bench_get_by_index_100k,
        bench_delete_random_1k_of_10k
}
criterion_main!(benches);
