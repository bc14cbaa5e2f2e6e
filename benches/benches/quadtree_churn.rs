// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use canopy_quadtree::{Bounds, LooseQuadtree};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

type Store = Rc<RefCell<Vec<Bounds<f64>>>>;

fn tree_over(store: Store) -> LooseQuadtree<f64, usize, impl Fn(&usize) -> Bounds<f64>> {
    LooseQuadtree::new(move |id: &usize| store.borrow()[*id])
}

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Bounds<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Bounds::new(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, max_w: f64, max_h: f64, rect_w: f64, rect_h: f64) -> Vec<Bounds<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (max_w - rect_w).max(1.0);
        let y0 = rng.next_f64() * (max_h - rect_h).max(1.0);
        out.push(Bounds::new(x0, y0, rect_w, rect_h));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Bounds<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Bounds::new(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn bench_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_insert_query_n{}", n), |b| {
            b.iter_batched(
                || Rc::new(RefCell::new(rects.clone())),
                |store| {
                    let mut tree = tree_over(store.clone());
                    let count = store.borrow().len();
                    for id in 0..count {
                        let _ = tree.insert(id);
                    }
                    let hits: usize = tree
                        .query_intersects(Bounds::new(100.0, 100.0, 400.0, 400.0))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }

    let rects = gen_random_rects(4096, 2000.0, 2000.0, 16.0, 16.0);
    group.bench_function("random_insert_query_4096", |b| {
        b.iter_batched(
            || Rc::new(RefCell::new(rects.clone())),
            |store| {
                let mut tree = tree_over(store.clone());
                let count = store.borrow().len();
                for id in 0..count {
                    let _ = tree.insert(id);
                }
                let hits: usize = tree
                    .query_intersects(Bounds::new(500.0, 500.0, 600.0, 600.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });

    let rects = gen_clustered_rects(32, 128, 120.0);
    group.bench_function("clustered_insert_query", |b| {
        b.iter_batched(
            || Rc::new(RefCell::new(rects.clone())),
            |store| {
                let mut tree = tree_over(store.clone());
                let count = store.borrow().len();
                for id in 0..count {
                    let _ = tree.insert(id);
                }
                let hits: usize = tree
                    .query_intersects(Bounds::new(0.0, 0.0, 1000.0, 1000.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    let rects = gen_random_rects(2048, 2000.0, 2000.0, 16.0, 16.0);
    group.throughput(Throughput::Elements(2048));
    group.bench_function("update_all_then_query", |b| {
        b.iter_batched(
            || {
                let store: Store = Rc::new(RefCell::new(rects.clone()));
                let mut tree = tree_over(store.clone());
                let count = store.borrow().len();
                for id in 0..count {
                    let _ = tree.insert(id);
                }
                (store, tree, Rng::new(0xFACE_FEED_CAFE_BABE))
            },
            |(store, mut tree, mut rng)| {
                let count = store.borrow().len();
                for id in 0..count {
                    let dx = (rng.next_f64() - 0.5) * 50.0;
                    let dy = (rng.next_f64() - 0.5) * 50.0;
                    {
                        let mut rects = store.borrow_mut();
                        let r = rects[id];
                        rects[id] = Bounds::new(r.left + dx, r.top + dy, r.width, r.height);
                    }
                    let _ = tree.update(id);
                }
                let hits: usize = tree
                    .query_intersects(Bounds::new(500.0, 500.0, 600.0, 600.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("remove_half_cleanup_reinsert", |b| {
        b.iter_batched(
            || {
                let store: Store = Rc::new(RefCell::new(rects.clone()));
                let mut tree = tree_over(store.clone());
                let count = store.borrow().len();
                for id in 0..count {
                    let _ = tree.insert(id);
                }
                (store, tree)
            },
            |(store, mut tree)| {
                let count = store.borrow().len();
                for id in (0..count).step_by(2) {
                    let _ = tree.remove(id);
                }
                tree.force_cleanup();
                for id in (0..count).step_by(2) {
                    let _ = tree.insert(id);
                }
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build_query, bench_churn);
criterion_main!(benches);
