// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use std::cell::RefCell;
use std::rc::Rc;

use canopy_quadtree::{Bounds, LooseQuadtree};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

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

fn to_rstar_rects(v: &[Bounds<f64>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| {
            Rectangle::from_corners(
                [r.left, r.top],
                [r.left + r.width, r.top + r.height],
            )
        })
        .collect()
}

fn bench_quadtree_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree_external_compare");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let query = Bounds::new(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("canopy_build_query_n{}", n), |b| {
            b.iter_batched(
                || Rc::new(RefCell::new(rects.clone())),
                |store| {
                    let extractor_store = store.clone();
                    let mut tree =
                        LooseQuadtree::new(move |id: &usize| extractor_store.borrow()[*id]);
                    let count = store.borrow().len();
                    for id in 0..count {
                        let _ = tree.insert(id);
                    }
                    let hits: usize = tree.query_intersects(query).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [query.left, query.top],
                        [query.left + query.width, query.top + query.height],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_quadtree_external_compare);
criterion_main!(benches);
