// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving entities.
//!
//! A few hundred entities drift around a large world; every frame updates
//! their anchors and culls against a viewport, with a periodic cleanup pass.
//!
//! Run:
//! - `cargo run -p canopy_demos --example moving_entities`

use std::cell::RefCell;
use std::rc::Rc;

use canopy_quadtree::{Bounds, LooseQuadtree};

const WORLD: f64 = 4096.0;
const ENTITIES: usize = 400;
const FRAMES: usize = 120;

struct Rng(u64);

impl Rng {
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

fn main() {
    let mut rng = Rng(0x5EED_CA11_AB1E_0001);
    let mut velocities = Vec::with_capacity(ENTITIES);
    let mut rects = Vec::with_capacity(ENTITIES);
    for _ in 0..ENTITIES {
        let size = 4.0 + rng.next_f64() * 60.0;
        rects.push(Bounds::new(
            rng.next_f64() * (WORLD - size),
            rng.next_f64() * (WORLD - size),
            size,
            size,
        ));
        velocities.push((
            (rng.next_f64() - 0.5) * 16.0,
            (rng.next_f64() - 0.5) * 16.0,
        ));
    }

    let store = Rc::new(RefCell::new(rects));
    let extractor_store = store.clone();
    let mut tree = LooseQuadtree::new(move |id: &usize| extractor_store.borrow()[*id]);
    for id in 0..ENTITIES {
        tree.insert(id);
    }

    let viewport = Bounds::new(WORLD / 2.0 - 400.0, WORLD / 2.0 - 300.0, 800.0, 600.0);
    let mut visible_total = 0_usize;
    for frame in 0..FRAMES {
        for id in 0..ENTITIES {
            let (mut vx, mut vy) = velocities[id];
            {
                let mut rects = store.borrow_mut();
                let r = rects[id];
                let mut left = r.left + vx;
                let mut top = r.top + vy;
                // Bounce off the world edges.
                if left < 0.0 || left + r.width > WORLD {
                    vx = -vx;
                    left = r.left;
                }
                if top < 0.0 || top + r.height > WORLD {
                    vy = -vy;
                    top = r.top;
                }
                rects[id] = Bounds::new(left, top, r.width, r.height);
            }
            velocities[id] = (vx, vy);
            tree.update(id);
        }

        let visible = tree.query_intersects(viewport).count();
        visible_total += visible;
        if frame % 30 == 0 {
            println!("frame {:3}: {} entities in view, {:?}", frame, visible, tree);
        }
        if frame % 40 == 39 {
            tree.force_cleanup();
        }
    }
    println!(
        "average visible per frame: {}",
        visible_total / FRAMES
    );
}
