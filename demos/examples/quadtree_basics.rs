// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build a small tree over kurbo rects, run all three query kinds, and
//! reclaim storage after removals.
//!
//! Run:
//! - `cargo run -p canopy_demos --example quadtree_basics`

use std::cell::RefCell;
use std::rc::Rc;

use canopy_quadtree::{Bounds, LooseQuadtree};
use kurbo::Rect;

fn main() {
    // Objects are plain kurbo rects owned by the caller; the tree reads them
    // through the extractor and stores only the indices.
    let store = Rc::new(RefCell::new(vec![
        Rect::new(0.0, 0.0, 200.0, 200.0),
        Rect::new(10.0, 10.0, 70.0, 70.0),
        Rect::new(40.0, 40.0, 160.0, 160.0),
        Rect::new(500.0, 500.0, 520.0, 520.0),
    ]));
    let extractor_store = store.clone();
    let mut tree = LooseQuadtree::new(move |id: &usize| Bounds::from(extractor_store.borrow()[*id]));

    for id in 0..store.borrow().len() {
        tree.insert(id);
    }
    println!("tree: {:?}", tree);
    println!("loose bounds: {:?}", tree.loose_bounds());

    let region = Bounds::from(Rect::new(30.0, 30.0, 180.0, 180.0));
    let overlapping: Vec<_> = tree.query_intersects(region).collect();
    let inside: Vec<_> = tree.query_inside(region).collect();
    let covering: Vec<_> = tree.query_contains(region).collect();
    println!("region {:?}", region);
    println!("  overlapping: {:?}", overlapping);
    println!("  fully inside: {:?}", inside);
    println!("  covering it: {:?}", covering);

    // Move the small box away and re-anchor it.
    store.borrow_mut()[1] = Rect::new(600.0, 600.0, 640.0, 640.0);
    tree.update(1);
    let overlapping: Vec<_> = tree.query_intersects(region).collect();
    println!("after moving box 1, overlapping: {:?}", overlapping);

    tree.remove(3);
    tree.remove(1);
    tree.force_cleanup();
    println!("after removals and cleanup: {:?}", tree);
}
