// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Canopy Quadtree: insert, move, remove, and query.

use std::cell::RefCell;
use std::rc::Rc;

use canopy_quadtree::{Bounds, LooseQuadtree};

fn main() {
    let store = Rc::new(RefCell::new(vec![
        Bounds::new(0_i64, 0, 10, 10),
        Bounds::new(5, 5, 15, 15),
    ]));
    let extractor_store = store.clone();
    let mut tree = LooseQuadtree::new(move |id: &usize| extractor_store.borrow()[*id]);
    tree.insert(0);
    tree.insert(1);

    // Move box 0 to the right and re-anchor it.
    store.borrow_mut()[0] = Bounds::new(20, 0, 10, 10);
    tree.update(0);

    let hits: Vec<_> = tree.query_intersects(Bounds::new(4, 4, 4, 4)).collect();
    println!("hits around (4,4): {:?}", hits);

    tree.remove(1);
    tree.force_cleanup();
    println!("after removal: {:?}", tree);
}
