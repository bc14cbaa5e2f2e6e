// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_quadtree --heading-base-level=0

//! Canopy Quadtree: a generic 2D loose quadtree.
//!
//! Canopy Quadtree indexes axis-aligned rectangles that belong to caller-owned
//! objects and answers region queries over them.
//!
//! - Insert, update, and remove objects whose rectangles may sit anywhere and
//!   at any scale; the root cell grows (and shrinks back) on demand.
//! - Query by region: overlap, fully-inside, and fully-covers, each as a lazy
//!   iterator that prunes whole subtrees and never collects results up front.
//! - Object rectangles are read on demand through a [`BoundsExtractor`]; the
//!   tree stores only lightweight tokens and never copies object data.
//!
//! It is generic over the scalar type and does not depend on any geometry
//! crate. "Loose" means each cell claims twice its own extent, so an object is
//! anchored at the deepest cell whose doubled bound still contains it; objects
//! straddling cell edges sink to their natural depth instead of piling up near
//! the root.
//!
//! # Example
//!
//! ```rust
//! use canopy_quadtree::{Bounds, LooseQuadtree};
//!
//! // Objects live outside the tree; tokens index into this slice.
//! let boxes = [
//!     Bounds::new(0.0_f64, 0.0, 30.0, 20.0),
//!     Bounds::new(100.0, 80.0, 8.0, 8.0),
//! ];
//! let mut tree = LooseQuadtree::new(|id: &usize| boxes[*id]);
//! assert!(tree.insert(0));
//! assert!(tree.insert(1));
//! assert_eq!(tree.len(), 2);
//!
//! let hits: Vec<_> = tree
//!     .query_intersects(Bounds::new(-10.0, -10.0, 50.0, 50.0))
//!     .collect();
//! assert_eq!(hits, vec![0]);
//! ```
//!
//! Removals deliberately leave empty cells behind: queries reclaim them as
//! they walk past, and [`LooseQuadtree::force_cleanup`] compacts everything at
//! once. Neither changes what the tree answers.
//!
//! ## Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates, and rectangle
//! extents must not be negative (zero is fine). Integer arithmetic saturates
//! near the scalar's limits.

mod arena;
mod cursor;
pub mod query;
pub mod tree;
pub mod types;

#[cfg(feature = "kurbo")]
mod interop;

pub use query::Query;
pub use tree::{BoundsExtractor, LooseQuadtree};
pub use types::{Bounds, Coordinate};
