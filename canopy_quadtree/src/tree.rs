// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The index container: placement, growth, removal, and lifecycle.

use core::fmt::Debug;
use core::hash::Hash;

use rustc_hash::FxHashMap;

use crate::arena::{Entry, NodeArena, NodeRef};
use crate::cursor::{ForwardCursor, FullCursor};
use crate::query::{Query, QueryKind};
use crate::types::{Bounds, Coordinate, Quadrant};

/// Maps an object token to its current rectangle.
///
/// The extractor must be deterministic for a given object state and free of
/// side effects. The tree calls it exactly once per
/// [`insert`](LooseQuadtree::insert) and once per
/// [`update`](LooseQuadtree::update), and never during removal or membership
/// checks. Plain closures `Fn(&O) -> Bounds<N>` implement it.
pub trait BoundsExtractor<N, O> {
    /// Current rectangle of `object`.
    fn bounds(&self, object: &O) -> Bounds<N>;
}

impl<N, O, F> BoundsExtractor<N, O> for F
where
    F: Fn(&O) -> Bounds<N>,
{
    fn bounds(&self, object: &O) -> Bounds<N> {
        self(object)
    }
}

/// Placement never descends past this depth, whatever the rectangle's size.
const MAX_DEPTH: usize = 64;

/// A loose quadtree over caller-owned objects.
///
/// The tree stores lightweight object tokens and reads their rectangles on
/// demand through a [`BoundsExtractor`]; it never owns or copies object data.
/// Each object is anchored at the deepest cell whose loose bound (the cell
/// scaled 2×) fully contains its rectangle, which lets region queries prune
/// whole subtrees while objects move freely across cell boundaries.
///
/// The root grows on demand: the first insertion seeds a cell around that
/// rectangle, and later insertions that fall outside re-parent the root under
/// ever larger cells until they fit. Removals leave empty nodes behind on
/// purpose; queries reclaim them opportunistically as they walk past, and
/// [`force_cleanup`](Self::force_cleanup) reclaims everything at once.
///
/// One owner mutates and queries the tree; there is no internal locking.
/// Several trees may index the same objects independently.
pub struct LooseQuadtree<N, O, X> {
    pub(crate) arena: NodeArena<N, O>,
    pub(crate) root: Option<NodeRef>,
    pub(crate) root_cell: Bounds<N>,
    locations: FxHashMap<O, NodeRef>,
    len: usize,
    extractor: X,
}

impl<N, O, X> LooseQuadtree<N, O, X>
where
    N: Coordinate,
    O: Copy + Eq + Hash,
    X: BoundsExtractor<N, O>,
{
    /// Create an empty tree reading object rectangles through `extractor`.
    pub fn new(extractor: X) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            root_cell: Bounds::new(N::zero(), N::zero(), N::zero(), N::zero()),
            locations: FxHashMap::default(),
            len: 0,
            extractor,
        }
    }

    /// Insert `object`, reading its rectangle through the extractor.
    ///
    /// Returns `true` for a fresh insertion. An already-present object is
    /// re-anchored to its current rectangle instead, exactly as
    /// [`update`](Self::update) would, and `false` is returned; duplicate
    /// inserts are absorbed, never doubled.
    pub fn insert(&mut self, object: O) -> bool {
        self.upsert(object)
    }

    /// Re-anchor `object` after its rectangle changed in place.
    ///
    /// Returns `true` when the object was already present. An unknown object
    /// is inserted as if by [`insert`](Self::insert) and `false` is returned.
    pub fn update(&mut self, object: O) -> bool {
        !self.upsert(object)
    }

    /// Detach `object`. Returns `false` for objects the tree does not hold,
    /// so removing twice (or removing something never inserted) is a no-op.
    ///
    /// Nodes emptied by removals are reclaimed lazily, during later queries
    /// or [`force_cleanup`](Self::force_cleanup), not here.
    pub fn remove(&mut self, object: O) -> bool {
        match self.locations.remove(&object) {
            Some(node) => {
                self.detach(object, node);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Whether `object` is currently stored.
    ///
    /// A table lookup only; the answer does not depend on the object's
    /// rectangle still matching what was indexed.
    pub fn contains(&self, object: &O) -> bool {
        self.locations.contains_key(object)
    }

    /// Number of stored objects. Maintained directly, never a tree walk.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A rectangle guaranteed to contain every stored rectangle: the root
    /// cell scaled to twice its extent. Zero bounds while the tree is empty.
    pub fn loose_bounds(&self) -> Bounds<N> {
        if self.root.is_some() {
            self.root_cell.loose()
        } else {
            Bounds::new(N::zero(), N::zero(), N::zero(), N::zero())
        }
    }

    /// Drop every node and entry at once.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.root = None;
        self.locations.clear();
        self.len = 0;
    }

    /// Walk the whole tree, free every subtree removals have emptied, shrink
    /// the root while it adds nothing, and release arena blocks that drained.
    ///
    /// Purely a storage operation: length, membership, and query results are
    /// unchanged. Safe to call at any time, including on an empty tree.
    pub fn force_cleanup(&mut self) {
        if let Some(root) = self.root {
            let mut cursor = FullCursor::start_at(root, self.root_cell);
            loop {
                let first = cursor.came_from().map_or(0, |q| q.idx() + 1);
                let mut descended = false;
                for &q in &Quadrant::ALL[first..] {
                    if self.arena.node(cursor.node()).child(q).is_some() {
                        cursor.descend(&self.arena, q);
                        descended = true;
                        break;
                    }
                }
                if descended {
                    continue;
                }
                if cursor.depth() == 0 {
                    break;
                }
                let finished = cursor.node();
                cursor.ascend();
                if self.arena.node(finished).is_empty() {
                    let q = cursor.came_from().expect("cursor just ascended");
                    self.arena.node_mut(cursor.node()).clear_child(q);
                    self.arena.free(finished);
                }
            }
            self.shrink_root();
        }
        self.arena.sweep();
    }

    /// Objects whose rectangle overlaps `region`.
    pub fn query_intersects(&mut self, region: Bounds<N>) -> Query<'_, N, O, X> {
        Query::new(self, region, QueryKind::Intersects)
    }

    /// Objects whose rectangle lies entirely inside `region`.
    pub fn query_inside(&mut self, region: Bounds<N>) -> Query<'_, N, O, X> {
        Query::new(self, region, QueryKind::Inside)
    }

    /// Objects whose rectangle fully covers `region`.
    pub fn query_contains(&mut self, region: Bounds<N>) -> Query<'_, N, O, X> {
        Query::new(self, region, QueryKind::Contains)
    }

    /// Shared insert/update path. Returns `true` when `object` was new.
    fn upsert(&mut self, object: O) -> bool {
        let bounds = self.extractor.bounds(&object);
        match self.locations.get(&object).copied() {
            Some(old) => {
                let anchor = self.place(&bounds);
                if anchor == old {
                    let node = self.arena.node_mut(old);
                    let entry = node
                        .entries
                        .iter_mut()
                        .find(|e| e.object == object)
                        .expect("location table points at the anchoring node");
                    entry.bounds = bounds;
                } else {
                    self.detach(object, old);
                    self.arena
                        .node_mut(anchor)
                        .entries
                        .push(Entry { object, bounds });
                    self.locations.insert(object, anchor);
                }
                false
            }
            None => {
                let anchor = self.place(&bounds);
                self.arena
                    .node_mut(anchor)
                    .entries
                    .push(Entry { object, bounds });
                self.locations.insert(object, anchor);
                self.len += 1;
                true
            }
        }
    }

    fn detach(&mut self, object: O, node: NodeRef) {
        let entries = &mut self.arena.node_mut(node).entries;
        let at = entries
            .iter()
            .position(|e| e.object == object)
            .expect("location table points at the anchoring node");
        entries.swap_remove(at);
    }

    /// Node the rectangle anchors at, creating the root, growing it, and
    /// creating path nodes as needed.
    fn place(&mut self, bounds: &Bounds<N>) -> NodeRef {
        if self.root.is_none() {
            self.root_cell = seed_cell(bounds);
            self.root = Some(self.arena.allocate());
        }
        while !self.root_cell.loose().contains(bounds) {
            self.grow(bounds);
        }
        let root = self.root.expect("root was seeded above");
        let mut cursor = ForwardCursor::start_at(root, self.root_cell);
        while cursor.depth() < MAX_DEPTH {
            let cell = cursor.cell();
            let q = cell.quadrant_of(bounds.center_x(), bounds.center_y());
            let child_cell = cell.quadrant(q);
            // Fully degenerate cells stop subdividing.
            if child_cell == cell || !child_cell.loose().contains(bounds) {
                break;
            }
            if self.arena.node(cursor.node()).child(q).is_none() {
                let child = self.arena.allocate();
                self.arena.node_mut(cursor.node()).set_child(q, child);
            }
            cursor.descend(&self.arena, q);
        }
        cursor.node()
    }

    /// Replace the root with one of doubled extent growing toward `target`,
    /// keeping the old root as the exactly matching quadrant.
    fn grow(&mut self, target: &Bounds<N>) {
        let cell = self.root_cell;
        let leftward = target.center_x() < cell.center_x();
        let upward = target.center_y() < cell.center_y();
        let left = if leftward {
            N::sub(cell.left, cell.width)
        } else {
            cell.left
        };
        let top = if upward {
            N::sub(cell.top, cell.height)
        } else {
            cell.top
        };
        // The old root keeps its cell, so it sits opposite the growth.
        let q = match (leftward, upward) {
            (true, true) => Quadrant::BottomRight,
            (false, true) => Quadrant::BottomLeft,
            (true, false) => Quadrant::TopRight,
            (false, false) => Quadrant::TopLeft,
        };
        let old_root = self.root.expect("grow is only reached with a root");
        let new_root = self.arena.allocate();
        self.arena.node_mut(new_root).set_child(q, old_root);
        self.root = Some(new_root);
        self.root_cell = Bounds::new(
            left,
            top,
            N::add(cell.width, cell.width),
            N::add(cell.height, cell.height),
        );
    }

    /// Promote lone children to root and drop an entirely empty root.
    fn shrink_root(&mut self) {
        while let Some(root) = self.root {
            let node = self.arena.node(root);
            if !node.entries.is_empty() {
                break;
            }
            if node.is_empty() {
                self.arena.free(root);
                self.root = None;
                break;
            }
            let Some((q, child)) = node.only_child() else {
                break;
            };
            self.arena.node_mut(root).clear_child(q);
            self.arena.free(root);
            self.root = Some(child);
            self.root_cell = self.root_cell.quadrant(q);
        }
    }
}

impl<N: Coordinate, O, X> Debug for LooseQuadtree<N, O, X> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LooseQuadtree")
            .field("len", &self.len)
            .field("has_root", &self.root.is_some())
            .field("root_cell", &self.root_cell)
            .field("arena", &self.arena)
            .finish_non_exhaustive()
    }
}

/// Initial root cell for a first rectangle: the rectangle scaled to twice its
/// extent, with degenerate axes widened so the cell can still split and
/// double.
fn seed_cell<N: Coordinate>(bounds: &Bounds<N>) -> Bounds<N> {
    let mut cell = bounds.loose();
    if !(N::zero() < cell.width) {
        cell.width = N::one();
    }
    if !(N::zero() < cell.height) {
        cell.height = N::one();
    }
    cell
}
