// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Non-recursive traversal cursors over the node graph.
//!
//! Placement only ever walks down, so it uses the cheap forward cursor. The
//! cleanup and query walks have to come back to a parent and know which
//! subtree they just finished; they use the full cursor, which keeps an
//! explicit frame per level instead of recursing.

use crate::arena::{NodeArena, NodeRef};
use crate::types::{Bounds, Coordinate, Quadrant};

/// Descend-only cursor; each child cell is derived from the parent cell on
/// the way down.
pub(crate) struct ForwardCursor<N> {
    node: NodeRef,
    cell: Bounds<N>,
    depth: usize,
}

impl<N: Coordinate> ForwardCursor<N> {
    pub(crate) fn start_at(node: NodeRef, cell: Bounds<N>) -> Self {
        Self {
            node,
            cell,
            depth: 0,
        }
    }

    #[inline]
    pub(crate) fn node(&self) -> NodeRef {
        self.node
    }

    #[inline]
    pub(crate) fn cell(&self) -> Bounds<N> {
        self.cell
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Step into an existing child. Callers create missing children first;
    /// descending into an absent child is a bug.
    pub(crate) fn descend<O>(&mut self, arena: &NodeArena<N, O>, q: Quadrant) {
        let child = arena
            .node(self.node)
            .child(q)
            .expect("descend into absent child");
        self.cell = self.cell.quadrant(q);
        self.node = child;
        self.depth += 1;
    }
}

struct Frame<N> {
    node: NodeRef,
    cell: Bounds<N>,
    entered: Quadrant,
}

/// Cursor that can also climb back up.
///
/// Every level is restored exactly from the frame stack rather than being
/// recomputed; a node created mid-walk therefore reports the same cell on the
/// way up as it did on the way down.
pub(crate) struct FullCursor<N> {
    frames: Vec<Frame<N>>,
    node: NodeRef,
    cell: Bounds<N>,
    came_from: Option<Quadrant>,
}

impl<N: Coordinate> FullCursor<N> {
    pub(crate) fn start_at(node: NodeRef, cell: Bounds<N>) -> Self {
        Self {
            frames: Vec::new(),
            node,
            cell,
            came_from: None,
        }
    }

    #[inline]
    pub(crate) fn node(&self) -> NodeRef {
        self.node
    }

    #[inline]
    pub(crate) fn cell(&self) -> Bounds<N> {
        self.cell
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Quadrant the cursor most recently ascended out of; `None` right after
    /// `start_at` or a descent.
    #[inline]
    pub(crate) fn came_from(&self) -> Option<Quadrant> {
        self.came_from
    }

    /// Step into an existing child, remembering where we came in from.
    pub(crate) fn descend<O>(&mut self, arena: &NodeArena<N, O>, q: Quadrant) {
        let child = arena
            .node(self.node)
            .child(q)
            .expect("descend into absent child");
        self.frames.push(Frame {
            node: self.node,
            cell: self.cell,
            entered: q,
        });
        self.node = child;
        self.cell = self.cell.quadrant(q);
        self.came_from = None;
    }

    /// Climb one level; ascending above the start node is a bug.
    pub(crate) fn ascend(&mut self) {
        let frame = self.frames.pop().expect("ascend above the start node");
        self.node = frame.node;
        self.cell = frame.cell;
        self.came_from = Some(frame.entered);
    }
}
