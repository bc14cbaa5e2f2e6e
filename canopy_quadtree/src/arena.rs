// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes and the block allocator that owns them.

use crate::types::{Bounds, Quadrant};

pub(crate) const NODES_PER_BLOCK: usize = 64;

/// Arena handle of a tree node.
///
/// Handles are plain slot addresses; a handle is never reused while its node
/// is still reachable from the tree, so no generation counter is needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeRef(u32);

impl NodeRef {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "node handles are 32-bit by design"
    )]
    const fn new(block: usize, slot: usize) -> Self {
        Self((block * NODES_PER_BLOCK + slot) as u32)
    }

    #[inline]
    const fn block(self) -> usize {
        self.0 as usize / NODES_PER_BLOCK
    }

    #[inline]
    const fn slot(self) -> usize {
        self.0 as usize % NODES_PER_BLOCK
    }
}

/// One anchored object: the token plus the rectangle it had when placed.
pub(crate) struct Entry<N, O> {
    pub(crate) object: O,
    pub(crate) bounds: Bounds<N>,
}

/// A cell of the recursive subdivision: up to four exclusively owned children
/// and the objects anchored at this depth.
pub(crate) struct TreeNode<N, O> {
    children: [Option<NodeRef>; 4],
    pub(crate) entries: Vec<Entry<N, O>>,
}

impl<N, O> TreeNode<N, O> {
    fn empty() -> Self {
        Self {
            children: [None; 4],
            entries: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn child(&self, q: Quadrant) -> Option<NodeRef> {
        self.children[q.idx()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, q: Quadrant, child: NodeRef) {
        self.children[q.idx()] = Some(child);
    }

    #[inline]
    pub(crate) fn clear_child(&mut self, q: Quadrant) {
        self.children[q.idx()] = None;
    }

    /// True when nothing is anchored here and no children remain.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.children.iter().all(Option::is_none)
    }

    /// The lone remaining child, if the node holds exactly one.
    pub(crate) fn only_child(&self) -> Option<(Quadrant, NodeRef)> {
        let mut found = None;
        for q in Quadrant::ALL {
            if let Some(child) = self.children[q.idx()] {
                if found.is_some() {
                    return None;
                }
                found = Some((q, child));
            }
        }
        found
    }

    fn reset(&mut self) {
        self.children = [None; 4];
        // `clear` keeps the allocation for the slot's next tenant.
        self.entries.clear();
    }
}

struct Block<N, O> {
    nodes: Vec<TreeNode<N, O>>,
    live: usize,
}

impl<N, O> Block<N, O> {
    fn new() -> Self {
        let mut nodes = Vec::with_capacity(NODES_PER_BLOCK);
        nodes.resize_with(NODES_PER_BLOCK, TreeNode::empty);
        Self { nodes, live: 0 }
    }
}

/// Block allocator for tree nodes.
///
/// Nodes come from fixed-size blocks allocated in bulk and are recycled
/// through a free list, so steady insert/remove churn costs no allocator
/// traffic. A block's storage is released only once every one of its slots is
/// free again, during [`sweep`](Self::sweep).
pub(crate) struct NodeArena<N, O> {
    blocks: Vec<Option<Block<N, O>>>,
    free: Vec<NodeRef>,
}

impl<N, O> NodeArena<N, O> {
    pub(crate) fn new() -> Self {
        Self {
            blocks: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn node(&self, r: NodeRef) -> &TreeNode<N, O> {
        let block = self.blocks[r.block()].as_ref().expect("stale node handle");
        &block.nodes[r.slot()]
    }

    pub(crate) fn node_mut(&mut self, r: NodeRef) -> &mut TreeNode<N, O> {
        let block = self.blocks[r.block()].as_mut().expect("stale node handle");
        &mut block.nodes[r.slot()]
    }

    /// Hand out an empty node, growing by a whole block when the free list
    /// runs dry.
    pub(crate) fn allocate(&mut self) -> NodeRef {
        if self.free.is_empty() {
            let block = self.blocks.len();
            self.blocks.push(Some(Block::new()));
            for slot in (0..NODES_PER_BLOCK).rev() {
                self.free.push(NodeRef::new(block, slot));
            }
        }
        let r = self.free.pop().expect("free list refilled above");
        let block = self.blocks[r.block()].as_mut().expect("stale node handle");
        debug_assert!(block.nodes[r.slot()].is_empty());
        block.live += 1;
        r
    }

    /// Return a detached node to the free list.
    pub(crate) fn free(&mut self, r: NodeRef) {
        let block = self.blocks[r.block()].as_mut().expect("stale node handle");
        debug_assert!(block.nodes[r.slot()].entries.is_empty());
        block.nodes[r.slot()].reset();
        block.live -= 1;
        self.free.push(r);
    }

    /// Release every block whose slots are all free again.
    pub(crate) fn sweep(&mut self) {
        let mut dropped = false;
        for block in &mut self.blocks {
            if block.as_ref().is_some_and(|b| b.live == 0) {
                *block = None;
                dropped = true;
            }
        }
        if dropped {
            let blocks = &self.blocks;
            self.free.retain(|r| blocks[r.block()].is_some());
            while matches!(self.blocks.last(), Some(None)) {
                self.blocks.pop();
            }
        }
    }

    /// Drop all storage at once.
    pub(crate) fn reset(&mut self) {
        self.blocks.clear();
        self.free.clear();
    }

    /// Number of live nodes across all blocks.
    pub(crate) fn live_nodes(&self) -> usize {
        self.blocks.iter().flatten().map(|b| b.live).sum()
    }

    /// Number of blocks still holding storage.
    pub(crate) fn allocated_blocks(&self) -> usize {
        self.blocks.iter().flatten().count()
    }
}

impl<N, O> core::fmt::Debug for NodeArena<N, O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeArena")
            .field("blocks", &self.allocated_blocks())
            .field("live", &self.live_nodes())
            .field("free", &self.free.len())
            .finish_non_exhaustive()
    }
}
