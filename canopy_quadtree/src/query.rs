// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pruned region queries as lazy, resumable iterators.

use core::fmt::Debug;
use core::hash::Hash;

use crate::cursor::FullCursor;
use crate::tree::{BoundsExtractor, LooseQuadtree};
use crate::types::{Bounds, Coordinate, Quadrant};

/// Predicate deciding which entries a query yields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum QueryKind {
    /// Entry rectangle overlaps the region.
    Intersects,
    /// Region fully contains the entry rectangle.
    Inside,
    /// Entry rectangle fully contains the region.
    Contains,
}

impl QueryKind {
    #[inline]
    fn matches<N: Coordinate>(self, entry: &Bounds<N>, region: &Bounds<N>) -> bool {
        match self {
            Self::Intersects => entry.intersects(region),
            Self::Inside => region.contains(entry),
            Self::Contains => entry.contains(region),
        }
    }
}

/// Lazy result iterator over one region query.
///
/// The walk is a suspended depth-first traversal: each `next` call resumes
/// where the previous one stopped and returns the following match, so results
/// are never collected up front. Subtrees whose loose cell misses the region
/// entirely are skipped without being visited.
///
/// The query borrows the tree for its whole lifetime, so the tree cannot be
/// mutated while results are still being pulled; dropping the query early is
/// fine and leaves nothing to clean up. Yield order is the tree's fixed
/// traversal order and is not stable across structural changes.
///
/// As a side effect, climbing out of a node that removals have left entirely
/// empty frees that node; [`force_cleanup`](LooseQuadtree::force_cleanup)
/// finishes whatever queries have not walked past.
pub struct Query<'a, N, O, X> {
    tree: &'a mut LooseQuadtree<N, O, X>,
    region: Bounds<N>,
    kind: QueryKind,
    cursor: Option<FullCursor<N>>,
    next_entry: usize,
    scanning: bool,
}

impl<'a, N, O, X> Query<'a, N, O, X>
where
    N: Coordinate,
    O: Copy + Eq + Hash,
    X: BoundsExtractor<N, O>,
{
    pub(crate) fn new(
        tree: &'a mut LooseQuadtree<N, O, X>,
        region: Bounds<N>,
        kind: QueryKind,
    ) -> Self {
        let cursor = match tree.root {
            Some(root) if tree.root_cell.loose().intersects(&region) => {
                Some(FullCursor::start_at(root, tree.root_cell))
            }
            _ => None,
        };
        Self {
            tree,
            region,
            kind,
            cursor,
            next_entry: 0,
            scanning: true,
        }
    }
}

impl<N, O, X> Iterator for Query<'_, N, O, X>
where
    N: Coordinate,
    O: Copy + Eq + Hash,
    X: BoundsExtractor<N, O>,
{
    type Item = O;

    fn next(&mut self) -> Option<O> {
        let mut cursor = self.cursor.take()?;
        loop {
            if self.scanning {
                let node = self.tree.arena.node(cursor.node());
                while self.next_entry < node.entries.len() {
                    let entry = &node.entries[self.next_entry];
                    self.next_entry += 1;
                    if self.kind.matches(&entry.bounds, &self.region) {
                        let object = entry.object;
                        self.cursor = Some(cursor);
                        return Some(object);
                    }
                }
                self.scanning = false;
            }

            // Entries done here; pick the next child subtree worth a visit.
            let first = cursor.came_from().map_or(0, |q| q.idx() + 1);
            let mut descended = false;
            for &q in &Quadrant::ALL[first..] {
                if self.tree.arena.node(cursor.node()).child(q).is_none() {
                    continue;
                }
                if !cursor.cell().quadrant(q).loose().intersects(&self.region) {
                    // Nothing under this child can match.
                    continue;
                }
                cursor.descend(&self.tree.arena, q);
                self.next_entry = 0;
                self.scanning = true;
                descended = true;
                break;
            }
            if descended {
                continue;
            }

            if cursor.depth() == 0 {
                return None;
            }
            let finished = cursor.node();
            cursor.ascend();
            if self.tree.arena.node(finished).is_empty() {
                let q = cursor.came_from().expect("cursor just ascended");
                self.tree.arena.node_mut(cursor.node()).clear_child(q);
                self.tree.arena.free(finished);
            }
        }
    }
}

impl<N: Coordinate, O, X> Debug for Query<'_, N, O, X> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Query")
            .field("kind", &self.kind)
            .field("region", &self.region)
            .field("exhausted", &self.cursor.is_none())
            .finish_non_exhaustive()
    }
}
