// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf enumeration and neighbor-finding traversal.
//!
//! ## Neighbor propagation
//!
//! [`Traverse`] walks the tree depth-first while carrying, for every node, the eight
//! nodes adjacent to it that are at least as large as it is. A child's neighbor table
//! is derived from its parent's in constant time:
//!
//! - Toward the inside of the parent the neighbor is a sibling.
//! - Toward the outside it is the parent's neighbor in that direction, or, when that
//!   neighbor is Grey, the child of it that touches the shared edge or corner.
//!
//! A leaf therefore learns about a neighbor that is smaller than itself only as the
//! Grey node covering it; callers that need the smaller leaves descend from there.

use alloc::vec;
use alloc::vec::Vec;
use quadtree_geom::Direction;

use crate::tree::{NodeData, Quadtree};
use crate::types::NodeId;

/// Child visiting order, NW, NE, SE, SW.
pub(crate) const FORWARD: [Direction; 4] = Direction::QUADRANTS;

/// Child visiting order, SW, SE, NE, NW.
pub(crate) const REVERSED: [Direction; 4] = [
    Direction::SouthWest,
    Direction::SouthEast,
    Direction::NorthEast,
    Direction::NorthWest,
];

/// A Black leaf with its neighbor table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LeafNeighbors {
    /// The leaf.
    pub node: NodeId,
    /// Neighbor in each direction, indexed by [`Direction::index`].
    ///
    /// An entry is `None` outside the tree and where the adjacent area is White.
    /// Otherwise it is either a Black leaf at least as large as `node` or a Grey node
    /// the same size as `node`.
    pub neighbors: [Option<NodeId>; 8],
}

impl LeafNeighbors {
    /// Neighbor in direction `d`.
    pub fn neighbor(&self, d: Direction) -> Option<NodeId> {
        self.neighbors[d.index()]
    }
}

/// Depth-first iterator over Black leaves and their neighbors.
///
/// Created by [`Quadtree::traverse`] and [`Quadtree::traverse_reversed`].
#[derive(Debug)]
pub struct Traverse<'a, T> {
    tree: &'a Quadtree<T>,
    order: [Direction; 4],
    stack: Vec<(NodeId, [Option<NodeId>; 8])>,
}

impl<T> Traverse<'_, T> {
    /// Child of `candidate` in quadrant `q` when it is Grey, else `candidate` itself.
    fn select(&self, candidate: Option<NodeId>, q: Direction) -> Option<NodeId> {
        let id = candidate?;
        match self.tree.node(id).data {
            NodeData::Grey(children) => Some(children[q.quadrant_index()]),
            _ => Some(id),
        }
    }

    /// Neighbor table of the child in quadrant `q`, given the parent's table.
    fn child_neighbors(
        &self,
        parent: &[Option<NodeId>; 8],
        children: &[NodeId; 4],
        q: Direction,
    ) -> [Option<NodeId>; 8] {
        let (cw, ccw) = (q.clockwise_side(), q.counter_clockwise_side());
        let outward = |side: Direction| side == cw || side == ccw;
        let mut table = [None; 8];
        for d in Direction::ALL {
            table[d.index()] = if d.is_side() {
                if outward(d) {
                    let along = if d == cw { ccw } else { cw };
                    self.select(parent[d.index()], Direction::quadrant(d.opposite(), along))
                } else {
                    let along = if cw == d.opposite() { ccw } else { cw };
                    Some(children[Direction::quadrant(d, along).quadrant_index()])
                }
            } else if d == q {
                self.select(parent[d.index()], d.opposite())
            } else if d == q.opposite() {
                Some(children[d.quadrant_index()])
            } else {
                // One of the corner's sides leaves the parent, the other stays inside.
                let (a, b) = (d.clockwise_side(), d.counter_clockwise_side());
                let (out, inward) = if outward(a) { (a, b) } else { (b, a) };
                self.select(parent[out.index()], Direction::quadrant(out.opposite(), inward))
            };
        }
        table
    }
}

impl<T> Iterator for Traverse<'_, T> {
    type Item = LeafNeighbors;

    fn next(&mut self) -> Option<LeafNeighbors> {
        while let Some((id, mut table)) = self.stack.pop() {
            match self.tree.node(id).data {
                NodeData::White => {}
                NodeData::Black(_) => {
                    for slot in &mut table {
                        if let Some(n) = *slot
                            && matches!(self.tree.node(n).data, NodeData::White)
                        {
                            *slot = None;
                        }
                    }
                    return Some(LeafNeighbors {
                        node: id,
                        neighbors: table,
                    });
                }
                NodeData::Grey(children) => {
                    for q in self.order.iter().rev() {
                        let child_table = self.child_neighbors(&table, &children, *q);
                        self.stack.push((children[q.quadrant_index()], child_table));
                    }
                }
            }
        }
        None
    }
}

/// Depth-first iterator over Black leaves in NW, NE, SE, SW order.
///
/// Created by [`Quadtree::leaves`].
#[derive(Debug)]
pub struct Leaves<'a, T> {
    tree: &'a Quadtree<T>,
    stack: Vec<NodeId>,
}

impl<T> Iterator for Leaves<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            match self.tree.node(id).data {
                NodeData::White => {}
                NodeData::Black(_) => return Some(id),
                NodeData::Grey(children) => self.stack.extend(children.iter().rev()),
            }
        }
        None
    }
}

impl<T> Quadtree<T> {
    /// Visit every Black leaf with its neighbor table, children in NW, NE, SE, SW order.
    ///
    /// The iterator borrows the tree, so it cannot be invalidated by edits; call this
    /// again to restart.
    pub fn traverse(&self) -> Traverse<'_, T> {
        self.traverse_in(FORWARD)
    }

    /// Like [`traverse`](Self::traverse) but visiting children in SW, SE, NE, NW order.
    pub fn traverse_reversed(&self) -> Traverse<'_, T> {
        self.traverse_in(REVERSED)
    }

    pub(crate) fn traverse_in(&self, order: [Direction; 4]) -> Traverse<'_, T> {
        Traverse {
            tree: self,
            order,
            stack: vec![(self.root, [None; 8])],
        }
    }

    /// Black leaves in NW, NE, SE, SW depth-first order.
    pub fn leaves(&self) -> Leaves<'_, T> {
        Leaves {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Values of the Black leaves, in the same order as [`leaves`](Self::leaves).
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.leaves().filter_map(|id| self.value(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadtree_geom::{Aabb, Point};

    /// Brute-force check: a reported neighbor must touch the leaf on the right side,
    /// be at least as large, and an absent neighbor must mean no Black cell there.
    fn check_neighbors(tree: &Quadtree<i32>, leaf: &LeafNeighbors) {
        let b = tree.bounds(leaf.node).unwrap();
        let side = b.width();
        for d in Direction::ALL {
            let (dx, dy) = d.offset();
            let probe = Aabb::from_xywh(b.lower.x + dx * side, b.lower.y + dy * side, side, side);
            match leaf.neighbor(d) {
                Some(n) => {
                    let nb = tree.bounds(n).unwrap();
                    assert!(nb.width() >= side, "{d:?} neighbor smaller than leaf");
                    assert!(nb.contains_aabb(&probe), "{d:?} neighbor does not cover the probe");
                }
                None => {
                    let root = tree.root_bounds();
                    for y in probe.lower.y..probe.upper.y {
                        for x in probe.lower.x..probe.upper.x {
                            let p = Point::new(x, y);
                            if root.contains_point(p) {
                                assert_eq!(tree.value_at(p), None, "{d:?} missed a cell at {p:?}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn traversal_counts_black_leaves() {
        let mut tree = Quadtree::new(3).unwrap();
        tree.set_point(Point::new(0, 0), 1);
        tree.set_point(Point::new(1, 1), 1);
        assert_eq!(tree.traverse().count(), 2);
        tree.set_point(Point::new(4, 4), 1);
        tree.set_point(Point::new(5, 5), 1);
        tree.set_point(Point::new(0, 5), 1);
        assert_eq!(tree.traverse().count(), 5);
        assert_eq!(tree.traverse_reversed().count(), 5);
    }

    #[test]
    fn empty_and_full_trees() {
        let mut tree = Quadtree::new(2).unwrap();
        assert_eq!(tree.traverse().count(), 0);
        tree.set(1);
        let all: Vec<LeafNeighbors> = tree.traverse().collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].neighbors, [None; 8], "the root has no neighbors");
    }

    #[test]
    fn sibling_cells_see_each_other() {
        let mut tree = Quadtree::new(1).unwrap();
        tree.set_point(Point::new(0, 0), 1);
        tree.set_point(Point::new(1, 0), 2);
        tree.set_point(Point::new(1, 1), 3);
        let nw = tree.leaf_at(Point::new(0, 0)).unwrap();
        let ne = tree.leaf_at(Point::new(1, 0)).unwrap();
        let se = tree.leaf_at(Point::new(1, 1)).unwrap();
        let first = tree.traverse().next().unwrap();
        assert_eq!(first.node, nw);
        assert_eq!(first.neighbor(Direction::East), Some(ne));
        assert_eq!(first.neighbor(Direction::SouthEast), Some(se));
        assert_eq!(first.neighbor(Direction::South), None, "White neighbor is dropped");
        assert_eq!(first.neighbor(Direction::West), None, "outside the tree");
    }

    #[test]
    fn neighbors_across_parent_boundaries() {
        let mut tree = Quadtree::new(3).unwrap();
        // A coarse block next to fine cells.
        tree.set_rect(Aabb::from_xywh(4, 0, 4, 4), 1);
        tree.set_point(Point::new(3, 1), 2);
        tree.set_point(Point::new(3, 4), 3);
        tree.set_point(Point::new(4, 4), 4);
        tree.set_point(Point::new(2, 3), 5);

        let fine = tree.leaf_at(Point::new(3, 1)).unwrap();
        let block = tree.leaf_at(Point::new(4, 0)).unwrap();
        let leaf = tree.traverse().find(|l| l.node == fine).unwrap();
        assert_eq!(leaf.neighbor(Direction::East), Some(block));
        assert_eq!(leaf.neighbor(Direction::NorthEast), Some(block));
        assert_eq!(leaf.neighbor(Direction::SouthEast), Some(block));

        let corner = tree.leaf_at(Point::new(3, 4)).unwrap();
        let leaf = tree.traverse().find(|l| l.node == corner).unwrap();
        assert_eq!(leaf.neighbor(Direction::NorthEast), tree.leaf_at(Point::new(4, 3)));
        assert_eq!(leaf.neighbor(Direction::East), tree.leaf_at(Point::new(4, 4)));

        for leaf in tree.traverse().chain(tree.traverse_reversed()) {
            check_neighbors(&tree, &leaf);
        }
    }

    #[test]
    fn neighbor_tables_hold_on_scattered_content() {
        let mut tree = Quadtree::new(4).unwrap();
        tree.set_circle(Point::new(6, 7), 5, 1);
        tree.set_rect(Aabb::from_xywh(8, 0, 8, 4), 2);
        tree.set_point(Point::new(15, 15), 3);
        tree.set_point(Point::new(0, 15), 3);
        tree.unset_point(Point::new(6, 7));
        for leaf in tree.traverse() {
            check_neighbors(&tree, &leaf);
        }
    }

    #[test]
    fn reversed_visits_same_leaves_backwards() {
        let mut tree = Quadtree::new(3).unwrap();
        for (x, y) in [(0, 0), (7, 0), (7, 7), (0, 7), (3, 4)] {
            tree.set_point(Point::new(x, y), 1);
        }
        let forward: Vec<NodeId> = tree.traverse().map(|l| l.node).collect();
        let mut backward: Vec<NodeId> = tree.traverse_reversed().map(|l| l.node).collect();
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(forward, tree.leaves().collect::<Vec<_>>());
    }
}
