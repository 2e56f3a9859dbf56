// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connected-component labeling over Black leaves.
//!
//! Labeling runs two passes of [`Quadtree::traverse`], the second in reversed child
//! order, so that each leaf sees labels from neighbors on every side. Equivalent labels
//! are merged with a [`DisjointSet`]. Neighbors smaller than a leaf are reached by
//! descending from the Grey neighbor into the children along the shared edge or corner.

use alloc::vec::Vec;
use hashbrown::HashMap;
use quadtree_geom::Direction;
use smallvec::SmallVec;

use crate::disjoint_set::DisjointSet;
use crate::traverse::{FORWARD, REVERSED};
use crate::tree::{NodeData, Quadtree};
use crate::types::{Connectivity, NodeId};

type Labels = HashMap<NodeId, usize>;
type Found = SmallVec<[usize; 8]>;

impl<T> Quadtree<T> {
    /// Group Black leaves into connected regions regardless of their values.
    ///
    /// With `use_quadrants` leaves touching only at a corner are connected too.
    /// Components come in the order their first leaf is visited; leaves inside a
    /// component are sorted by ascending depth.
    pub fn find_connected_components(&self, use_quadrants: bool) -> Vec<Vec<NodeId>> {
        self.find_connected_components_with(Connectivity::from_use_quadrants(use_quadrants))
    }

    /// [`find_connected_components`](Self::find_connected_components) with an explicit
    /// [`Connectivity`].
    pub fn find_connected_components_with(&self, connectivity: Connectivity) -> Vec<Vec<NodeId>> {
        self.label_components(connectivity, |_, _| true)
    }

    fn label_components(
        &self,
        connectivity: Connectivity,
        same: impl Fn(&T, &T) -> bool,
    ) -> Vec<Vec<NodeId>> {
        let directions: &[Direction] = if connectivity.includes_corners() {
            &Direction::ALL
        } else {
            &Direction::SIDES
        };
        let mut labels = Labels::new();
        let mut sets = DisjointSet::new();
        let mut visited = Vec::new();

        for order in [FORWARD, REVERSED] {
            for leaf in self.traverse_in(order) {
                let Some(value) = self.value(leaf.node) else {
                    continue;
                };
                let mut found = Found::new();
                if let Some(&own) = labels.get(&leaf.node) {
                    found.push(own);
                }
                for &d in directions {
                    if let Some(n) = leaf.neighbor(d) {
                        self.collect_labels(n, d, value, &same, &labels, &mut found);
                    }
                }
                let label = match found.iter().min() {
                    Some(&min) => min,
                    None => sets.make_set(leaf.node),
                };
                for &other in &found {
                    sets.union(label, other);
                }
                if labels.insert(leaf.node, label).is_none() {
                    visited.push(leaf.node);
                }
            }
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<NodeId>> = Vec::new();
        for id in visited {
            let root = sets.find(labels[&id]);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(id);
        }
        for component in &mut components {
            component.sort_by_key(|id| self.node(*id).depth);
        }
        tracing::debug!(
            leaves = labels.len(),
            components = components.len(),
            "labeled connected components"
        );
        components
    }

    /// Push the labels of the Black leaves in `n` that touch the leaf looking at it in
    /// direction `d`.
    fn collect_labels(
        &self,
        n: NodeId,
        d: Direction,
        value: &T,
        same: &impl Fn(&T, &T) -> bool,
        labels: &Labels,
        found: &mut Found,
    ) {
        match &self.node(n).data {
            NodeData::White => {}
            NodeData::Black(v) => {
                if same(value, v)
                    && let Some(&label) = labels.get(&n)
                {
                    found.push(label);
                }
            }
            NodeData::Grey(children) => {
                let back = d.opposite();
                if d.is_side() {
                    for along in [d.clockwise_side(), d.counter_clockwise_side()] {
                        let q = Direction::quadrant(back, along);
                        let child = children[q.quadrant_index()];
                        self.collect_labels(child, d, value, same, labels, found);
                    }
                } else {
                    let child = children[back.quadrant_index()];
                    self.collect_labels(child, d, value, same, labels, found);
                }
            }
        }
    }
}

impl<T: PartialEq> Quadtree<T> {
    /// Group Black leaves into connected regions of equal value.
    pub fn find_value_components(&self, connectivity: Connectivity) -> Vec<Vec<NodeId>> {
        self.label_components(connectivity, |a, b| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadtree_geom::{Aabb, Point};

    fn sizes(components: &[Vec<NodeId>]) -> Vec<usize> {
        let mut s: Vec<usize> = components.iter().map(Vec::len).collect();
        s.sort_unstable();
        s
    }

    #[test]
    fn adjacent_cells_form_one_component() {
        let mut tree = Quadtree::new(3).unwrap();
        tree.set_point(Point::new(0, 0), 1);
        tree.set_point(Point::new(1, 0), 1);
        let components = tree.find_connected_components(true);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 2);
    }

    #[test]
    fn isolated_cells_are_singletons() {
        let mut tree = Quadtree::new(3).unwrap();
        for (x, y) in [(0, 0), (2, 0), (4, 0), (0, 2), (2, 2), (4, 2)] {
            tree.set_point(Point::new(x, y), 1);
        }
        let components = tree.find_connected_components(true);
        assert_eq!(sizes(&components), [1; 6]);
    }

    #[test]
    fn empty_tree_has_no_components() {
        let tree = Quadtree::<i32>::new(3).unwrap();
        assert!(tree.find_connected_components(true).is_empty());
    }

    #[test]
    fn diagonal_contact_depends_on_connectivity() {
        let mut tree = Quadtree::new(3).unwrap();
        tree.set_point(Point::new(3, 3), 1);
        tree.set_point(Point::new(4, 4), 1);
        assert_eq!(tree.find_connected_components(true).len(), 1);
        assert_eq!(tree.find_connected_components(false).len(), 2);
        assert_eq!(
            tree.find_connected_components_with(Connectivity::Sides).len(),
            2
        );
    }

    #[test]
    fn mixed_sizes_join_through_grey_neighbors() {
        let mut tree = Quadtree::new(3).unwrap();
        // A large block on the east, a T of small cells reaching it from the west.
        tree.set_rect(Aabb::from_xywh(4, 0, 4, 4), 1);
        tree.set_point(Point::new(3, 2), 1);
        tree.set_point(Point::new(2, 2), 1);
        tree.set_point(Point::new(2, 1), 1);
        tree.set_point(Point::new(2, 3), 1);
        // Separate blob in the south-west.
        tree.set_rect(Aabb::from_xywh(0, 6, 2, 2), 1);

        let components = tree.find_connected_components(false);
        assert_eq!(sizes(&components), [1, 5]);
        let big = components.iter().find(|c| c.len() == 5).unwrap();
        // The coarse block comes first: leaves are sorted by depth.
        assert_eq!(tree.depth(big[0]), Some(1));
        let depths: Vec<u32> = big.iter().map(|id| tree.depth(*id).unwrap()).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn u_shape_is_one_component() {
        // Two arms joined only at the bottom.
        let mut tree = Quadtree::new(3).unwrap();
        tree.set_rect(Aabb::from_xywh(0, 0, 1, 6), 1);
        tree.set_rect(Aabb::from_xywh(6, 0, 1, 6), 1);
        tree.set_rect(Aabb::from_xywh(0, 6, 7, 1), 1);
        let components = tree.find_connected_components(false);
        assert_eq!(components.len(), 1);
        assert_eq!(
            components[0].len(),
            tree.leaf_count(),
            "every leaf is in the single component"
        );
    }

    #[test]
    fn value_components_split_on_value() {
        let mut tree = Quadtree::new(2).unwrap();
        tree.set_rect(Aabb::from_xywh(0, 0, 2, 4), 1);
        tree.set_rect(Aabb::from_xywh(2, 0, 2, 4), 2);
        assert_eq!(tree.find_connected_components(true).len(), 1);
        let by_value = tree.find_value_components(Connectivity::SidesAndCorners);
        assert_eq!(by_value.len(), 2);
        for component in &by_value {
            let first = tree.value(component[0]);
            assert!(component.iter().all(|id| tree.value(*id) == first));
        }
    }

    #[test]
    fn components_cover_every_leaf_once() {
        let mut tree = Quadtree::new(4).unwrap();
        tree.set_circle(Point::new(4, 4), 3, 1);
        tree.set_circle(Point::new(12, 12), 3, 1);
        tree.set_rect(Aabb::from_xywh(7, 0, 3, 16), 1);
        tree.set_point(Point::new(0, 15), 1);
        let components = tree.find_connected_components(true);
        let mut all: Vec<NodeId> = components.into_iter().flatten().collect();
        all.sort_by_key(|id| (id.0, id.1));
        let mut leaves: Vec<NodeId> = tree.leaves().collect();
        leaves.sort_by_key(|id| (id.0, id.1));
        assert_eq!(all, leaves);
        // Both circles touch the bar; the corner cell stands alone.
        assert_eq!(sizes(&tree.find_connected_components(true)).len(), 2);
    }
}
