// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=quadtree_region --heading-base-level=0

//! Quadtree Region: a region quadtree over an integer grid.
//!
//! The tree covers the square `[0, 2^resolution)²` and stores a value per cell, keeping
//! uniform areas as single coarse nodes.
//!
//! - Fill and clear single cells, boxes, discs, or the whole tree.
//! - Every structural change is reported as a [`QuadEvent`] to subscribers on the
//!   changed node or any of its ancestors, which is enough to keep an external
//!   renderer or spatial index in sync without diffing.
//! - Grow the tree around its content with [`Quadtree::expand_from_center`], either
//!   explicitly or automatically when a fill lands outside the tree.
//! - Walk Black leaves together with their eight neighbors in [`Quadtree::traverse`].
//! - Group leaves into connected regions with [`Quadtree::find_connected_components`].
//!
//! ## Node states
//!
//! Each node is White (empty leaf), Black (uniform leaf holding one value) or Grey (four
//! children). After every public edit the tree is canonical: no Grey node has four
//! White children or four Black children holding equal values.
//!
//! ## API overview
//!
//! - [`Quadtree`]: the tree and its arena of nodes.
//! - [`NodeId`]: generational handle of a node.
//! - [`QuadState`]: White, Black or Grey.
//! - [`QuadEvent`] and [`EventMask`]: change notifications and subscription filters.
//! - [`LeafNeighbors`]: a leaf and its neighbor table, produced by [`Traverse`].
//! - [`Connectivity`]: 4- or 8-connected component labeling.
//! - [`DisjointSet`]: the union-find forest behind labeling, usable on its own.
//!
//! Key operations:
//! - [`Quadtree::set_point`] / [`Quadtree::set_rect`] / [`Quadtree::set_circle`] / [`Quadtree::set`]
//! - [`Quadtree::unset_point`] / [`Quadtree::unset_rect`] / [`Quadtree::unset_circle`] / [`Quadtree::unset`]
//! - [`Quadtree::subscribe`] → [`SubscriptionId`]
//! - [`Quadtree::expand_from_center`] → new root
//! - [`Quadtree::traverse`] and [`Quadtree::find_connected_components`]
//!
//! ### Minimal usage
//!
//! ```
//! use quadtree_region::{Aabb, Point, QuadState, Quadtree};
//!
//! let mut tree = Quadtree::new(3).unwrap();
//! assert_eq!(tree.root_bounds(), Aabb::square(8));
//!
//! tree.set_point(Point::new(0, 0), 'a');
//! tree.set_point(Point::new(1, 0), 'a');
//! assert_eq!(tree.state(tree.root()), Some(QuadState::Grey));
//! assert_eq!(tree.leaf_count(), 2);
//!
//! // Filling a whole quadrant stores a single coarse leaf.
//! tree.set_rect(Aabb::from_xywh(4, 4, 4, 4), 'b');
//! assert_eq!(tree.value_at(Point::new(6, 5)), Some(&'b'));
//!
//! let components = tree.find_connected_components(true);
//! assert_eq!(components.len(), 2);
//! ```
//!
//! ### Events
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use quadtree_region::{Point, QuadEvent, Quadtree};
//!
//! let mut tree = Quadtree::new(2).unwrap();
//! let added = Rc::new(RefCell::new(Vec::new()));
//! let sink = added.clone();
//! tree.on_added(move |e| {
//!     if let QuadEvent::Added { bounds, value, .. } = e {
//!         sink.borrow_mut().push((*bounds, **value));
//!     }
//! });
//!
//! tree.set_point(Point::new(3, 3), 7);
//! assert_eq!(added.borrow().len(), 1);
//! assert_eq!(added.borrow()[0].1, 7);
//! ```
//!
//! See the `quadtree_basics` demo for a runnable version with printed output.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod components;
mod disjoint_set;
mod error;
mod events;
mod expand;
mod traverse;
mod tree;
mod types;

pub use disjoint_set::DisjointSet;
pub use error::{MAX_RESOLUTION, QuadtreeError};
pub use events::{Handler, QuadEvent};
pub use traverse::{LeafNeighbors, Leaves, Traverse};
pub use tree::Quadtree;
pub use types::{Connectivity, EventMask, NodeId, QuadState, SubscriptionId};

pub use quadtree_geom::{Aabb, Direction, Point};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn event_driven_mirror_stays_in_sync() {
        // A collaborator that keeps its own list of filled regions from events alone.
        let mirror: Rc<RefCell<Vec<(Aabb, u8)>>> = Rc::new(RefCell::new(Vec::new()));
        let mut tree = Quadtree::new(4).unwrap();
        let sink = mirror.clone();
        tree.subscribe(tree.root(), EventMask::all(), move |e| {
            let mut m = sink.borrow_mut();
            match e {
                QuadEvent::Added { bounds, value, .. } => m.push((*bounds, **value)),
                QuadEvent::Removing { bounds, .. } => m.retain(|(b, _)| b != bounds),
                QuadEvent::Changed { bounds, value, .. } => {
                    for entry in m.iter_mut().filter(|(b, _)| b == bounds) {
                        entry.1 = **value;
                    }
                }
                QuadEvent::Expand { offset, .. } => {
                    for entry in m.iter_mut() {
                        entry.0 = entry.0.translate(*offset);
                    }
                }
            }
        })
        .unwrap();

        tree.set_auto_expand(true);
        tree.set_rect(Aabb::from_xywh(0, 0, 8, 8), 1);
        tree.set_circle(Point::new(10, 10), 3, 2);
        tree.unset_point(Point::new(3, 3));
        tree.set_point(Point::new(0, 0), 3);
        tree.set_point(Point::new(20, 1), 4);
        tree.unset_rect(Aabb::from_xywh(2, 0, 4, 30));

        let mut expected: Vec<(Aabb, u8)> = tree
            .leaves()
            .map(|id| (tree.bounds(id).unwrap(), *tree.value(id).unwrap()))
            .collect();
        let mut actual = mirror.borrow().clone();
        let key = |e: &(Aabb, u8)| (e.0.lower.x, e.0.lower.y, e.0.width(), e.1);
        expected.sort_by_key(key);
        actual.sort_by_key(key);
        assert_eq!(actual, expected);
    }
}
