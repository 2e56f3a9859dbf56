// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Growing the tree around its existing content.
//!
//! Expansion doubles the root side and re-centers the old content: the old root's
//! quadrant `q` becomes the grandchild `new_root.child[q].child[opposite(q)]`, so every
//! old cell `p` is found at `p + side / 4` afterwards (`side` being the new root side).
//! Existing nodes are moved rather than copied, so their ids stay valid.

use alloc::vec;
use quadtree_geom::{Aabb, Direction, Point};

use crate::error::{QuadtreeError, side_for};
use crate::tree::{NodeData, Quadtree};
use crate::types::NodeId;

impl<T: Clone + PartialEq> Quadtree<T> {
    /// Double the tree around its center and return the new root.
    ///
    /// A Black or White old root is subdivided first (firing the usual events), then its
    /// quadrants are moved one level down toward the new center and the new root fires
    /// [`QuadEvent::Expand`](crate::QuadEvent::Expand) with the translation to apply to
    /// cached positions. Subscriptions on the old root move to the new one.
    ///
    /// At resolution 0 the old single cell becomes the NW cell and the offset is zero.
    ///
    /// Fails without touching the tree if the new resolution would exceed
    /// [`MAX_RESOLUTION`](crate::MAX_RESOLUTION).
    pub fn expand_from_center(&mut self) -> Result<NodeId, QuadtreeError> {
        self.expand_once()?;
        Ok(self.root)
    }

    /// Grow once and return the translation applied to the old content.
    pub(crate) fn expand_once(&mut self) -> Result<Point, QuadtreeError> {
        let resolution = self.resolution + 1;
        let side = side_for(resolution)?;
        let old_root = self.root;
        let offset = Point::splat(side / 4);

        if self.resolution > 0 && !matches!(self.node(old_root).data, NodeData::Grey(_)) {
            self.subdivide(old_root);
        }
        self.resolution = resolution;

        let bounds = Aabb::square(side);
        let new_root = self.alloc(None, 0, bounds, NodeData::White);
        let children = if side == 2 {
            Direction::QUADRANTS.map(|q| {
                if q == Direction::NorthWest {
                    self.relocate(old_root, new_root, Point::ZERO);
                    old_root
                } else {
                    let b = Self::quadrant_bounds(bounds, q);
                    self.alloc(Some(new_root), 1, b, NodeData::White)
                }
            })
        } else {
            let moved = self.grey_children(old_root);
            Direction::QUADRANTS
                .map(|q| self.ring_quadrant(new_root, q, moved[q.quadrant_index()], offset))
        };
        self.node_mut(new_root).data = NodeData::Grey(children);

        self.listeners.transfer(old_root, new_root);
        // At resolution 0 the old root lives on as the NW cell.
        if side > 2 {
            self.free(old_root);
        }
        self.root = new_root;
        self.merge(new_root);

        tracing::debug!(resolution, ?offset, "expanded from center");
        self.notify_expand(offset);
        Ok(offset)
    }

    /// Build the new root's quadrant `q`, holding `moved` in its inner corner.
    fn ring_quadrant(
        &mut self,
        new_root: NodeId,
        q: Direction,
        moved: NodeId,
        offset: Point,
    ) -> NodeId {
        let bounds = Self::quadrant_bounds(self.node(new_root).bounds, q);
        let child = self.alloc(Some(new_root), 1, bounds, NodeData::White);
        let inner = q.opposite();
        let grandchildren = Direction::QUADRANTS.map(|g| {
            if g == inner {
                self.relocate(moved, child, offset);
                moved
            } else {
                let b = Self::quadrant_bounds(bounds, g);
                self.alloc(Some(child), 2, b, NodeData::White)
            }
        });
        self.node_mut(child).data = NodeData::Grey(grandchildren);
        child
    }

    /// Re-parent a subtree one level deeper and shift its bounds.
    fn relocate(&mut self, id: NodeId, parent: NodeId, offset: Point) {
        self.node_mut(id).parent = Some(parent);
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node_mut(n);
            node.depth += 1;
            node.bounds = node.bounds.translate(offset);
            if let NodeData::Grey(children) = node.data {
                stack.extend(children);
            }
        }
    }
}
