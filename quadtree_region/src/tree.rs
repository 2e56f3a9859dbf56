// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node storage, fills, clears, subdivision and merging.

use alloc::boxed::Box;
use alloc::vec::Vec;
use quadtree_geom::{Aabb, Direction, Point};

use crate::error::{QuadtreeError, side_for};
use crate::events::{Handler, Listeners, QuadEvent};
use crate::types::{EventMask, NodeId, QuadState, SubscriptionId};

/// Payload of a node. Grey children are ordered NW, NE, SE, SW.
#[derive(Clone, Debug)]
pub(crate) enum NodeData<T> {
    White,
    Black(T),
    Grey([NodeId; 4]),
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: u32,
    pub(crate) bounds: Aabb,
    pub(crate) data: NodeData<T>,
}

impl<T> Node<T> {
    pub(crate) fn state(&self) -> QuadState {
        match self.data {
            NodeData::White => QuadState::White,
            NodeData::Black(_) => QuadState::Black,
            NodeData::Grey(_) => QuadState::Grey,
        }
    }
}

/// Which value event to raise for a Black node.
enum Notify<'a, T> {
    Added,
    Removing,
    Changed(&'a T),
}

/// Walks from a node up to the root.
struct Ancestors<'a, T> {
    nodes: &'a [Option<Node<T>>],
    next: Option<NodeId>,
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.nodes[id.idx()].as_ref().and_then(|n| n.parent);
        Some(id)
    }
}

/// Region quadtree over the square `[0, 2^resolution)²`.
///
/// Nodes live in a slot arena addressed by [`NodeId`]; children are owned through their
/// parent's `Grey` entry and the parent link is a plain id used only to bubble events
/// and to re-root the tree.
pub struct Quadtree<T> {
    nodes: Vec<Option<Node<T>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    pub(crate) root: NodeId,
    pub(crate) resolution: u32,
    auto_expand: bool,
    pub(crate) listeners: Listeners<T>,
}

impl<T> core::fmt::Debug for Quadtree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Quadtree")
            .field("resolution", &self.resolution)
            .field("root", &self.root)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("auto_expand", &self.auto_expand)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<T> Quadtree<T> {
    /// Create an empty (White) tree covering `[0, 2^resolution)` on both axes.
    ///
    /// Fails if `2^resolution` does not fit the `i32` grid.
    pub fn new(resolution: u32) -> Result<Self, QuadtreeError> {
        let side = side_for(resolution)?;
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
            resolution,
            auto_expand: false,
            listeners: Listeners::default(),
        };
        tree.root = tree.alloc(None, 0, Aabb::square(side), NodeData::White);
        Ok(tree)
    }

    /// The current root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Maximum depth; the root side is `2^resolution`.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Region covered by the whole tree.
    pub fn root_bounds(&self) -> Aabb {
        self.node(self.root).bounds
    }

    /// Whether out-of-bounds point and circle fills grow the tree instead of failing.
    pub fn auto_expand(&self) -> bool {
        self.auto_expand
    }

    /// Enable or disable automatic growth.
    pub fn set_auto_expand(&mut self, enabled: bool) {
        self.auto_expand = enabled;
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Region of a node.
    pub fn bounds(&self, id: NodeId) -> Option<Aabb> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Depth of a node; the root is at depth 0.
    pub fn depth(&self, id: NodeId) -> Option<u32> {
        self.node_opt(id).map(|n| n.depth)
    }

    /// Parent of a node, `None` for the root or a stale id.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a Grey node in NW, NE, SE, SW order.
    pub fn children(&self, id: NodeId) -> Option<[NodeId; 4]> {
        match self.node_opt(id)?.data {
            NodeData::Grey(children) => Some(children),
            _ => None,
        }
    }

    /// State of a node.
    pub fn state(&self, id: NodeId) -> Option<QuadState> {
        self.node_opt(id).map(Node::state)
    }

    /// Value of a Black node.
    pub fn value(&self, id: NodeId) -> Option<&T> {
        match &self.node_opt(id)?.data {
            NodeData::Black(v) => Some(v),
            _ => None,
        }
    }

    /// The leaf (White or Black) covering the cell at `p`.
    pub fn leaf_at(&self, p: Point) -> Option<NodeId> {
        let mut id = self.root;
        if !self.node(id).bounds.contains_point(p) {
            return None;
        }
        while let NodeData::Grey(_) = self.node(id).data {
            id = self.child_containing(id, p);
        }
        Some(id)
    }

    /// Value stored at the cell `p`, if any.
    pub fn value_at(&self, p: Point) -> Option<&T> {
        self.leaf_at(p).and_then(|id| self.value(id))
    }

    /// Number of live nodes of any state.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Number of Black leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Subscribe to events raised on `node` or anywhere below it.
    ///
    /// Returns `None` if `node` is stale. Subscriptions on the root follow it across
    /// [`expand_from_center`](Self::expand_from_center); subscriptions on a node that is
    /// merged away are dropped with it.
    pub fn subscribe(
        &mut self,
        node: NodeId,
        mask: EventMask,
        handler: impl FnMut(&QuadEvent<'_, T>) + 'static,
    ) -> Option<SubscriptionId> {
        if !self.is_alive(node) {
            return None;
        }
        Some(self.listeners.subscribe(node, mask, Box::new(handler)))
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Subscribe to [`QuadEvent::Added`] on the root.
    pub fn on_added(&mut self, handler: impl FnMut(&QuadEvent<'_, T>) + 'static) -> SubscriptionId {
        self.subscribe_root(EventMask::ADDED, Box::new(handler))
    }

    /// Subscribe to [`QuadEvent::Removing`] on the root.
    pub fn on_removing(
        &mut self,
        handler: impl FnMut(&QuadEvent<'_, T>) + 'static,
    ) -> SubscriptionId {
        self.subscribe_root(EventMask::REMOVING, Box::new(handler))
    }

    /// Subscribe to [`QuadEvent::Changed`] on the root.
    pub fn on_changed(
        &mut self,
        handler: impl FnMut(&QuadEvent<'_, T>) + 'static,
    ) -> SubscriptionId {
        self.subscribe_root(EventMask::CHANGED, Box::new(handler))
    }

    /// Subscribe to [`QuadEvent::Expand`] on the root.
    pub fn on_expand(
        &mut self,
        handler: impl FnMut(&QuadEvent<'_, T>) + 'static,
    ) -> SubscriptionId {
        self.subscribe_root(EventMask::EXPAND, Box::new(handler))
    }

    fn subscribe_root(&mut self, mask: EventMask, handler: Handler<T>) -> SubscriptionId {
        let root = self.root;
        self.listeners.subscribe(root, mask, handler)
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        self.node_opt(id).expect("dangling NodeId")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        let n = self.nodes[id.idx()].as_mut().expect("dangling NodeId");
        debug_assert_eq!(n.generation, id.1, "stale NodeId");
        n
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node<T>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn alloc(
        &mut self,
        parent: Option<NodeId>,
        depth: u32,
        bounds: Aabb,
        data: NodeData<T>,
    ) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent,
            depth,
            bounds,
            data,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        NodeId::new(idx as u32, generation)
    }

    /// Free a single slot. Children must already be freed or re-homed.
    pub(crate) fn free(&mut self, id: NodeId) {
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        self.listeners.forget(id);
    }

    pub(crate) fn grey_children(&self, id: NodeId) -> [NodeId; 4] {
        match self.node(id).data {
            NodeData::Grey(children) => children,
            _ => unreachable!("node {id:?} is not Grey"),
        }
    }

    /// Child of a Grey node whose quadrant contains `p`.
    pub(crate) fn child_containing(&self, id: NodeId, p: Point) -> NodeId {
        let node = self.node(id);
        let NodeData::Grey(children) = &node.data else {
            unreachable!("node {id:?} is not Grey");
        };
        let center = node.bounds.center();
        let q = match (p.x >= center.x, p.y >= center.y) {
            (false, false) => Direction::NorthWest,
            (true, false) => Direction::NorthEast,
            (true, true) => Direction::SouthEast,
            (false, true) => Direction::SouthWest,
        };
        children[q.quadrant_index()]
    }

    /// Raise a value event on a Black node and bubble it to the root.
    fn notify(&mut self, id: NodeId, what: Notify<'_, T>) {
        if self.listeners.is_empty() {
            return;
        }
        let nodes = &self.nodes;
        let node = nodes[id.idx()].as_ref().expect("dangling NodeId");
        let NodeData::Black(value) = &node.data else {
            unreachable!("value events are only raised for Black nodes");
        };
        let (node_id, bounds) = (id, node.bounds);
        let event = match what {
            Notify::Added => QuadEvent::Added {
                node: node_id,
                bounds,
                value,
            },
            Notify::Removing => QuadEvent::Removing {
                node: node_id,
                bounds,
                value,
            },
            Notify::Changed(old) => QuadEvent::Changed {
                node: node_id,
                bounds,
                old,
                value,
            },
        };
        let path = Ancestors {
            nodes,
            next: Some(id),
        };
        self.listeners.emit(path, &event);
    }

    /// Raise [`QuadEvent::Expand`] on the root.
    pub(crate) fn notify_expand(&mut self, offset: Point) {
        let root = self.root;
        let event = QuadEvent::Expand { root, offset };
        self.listeners.emit(core::iter::once(root), &event);
    }

    /// Discard a whole subtree, reporting every Black leaf as removed (NW, NE, SE, SW order).
    fn discard_subtree(&mut self, id: NodeId) {
        match self.node(id).data {
            NodeData::Grey(children) => {
                for c in children {
                    self.discard_subtree(c);
                }
            }
            NodeData::Black(_) => self.notify(id, Notify::Removing),
            NodeData::White => {}
        }
        self.free(id);
    }

    /// Turn a node White. Returns false if it already was.
    fn clear_node(&mut self, id: NodeId) -> bool {
        match self.node(id).data {
            NodeData::White => false,
            NodeData::Black(_) => {
                self.notify(id, Notify::Removing);
                self.node_mut(id).data = NodeData::White;
                true
            }
            NodeData::Grey(children) => {
                for c in children {
                    self.discard_subtree(c);
                }
                self.node_mut(id).data = NodeData::White;
                tracing::trace!(?id, "cleared subtree");
                true
            }
        }
    }

    /// Quadrant `q` of a square box.
    pub(crate) fn quadrant_bounds(bounds: Aabb, q: Direction) -> Aabb {
        let half = bounds.width() / 2;
        let (dx, dy) = q.offset();
        let x = bounds.lower.x + if dx > 0 { half } else { 0 };
        let y = bounds.lower.y + if dy > 0 { half } else { 0 };
        Aabb::from_xywh(x, y, half, half)
    }
}

impl<T: Clone + PartialEq> Quadtree<T> {
    /// Fill the whole tree with `value`.
    pub fn set(&mut self, value: T) -> bool {
        let root = self.root;
        let changed = self.set_node(root, &value);
        if changed {
            self.merge(root);
        }
        changed
    }

    /// Set the cell at `p`.
    ///
    /// Returns false if nothing changed, including when `p` lies outside the tree and
    /// auto-expansion is off (or cannot grow the tree far enough).
    pub fn set_point(&mut self, p: Point, value: T) -> bool {
        let cell = Aabb::new(p, Point::new(p.x.saturating_add(1), p.y.saturating_add(1)));
        let Some(offset) = self.fit(cell) else {
            return false;
        };
        match self.set_point_internal(p + offset, &value) {
            Some(leaf) => {
                self.merge_up(leaf);
                true
            }
            None => false,
        }
    }

    /// Fill every cell of `rect` that lies inside the tree.
    pub fn set_rect(&mut self, rect: Aabb, value: T) -> bool {
        let root = self.root;
        let changed = self.set_rect_internal(root, rect, &value);
        if changed {
            self.merge(root);
        }
        changed
    }

    /// Fill every cell whose distance to `center` is strictly less than `radius`.
    ///
    /// The largest square inscribed in the circle is filled as a box; only the ring
    /// between the square and the circle is tested cell by cell.
    pub fn set_circle(&mut self, center: Point, radius: i32, value: T) -> bool {
        if radius <= 0 {
            return false;
        }
        // Without auto-expansion the circle is simply clipped to the tree.
        let offset = if self.auto_expand {
            match self.fit(circle_cover(center, radius)) {
                Some(offset) => offset,
                None => return false,
            }
        } else {
            Point::ZERO
        };
        let center = center + offset;
        let inner = inscribed_square(center, radius);
        let mut changed = false;
        for p in ring_cells(center, radius, inner, self.root_bounds()) {
            changed |= self.set_point_internal(p, &value).is_some();
        }
        changed |= self.set_rect_internal(self.root, inner, &value);
        if changed {
            self.merge(self.root);
        }
        changed
    }

    /// Clear the whole tree.
    pub fn unset(&mut self) -> bool {
        let root = self.root;
        let changed = self.clear_node(root);
        if changed {
            self.merge(root);
        }
        changed
    }

    /// Clear the cell at `p`. Never grows the tree.
    pub fn unset_point(&mut self, p: Point) -> bool {
        match self.unset_point_internal(p) {
            Some(leaf) => {
                self.merge_up(leaf);
                true
            }
            None => false,
        }
    }

    /// Clear every cell of `rect`.
    pub fn unset_rect(&mut self, rect: Aabb) -> bool {
        let root = self.root;
        let changed = self.unset_rect_internal(root, rect);
        if changed {
            self.merge(root);
        }
        changed
    }

    /// Clear every cell whose distance to `center` is strictly less than `radius`.
    pub fn unset_circle(&mut self, center: Point, radius: i32) -> bool {
        if radius <= 0 {
            return false;
        }
        let inner = inscribed_square(center, radius);
        let mut changed = false;
        for p in ring_cells(center, radius, inner, self.root_bounds()) {
            changed |= self.unset_point_internal(p).is_some();
        }
        changed |= self.unset_rect_internal(self.root, inner);
        if changed {
            self.merge(self.root);
        }
        changed
    }

    /// Offset to apply to `area` so that it lies inside the tree, growing the tree when
    /// auto-expansion allows it. `None` if it cannot be made to fit.
    fn fit(&mut self, area: Aabb) -> Option<Point> {
        let limit = 1_i32 << crate::error::MAX_RESOLUTION;
        if !Aabb::new(Point::splat(-limit), Point::splat(limit)).contains_aabb(&area) {
            return None;
        }
        let steps = match self.doublings_to_fit(area) {
            Some(0) => return Some(Point::ZERO),
            _ if !self.auto_expand => return None,
            Some(steps) => steps,
            None => {
                tracing::debug!(resolution = self.resolution, "area cannot fit");
                return None;
            }
        };
        let mut offset = Point::ZERO;
        for _ in 0..steps {
            match self.expand_once() {
                Ok(step) => offset += step,
                Err(err) => {
                    tracing::debug!(%err, "auto-expansion stopped");
                    return None;
                }
            }
            tracing::debug!(resolution = self.resolution, ?offset, "auto-expanded");
        }
        Some(offset)
    }

    /// How many expansions it takes before `area` lies inside the tree, replaying the
    /// offsets each expansion applies. `None` if that would exceed
    /// [`MAX_RESOLUTION`](crate::MAX_RESOLUTION).
    fn doublings_to_fit(&self, area: Aabb) -> Option<u32> {
        let mut resolution = self.resolution;
        let mut shifted = area;
        let mut steps = 0;
        loop {
            let side = side_for(resolution).ok()?;
            if Aabb::square(side).contains_aabb(&shifted) {
                return Some(steps);
            }
            resolution += 1;
            let grown = side_for(resolution).ok()?;
            shifted = shifted.translate(Point::splat(grown / 4));
            steps += 1;
        }
    }

    /// Make a node Black with `value`. Returns false if it already held an equal value.
    fn set_node(&mut self, id: NodeId, value: &T) -> bool {
        match &mut self.node_mut(id).data {
            NodeData::Black(v) if *v == *value => false,
            NodeData::Black(v) => {
                let old = core::mem::replace(v, value.clone());
                self.notify(id, Notify::Changed(&old));
                true
            }
            NodeData::White => {
                self.node_mut(id).data = NodeData::Black(value.clone());
                self.notify(id, Notify::Added);
                true
            }
            NodeData::Grey(children) => {
                let children = *children;
                for c in children {
                    self.discard_subtree(c);
                }
                self.node_mut(id).data = NodeData::Black(value.clone());
                self.notify(id, Notify::Added);
                true
            }
        }
    }

    /// Set one cell, returning the leaf that changed.
    fn set_point_internal(&mut self, p: Point, value: &T) -> Option<NodeId> {
        let mut id = self.root;
        if !self.node(id).bounds.contains_point(p) {
            return None;
        }
        loop {
            let node = self.node(id);
            let splittable = node.depth < self.resolution;
            match &node.data {
                NodeData::Black(v) if *v == *value => return None,
                NodeData::Grey(_) => id = self.child_containing(id, p),
                _ if splittable => {
                    self.subdivide(id);
                    id = self.child_containing(id, p);
                }
                _ => return self.set_node(id, value).then_some(id),
            }
        }
    }

    /// Clear one cell, returning the leaf that changed.
    fn unset_point_internal(&mut self, p: Point) -> Option<NodeId> {
        let mut id = self.root;
        if !self.node(id).bounds.contains_point(p) {
            return None;
        }
        loop {
            let node = self.node(id);
            let splittable = node.depth < self.resolution;
            match &node.data {
                NodeData::White => return None,
                NodeData::Grey(_) => id = self.child_containing(id, p),
                NodeData::Black(_) if splittable => {
                    self.subdivide(id);
                    id = self.child_containing(id, p);
                }
                NodeData::Black(_) => return self.clear_node(id).then_some(id),
            }
        }
    }

    fn set_rect_internal(&mut self, id: NodeId, rect: Aabb, value: &T) -> bool {
        let node = self.node(id);
        if rect.contains_aabb(&node.bounds) {
            return self.set_node(id, value);
        }
        // A unit cell cannot be partially covered by an integer box.
        if !rect.intersects(&node.bounds) || node.depth >= self.resolution {
            return false;
        }
        let subdivided = match &node.data {
            NodeData::Black(v) if *v == *value => return false,
            NodeData::Grey(_) => false,
            _ => {
                self.subdivide(id);
                true
            }
        };
        let mut any = false;
        for c in self.grey_children(id) {
            any |= self.set_rect_internal(c, rect, value);
        }
        any || subdivided
    }

    fn unset_rect_internal(&mut self, id: NodeId, rect: Aabb) -> bool {
        let node = self.node(id);
        if let NodeData::White = node.data {
            return false;
        }
        if rect.contains_aabb(&node.bounds) {
            return self.clear_node(id);
        }
        if !rect.intersects(&node.bounds) || node.depth >= self.resolution {
            return false;
        }
        let subdivided = match node.data {
            NodeData::Grey(_) => false,
            _ => {
                self.subdivide(id);
                true
            }
        };
        let mut any = false;
        for c in self.grey_children(id) {
            any |= self.unset_rect_internal(c, rect);
        }
        any || subdivided
    }

    /// Split a White or Black node into four children that inherit its value.
    pub(crate) fn subdivide(&mut self, id: NodeId) {
        let node = self.node(id);
        assert!(
            node.depth < self.resolution,
            "cannot subdivide a node at maximum depth"
        );
        let (bounds, depth) = (node.bounds, node.depth);
        if let NodeData::Black(_) = node.data {
            self.notify(id, Notify::Removing);
        }
        let value = match core::mem::replace(&mut self.node_mut(id).data, NodeData::White) {
            NodeData::Black(v) => Some(v),
            NodeData::White => None,
            NodeData::Grey(_) => unreachable!("node {id:?} is already Grey"),
        };
        let children = Direction::QUADRANTS.map(|q| {
            let data = match &value {
                Some(v) => NodeData::Black(v.clone()),
                None => NodeData::White,
            };
            self.alloc(Some(id), depth + 1, Self::quadrant_bounds(bounds, q), data)
        });
        self.node_mut(id).data = NodeData::Grey(children);
        if value.is_some() {
            for c in children {
                self.notify(c, Notify::Added);
            }
        }
        tracing::trace!(?id, depth, "subdivided");
    }

    /// Collapse uniform Grey nodes at or below `id`, bottom-up.
    ///
    /// Returns true if any node merged.
    pub(crate) fn merge(&mut self, id: NodeId) -> bool {
        let NodeData::Grey(children) = self.node(id).data else {
            return false;
        };
        let mut any = false;
        for c in children {
            any |= self.merge(c);
        }
        self.collapse(id) || any
    }

    /// Collapse the ancestors of a single edited leaf, stopping at the first one that
    /// stays mixed.
    fn merge_up(&mut self, leaf: NodeId) {
        let mut cur = self.node(leaf).parent;
        while let Some(id) = cur
            && self.collapse(id)
        {
            cur = self.node(id).parent;
        }
    }

    /// Replace a Grey node by its children's common state if all four are equal
    /// Black leaves or all White.
    fn collapse(&mut self, id: NodeId) -> bool {
        let NodeData::Grey(children) = self.node(id).data else {
            return false;
        };
        let all_black_equal = match &self.node(children[0]).data {
            NodeData::Black(first) => children[1..]
                .iter()
                .all(|c| matches!(&self.node(*c).data, NodeData::Black(v) if v == first)),
            _ => false,
        };
        if all_black_equal {
            for c in children {
                self.notify(c, Notify::Removing);
            }
            let value =
                match core::mem::replace(&mut self.node_mut(children[0]).data, NodeData::White) {
                    NodeData::Black(v) => v,
                    _ => unreachable!("checked above"),
                };
            for c in children {
                self.free(c);
            }
            self.node_mut(id).data = NodeData::Black(value);
            self.notify(id, Notify::Added);
            tracing::trace!(?id, "merged into Black");
            return true;
        }
        if children
            .iter()
            .all(|c| matches!(self.node(*c).data, NodeData::White))
        {
            for c in children {
                self.free(c);
            }
            self.node_mut(id).data = NodeData::White;
            tracing::trace!(?id, "merged into White");
            return true;
        }
        false
    }
}

#[cfg(test)]
impl<T> Quadtree<T> {
    /// Check parent links, depths and quadrant bounds of the whole tree.
    pub(crate) fn assert_invariants(&self) {
        let mut stack = alloc::vec![self.root];
        assert_eq!(self.node(self.root).parent, None);
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            assert!(node.depth <= self.resolution, "depth above resolution");
            if let NodeData::Grey(children) = node.data {
                assert!(node.depth < self.resolution, "Grey node at max depth");
                for (q, c) in Direction::QUADRANTS.iter().zip(children) {
                    let child = self.node(c);
                    assert_eq!(child.parent, Some(id));
                    assert_eq!(child.depth, node.depth + 1);
                    assert_eq!(child.bounds, Self::quadrant_bounds(node.bounds, *q));
                    stack.push(c);
                }
            }
        }
    }
}

/// Box of every cell that can lie strictly within `radius` of `center`.
fn circle_cover(center: Point, radius: i32) -> Aabb {
    let reach = radius - 1;
    Aabb::new(
        Point::new(center.x.saturating_sub(reach), center.y.saturating_sub(reach)),
        Point::new(
            center.x.saturating_add(radius),
            center.y.saturating_add(radius),
        ),
    )
}

/// Largest centered square whose cells all lie strictly inside the circle.
fn inscribed_square(center: Point, radius: i32) -> Aabb {
    // Largest h with 2h² < r².
    let r2 = i64::from(radius) * i64::from(radius);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the half side never exceeds the radius."
    )]
    let half = ((r2 - 1) / 2).isqrt() as i32;
    Aabb::new(
        Point::new(center.x.saturating_sub(half), center.y.saturating_sub(half)),
        Point::new(
            center.x.saturating_add(half + 1),
            center.y.saturating_add(half + 1),
        ),
    )
}

fn dist2(a: Point, b: Point) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

/// Cells of the circle outside `inner`, clipped to `clip`, in row-major order.
fn ring_cells(center: Point, radius: i32, inner: Aabb, clip: Aabb) -> Vec<Point> {
    let cover = circle_cover(center, radius);
    let lo = Point::new(
        cover.lower.x.max(clip.lower.x),
        cover.lower.y.max(clip.lower.y),
    );
    let hi = Point::new(
        cover.upper.x.min(clip.upper.x),
        cover.upper.y.min(clip.upper.y),
    );
    let r2 = i64::from(radius) * i64::from(radius);
    let mut out = Vec::new();
    for y in lo.y..hi.y {
        let row_inside = y >= inner.lower.y && y < inner.upper.y;
        let (skip_from, skip_to) = if row_inside {
            (inner.lower.x, inner.upper.x)
        } else {
            (hi.x, hi.x)
        };
        let xs = (lo.x..hi.x.min(skip_from)).chain(skip_to.max(lo.x)..hi.x);
        for x in xs {
            let p = Point::new(x, y);
            if dist2(p, center) < r2 {
                out.push(p);
            }
        }
    }
    out
}
