// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notification.
//!
//! ## Overview
//!
//! Every structural change is reported as a [`QuadEvent`] raised on the affected node
//! and then bubbled up through each ancestor to the root, so a subscription on any
//! node sees every change inside its subtree.
//!
//! ## Ordering
//!
//! - A Black leaf whose value is replaced in place reports only [`QuadEvent::Changed`].
//! - Subdividing a Black node reports [`QuadEvent::Removing`] for it before the four
//!   children report [`QuadEvent::Added`] in NW, NE, SE, SW order.
//! - Merging four equal Black children reports [`QuadEvent::Removing`] for each child
//!   in NW, NE, SE, SW order, then one [`QuadEvent::Added`] for the parent.
//! - Merging four White children is silent.
//! - [`QuadEvent::Expand`] is raised on the new root only.
//!
//! Handlers receive the event by reference and cannot reach the tree that raised it,
//! so they cannot observe or mutate a half-finished structural change.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;
use quadtree_geom::{Aabb, Point};

use crate::types::{EventMask, NodeId, SubscriptionId};

/// A structural change.
#[derive(Debug)]
pub enum QuadEvent<'a, T> {
    /// A node became Black.
    Added {
        /// The node holding the value.
        node: NodeId,
        /// Its region.
        bounds: Aabb,
        /// The new value.
        value: &'a T,
    },
    /// A Black node is about to stop holding its value (cleared, subdivided or merged away).
    Removing {
        /// The node losing the value.
        node: NodeId,
        /// Its region.
        bounds: Aabb,
        /// The value being discarded.
        value: &'a T,
    },
    /// A Black node's value was replaced in place.
    Changed {
        /// The node.
        node: NodeId,
        /// Its region.
        bounds: Aabb,
        /// Value before the change.
        old: &'a T,
        /// Value after the change.
        value: &'a T,
    },
    /// The tree grew a new root twice the size of the old one.
    Expand {
        /// The new root.
        root: NodeId,
        /// Amount to add to every cached position (in old-root units).
        offset: Point,
    },
}

impl<T> QuadEvent<'_, T> {
    /// The mask bit matching this event.
    pub fn kind(&self) -> EventMask {
        match self {
            Self::Added { .. } => EventMask::ADDED,
            Self::Removing { .. } => EventMask::REMOVING,
            Self::Changed { .. } => EventMask::CHANGED,
            Self::Expand { .. } => EventMask::EXPAND,
        }
    }

    /// Region of the affected node, if the event is about a single node.
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Self::Added { bounds, .. }
            | Self::Removing { bounds, .. }
            | Self::Changed { bounds, .. } => Some(*bounds),
            Self::Expand { .. } => None,
        }
    }
}

/// Boxed event handler.
pub type Handler<T> = Box<dyn FnMut(&QuadEvent<'_, T>)>;

struct Subscription<T> {
    id: SubscriptionId,
    mask: EventMask,
    handler: Handler<T>,
}

/// Per-node subscription lists.
pub(crate) struct Listeners<T> {
    by_node: HashMap<NodeId, Vec<Subscription<T>>>,
    next_id: u64,
}

impl<T> core::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total: usize = self.by_node.values().map(Vec::len).sum();
        f.debug_struct("Listeners")
            .field("nodes", &self.by_node.len())
            .field("subscriptions", &total)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            by_node: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Listeners<T> {
    pub(crate) fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    pub(crate) fn subscribe(
        &mut self,
        node: NodeId,
        mask: EventMask,
        handler: Handler<T>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.by_node
            .entry(node)
            .or_default()
            .push(Subscription { id, mask, handler });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut emptied = None;
        let mut found = false;
        for (node, subs) in self.by_node.iter_mut() {
            if let Some(pos) = subs.iter().position(|s| s.id == id) {
                subs.remove(pos);
                found = true;
                if subs.is_empty() {
                    emptied = Some(*node);
                }
                break;
            }
        }
        if let Some(node) = emptied {
            self.by_node.remove(&node);
        }
        found
    }

    /// Drop every subscription attached to a node that no longer exists.
    pub(crate) fn forget(&mut self, node: NodeId) {
        self.by_node.remove(&node);
    }

    /// Move subscriptions from `from` onto `to`, keeping their order.
    pub(crate) fn transfer(&mut self, from: NodeId, to: NodeId) {
        if let Some(mut subs) = self.by_node.remove(&from) {
            self.by_node.entry(to).or_default().append(&mut subs);
        }
    }

    /// Deliver `event` to the subscriptions of every node in `path`, in path order.
    pub(crate) fn emit(&mut self, path: impl Iterator<Item = NodeId>, event: &QuadEvent<'_, T>) {
        let kind = event.kind();
        for node in path {
            let Some(subs) = self.by_node.get_mut(&node) else {
                continue;
            };
            for sub in subs.iter_mut().filter(|s| s.mask.intersects(kind)) {
                (sub.handler)(event);
            }
        }
    }
}
