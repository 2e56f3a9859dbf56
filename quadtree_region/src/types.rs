// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the region quadtree: node identifiers, node states, and event masks.

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - Subdivision allocates four fresh slots for the children.
/// - Merging frees the children; any existing `NodeId` that pointed to them is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
/// - Expansion re-parents existing nodes, so their ids stay valid; only the old root is freed.
///
/// Use [`Quadtree::is_alive`](crate::Quadtree::is_alive) to check whether a `NodeId` still
/// refers to a live node. Stale ids never alias a different live node because the generation
/// must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Observable state of a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum QuadState {
    /// Empty leaf: no value, no children.
    White,
    /// Uniform leaf holding one value.
    Black,
    /// Internal node with exactly four children.
    Grey,
}

/// Which neighbors count as adjacent when grouping leaves into components.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Connectivity {
    /// 4-connected: leaves must share an edge.
    Sides,
    /// 8-connected: leaves sharing only a corner are adjacent too.
    #[default]
    SidesAndCorners,
}

impl Connectivity {
    /// `true` selects [`Connectivity::SidesAndCorners`].
    pub const fn from_use_quadrants(use_quadrants: bool) -> Self {
        if use_quadrants {
            Self::SidesAndCorners
        } else {
            Self::Sides
        }
    }

    /// Whether corner neighbors are considered.
    pub const fn includes_corners(self) -> bool {
        matches!(self, Self::SidesAndCorners)
    }
}

bitflags::bitflags! {
    /// Event kinds a subscription wants to receive.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        /// A Black node appeared.
        const ADDED    = 0b0000_0001;
        /// A Black node is about to lose its value.
        const REMOVING = 0b0000_0010;
        /// A Black node's value was replaced in place.
        const CHANGED  = 0b0000_0100;
        /// The tree grew a new root.
        const EXPAND   = 0b0000_1000;
    }
}

impl Default for EventMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Handle returned by subscriptions, used to unsubscribe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);
