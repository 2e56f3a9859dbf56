// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Union-find forest used by connected-component labeling.
//!
//! Elements live in one `Vec` and point at their parent by index, so `find` and
//! `union` never allocate and the forest cannot form ownership cycles.

use alloc::vec::Vec;

#[derive(Clone, Debug)]
struct Element<T> {
    item: T,
    parent: usize,
    rank: u32,
}

/// Path-compressed, union-by-rank disjoint-set forest.
#[derive(Clone, Debug)]
pub struct DisjointSet<T> {
    elements: Vec<Element<T>>,
}

impl<T> Default for DisjointSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DisjointSet<T> {
    /// Create an empty forest.
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Number of elements (not sets).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if no element was ever added.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add a singleton set and return its element index.
    pub fn make_set(&mut self, item: T) -> usize {
        let idx = self.elements.len();
        self.elements.push(Element {
            item,
            parent: idx,
            rank: 0,
        });
        idx
    }

    /// Payload of an element.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn item(&self, idx: usize) -> &T {
        &self.elements[idx].item
    }

    /// Representative of the set containing `idx`, compressing the path on the way.
    pub fn find(&mut self, idx: usize) -> usize {
        let mut root = idx;
        while self.elements[root].parent != root {
            root = self.elements[root].parent;
        }
        let mut cur = idx;
        while self.elements[cur].parent != root {
            let next = self.elements[cur].parent;
            self.elements[cur].parent = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`. Returns the new representative.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (rank_a, rank_b) = (self.elements[ra].rank, self.elements[rb].rank);
        if rank_a < rank_b {
            self.elements[ra].parent = rb;
            rb
        } else if rank_a > rank_b {
            self.elements[rb].parent = ra;
            ra
        } else {
            self.elements[rb].parent = ra;
            self.elements[ra].rank += 1;
            ra
        }
    }

    /// Whether `a` and `b` belong to the same set.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
