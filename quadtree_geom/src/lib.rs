// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree Geom: integer grid geometry for region quadtrees.
//!
//! - [`Point`]: integer point/offset with vector arithmetic and length.
//! - [`Aabb`]: half-open integer box `[lower, upper)` with containment, overlap and union.
//! - [`Direction`]: the 8-way compass (4 sides, 4 corners) with `opposite`,
//!   `clockwise_side`, `counter_clockwise_side` and `quadrant` composition.
//!
//! Coordinates are `i32`; the y axis grows south, so north is toward smaller `y`
//! and the north-west quadrant of a box touches its `lower` corner.
//!
//! # Example
//!
//! ```rust
//! use quadtree_geom::{Aabb, Direction, Point};
//!
//! let root = Aabb::square(8);
//! assert!(root.contains_point(Point::new(7, 7)));
//! assert!(!root.contains_point(Point::new(8, 8)));
//!
//! // The child sitting clockwise of a side's quadrant.
//! let q = Direction::quadrant(Direction::West, Direction::West.clockwise_side());
//! assert_eq!(q, Direction::NorthWest);
//! assert_eq!(q.opposite(), Direction::SouthEast);
//! ```
//!
//! Boxes and points convert into their `kurbo` counterparts so that display code can
//! scale them into its own units.
//!
//! This crate is `no_std`.

#![no_std]

pub mod direction;
pub mod types;

pub use direction::Direction;
pub use types::{Aabb, Point};
