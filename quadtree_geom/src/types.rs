// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: integer points and half-open boxes.

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Integer point (or offset) on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column, growing east.
    pub x: i32,
    /// Row, growing south.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Point with both coordinates set to `v`.
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v }
    }

    /// Squared Euclidean length, widened so it cannot overflow.
    pub const fn length_squared(self) -> i64 {
        let x = self.x as i64;
        let y = self.y as i64;
        x * x + y * y
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        kurbo::Vec2::new(f64::from(self.x), f64::from(self.y)).hypot()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<i32> for Point {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Point> for i32 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        rhs * self
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

/// Axis-aligned integer box covering the half-open range `[lower, upper)`.
///
/// A box with `upper.x <= lower.x` or `upper.y <= lower.y` covers no cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Aabb {
    /// Inclusive north-west corner.
    pub lower: Point,
    /// Exclusive south-east corner.
    pub upper: Point,
}

impl Aabb {
    /// Create a new box from its corners.
    pub const fn new(lower: Point, upper: Point) -> Self {
        Self { lower, upper }
    }

    /// Create a box from origin and size.
    pub const fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            lower: Point::new(x, y),
            upper: Point::new(x + w, y + h),
        }
    }

    /// Square box of side `size` anchored at the origin.
    pub const fn square(size: i32) -> Self {
        Self::from_xywh(0, 0, size, size)
    }

    /// Horizontal extent.
    pub const fn width(&self) -> i32 {
        self.upper.x - self.lower.x
    }

    /// Vertical extent.
    pub const fn height(&self) -> i32 {
        self.upper.y - self.lower.y
    }

    /// True if the box covers no cells.
    pub const fn is_empty(&self) -> bool {
        self.upper.x <= self.lower.x || self.upper.y <= self.lower.y
    }

    /// Whether the cell at `p` lies inside the box.
    pub const fn contains_point(&self, p: Point) -> bool {
        p.x >= self.lower.x && p.x < self.upper.x && p.y >= self.lower.y && p.y < self.upper.y
    }

    /// Whether `other` lies fully inside this box. Edges may coincide.
    pub const fn contains_aabb(&self, other: &Self) -> bool {
        other.lower.x >= self.lower.x
            && other.lower.y >= self.lower.y
            && other.upper.x <= self.upper.x
            && other.upper.y <= self.upper.y
    }

    /// Whether the two boxes share at least one cell. Touching edges do not count.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.lower.x < other.upper.x
            && other.lower.x < self.upper.x
            && self.lower.y < other.upper.y
            && other.lower.y < self.upper.y
    }

    /// Smallest box covering both inputs.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            lower: Point::new(
                self.lower.x.min(other.lower.x),
                self.lower.y.min(other.lower.y),
            ),
            upper: Point::new(
                self.upper.x.max(other.upper.x),
                self.upper.y.max(other.upper.y),
            ),
        }
    }

    /// The box shifted by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            lower: self.lower + offset,
            upper: self.upper + offset,
        }
    }

    /// Center of the box, rounded toward the lower corner.
    pub const fn center(&self) -> Point {
        Point::new(
            self.lower.x + self.width() / 2,
            self.lower.y + self.height() / 2,
        )
    }
}

impl From<Aabb> for kurbo::Rect {
    fn from(b: Aabb) -> Self {
        Self::new(
            f64::from(b.lower.x),
            f64::from(b.lower.y),
            f64::from(b.upper.x),
            f64::from(b.upper.y),
        )
    }
}
