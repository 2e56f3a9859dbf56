// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 8-way compass and its composition operators.
//!
//! Directions are indexed `0..8` in clockwise order starting at west, so sides
//! sit at even indices and corners at odd ones. A corner also names a quadrant
//! of a square: [`Direction::NorthWest`] is the quadrant touching both the
//! west and the north side.
//!
//! Every operator is a table lookup or a small index computation, which lets a
//! tree walk move between a node's neighbors and its children without looking
//! at coordinates.

/// One of the eight compass directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    /// Toward smaller x.
    West = 0,
    /// Corner between west and north.
    NorthWest = 1,
    /// Toward smaller y.
    North = 2,
    /// Corner between north and east.
    NorthEast = 3,
    /// Toward larger x.
    East = 4,
    /// Corner between east and south.
    SouthEast = 5,
    /// Toward larger y.
    South = 6,
    /// Corner between south and west.
    SouthWest = 7,
}

use Direction::*;

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 8] = [
        West, NorthWest, North, NorthEast, East, SouthEast, South, SouthWest,
    ];

    /// The four sides in index order.
    pub const SIDES: [Self; 4] = [West, North, East, South];

    /// The four corners in index order.
    pub const CORNERS: [Self; 4] = [NorthWest, NorthEast, SouthEast, SouthWest];

    /// Quadrants in child order: NW, NE, SE, SW.
    ///
    /// This is the same sequence as [`Direction::CORNERS`]; the alias reads
    /// better where a corner is used to pick a child.
    pub const QUADRANTS: [Self; 4] = Self::CORNERS;

    /// Position in `0..8`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index % 8`.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    /// True for west, north, east and south.
    pub const fn is_side(self) -> bool {
        self.index() % 2 == 0
    }

    /// True for the four diagonal directions.
    pub const fn is_corner(self) -> bool {
        !self.is_side()
    }

    /// The direction 180° around.
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// The first side reached going clockwise from `self`.
    ///
    /// For a corner this is the side bounding the corner on its clockwise
    /// flank (`NorthWest` → `North`); for a side it is the next side
    /// (`West` → `North`).
    pub const fn clockwise_side(self) -> Self {
        if self.is_side() {
            Self::from_index(self.index() + 2)
        } else {
            Self::from_index(self.index() + 1)
        }
    }

    /// The first side reached going counter-clockwise from `self`.
    ///
    /// `NorthWest` → `West`, `West` → `South`.
    pub const fn counter_clockwise_side(self) -> Self {
        if self.is_side() {
            Self::from_index(self.index() + 6)
        } else {
            Self::from_index(self.index() + 7)
        }
    }

    /// The corner between two adjacent sides, given in either order.
    ///
    /// # Panics
    ///
    /// Panics if `a` and `b` are not two perpendicular sides.
    pub const fn quadrant(a: Self, b: Self) -> Self {
        assert!(
            a.is_side() && b.is_side(),
            "quadrant() takes two side directions"
        );
        let (lo, hi) = if a.index() < b.index() {
            (a.index(), b.index())
        } else {
            (b.index(), a.index())
        };
        match (lo, hi) {
            (0, 2) => NorthWest,
            (2, 4) => NorthEast,
            (4, 6) => SouthEast,
            (0, 6) => SouthWest,
            _ => panic!("quadrant() takes two adjacent side directions"),
        }
    }

    /// Child slot of a quadrant: NW → 0, NE → 1, SE → 2, SW → 3.
    ///
    /// # Panics
    ///
    /// Panics if `self` is a side.
    pub const fn quadrant_index(self) -> usize {
        assert!(self.is_corner(), "only corners name quadrants");
        self.index() / 2
    }

    /// Unit grid offset of the direction, with north pointing to smaller y.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            West => (-1, 0),
            NorthWest => (-1, -1),
            North => (0, -1),
            NorthEast => (1, -1),
            East => (1, 0),
            SouthEast => (1, 1),
            South => (0, 1),
            SouthWest => (-1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_sides() {
        assert_eq!(East.opposite(), West);
        assert_eq!(South.opposite(), North);
        assert_eq!(West.opposite(), East);
        assert_eq!(North.opposite(), South);
        assert_eq!(NorthWest.opposite(), SouthEast);
        assert_eq!(SouthWest.opposite(), NorthEast);
    }

    #[test]
    fn clockwise_side_of_sides_and_corners() {
        assert_eq!(North.clockwise_side(), East);
        assert_eq!(East.clockwise_side(), South);
        assert_eq!(South.clockwise_side(), West);
        assert_eq!(West.clockwise_side(), North);
        assert_eq!(NorthWest.clockwise_side(), North);
        assert_eq!(SouthWest.clockwise_side(), West);
    }

    #[test]
    fn counter_clockwise_side_of_sides_and_corners() {
        assert_eq!(North.counter_clockwise_side(), West);
        assert_eq!(East.counter_clockwise_side(), North);
        assert_eq!(South.counter_clockwise_side(), East);
        assert_eq!(West.counter_clockwise_side(), South);
        assert_eq!(NorthWest.counter_clockwise_side(), West);
        assert_eq!(SouthEast.counter_clockwise_side(), East);
    }

    #[test]
    fn quadrant_is_symmetric() {
        assert_eq!(Direction::quadrant(North, West), NorthWest);
        assert_eq!(Direction::quadrant(West, North), NorthWest);
        assert_eq!(Direction::quadrant(North, East), NorthEast);
        assert_eq!(Direction::quadrant(East, North), NorthEast);
        assert_eq!(Direction::quadrant(South, East), SouthEast);
        assert_eq!(Direction::quadrant(East, South), SouthEast);
        assert_eq!(Direction::quadrant(South, West), SouthWest);
        assert_eq!(Direction::quadrant(West, South), SouthWest);
    }

    #[test]
    #[should_panic(expected = "adjacent")]
    fn quadrant_rejects_parallel_sides() {
        let _ = Direction::quadrant(North, South);
    }

    #[test]
    fn corners_are_bounded_by_their_sides() {
        for c in Direction::CORNERS {
            let q = Direction::quadrant(c.clockwise_side(), c.counter_clockwise_side());
            assert_eq!(q, c, "{c:?} should be rebuilt from its two sides");
        }
    }

    #[test]
    fn side_then_clockwise_names_child_order() {
        let children: [Direction; 4] =
            Direction::SIDES.map(|d| Direction::quadrant(d, d.clockwise_side()));
        assert_eq!(children, [NorthWest, NorthEast, SouthEast, SouthWest]);
        for (i, q) in Direction::QUADRANTS.iter().enumerate() {
            assert_eq!(q.quadrant_index(), i);
        }
    }

    #[test]
    fn offsets_are_opposite() {
        for d in Direction::ALL {
            let (x, y) = d.offset();
            let (ox, oy) = d.opposite().offset();
            assert_eq!((x + ox, y + oy), (0, 0), "{d:?}");
            assert_eq!(d.is_corner(), x != 0 && y != 0);
        }
    }
}
