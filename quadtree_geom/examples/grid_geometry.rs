// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Quadtree Geom: boxes, points and the direction algebra.

use quadtree_geom::{Aabb, Direction, Point};

fn main() {
    let root = Aabb::square(8);
    let cell = Aabb::from_xywh(3, 4, 1, 1);
    println!("root {root:?} contains {cell:?}: {}", root.contains_aabb(&cell));
    println!(
        "(8, 8) inside root: {}",
        root.contains_point(Point::new(8, 8))
    );

    let v = Point::new(3, 4);
    println!("|{v:?}| = {} (squared {})", v.length(), v.length_squared());

    for d in Direction::ALL {
        let corner = if d.is_side() {
            Some(Direction::quadrant(d, d.clockwise_side()))
        } else {
            None
        };
        println!(
            "{d:?}: opposite {:?}, cw side {:?}, ccw side {:?}, quadrant with cw side {corner:?}",
            d.opposite(),
            d.clockwise_side(),
            d.counter_clockwise_side()
        );
    }

    let rect: kurbo::Rect = cell.into();
    println!("as kurbo rect: {rect:?}");
}
