// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Neighbor traversal and connected-component labeling.
//!
//! Run:
//! - `cargo run -p quadtree_demos --example quadtree_components`

use quadtree_region::{Aabb, Connectivity, Direction, Point, Quadtree};

const MAP: [&str; 8] = [
    "##....aa",
    "##....aa",
    "...#....",
    "....#...",
    "bb......",
    "bb..cccc",
    "....cccc",
    "#...cccc",
];

fn main() {
    let mut tree = Quadtree::new(3).expect("resolution 3 is valid");
    for (y, row) in (0..).zip(MAP) {
        for (x, ch) in (0..).zip(row.chars()) {
            if ch != '.' {
                tree.set_point(Point::new(x, y), ch);
            }
        }
    }
    // A solid quadrant collapses into one leaf; show it off with a rect fill too.
    tree.set_rect(Aabb::from_xywh(4, 4, 4, 4), 'c');

    for leaf in tree.traverse().take(3) {
        let east = leaf.neighbor(Direction::East).and_then(|n| tree.bounds(n));
        println!("{:?}: east neighbor {east:?}", tree.bounds(leaf.node));
    }

    for (label, connectivity) in [
        ("4-connected", Connectivity::Sides),
        ("8-connected", Connectivity::SidesAndCorners),
    ] {
        let components = tree.find_connected_components_with(connectivity);
        println!("{label}: {} components", components.len());
        for component in &components {
            let cells: i32 = component
                .iter()
                .filter_map(|id| tree.bounds(*id))
                .map(|b| b.width() * b.height())
                .sum();
            println!("  {} leaves, {cells} cells", component.len());
        }
    }

    let by_value = tree.find_value_components(Connectivity::SidesAndCorners);
    println!("by value: {} components", by_value.len());
}
