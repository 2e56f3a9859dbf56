// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic region quadtree usage: fills, clears, events and enumeration.
//!
//! Run:
//! - `cargo run -p quadtree_demos --example quadtree_basics`
//! - `RUST_LOG=quadtree_region=trace cargo run -p quadtree_demos --example quadtree_basics`

use quadtree_region::{Aabb, EventMask, Point, QuadEvent, Quadtree};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut tree = Quadtree::new(3).expect("resolution 3 is valid");
    tree.subscribe(tree.root(), EventMask::all(), |e| match e {
        QuadEvent::Added { bounds, value, .. } => println!("  + {bounds:?} = {value}"),
        QuadEvent::Removing { bounds, value, .. } => println!("  - {bounds:?} (was {value})"),
        QuadEvent::Changed {
            bounds, old, value, ..
        } => println!("  ~ {bounds:?}: {old} -> {value}"),
        QuadEvent::Expand { offset, .. } => println!("  expanded, offset {offset:?}"),
    });

    info!("set (0,0) and (1,0)");
    tree.set_point(Point::new(0, 0), 'x');
    tree.set_point(Point::new(1, 0), 'x');

    info!("fill the south-east quadrant");
    tree.set_rect(Aabb::from_xywh(4, 4, 4, 4), 'y');

    info!("complete a 2x2 block, which merges");
    tree.set_point(Point::new(0, 1), 'x');
    tree.set_point(Point::new(1, 1), 'x');

    info!("recolor it in place");
    tree.set_point(Point::new(0, 0), 'z');

    info!("clear a cell out of the quadrant");
    tree.unset_point(Point::new(7, 7));

    let values: String = tree.values().collect();
    info!(leaves = tree.leaf_count(), ?values, "final tree");
    for id in tree.leaves() {
        println!(
            "  depth {} {:?} = {}",
            tree.depth(id).unwrap_or_default(),
            tree.bounds(id).unwrap_or_default(),
            tree.value(id).copied().unwrap_or(' ')
        );
    }
}
