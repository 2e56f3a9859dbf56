// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Growing a tree around its content, explicitly and through auto-expansion.
//!
//! Run:
//! - `cargo run -p quadtree_demos --example quadtree_expand`
//! - `RUST_LOG=debug cargo run -p quadtree_demos --example quadtree_expand`

use quadtree_region::{Point, QuadEvent, Quadtree};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut tree = Quadtree::new(2).expect("resolution 2 is valid");
    tree.on_expand(|e| {
        if let QuadEvent::Expand { root, offset } = e {
            info!(?root, ?offset, "new root, shift cached positions");
        }
    });

    tree.set_point(Point::new(0, 0), "origin");
    tree.set_point(Point::new(3, 3), "corner");

    match tree.expand_from_center() {
        Ok(root) => info!(bounds = ?tree.bounds(root), "expanded"),
        Err(err) => warn!(%err, "could not expand"),
    }
    info!(value = ?tree.value_at(Point::new(2, 2)), "origin moved to (2, 2)");

    // Out-of-bounds writes fail until auto-expansion is turned on.
    let far = Point::new(40, -5);
    let changed = tree.set_point(far, "far");
    info!(?far, changed, "set without auto-expand");
    tree.set_auto_expand(true);
    let changed = tree.set_point(far, "far");
    info!(?far, changed, "set with auto-expand");
    info!(
        resolution = tree.resolution(),
        bounds = ?tree.root_bounds(),
        values = ?tree.values().collect::<Vec<_>>(),
        "final tree"
    );
}
