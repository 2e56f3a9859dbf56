// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping a display list in sync with a quadtree through events alone.
//!
//! The "renderer" keys its shapes by node bounds and scales them into screen space with
//! Kurbo; it never walks the tree.
//!
//! Run:
//! - `cargo run -p quadtree_demos --example quadtree_renderer`

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use kurbo::{Affine, Rect};
use quadtree_region::{Aabb, EventMask, Point, QuadEvent, Quadtree};

const CELL: f64 = 12.0;

#[derive(Default)]
struct DisplayList {
    shapes: BTreeMap<(i32, i32, i32), (Rect, u32)>,
    scale: Affine,
}

impl DisplayList {
    fn key(bounds: &Aabb) -> (i32, i32, i32) {
        (bounds.lower.x, bounds.lower.y, bounds.width())
    }

    fn apply(&mut self, event: &QuadEvent<'_, u32>) {
        match event {
            QuadEvent::Added { bounds, value, .. } => {
                let rect = self.scale.transform_rect_bbox(Rect::from(*bounds));
                self.shapes.insert(Self::key(bounds), (rect, **value));
            }
            QuadEvent::Removing { bounds, .. } => {
                self.shapes.remove(&Self::key(bounds));
            }
            QuadEvent::Changed { bounds, value, .. } => {
                if let Some(entry) = self.shapes.get_mut(&Self::key(bounds)) {
                    entry.1 = **value;
                }
            }
            QuadEvent::Expand { offset, .. } => {
                let shift =
                    Affine::translate((f64::from(offset.x) * CELL, f64::from(offset.y) * CELL));
                self.shapes = std::mem::take(&mut self.shapes)
                    .into_values()
                    .map(|(rect, color)| {
                        let moved = shift.transform_rect_bbox(rect);
                        let key = (
                            (moved.x0 / CELL) as i32,
                            (moved.y0 / CELL) as i32,
                            (moved.width() / CELL) as i32,
                        );
                        (key, (moved, color))
                    })
                    .collect();
            }
        }
    }

    fn area(&self) -> f64 {
        self.shapes.values().map(|(r, _)| r.area()).sum()
    }
}

fn main() {
    let list = Rc::new(RefCell::new(DisplayList {
        scale: Affine::scale(CELL),
        ..Default::default()
    }));

    let mut tree = Quadtree::new(4).expect("resolution 4 is valid");
    tree.set_auto_expand(true);
    let sink = list.clone();
    tree.subscribe(tree.root(), EventMask::all(), move |e| sink.borrow_mut().apply(e));

    tree.set_circle(Point::new(8, 8), 6, 0xff_00_00);
    tree.set_rect(Aabb::from_xywh(0, 0, 4, 4), 0x00_ff_00);
    tree.set_point(Point::new(20, 3), 0x00_00_ff);
    tree.unset_rect(Aabb::from_xywh(10, 6, 4, 4));

    let list = list.borrow();
    println!(
        "{} shapes covering {:.0} px² (tree: {} leaves, resolution {})",
        list.shapes.len(),
        list.area(),
        tree.leaf_count(),
        tree.resolution()
    );
    let cells: i64 = tree
        .leaves()
        .filter_map(|id| tree.bounds(id))
        .map(|b| i64::from(b.width()) * i64::from(b.height()))
        .sum();
    assert_eq!(list.shapes.len(), tree.leaf_count());
    assert!((list.area() - cells as f64 * CELL * CELL).abs() < 1e-6);
    for ((x, y, w), (rect, color)) in list.shapes.iter().take(8) {
        println!("  cell ({x}, {y}) size {w}: {rect:?} #{color:06x}");
    }
}
