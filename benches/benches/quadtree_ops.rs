// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use quadtree_region::{Aabb, Point, Quadtree};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_below(&mut self, bound: i32) -> i32 {
        (self.next_u64() % bound as u64) as i32
    }
}

fn gen_random_points(count: usize, side: i32) -> Vec<Point> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| Point::new(rng.next_below(side), rng.next_below(side)))
        .collect()
}

fn gen_random_rects(count: usize, side: i32, max_extent: i32) -> Vec<Aabb> {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    (0..count)
        .map(|_| {
            let w = 1 + rng.next_below(max_extent);
            let h = 1 + rng.next_below(max_extent);
            Aabb::from_xywh(rng.next_below(side - w), rng.next_below(side - h), w, h)
        })
        .collect()
}

/// Tree with scattered blobs of a few distinct values.
fn blob_tree(resolution: u32, blobs: usize) -> Quadtree<u8> {
    let side = 1 << resolution;
    let mut tree = Quadtree::new(resolution).unwrap();
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    for i in 0..blobs {
        let center = Point::new(rng.next_below(side), rng.next_below(side));
        let radius = 2 + rng.next_below(side / 16);
        tree.set_circle(center, radius, (i % 3) as u8);
    }
    tree
}

fn bench_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("points");
    for &res in &[6u32, 8, 10] {
        let points = gen_random_points(4096, 1 << res);
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("set_then_unset_res{res}"), |b| {
            b.iter_batched(
                || Quadtree::<u8>::new(res).unwrap(),
                |mut tree| {
                    for p in &points {
                        tree.set_point(*p, 1);
                    }
                    for p in points.iter().step_by(2) {
                        tree.unset_point(*p);
                    }
                    black_box(tree.leaf_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_rects(c: &mut Criterion) {
    let mut group = c.benchmark_group("rects");
    let rects = gen_random_rects(512, 1024, 96);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("set_rect_res10", |b| {
        b.iter_batched(
            || Quadtree::<u8>::new(10).unwrap(),
            |mut tree| {
                for (i, r) in rects.iter().enumerate() {
                    tree.set_rect(*r, (i % 4) as u8);
                }
                black_box(tree.leaf_count());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_circles(c: &mut Criterion) {
    let mut group = c.benchmark_group("circles");
    for &radius in &[8, 64, 256] {
        group.bench_function(format!("set_circle_r{radius}"), |b| {
            b.iter_batched(
                || Quadtree::<u8>::new(10).unwrap(),
                |mut tree| {
                    tree.set_circle(Point::new(512, 512), radius, 1);
                    black_box(tree.leaf_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.bench_function("auto_expand_walk", |b| {
        b.iter_batched(
            || {
                let mut tree = Quadtree::<u8>::new(4).unwrap();
                tree.set_auto_expand(true);
                tree
            },
            |mut tree| {
                for i in 0..64 {
                    tree.set_circle(Point::new(i * 12, i * 7), 5, 1);
                }
                black_box(tree.resolution());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let tree = blob_tree(9, 200);
    group.throughput(Throughput::Elements(tree.leaf_count() as u64));
    group.bench_function("traverse", |b| {
        b.iter(|| black_box(tree.traverse().count()))
    });
    group.bench_function("connected_components_8", |b| {
        b.iter(|| black_box(tree.find_connected_components(true).len()))
    });
    group.bench_function("connected_components_4", |b| {
        b.iter(|| black_box(tree.find_connected_components(false).len()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_points,
    bench_rects,
    bench_circles,
    bench_queries
);
criterion_main!(benches);
