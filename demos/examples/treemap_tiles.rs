// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The same hierarchy tiled by each treemap strategy, then relaid with
//! `Resquarify` after the values change.
//!
//! Run:
//! - `RUST_LOG=understory_hierarchy=trace cargo run -p understory_hierarchy_demos --example treemap_tiles`

use kurbo::Rect;
use understory_hierarchy::{
    Binary, Dice, Hierarchy, Resquarify, Slice, SliceDice, Squarify, Tile, TileInput, Treemap,
};
use understory_hierarchy_demos::setup_logging;

fn build() -> Hierarchy<(&'static str, f64)> {
    let mut tree = Hierarchy::new(("root", 0.0));
    let root = tree.root();
    let a = tree.insert(root, ("a", 0.0));
    let b = tree.insert(root, ("b", 0.0));
    for (name, v) in [("a1", 6.0), ("a2", 6.0), ("a3", 4.0), ("a4", 3.0)] {
        tree.insert(a, (name, v));
    }
    for (name, v) in [("b1", 2.0), ("b2", 2.0), ("b3", 1.0)] {
        tree.insert(b, (name, v));
    }
    tree.sum(|d| d.1);
    tree
}

fn print(title: &str, tree: &Hierarchy<(&'static str, f64)>) {
    println!("{title}");
    for id in tree.leaves(tree.root()) {
        let r = tree[id].rect();
        println!(
            "  {:<3} ({:6.2}, {:6.2}) - ({:6.2}, {:6.2})",
            tree[id].data().0,
            r.x0,
            r.y0,
            r.x1,
            r.y1
        );
    }
}

fn run<L: Tile>(title: &str, tile: L) {
    let mut tree = build();
    Treemap::new()
        .size(60.0, 40.0)
        .padding_inner(1.0)
        .padding_top(3.0)
        .round(true)
        .tile(tile)
        .layout(&mut tree);
    print(title, &tree);
}

fn main() {
    setup_logging();

    run("dice", Dice);
    run("slice", Slice);
    run("slice-dice", SliceDice);
    run("binary", Binary);
    run("squarify", Squarify::new());
    run("squarify (ratio 1)", Squarify::with_ratio(1.0));
    run(
        "custom: dice wide parents, slice tall ones",
        |input: &TileInput<'_>, rect: Rect, out: &mut [Rect]| {
            if rect.width() >= rect.height() {
                understory_hierarchy::dice(input.values, rect, out);
            } else {
                understory_hierarchy::slice(input.values, rect, out);
            }
        },
    );

    let mut tree = build();
    let mut map = Treemap::new().size(60.0, 40.0).tile(Resquarify::new());
    map.layout(&mut tree);
    print("resquarify", &tree);
    for id in tree.leaves(tree.root()) {
        if let Some(d) = tree.data_mut(id) {
            d.1 = 7.0 - d.1;
        }
    }
    tree.sum(|d| d.1);
    map.layout(&mut tree);
    print("resquarify after the values change (same rows)", &tree);
}
