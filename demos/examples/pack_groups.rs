// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle packing of a small two-level hierarchy.
//!
//! Run:
//! - `cargo run -p understory_hierarchy_demos --example pack_groups`

use understory_hierarchy::{Hierarchy, Node, Pack, Padding};
use understory_hierarchy_demos::setup_logging;

#[derive(Debug)]
struct Item {
    name: &'static str,
    size: f64,
}

fn main() {
    setup_logging();

    let mut tree = Hierarchy::new(Item { name: "all", size: 0.0 });
    let root = tree.root();
    for (group, members) in [
        ("fruit", &[("apple", 30.0), ("pear", 12.0), ("fig", 4.0)][..]),
        ("veg", &[("leek", 20.0), ("kale", 18.0)][..]),
        ("nuts", &[("almond", 9.0), ("pecan", 7.0), ("hazel", 5.0), ("brazil", 2.0)][..]),
    ] {
        let g = tree.insert(root, Item { name: group, size: 0.0 });
        for &(name, size) in members {
            tree.insert(g, Item { name, size });
        }
    }
    tree.sum(|item| item.size)
        .sort_by(|a, b| b.value().partial_cmp(&a.value()).unwrap_or(core::cmp::Ordering::Equal));

    Pack::new()
        .size(400.0, 400.0)
        .padding(Padding::from_fn(|n: &Node<Item>| if n.depth() == 0 { 8.0 } else { 3.0 }))
        .layout(&mut tree);

    for id in tree.pre_order(root) {
        let node = &tree[id];
        let c = node.circle();
        println!(
            "{:indent$}{:<8} center=({:7.2}, {:7.2}) r={:6.2}",
            "",
            node.data().name,
            c.center.x,
            c.center.y,
            c.radius,
            indent = node.depth() * 2
        );
    }
}
