// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a hierarchy from file paths and lay it out as an icicle chart.
//!
//! Run:
//! - `cargo run -p understory_hierarchy_demos --example stratify_paths`

use understory_hierarchy::{Partition, Stratify, StratifyPath};
use understory_hierarchy_demos::setup_logging;

fn main() {
    setup_logging();

    let files = [
        ("/src/lib.rs", 120.0),
        ("/src/pack/mod.rs", 300.0),
        ("/src/pack/enclose.rs", 180.0),
        ("/src/treemap/mod.rs", 260.0),
        ("/README.md", 40.0),
    ];
    let mut tree = StratifyPath::new(|f: &(&str, f64)| f.0.to_string())
        .stratify(files)
        .unwrap_or_else(|e| panic!("paths form a tree: {e}"));
    tree.sum(|f| f.map_or(0.0, |f| f.1));

    Partition::new()
        .size(800.0, 120.0)
        .padding(1.0)
        .round(true)
        .layout(&mut tree);
    for id in tree.pre_order(tree.root()) {
        let node = &tree[id];
        let r = node.rect();
        println!(
            "{:indent$}{} [{} .. {}] x [{} .. {}]",
            "",
            node.id().unwrap_or("?"),
            r.x0,
            r.x1,
            r.y0,
            r.y1,
            indent = node.depth() * 2
        );
    }

    // Flat id/parent-id records report structural problems instead of panicking.
    let broken = [("a", None), ("b", Some("a")), ("c", Some("x"))];
    let result = Stratify::new(
        |r: &(&str, Option<&str>)| Some(r.0.to_string()),
        |r: &(&str, Option<&str>)| r.1.map(str::to_string),
    )
    .stratify(broken);
    match result {
        Ok(_) => println!("unexpectedly valid"),
        Err(e) => println!("stratify failed: {e}"),
    }
}
