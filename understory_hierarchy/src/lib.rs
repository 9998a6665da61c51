// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hierarchy --heading-base-level=0

//! Understory Hierarchy: hierarchical layouts over a Kurbo-native tree.
//!
//! Understory Hierarchy turns tree-shaped data into geometry for
//! visualizations such as circle packs, treemaps, and icicle charts.
//!
//! - Builds an explicit tree from flat id/parent-id records with [`Stratify`],
//!   or from slash-separated paths with [`StratifyPath`].
//! - Provides traversal and aggregation over the tree ([`Hierarchy::sum`],
//!   [`Hierarchy::count`], [`Hierarchy::sort_by`], ancestors, leaves, paths).
//! - Computes circle packings ([`Pack`]), treemaps ([`Treemap`]) with a family
//!   of tiling strategies, and adjacency diagrams ([`Partition`]).
//!
//! ## Not a renderer
//!
//! Layouts only write a [`Circle`](kurbo::Circle) or [`Rect`](kurbo::Rect)
//! into each node. Drawing, interaction, and animation are left to the caller;
//! the tree is plain data that can be read back with [`Node::circle`] and
//! [`Node::rect`].
//!
//! Layouts are deterministic: the same tree and configuration always give the
//! same geometry. Circle packing is a good local packing, not an optimal one.
//!
//! ## API overview
//!
//! - [`Hierarchy`]: arena-backed tree with exactly one root.
//! - [`Node`]: per-node datum plus derived `depth`, `height`, and `value`.
//! - [`NodeId`]: handle of a node within its hierarchy.
//! - [`Stratify`] / [`StratifyPath`]: build a hierarchy from records;
//!   failures are reported as [`StratifyError`].
//! - [`Pack`], [`pack_siblings`], [`pack_enclose`]: circle packing.
//! - [`Treemap`] with a [`Tile`]: [`Dice`], [`Slice`], [`SliceDice`],
//!   [`Binary`], [`Squarify`], or [`Resquarify`].
//! - [`Partition`]: one band per depth.
//!
//! ## Example
//!
//! ```rust
//! use understory_hierarchy::{Stratify, Treemap};
//!
//! let records = [("root", ""), ("a", "root"), ("b", "root"), ("c", "a")];
//! let mut tree = Stratify::new(
//!     |r: &(&str, &str)| Some(r.0.into()),
//!     |r: &(&str, &str)| (!r.1.is_empty()).then(|| r.1.into()),
//! )
//! .stratify(records)
//! .unwrap();
//!
//! tree.count();
//! Treemap::new().size(100.0, 50.0).layout(&mut tree);
//!
//! let area: f64 = tree
//!     .leaves(tree.root())
//!     .into_iter()
//!     .map(|id| tree[id].rect().area())
//!     .sum();
//! assert!((area - 5000.0).abs() < 1e-9);
//! ```
//!
//! ## Logging
//!
//! Layout and stratify calls emit [`tracing`] events at `debug` level, and
//! per-parent tiling decisions at `trace` level. No subscriber is installed
//! by this crate.
//!
//! ## Features
//!
//! - `std` (default): use the standard library for float math.
//! - `libm`: float math through `libm` for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hierarchy;
mod pack;
mod partition;
mod stratify;
mod treemap;
mod types;
mod util;

pub use hierarchy::{BreadthFirst, Hierarchy, Node, PostOrder, PreOrder};
pub use pack::{Pack, pack_enclose, pack_siblings};
pub use partition::Partition;
pub use stratify::{Stratify, StratifyError, StratifyPath};
pub use treemap::{
    Binary, Dice, GOLDEN_RATIO, Resquarify, Row, RowLayout, Slice, SliceDice, Squarify, Tile,
    TileInput, Treemap, binary, dice, slice, squarify_ratio,
};
pub use types::{Link, NodeId, Padding};
