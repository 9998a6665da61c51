// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adjacency ("icicle") layout.

use alloc::vec::Vec;

use kurbo::{Rect, Size};
use tracing::debug;

use crate::hierarchy::Hierarchy;
use crate::treemap::dice;
use crate::types::NodeId;
use crate::util::{inset_or_collapse, round_rect};

/// Partition layout configuration.
///
/// Every depth gets a horizontal band of equal height, and each node spans
/// the horizontal extent of its children. Values must be set with
/// [`Hierarchy::sum`] or [`Hierarchy::count`] first.
///
/// ```rust
/// use kurbo::Rect;
/// use understory_hierarchy::{Hierarchy, Partition};
///
/// let mut tree = Hierarchy::new(0.0);
/// let root = tree.root();
/// let a = tree.insert(root, 1.0);
/// tree.insert(root, 1.0);
/// tree.sum(|v| *v);
///
/// Partition::new().size(4.0, 2.0).layout(&mut tree);
/// assert_eq!(tree[root].rect(), Rect::new(0.0, 0.0, 4.0, 1.0));
/// assert_eq!(tree[a].rect(), Rect::new(0.0, 1.0, 2.0, 2.0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Partition {
    size: Size,
    padding: f64,
    round: bool,
}

impl Partition {
    /// A 1×1 layout without padding or rounding.
    pub const fn new() -> Self {
        Self {
            size: Size::new(1.0, 1.0),
            padding: 0.0,
            round: false,
        }
    }

    /// Set the layout extent.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        debug_assert!(
            width.is_finite() && height.is_finite(),
            "partition size must be finite; got {width}×{height}"
        );
        self.size = Size::new(width, height);
        self
    }

    /// Gap left on the right and bottom of every node.
    pub fn padding(mut self, padding: f64) -> Self {
        debug_assert!(padding.is_finite(), "padding must be finite; got {padding}");
        self.padding = padding;
        self
    }

    /// Round every coordinate to the nearest integer (halves round up).
    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Assign a [`rect`](crate::Node::rect) to every node of `tree`.
    pub fn layout<T>(&self, tree: &mut Hierarchy<T>) {
        let root = tree.root();
        let height = self.size.height;
        #[allow(
            clippy::cast_precision_loss,
            reason = "Tree heights are far below 2^52."
        )]
        let bands = (tree.node(root).height() + 1) as f64;
        debug!(nodes = tree.node_count(), bands, "partition layout");

        tree.node_mut(root).rect = Rect::new(self.padding, self.padding, self.size.width, height / bands);

        let mut values: Vec<f64> = Vec::new();
        let mut rects: Vec<Rect> = Vec::new();
        let order: Vec<NodeId> = tree.pre_order(root).collect();
        for id in order {
            let node = tree.node(id);
            let r = node.rect;
            if !node.is_leaf() {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "Tree depths are far below 2^52."
                )]
                let depth = node.depth() as f64;
                values.clear();
                values.extend(
                    node.children()
                        .iter()
                        .map(|&c| tree.node(c).value().unwrap_or(0.0)),
                );
                rects.clear();
                rects.resize(values.len(), Rect::ZERO);
                let band = Rect::new(
                    r.x0,
                    height * (depth + 1.0) / bands,
                    r.x1,
                    height * (depth + 2.0) / bands,
                );
                dice(&values, band, &mut rects);
                let children = node.children().to_vec();
                for (c, rect) in children.into_iter().zip(&rects) {
                    tree.node_mut(c).rect = *rect;
                }
            }
            tree.node_mut(id).rect =
                inset_or_collapse(r.x0, r.y0, r.x1 - self.padding, r.y1 - self.padding);
        }

        if self.round {
            for id in tree.ids().collect::<Vec<_>>() {
                let node = tree.node_mut(id);
                node.rect = round_rect(node.rect);
            }
        }
    }
}

impl Default for Partition {
    fn default() -> Self {
        Self::new()
    }
}
