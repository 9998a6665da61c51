// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap layout and tiling strategies.
//!
//! A [`Treemap`] walks the hierarchy top-down. For every parent it shrinks
//! the parent's rect by the configured padding and hands the remainder to a
//! [`Tile`], which divides it among the children by value.
//!
//! ## Tiles
//!
//! - [`Dice`]: side by side, left to right.
//! - [`Slice`]: stacked, top to bottom.
//! - [`SliceDice`]: alternates by depth.
//! - [`Binary`]: balanced bisection.
//! - [`Squarify`]: rows of roughly square cells (the default).
//! - [`Resquarify`]: squarify, then keep the row grouping on later layouts.
//!
//! Any `FnMut(&TileInput<'_>, Rect, &mut [Rect])` closure is a tile too.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};
use tracing::{debug, trace};

use crate::hierarchy::Hierarchy;
use crate::types::{NodeId, Padding};
use crate::util::{inset_or_collapse, round_rect};

mod binary;
mod dice;
mod resquarify;
mod slice;
mod slice_dice;
mod squarify;

pub use binary::{Binary, binary};
pub use dice::{Dice, dice};
pub use resquarify::{Resquarify, RowLayout};
pub use slice::{Slice, slice};
pub use slice_dice::SliceDice;
pub use squarify::{GOLDEN_RATIO, Row, Squarify, squarify_ratio};

/// What a [`Tile`] sees of the parent being tiled.
#[derive(Copy, Clone, Debug)]
pub struct TileInput<'a> {
    /// The parent whose children are being laid out.
    pub parent: NodeId,
    /// Depth of the parent.
    pub depth: usize,
    /// The parent's children, in order.
    pub children: &'a [NodeId],
    /// Each child's value, parallel to `children`. Missing values are zero.
    pub values: &'a [f64],
}

/// A treemap tiling strategy.
///
/// Implementations fill `out[i]` with the rect for `input.children[i]`,
/// dividing `rect` among the children. `out` has one slot per child.
pub trait Tile {
    /// Divide `rect` among the children described by `input`.
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]);
}

impl<F> Tile for F
where
    F: FnMut(&TileInput<'_>, Rect, &mut [Rect]),
{
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        self(input, rect, out);
    }
}

/// Treemap layout configuration.
///
/// Node values must be set with [`Hierarchy::sum`] or [`Hierarchy::count`]
/// before layout. Each parent's children are tiled by the sum of their own
/// values, so a parent may carry a value of its own without leaving a gap.
///
/// ```rust
/// use kurbo::Rect;
/// use understory_hierarchy::{Dice, Hierarchy, Treemap};
///
/// let mut tree = Hierarchy::new(0.0);
/// let root = tree.root();
/// let a = tree.insert(root, 1.0);
/// let b = tree.insert(root, 3.0);
/// tree.sum(|v| *v);
///
/// Treemap::new().size(8.0, 2.0).tile(Dice).layout(&mut tree);
/// assert_eq!(tree[a].rect(), Rect::new(0.0, 0.0, 2.0, 2.0));
/// assert_eq!(tree[b].rect(), Rect::new(2.0, 0.0, 8.0, 2.0));
/// ```
pub struct Treemap<T, L = Squarify> {
    size: Size,
    tile: L,
    round: bool,
    inner: Padding<T>,
    top: Padding<T>,
    right: Padding<T>,
    bottom: Padding<T>,
    left: Padding<T>,
}

impl<T> Treemap<T> {
    /// A 1×1 squarified treemap without padding or rounding.
    pub fn new() -> Self {
        Self {
            size: Size::new(1.0, 1.0),
            tile: Squarify::new(),
            round: false,
            inner: Padding::default(),
            top: Padding::default(),
            right: Padding::default(),
            bottom: Padding::default(),
            left: Padding::default(),
        }
    }
}

impl<T> Default for Treemap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, L: Tile> Treemap<T, L> {
    /// Set the layout extent; the root covers `(0, 0)` to `(width, height)`.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        debug_assert!(
            width.is_finite() && height.is_finite(),
            "treemap size must be finite; got {width}×{height}"
        );
        self.size = Size::new(width, height);
        self
    }

    /// Use `tile` to divide each parent among its children.
    pub fn tile<M: Tile>(self, tile: M) -> Treemap<T, M> {
        Treemap {
            size: self.size,
            tile,
            round: self.round,
            inner: self.inner,
            top: self.top,
            right: self.right,
            bottom: self.bottom,
            left: self.left,
        }
    }

    /// Round every coordinate to the nearest integer (halves round up).
    pub fn round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Set both inner and outer padding.
    pub fn padding(self, padding: impl Into<Padding<T>>) -> Self {
        let padding = padding.into();
        self.padding_inner(padding.clone()).padding_outer(padding)
    }

    /// Gap between adjacent children of a parent.
    pub fn padding_inner(mut self, padding: impl Into<Padding<T>>) -> Self {
        self.inner = padding.into();
        self
    }

    /// Gap between a parent's edges and its children, on all four sides.
    pub fn padding_outer(self, padding: impl Into<Padding<T>>) -> Self {
        let padding = padding.into();
        self.padding_top(padding.clone())
            .padding_right(padding.clone())
            .padding_bottom(padding.clone())
            .padding_left(padding)
    }

    /// Gap between a parent's top edge and its children.
    pub fn padding_top(mut self, padding: impl Into<Padding<T>>) -> Self {
        self.top = padding.into();
        self
    }

    /// Gap between a parent's right edge and its children.
    pub fn padding_right(mut self, padding: impl Into<Padding<T>>) -> Self {
        self.right = padding.into();
        self
    }

    /// Gap between a parent's bottom edge and its children.
    pub fn padding_bottom(mut self, padding: impl Into<Padding<T>>) -> Self {
        self.bottom = padding.into();
        self
    }

    /// Gap between a parent's left edge and its children.
    pub fn padding_left(mut self, padding: impl Into<Padding<T>>) -> Self {
        self.left = padding.into();
        self
    }

    /// The tile in use.
    pub fn tiling(&self) -> &L {
        &self.tile
    }

    /// Mutable access to the tile, e.g. to clear [`Resquarify`] state.
    pub fn tiling_mut(&mut self) -> &mut L {
        &mut self.tile
    }

    /// Assign a [`rect`](crate::Node::rect) to every node of `tree`.
    pub fn layout(&mut self, tree: &mut Hierarchy<T>) {
        debug!(
            nodes = tree.node_count(),
            width = self.size.width,
            height = self.size.height,
            round = self.round,
            "treemap layout"
        );
        let root = tree.root();
        tree.node_mut(root).rect = Rect::from_origin_size(Point::ZERO, self.size);

        // Half the inner padding of each depth's parent, indexed by depth.
        let mut inset: Vec<f64> = vec![0.0];
        let mut children: Vec<NodeId> = Vec::new();
        let mut values: Vec<f64> = Vec::new();
        let mut rects: Vec<Rect> = Vec::new();

        let order: Vec<NodeId> = tree.pre_order(root).collect();
        for id in order {
            let node = tree.node(id);
            let depth = node.depth();
            let p = inset[depth];
            let r = node.rect;
            let rect = inset_or_collapse(r.x0 + p, r.y0 + p, r.x1 - p, r.y1 - p);
            if node.is_leaf() {
                tree.node_mut(id).rect = rect;
                continue;
            }

            let p = self.inner.get(node) / 2.0;
            inset.truncate(depth + 1);
            inset.push(p);
            let inner = inset_or_collapse(
                rect.x0 + self.left.get(node) - p,
                rect.y0 + self.top.get(node) - p,
                rect.x1 - (self.right.get(node) - p),
                rect.y1 - (self.bottom.get(node) - p),
            );

            children.clear();
            children.extend_from_slice(node.children());
            values.clear();
            values.extend(
                children
                    .iter()
                    .map(|&c| tree.node(c).value().unwrap_or(0.0)),
            );
            rects.clear();
            rects.resize(children.len(), Rect::ZERO);

            let input = TileInput {
                parent: id,
                depth,
                children: &children,
                values: &values,
            };
            trace!(parent = ?id, depth, children = children.len(), "tile");
            self.tile.tile(&input, inner, &mut rects);

            tree.node_mut(id).rect = rect;
            for (&c, &r) in children.iter().zip(&rects) {
                tree.node_mut(c).rect = r;
            }
        }

        if self.round {
            for id in tree.ids().collect::<Vec<_>>() {
                let node = tree.node_mut(id);
                node.rect = round_rect(node.rect);
            }
        }
    }
}

impl<T, L: fmt::Debug> fmt::Debug for Treemap<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Treemap")
            .field("size", &self.size)
            .field("tile", &self.tile)
            .field("round", &self.round)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Node;

    fn two_level() -> (Hierarchy<f64>, Vec<NodeId>) {
        let mut t = Hierarchy::new(0.0);
        let root = t.root();
        let a = t.insert(root, 0.0);
        let b = t.insert(root, 0.0);
        let mut ids = vec![root, a, b];
        for v in [3.0, 1.0] {
            ids.push(t.insert(a, v));
        }
        for v in [2.0, 2.0] {
            ids.push(t.insert(b, v));
        }
        t.sum(|v| *v);
        (t, ids)
    }

    #[test]
    fn children_partition_parent() {
        let (mut t, ids) = two_level();
        Treemap::new().size(80.0, 40.0).layout(&mut t);
        for &id in &ids {
            let node = &t[id];
            if node.is_leaf() {
                continue;
            }
            let area: f64 = node.children().iter().map(|&c| t[c].rect().area()).sum();
            assert!((area - node.rect().area()).abs() < 1e-9, "{id:?}");
        }
        let leaves = &ids[3..];
        for (i, &a) in leaves.iter().enumerate() {
            for &b in &leaves[i + 1..] {
                assert!(t[a].rect().intersect(t[b].rect()).area() < 1e-9);
            }
        }
    }

    #[test]
    fn outer_padding_insets_children() {
        let (mut t, ids) = two_level();
        Treemap::new()
            .size(100.0, 100.0)
            .tile(SliceDice)
            .padding_outer(5.0)
            .layout(&mut t);
        assert_eq!(t[ids[0]].rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(t[ids[1]].rect(), Rect::new(5.0, 5.0, 50.0, 95.0));
        assert_eq!(t[ids[2]].rect(), Rect::new(50.0, 5.0, 95.0, 95.0));
    }

    #[test]
    fn inner_padding_separates_siblings() {
        let mut t = Hierarchy::new(0.0);
        let root = t.root();
        let a = t.insert(root, 1.0);
        let b = t.insert(root, 1.0);
        t.sum(|v| *v);
        Treemap::new()
            .size(10.0, 4.0)
            .tile(Dice)
            .padding_inner(2.0)
            .layout(&mut t);
        assert_eq!(t[a].rect(), Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(t[b].rect(), Rect::new(6.0, 0.0, 10.0, 4.0));
    }

    #[test]
    fn per_side_and_functional_padding() {
        let (mut t, ids) = two_level();
        Treemap::new()
            .size(100.0, 100.0)
            .tile(Dice)
            .padding_top(Padding::from_fn(|n: &Node<f64>| if n.depth() == 0 { 20.0 } else { 0.0 }))
            .layout(&mut t);
        assert_eq!(t[ids[1]].rect().y0, 20.0);
        assert_eq!(t[ids[3]].rect().y0, 20.0, "depth one adds no top padding");
    }

    #[test]
    fn oversized_padding_collapses_without_nan() {
        let (mut t, _) = two_level();
        Treemap::new().size(10.0, 10.0).padding(50.0).layout(&mut t);
        for id in t.ids() {
            let r = t[id].rect();
            assert!(r.is_finite(), "{id:?}: {r:?}");
            assert!(r.width() >= 0.0 && r.height() >= 0.0, "{id:?}: {r:?}");
        }
    }

    #[test]
    fn rounding_keeps_shared_edges() {
        let mut t = Hierarchy::new(0.0);
        let root = t.root();
        let kids: Vec<NodeId> = (0..3).map(|_| t.insert(root, 1.0)).collect();
        t.sum(|v| *v);
        Treemap::new().size(10.0, 3.0).tile(Dice).round(true).layout(&mut t);
        let rects: Vec<Rect> = kids.iter().map(|&k| t[k].rect()).collect();
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 3.0, 3.0));
        assert_eq!(rects[0].x1, rects[1].x0);
        assert_eq!(rects[1].x1, rects[2].x0);
        assert_eq!(rects[2].x1, 10.0);
    }

    #[test]
    fn closures_are_tiles() {
        let (mut t, ids) = two_level();
        let mut seen = Vec::new();
        Treemap::new()
            .size(4.0, 4.0)
            .tile(|input: &TileInput<'_>, rect: Rect, out: &mut [Rect]| {
                seen.push(input.parent);
                slice(input.values, rect, out);
            })
            .layout(&mut t);
        assert_eq!(seen, vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn resquarify_state_is_reachable() {
        let (mut t, ids) = two_level();
        let mut map = Treemap::new().size(10.0, 10.0).tile(Resquarify::new());
        map.layout(&mut t);
        assert!(map.tiling().rows(ids[0]).is_some());
        map.tiling_mut().clear();
        assert!(map.tiling().rows(ids[0]).is_none());
    }
}
