// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circle-packing layout.
//!
//! Leaves become circles whose area is proportional to their value (or whose
//! radius is given directly); each parent is the smallest circle enclosing
//! its packed children.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point, Size};
use tracing::debug;

use crate::hierarchy::{Hierarchy, Node};
use crate::types::{NodeId, Padding};
use crate::util::Lcg;

mod enclose;
mod siblings;

pub use enclose::pack_enclose;
pub use siblings::pack_siblings;

use siblings::pack_siblings_random;

type RadiusFn<T> = Box<dyn Fn(&Node<T>) -> f64>;

/// Circle-packing layout configuration.
///
/// ```rust
/// use understory_hierarchy::{Hierarchy, Pack};
///
/// let mut tree = Hierarchy::new(0.0);
/// let root = tree.root();
/// tree.insert(root, 1.0);
/// tree.insert(root, 4.0);
/// tree.sum(|v| *v);
///
/// Pack::new().size(100.0, 100.0).layout(&mut tree);
/// let c = tree[root].circle();
/// assert!((c.radius - 50.0).abs() < 1e-9);
/// assert_eq!((c.center.x, c.center.y), (50.0, 50.0));
/// ```
pub struct Pack<T> {
    size: Size,
    padding: Padding<T>,
    radius: Option<RadiusFn<T>>,
}

impl<T> Pack<T> {
    /// A layout of size 1×1 with no padding, sizing leaves by value.
    pub fn new() -> Self {
        Self {
            size: Size::new(1.0, 1.0),
            padding: Padding::default(),
            radius: None,
        }
    }

    /// Set the layout extent.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        debug_assert!(
            width.is_finite() && height.is_finite(),
            "pack size must be finite; got {width}×{height}"
        );
        self.size = Size::new(width, height);
        self
    }

    /// Set the gap left between sibling circles and their enclosing parent.
    pub fn padding(mut self, padding: impl Into<Padding<T>>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Size leaves with an explicit radius instead of `√value`.
    ///
    /// In this mode the packing is not scaled to fit [`size`](Self::size);
    /// only the root is centered in it. Negative and `NaN` radii become zero.
    pub fn radius(mut self, radius: impl Fn(&Node<T>) -> f64 + 'static) -> Self {
        self.radius = Some(Box::new(radius));
        self
    }

    /// Assign a [`circle`](Node::circle) to every node of `tree`.
    ///
    /// Without a radius accessor, leaf values must already be set with
    /// [`Hierarchy::sum`] or [`Hierarchy::count`]; missing values count as zero.
    pub fn layout(&self, tree: &mut Hierarchy<T>) {
        debug!(
            nodes = tree.node_count(),
            width = self.size.width,
            height = self.size.height,
            radius_mode = self.radius.is_some(),
            "pack layout"
        );
        let mut random = Lcg::new();
        let root = tree.root();
        tree.node_mut(root).circle.center = Point::new(self.size.width / 2.0, self.size.height / 2.0);
        let order: Vec<NodeId> = tree.post_order(root).collect();

        if let Some(radius) = &self.radius {
            for &id in &order {
                let node = tree.node(id);
                if node.is_leaf() {
                    let r = radius(node);
                    tree.node_mut(id).circle.radius = if r > 0.0 { r } else { 0.0 };
                }
            }
            pack_pass(tree, &order, &mut random, |node| self.padding.get(node) * 0.5);
            translate(tree, 1.0);
        } else {
            for &id in &order {
                let node = tree.node(id);
                if node.is_leaf() {
                    let v = node.value().unwrap_or(0.0);
                    tree.node_mut(id).circle.radius = if v > 0.0 { v.sqrt() } else { 0.0 };
                }
            }
            pack_pass(tree, &order, &mut random, |_| 0.0);
            let extent = self.size.min_side();
            let k = tree.node(root).circle.radius / extent;
            pack_pass(tree, &order, &mut random, |node| self.padding.get(node) * k);
            let r = tree.node(root).circle.radius;
            translate(tree, if r > 0.0 { extent / (2.0 * r) } else { 0.0 });
        }

        debug!(radius = tree.node(root).circle.radius, "pack layout done");
    }
}

impl<T> Default for Pack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Pack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pack")
            .field("size", &self.size)
            .field("padding", &self.padding)
            .field("radius_mode", &self.radius.is_some())
            .finish()
    }
}

/// Pack the children of every internal node in `order` (children first),
/// leaving `gap(node)` around each child.
///
/// Child centers end up relative to their parent's center.
fn pack_pass<T>(
    tree: &mut Hierarchy<T>,
    order: &[NodeId],
    random: &mut Lcg,
    gap: impl Fn(&Node<T>) -> f64,
) {
    let mut circles: Vec<Circle> = Vec::new();
    let mut kids: Vec<NodeId> = Vec::new();
    for &id in order {
        let node = tree.node(id);
        if node.is_leaf() {
            continue;
        }
        let r = gap(node);
        let r = if r.is_nan() { 0.0 } else { r };

        kids.clear();
        kids.extend_from_slice(node.children());
        circles.clear();
        circles.extend(kids.iter().map(|&c| {
            let mut circle = tree.node(c).circle;
            circle.radius += r;
            circle
        }));
        let e = pack_siblings_random(&mut circles, random);

        for (&c, circle) in kids.iter().zip(&circles) {
            tree.node_mut(c).circle = Circle::new(circle.center, circle.radius - r);
        }
        tree.node_mut(id).circle.radius = e + r;
    }
}

/// Scale every radius by `k` and turn relative centers into absolute ones.
fn translate<T>(tree: &mut Hierarchy<T>, k: f64) {
    // Parents precede children in id order.
    for id in tree.ids().collect::<Vec<_>>() {
        let node = tree.node(id);
        let center = match node.parent() {
            Some(p) => tree.node(p).circle.center + node.circle.center.to_vec2() * k,
            None => node.circle.center,
        };
        let circle = &mut tree.node_mut(id).circle;
        circle.radius *= k;
        circle.center = center;
    }
}
