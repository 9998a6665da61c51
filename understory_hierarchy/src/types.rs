// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for hierarchies: node identifiers, links, and padding.

use alloc::rc::Rc;
use core::fmt;

use crate::hierarchy::Node;

/// Identifier for a node in a [`Hierarchy`](crate::Hierarchy).
///
/// Identifiers are only meaningful for the hierarchy that produced them. Within
/// one hierarchy a parent's identifier always sorts before its children's.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A parent-child edge, as returned by [`Hierarchy::links`](crate::Hierarchy::links).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Link {
    /// The parent node.
    pub source: NodeId,
    /// The child node.
    pub target: NodeId,
}

/// Padding applied around or between nodes by a layout.
///
/// Every padding form is normalized to a `(node) -> f64` function: constants
/// convert with [`From<f64>`], and per-node padding is built with
/// [`Padding::from_fn`].
pub struct Padding<T>(Rc<dyn Fn(&Node<T>) -> f64>);

impl<T> Padding<T> {
    /// Padding that is the same for every node.
    pub fn constant(value: f64) -> Self {
        debug_assert!(value.is_finite(), "padding must be finite; got {value}");
        Self(Rc::new(move |_| value))
    }

    /// Padding computed per node.
    pub fn from_fn(f: impl Fn(&Node<T>) -> f64 + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Evaluate the padding for `node`. `NaN` results are treated as zero.
    pub fn get(&self, node: &Node<T>) -> f64 {
        let p = (self.0)(node);
        if p.is_nan() { 0.0 } else { p }
    }
}

impl<T> Clone for Padding<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Default for Padding<T> {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl<T> From<f64> for Padding<T> {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl<T> fmt::Debug for Padding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Padding").finish_non_exhaustive()
    }
}
