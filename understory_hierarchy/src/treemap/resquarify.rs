// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use tracing::trace;

use super::squarify::{GOLDEN_RATIO, Row, clamp_ratio, squarify_ratio};
use super::{Tile, TileInput, dice, slice};
use crate::types::NodeId;

/// Row grouping remembered for one parent by [`Resquarify`].
#[derive(Clone, Debug, PartialEq)]
pub struct RowLayout {
    ratio: f64,
    children: Vec<NodeId>,
    rows: Vec<Row>,
}

impl RowLayout {
    /// The aspect ratio the rows were computed for.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Children in the order the rows index into.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The rows, in layout order. Row values are refreshed on every reuse.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Members of `row` as node identifiers.
    pub fn members(&self, row: &Row) -> &[NodeId] {
        &self.children[row.range.clone()]
    }
}

/// Squarified tiling that keeps its row grouping stable across layouts.
///
/// The first layout of a parent squarifies normally and remembers which
/// children share a row and each row's orientation. Later layouts of the same
/// parent, with the same children and ratio, keep that grouping and only
/// resize rows for the new values, which keeps animated transitions
/// readable. A different child set or ratio squarifies afresh.
///
/// The remembered rows are held in this value, keyed by parent; reuse the
/// same `Resquarify` (for example through [`Treemap::tiling_mut`]) to keep
/// them.
///
/// [`Treemap::tiling_mut`]: crate::Treemap::tiling_mut
#[derive(Clone, Debug)]
pub struct Resquarify {
    ratio: f64,
    table: HashMap<NodeId, RowLayout>,
    values: Vec<f64>,
    slots: Vec<usize>,
    scratch: Vec<Rect>,
}

impl Resquarify {
    /// Resquarify toward the golden ratio.
    pub fn new() -> Self {
        Self::with_ratio(GOLDEN_RATIO)
    }

    /// Resquarify toward `ratio`. Ratios below one are treated as one.
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            ratio: clamp_ratio(ratio),
            table: HashMap::new(),
            values: Vec::new(),
            slots: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// The target aspect ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Change the target ratio. Stored rows are recomputed on next use.
    pub fn set_ratio(&mut self, ratio: f64) {
        self.ratio = clamp_ratio(ratio);
    }

    /// The rows remembered for `parent`, if it has been tiled.
    pub fn rows(&self, parent: NodeId) -> Option<&RowLayout> {
        self.table.get(&parent)
    }

    /// Forget every remembered row grouping.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Map each stored child to its position in `children`, or `None` if the
    /// child sets differ.
    fn match_children(layout: &RowLayout, children: &[NodeId], slots: &mut Vec<usize>) -> bool {
        if layout.children.len() != children.len() {
            return false;
        }
        slots.clear();
        if layout.children == children {
            slots.extend(0..children.len());
            return true;
        }
        let positions: HashMap<NodeId, usize> =
            children.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        for c in &layout.children {
            match positions.get(c) {
                Some(&i) => slots.push(i),
                None => return false,
            }
        }
        positions.len() == children.len()
    }
}

impl Default for Resquarify {
    fn default() -> Self {
        Self::new()
    }
}

impl Tile for Resquarify {
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        let reusable = match self.table.get(&input.parent) {
            Some(layout) => {
                layout.ratio == self.ratio
                    && Self::match_children(layout, input.children, &mut self.slots)
            }
            None => false,
        };

        if !reusable {
            trace!(parent = ?input.parent, children = input.children.len(), "resquarify: new rows");
            let rows = squarify_ratio(self.ratio, input.values, rect, out);
            self.table.insert(
                input.parent,
                RowLayout {
                    ratio: self.ratio,
                    children: input.children.to_vec(),
                    rows,
                },
            );
            return;
        }

        let Some(layout) = self.table.get_mut(&input.parent) else {
            unreachable!("reusable layouts are present in the table");
        };
        trace!(parent = ?input.parent, rows = layout.rows.len(), "resquarify: reusing rows");

        // Values in stored order.
        self.values.clear();
        self.values
            .extend(self.slots.iter().map(|&i| input.values[i]));
        self.scratch.clear();
        self.scratch.resize(self.slots.len(), Rect::ZERO);

        let mut value: f64 = self.values.iter().sum();
        let Rect {
            mut x0,
            mut y0,
            x1,
            y1,
        } = rect;
        let count = layout.rows.len();
        for (index, row) in layout.rows.iter_mut().enumerate() {
            let range = row.range.clone();
            row.value = self.values[range.clone()].iter().sum();
            let last = index + 1 == count || value == 0.0;
            if row.dice {
                let y = if last {
                    y1
                } else {
                    y0 + (y1 - y0) * row.value / value
                };
                dice(&self.values[range.clone()], Rect::new(x0, y0, x1, y), &mut self.scratch[range]);
                y0 = y;
            } else {
                let x = if last {
                    x1
                } else {
                    x0 + (x1 - x0) * row.value / value
                };
                slice(&self.values[range.clone()], Rect::new(x0, y0, x, y1), &mut self.scratch[range]);
                x0 = x;
            }
            value -= row.value;
        }

        for (&slot, &r) in self.slots.iter().zip(&self.scratch) {
            out[slot] = r;
        }
    }
}
