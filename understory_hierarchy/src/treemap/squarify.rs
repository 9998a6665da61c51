// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::Rect;

use super::{Tile, TileInput, dice, slice};

/// The golden ratio, `(1 + √5) / 2`, the default target aspect ratio.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// One row produced by [`squarify_ratio`].
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Sum of the values laid out in this row.
    pub value: f64,
    /// Whether the row was diced (children side by side) rather than sliced.
    pub dice: bool,
    /// Positions of the row's members in the input.
    pub range: Range<usize>,
}

/// Squarified tiling with target aspect ratio `ratio`.
///
/// Children are peeled off in input order into rows along the shorter side
/// of the remaining rect. A row keeps growing while adding the next child
/// does not make its worst aspect ratio (measured against `ratio`) worse.
/// Zero values at the start of a row join it without affecting the ratio.
///
/// Returns the rows in the order they were laid out.
pub fn squarify_ratio(ratio: f64, values: &[f64], rect: Rect, out: &mut [Rect]) -> Vec<Row> {
    debug_assert_eq!(values.len(), out.len(), "one output rect per value");
    let n = values.len().min(out.len());
    let mut rows = Vec::new();
    let mut value: f64 = values[..n].iter().sum();
    let Rect {
        mut x0,
        mut y0,
        x1,
        y1,
    } = rect;

    let mut i0 = 0;
    let mut i1 = 0;
    while i0 < n {
        let dx = x1 - x0;
        let dy = y1 - y0;

        let mut sum;
        loop {
            sum = values[i1];
            i1 += 1;
            if sum != 0.0 || i1 >= n {
                break;
            }
        }
        let mut min = sum;
        let mut max = sum;
        let alpha = (dy / dx).max(dx / dy) / (value * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max / beta).max(beta / min);

        while i1 < n {
            let v = values[i1];
            sum += v;
            min = min.min(v);
            max = max.max(v);
            beta = sum * sum * alpha;
            let new_ratio = (max / beta).max(beta / min);
            if new_ratio > min_ratio {
                sum -= v;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = Row {
            value: sum,
            dice: dx < dy,
            range: i0..i1,
        };
        // The last row takes whatever is left.
        let last = i1 >= n || value == 0.0;
        if row.dice {
            let y = if last { y1 } else { y0 + dy * sum / value };
            dice(&values[i0..i1], Rect::new(x0, y0, x1, y), &mut out[i0..i1]);
            y0 = y;
        } else {
            let x = if last { x1 } else { x0 + dx * sum / value };
            slice(&values[i0..i1], Rect::new(x0, y0, x, y1), &mut out[i0..i1]);
            x0 = x;
        }
        rows.push(row);
        value -= sum;
        i0 = i1;
    }
    rows
}

pub(crate) fn clamp_ratio(ratio: f64) -> f64 {
    debug_assert!(!ratio.is_nan(), "squarify ratio must not be NaN");
    if ratio > 1.0 { ratio } else { 1.0 }
}

/// Squarified treemap tile.
///
/// ```rust
/// use understory_hierarchy::Squarify;
///
/// assert_eq!(Squarify::new().ratio(), understory_hierarchy::GOLDEN_RATIO);
/// assert_eq!(Squarify::with_ratio(0.5).ratio(), 1.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Squarify {
    ratio: f64,
}

impl Squarify {
    /// Squarify toward the golden ratio.
    pub const fn new() -> Self {
        Self {
            ratio: GOLDEN_RATIO,
        }
    }

    /// Squarify toward `ratio`. Ratios below one are treated as one.
    pub fn with_ratio(ratio: f64) -> Self {
        Self {
            ratio: clamp_ratio(ratio),
        }
    }

    /// The target aspect ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

impl Default for Squarify {
    fn default() -> Self {
        Self::new()
    }
}

impl Tile for Squarify {
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        squarify_ratio(self.ratio, input.values, rect, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn area(out: &[Rect]) -> f64 {
        out.iter().map(|r| r.area()).sum()
    }

    fn assert_disjoint(out: &[Rect]) {
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                let overlap = a.intersect(*b).area();
                assert!(overlap < 1e-9, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn rows_cover_the_rect() {
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let mut out = [Rect::ZERO; 7];
        let rect = Rect::new(0.0, 0.0, 6.0, 4.0);
        let rows = squarify_ratio(1.0, &values, rect, &mut out);
        assert!((area(&out) - 24.0).abs() < 1e-9);
        assert_disjoint(&out);
        for (v, r) in values.iter().zip(&out) {
            assert!((r.area() - v).abs() < 1e-9, "value {v} got {r:?}");
        }
        let covered: usize = rows.iter().map(|r| r.range.len()).sum();
        assert_eq!(covered, values.len());
    }

    #[test]
    fn first_row_runs_along_short_side() {
        let mut out = [Rect::ZERO; 2];
        let rows = squarify_ratio(GOLDEN_RATIO, &[1.0, 1.0], Rect::new(0.0, 0.0, 4.0, 1.0), &mut out);
        assert!(!rows[0].dice, "wide rect slices a column first");
        assert_eq!(out[0], Rect::new(0.0, 0.0, 2.0, 1.0));
        assert_eq!(out[1], Rect::new(2.0, 0.0, 4.0, 1.0));
    }

    #[test]
    fn leading_zero_joins_the_first_row() {
        let values = [0.0, 4.0, 4.0];
        let mut out = [Rect::ZERO; 3];
        let rows = squarify_ratio(1.0, &values, Rect::new(0.0, 0.0, 4.0, 2.0), &mut out);
        assert_eq!(rows[0].range.start, 0);
        assert!(rows[0].range.end >= 2);
        assert_eq!(out[0].area(), 0.0);
        assert!(out.iter().all(|r| r.is_finite()), "{out:?}");
        assert!((area(&out) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn last_row_reaches_the_far_edges() {
        let rect = Rect::new(0.0, 0.0, 97.3, 61.7);
        for n in 1..40 {
            let values: Vec<f64> = (0..n).map(|i| 1.3 + f64::from(i) * 0.7).collect();
            let mut out = vec![Rect::ZERO; values.len()];
            squarify_ratio(GOLDEN_RATIO, &values, rect, &mut out);
            let x1 = out.iter().map(|r| r.x1).fold(f64::MIN, f64::max);
            let y1 = out.iter().map(|r| r.y1).fold(f64::MIN, f64::max);
            assert_eq!((x1, y1), (rect.x1, rect.y1), "{n} values");
        }
    }

    #[test]
    fn all_zero_values_stay_finite() {
        let mut out = vec![Rect::ZERO; 4];
        squarify_ratio(GOLDEN_RATIO, &[0.0; 4], Rect::new(0.0, 0.0, 4.0, 4.0), &mut out);
        assert!(out.iter().all(|r| r.is_finite()), "{out:?}");
    }

    #[test]
    fn degenerate_rect_stays_finite() {
        let mut out = [Rect::ZERO; 3];
        squarify_ratio(GOLDEN_RATIO, &[1.0, 2.0, 3.0], Rect::new(2.0, 2.0, 2.0, 2.0), &mut out);
        assert!(out.iter().all(|r| r.is_finite() && r.area() == 0.0), "{out:?}");
    }
}
