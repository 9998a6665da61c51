// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Rect;

use super::{Tile, TileInput};

/// Recursively bisect `rect` into `out`, balancing value on each side.
///
/// Each step splits the run of values at the point nearest half its total,
/// cutting across the longer side of the current rect. The result is a
/// balanced binary tree of rectangles that keeps the input order. Runs of
/// zero values split by count.
///
/// ```rust
/// use kurbo::Rect;
/// use understory_hierarchy::binary;
///
/// let mut out = [Rect::ZERO; 2];
/// binary(&[1.0, 3.0], Rect::new(0.0, 0.0, 8.0, 2.0), &mut out);
/// assert_eq!(out, [Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(2.0, 0.0, 8.0, 2.0)]);
/// ```
pub fn binary(values: &[f64], rect: Rect, out: &mut [Rect]) {
    debug_assert_eq!(values.len(), out.len(), "one output rect per value");
    let n = values.len().min(out.len());
    if n == 0 {
        return;
    }

    // sums[i] is the total of values[..i].
    let mut sums = Vec::with_capacity(n + 1);
    let mut total = 0.0;
    sums.push(total);
    for &v in &values[..n] {
        total += v;
        sums.push(total);
    }

    let mut pending = Vec::new();
    pending.push((0, n, total, rect));
    while let Some((i, j, value, r)) = pending.pop() {
        if i + 1 >= j {
            out[i] = r;
            continue;
        }

        let target = value / 2.0 + sums[i];
        let mut k = i + 1;
        let mut hi = j - 1;
        while k < hi {
            let mid = (k + hi) / 2;
            if sums[mid] < target {
                k = mid + 1;
            } else {
                hi = mid;
            }
        }
        if target - sums[k - 1] < sums[k] - target && i + 1 < k {
            k -= 1;
        }

        let left = sums[k] - sums[i];
        let right = value - left;
        // An all-zero run splits by count.
        #[allow(
            clippy::cast_precision_loss,
            reason = "Child counts are far below 2^52."
        )]
        let (weight, whole) = if value != 0.0 {
            (left, value)
        } else {
            ((k - i) as f64, (j - i) as f64)
        };
        if r.width() > r.height() {
            let xk = r.x0 + (r.x1 - r.x0) * weight / whole;
            pending.push((k, j, right, Rect::new(xk, r.y0, r.x1, r.y1)));
            pending.push((i, k, left, Rect::new(r.x0, r.y0, xk, r.y1)));
        } else {
            let yk = r.y0 + (r.y1 - r.y0) * weight / whole;
            pending.push((k, j, right, Rect::new(r.x0, yk, r.x1, r.y1)));
            pending.push((i, k, left, Rect::new(r.x0, r.y0, r.x1, yk)));
        }
    }
}

/// Tile that bisects children by value, see [`binary`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Binary;

impl Tile for Binary {
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        binary(input.values, rect, out);
    }
}
