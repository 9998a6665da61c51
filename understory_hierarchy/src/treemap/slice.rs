// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

use super::{Tile, TileInput};

/// Split `rect` vertically into `out`, one row per value.
///
/// The transpose of [`dice`](super::dice): heights are proportional to
/// `values`, all-zero groups split evenly, and the last row ends at `rect.y1`.
pub fn slice(values: &[f64], rect: Rect, out: &mut [Rect]) {
    debug_assert_eq!(values.len(), out.len(), "one output rect per value");
    let n = values.len().min(out.len());
    if n == 0 {
        return;
    }
    let total: f64 = values.iter().sum();
    let height = rect.y1 - rect.y0;
    #[allow(
        clippy::cast_precision_loss,
        reason = "Child counts are far below 2^52."
    )]
    let even = height / n as f64;
    let k = if total != 0.0 { height / total } else { 0.0 };

    let mut y = rect.y0;
    for (i, (&v, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
        let next = if i + 1 == n {
            rect.y1
        } else if total != 0.0 {
            y + v * k
        } else {
            y + even
        };
        *slot = Rect::new(rect.x0, y, rect.x1, next);
        y = next;
    }
}

/// Tile that stacks children top to bottom, see [`slice`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slice;

impl Tile for Slice {
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        slice(input.values, rect, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heights_follow_values() {
        let mut out = [Rect::ZERO; 2];
        slice(&[3.0, 1.0], Rect::new(1.0, 0.0, 2.0, 4.0), &mut out);
        assert_eq!(out, [Rect::new(1.0, 0.0, 2.0, 3.0), Rect::new(1.0, 3.0, 2.0, 4.0)]);
    }

    #[test]
    fn degenerate_rect_stays_finite() {
        let mut out = [Rect::ZERO; 2];
        slice(&[0.0, 0.0], Rect::new(0.0, 5.0, 3.0, 5.0), &mut out);
        assert!(out.iter().all(|r| r.area() == 0.0 && r.is_finite()), "{out:?}");
    }
}
