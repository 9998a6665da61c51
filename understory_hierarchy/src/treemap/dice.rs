// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

use super::{Tile, TileInput};

/// Split `rect` horizontally into `out`, one column per value.
///
/// Column widths are proportional to `values`; if they sum to zero the
/// columns are equally wide. The last column always ends at `rect.x1`.
pub fn dice(values: &[f64], rect: Rect, out: &mut [Rect]) {
    debug_assert_eq!(values.len(), out.len(), "one output rect per value");
    let n = values.len().min(out.len());
    if n == 0 {
        return;
    }
    let total: f64 = values.iter().sum();
    let width = rect.x1 - rect.x0;
    #[allow(
        clippy::cast_precision_loss,
        reason = "Child counts are far below 2^52."
    )]
    let even = width / n as f64;
    let k = if total != 0.0 { width / total } else { 0.0 };

    let mut x = rect.x0;
    for (i, (&v, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
        let next = if i + 1 == n {
            rect.x1
        } else if total != 0.0 {
            x + v * k
        } else {
            x + even
        };
        *slot = Rect::new(x, rect.y0, next, rect.y1);
        x = next;
    }
}

/// Tile that lays children out left to right, see [`dice`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dice;

impl Tile for Dice {
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        dice(input.values, rect, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_values() {
        let mut out = [Rect::ZERO; 3];
        dice(&[1.0, 2.0, 1.0], Rect::new(0.0, 0.0, 8.0, 2.0), &mut out);
        assert_eq!(
            out,
            [
                Rect::new(0.0, 0.0, 2.0, 2.0),
                Rect::new(2.0, 0.0, 6.0, 2.0),
                Rect::new(6.0, 0.0, 8.0, 2.0),
            ]
        );
    }

    #[test]
    fn zero_total_splits_evenly() {
        let mut out = [Rect::ZERO; 4];
        dice(&[0.0; 4], Rect::new(0.0, 0.0, 8.0, 1.0), &mut out);
        for (i, r) in out.iter().enumerate() {
            assert_eq!(r.width(), 2.0, "column {i} is {r:?}");
        }
    }

    #[test]
    fn last_edge_snaps_to_rect() {
        let mut out = [Rect::ZERO; 3];
        dice(&[1.0, 1.0, 1.0], Rect::new(0.0, 0.0, 1.0, 1.0), &mut out);
        assert_eq!(out[2].x1, 1.0);
        assert_eq!(out[0].x1, out[1].x0, "shared edges match");
    }

    #[test]
    fn zero_value_child_gets_zero_width() {
        let mut out = [Rect::ZERO; 3];
        dice(&[2.0, 0.0, 2.0], Rect::new(0.0, 0.0, 4.0, 1.0), &mut out);
        assert_eq!(out[1].width(), 0.0);
        assert_eq!(out[2], Rect::new(2.0, 0.0, 4.0, 1.0));
    }
}
