// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

use super::{Tile, TileInput, dice, slice};

/// Tile that alternates by depth: [`slice`] below parents at odd depth,
/// [`dice`] below parents at even depth (including the root).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceDice;

impl Tile for SliceDice {
    fn tile(&mut self, input: &TileInput<'_>, rect: Rect, out: &mut [Rect]) {
        if input.depth % 2 == 1 {
            slice(input.values, rect, out);
        } else {
            dice(input.values, rect, out);
        }
    }
}
