// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

/// Linear congruential generator used to shuffle circles before enclosing.
///
/// Seeded identically for every layout call so results are reproducible.
#[derive(Clone, Debug)]
pub(crate) struct Lcg(u64);

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub(crate) const fn new() -> Self {
        Self(1)
    }

    /// Next value in `[0, 1)`.
    pub(crate) fn next_f64(&mut self) -> f64 {
        self.0 = (Self::A * self.0 + Self::C) % Self::M;
        #[allow(
            clippy::cast_precision_loss,
            reason = "State is below 2^32 and fits an f64 mantissa."
        )]
        let s = self.0 as f64;
        s / 4_294_967_296.0
    }

    /// Fisher-Yates shuffle driven by this generator.
    pub(crate) fn shuffle<E>(&mut self, items: &mut [E]) {
        let mut m = items.len();
        while m > 0 {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss,
                reason = "Product lies in [0, m)."
            )]
            let i = (self.next_f64() * m as f64) as usize;
            m -= 1;
            items.swap(m, i);
        }
    }
}

/// Round half up, so `-0.5` rounds to `0` and `0.5` to `1`.
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

pub(crate) fn round_rect(r: Rect) -> Rect {
    Rect::new(
        round_half_up(r.x0),
        round_half_up(r.y0),
        round_half_up(r.x1),
        round_half_up(r.y1),
    )
}

/// Shrink a rect, collapsing each axis to its midpoint when it would invert.
pub(crate) fn inset_or_collapse(mut x0: f64, mut y0: f64, mut x1: f64, mut y1: f64) -> Rect {
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Rect::new(x0, y0, x1, y1)
}
