// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Front-chain packing of sibling circles.
//!
//! Circles are placed one at a time, each tangent to two adjacent circles on
//! the current front chain (a cyclic list around the packed set). When the
//! candidate overlaps another front circle the chain is cut past that circle
//! and placement retries, so only front circles are ever tested.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point, Vec2};

use super::enclose::enclose_random;
use crate::util::Lcg;

/// Pack `circles` so that none overlap, centered on the origin.
///
/// Only radii are read; every center is overwritten. Circles are placed in
/// slice order, so sorting by radius first changes the result. Returns the
/// radius of the circle enclosing the packing (`0.0` for empty input).
///
/// ```rust
/// use kurbo::{Circle, Point};
/// use understory_hierarchy::pack_siblings;
///
/// let mut circles = [
///     Circle::new(Point::ZERO, 1.0),
///     Circle::new(Point::ZERO, 1.0),
/// ];
/// let r = pack_siblings(&mut circles);
/// assert_eq!(r, 2.0);
/// assert_eq!(circles[0].center, Point::new(-1.0, 0.0));
/// assert_eq!(circles[1].center, Point::new(1.0, 0.0));
/// ```
pub fn pack_siblings(circles: &mut [Circle]) -> f64 {
    pack_siblings_random(circles, &mut Lcg::new())
}

pub(crate) fn pack_siblings_random(circles: &mut [Circle], random: &mut Lcg) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].center = Point::ZERO;
    if n == 1 {
        return circles[0].radius;
    }

    circles[0].center = Point::new(-circles[1].radius, 0.0);
    circles[1].center = Point::new(circles[0].radius, 0.0);
    if n == 2 {
        return circles[0].radius + circles[1].radius;
    }

    circles[2].center = place(circles[1], circles[0], circles[2].radius);

    // Front chain as a doubly linked cycle over circle indices.
    let mut next: Vec<usize> = vec![0; n];
    let mut prev: Vec<usize> = vec![0; n];
    next[0] = 1;
    prev[1] = 0;
    next[1] = 2;
    prev[2] = 1;
    next[2] = 0;
    prev[0] = 2;
    let mut a = 0;
    let mut b = 1;

    let mut i = 3;
    'place: while i < n {
        let r = circles[i].radius;
        circles[i].center = place(circles[a], circles[b], r);
        let c = circles[i];

        // Walk the front in both directions, nearest first by accumulated radius.
        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].radius;
        let mut sk = circles[a].radius;
        loop {
            if sj <= sk {
                if intersects(circles[j], c) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'place;
                }
                sj += circles[j].radius;
                j = next[j];
            } else {
                if intersects(circles[k], c) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'place;
                }
                sk += circles[k].radius;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;
        b = i;

        // Restart from the front pair closest to the origin.
        let mut best = score(circles, a, next[a]);
        let mut cur = next[b];
        while cur != b {
            let s = score(circles, cur, next[cur]);
            if s < best {
                a = cur;
                best = s;
            }
            cur = next[cur];
        }
        b = next[a];
        i += 1;
    }

    let mut front = Vec::with_capacity(n);
    let mut cur = b;
    loop {
        front.push(circles[cur]);
        cur = next[cur];
        if cur == b {
            break;
        }
    }
    let Some(enclosure) = enclose_random(&front, random) else {
        unreachable!("front chain is never empty");
    };

    let offset = enclosure.center.to_vec2();
    for circle in circles.iter_mut() {
        circle.center -= offset;
    }
    enclosure.radius
}

/// Center for a circle of `radius` tangent to both `b` and `a`.
fn place(b: Circle, a: Circle, radius: f64) -> Point {
    let d = b.center - a.center;
    let d2 = d.hypot2();
    if d2 == 0.0 {
        return a.center + Vec2::new(radius, 0.0);
    }
    let a2 = (a.radius + radius) * (a.radius + radius);
    let b2 = (b.radius + radius) * (b.radius + radius);
    if a2 > b2 {
        let x = (d2 + b2 - a2) / (2.0 * d2);
        let y = (b2 / d2 - x * x).max(0.0).sqrt();
        Point::new(
            b.center.x - x * d.x - y * d.y,
            b.center.y - x * d.y + y * d.x,
        )
    } else {
        let x = (d2 + a2 - b2) / (2.0 * d2);
        let y = (a2 / d2 - x * x).max(0.0).sqrt();
        Point::new(
            a.center.x + x * d.x - y * d.y,
            a.center.y + x * d.y + y * d.x,
        )
    }
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.radius + b.radius - 1e-6;
    let d = b.center - a.center;
    dr > 0.0 && dr * dr > d.hypot2()
}

/// Squared distance from the origin of the weighted midpoint of a front pair.
fn score(circles: &[Circle], a: usize, b: usize) -> f64 {
    let (a, b) = (circles[a], circles[b]);
    let ab = a.radius + b.radius;
    let dx = (a.center.x * b.radius + b.center.x * a.radius) / ab;
    let dy = (a.center.y * b.radius + b.center.y * a.radius) / ab;
    dx * dx + dy * dy
}
