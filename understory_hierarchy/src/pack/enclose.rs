// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smallest enclosing circle of a set of circles.
//!
//! This is the incremental move-to-front scheme: circles are visited in a
//! shuffled order while a basis of at most three support circles is kept.
//! Whenever a circle falls outside the current enclosure the basis is
//! extended with it and the enclosure is rebuilt from the basis alone.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point};
use smallvec::{SmallVec, smallvec};

use crate::util::Lcg;

type Basis = SmallVec<[Circle; 3]>;

/// Compute the smallest circle enclosing every circle in `circles`.
///
/// Returns `None` for empty input. The circles are visited in a fixed
/// pseudo-random order, so the result is deterministic.
///
/// ```rust
/// use kurbo::{Circle, Point};
/// use understory_hierarchy::pack_enclose;
///
/// let e = pack_enclose(&[
///     Circle::new(Point::new(-1.0, 0.0), 1.0),
///     Circle::new(Point::new(1.0, 0.0), 1.0),
/// ])
/// .unwrap();
/// assert!((e.radius - 2.0).abs() < 1e-9);
/// assert!(e.center.x.abs() < 1e-9);
/// ```
pub fn pack_enclose(circles: &[Circle]) -> Option<Circle> {
    enclose_random(circles, &mut Lcg::new())
}

pub(crate) fn enclose_random(circles: &[Circle], random: &mut Lcg) -> Option<Circle> {
    let mut circles: Vec<Circle> = circles.to_vec();
    random.shuffle(&mut circles);

    let mut basis = Basis::new();
    let mut enclosure: Option<Circle> = None;
    let mut i = 0;
    while i < circles.len() {
        let p = circles[i];
        match enclosure {
            Some(e) if encloses_weak(e, p) => i += 1,
            _ => {
                basis = extend_basis(&basis, p);
                enclosure = Some(enclose_basis(&basis));
                i = 0;
            }
        }
    }
    enclosure
}

fn extend_basis(basis: &Basis, p: Circle) -> Basis {
    if encloses_weak_all(p, basis) {
        return smallvec![p];
    }

    // `basis` has at least one element from here on.
    for &b in basis {
        if encloses_not(p, b) && encloses_weak_all(enclose_2(b, p), basis) {
            return smallvec![b, p];
        }
    }

    // And at least two from here on.
    for i in 0..basis.len().saturating_sub(1) {
        for j in i + 1..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(enclose_2(bi, bj), p)
                && encloses_not(enclose_2(bi, p), bj)
                && encloses_not(enclose_2(bj, p), bi)
                && encloses_weak_all(enclose_3(bi, bj, p), basis)
            {
                return smallvec![bi, bj, p];
            }
        }
    }

    unreachable!("enclosing circle basis could not be extended; inputs must be finite");
}

/// `a` fails to enclose `b`.
fn encloses_not(a: Circle, b: Circle) -> bool {
    let dr = a.radius - b.radius;
    let d = b.center - a.center;
    dr < 0.0 || dr * dr < d.hypot2()
}

/// `a` encloses `b`, allowing for a small relative tolerance.
fn encloses_weak(a: Circle, b: Circle) -> bool {
    let dr = a.radius - b.radius + a.radius.max(b.radius).max(1.0) * 1e-9;
    let d = b.center - a.center;
    dr > 0.0 && dr * dr > d.hypot2()
}

fn encloses_weak_all(a: Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|&b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match *basis {
        [a] => a,
        [a, b] => enclose_2(a, b),
        [a, b, c] => enclose_3(a, b, c),
        _ => unreachable!("bases hold one to three circles"),
    }
}

fn enclose_2(a: Circle, b: Circle) -> Circle {
    let (x1, y1, r1) = (a.center.x, a.center.y, a.radius);
    let (x2, y2, r2) = (b.center.x, b.center.y, b.radius);
    let (x21, y21, r21) = (x2 - x1, y2 - y1, r2 - r1);
    let l = (x21 * x21 + y21 * y21).sqrt();
    Circle::new(
        Point::new(
            (x1 + x2 + x21 / l * r21) / 2.0,
            (y1 + y2 + y21 / l * r21) / 2.0,
        ),
        (l + r1 + r2) / 2.0,
    )
}

/// The circle tangent to and enclosing `a`, `b`, and `c` (Apollonius).
fn enclose_3(a: Circle, b: Circle, c: Circle) -> Circle {
    let (x1, y1, r1) = (a.center.x, a.center.y, a.radius);
    let (x2, y2, r2) = (b.center.x, b.center.y, b.radius);
    let (x3, y3, r3) = (c.center.x, c.center.y, c.radius);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    // Nearly linear: fall back to the single root of `qb r + qc = 0`.
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(Point::new(x1 + xa + xb * r, y1 + ya + yb * r), r)
}
