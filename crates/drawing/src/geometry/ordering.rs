//! Ordering 2D points into a polygon boundary
//!
//! Two strategies feed the planar patch brushes:
//! - [`hull_order`]: Quickhull over the min-x/max-x baseline. Interior points
//!   are dropped, the result is convex.
//! - [`angular_order`]: every point sorted by angle around the centroid. Keeps
//!   all points, may self-intersect for traces that are not star-shaped.
//!
//! Both return indices in counter-clockwise order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{COLLINEAR_EPSILON, MIN_POLYGON_POINTS};
use crate::error::GeometryError;

/// Which ordering a patch brush uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderingStrategy {
    #[default]
    Hull,
    Angular,
}

impl OrderingStrategy {
    /// Order `points` with this strategy
    pub fn order(self, points: &[Vec2]) -> Result<Vec<usize>, GeometryError> {
        match self {
            OrderingStrategy::Hull => hull_order(points),
            OrderingStrategy::Angular => angular_order(points),
        }
    }
}

/// Twice the signed area of triangle `(a, b, p)`; positive when `p` is left of `a -> b`.
pub fn cross(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// Signed area of the polygon `indices` (shoelace); positive for counter-clockwise.
pub fn polygon_signed_area(points: &[Vec2], indices: &[usize]) -> f32 {
    let n = indices.len();
    (0..n)
        .map(|i| {
            let a = points[indices[i]];
            let b = points[indices[(i + 1) % n]];
            a.perp_dot(b)
        })
        .sum::<f32>()
        * 0.5
}

/// Reverse `indices` in place if they wind clockwise.
pub fn ensure_counter_clockwise(points: &[Vec2], indices: &mut [usize]) {
    if polygon_signed_area(points, indices) < 0.0 {
        indices.reverse();
    }
}

/// Convex hull of `points` as counter-clockwise indices.
///
/// Points on the baseline or on a hull edge are excluded. Fails with
/// [`GeometryError::NoHull`] when fewer than three points survive.
pub fn hull_order(points: &[Vec2]) -> Result<Vec<usize>, GeometryError> {
    if points.len() < MIN_POLYGON_POINTS {
        return Err(GeometryError::InsufficientPoints {
            needed: MIN_POLYGON_POINTS,
            got: points.len(),
        });
    }

    let mut min = 0;
    let mut max = 0;
    for (i, p) in points.iter().enumerate() {
        if p.x < points[min].x {
            min = i;
        }
        if p.x > points[max].x {
            max = i;
        }
    }
    if min == max {
        return Err(GeometryError::NoHull);
    }

    let a = points[min];
    let b = points[max];
    let mut below = Vec::new();
    let mut above = Vec::new();
    for (i, p) in points.iter().enumerate() {
        if i == min || i == max {
            continue;
        }
        let side = cross(a, b, *p);
        if side < -COLLINEAR_EPSILON {
            below.push(i);
        } else if side > COLLINEAR_EPSILON {
            above.push(i);
        }
    }

    let mut hull = Vec::with_capacity(points.len());
    hull.push(min);
    expand_hull(points, min, max, &below, &mut hull);
    hull.push(max);
    expand_hull(points, max, min, &above, &mut hull);

    if hull.len() < MIN_POLYGON_POINTS {
        return Err(GeometryError::NoHull);
    }
    Ok(hull)
}

/// Append the hull vertices strictly between `from` and `to`, walking with the
/// outside (`candidates`, all right of `from -> to`) on the right.
fn expand_hull(points: &[Vec2], from: usize, to: usize, candidates: &[usize], hull: &mut Vec<usize>) {
    let a = points[from];
    let b = points[to];

    let mut farthest: Option<(usize, f32)> = None;
    for &i in candidates {
        let distance = -cross(a, b, points[i]);
        if farthest.is_none_or(|(_, best)| distance > best) {
            farthest = Some((i, distance));
        }
    }
    let Some((apex, _)) = farthest else {
        return;
    };

    let p = points[apex];
    let outside = |s: Vec2, e: Vec2| -> Vec<usize> {
        candidates
            .iter()
            .copied()
            .filter(|&i| i != apex && cross(s, e, points[i]) < -COLLINEAR_EPSILON)
            .collect()
    };
    let first = outside(a, p);
    let second = outside(p, b);

    expand_hull(points, from, apex, &first, hull);
    hull.push(apex);
    expand_hull(points, apex, to, &second, hull);
}

/// All point indices sorted by angle around the centroid, ascending.
pub fn angular_order(points: &[Vec2]) -> Result<Vec<usize>, GeometryError> {
    if points.len() < MIN_POLYGON_POINTS {
        return Err(GeometryError::InsufficientPoints {
            needed: MIN_POLYGON_POINTS,
            got: points.len(),
        });
    }

    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let angle = |i: usize| {
        let d = points[i] - centroid;
        d.y.atan2(d.x)
    };

    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
    Ok(indices)
}
