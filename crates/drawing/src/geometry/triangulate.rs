//! Ear-clipping triangulation of an ordered simple polygon

use glam::Vec2;
use tracing::warn;

use super::ordering::{cross, ensure_counter_clockwise};
use crate::constants::{EAR_CONTAINMENT_TOLERANCE, MIN_POLYGON_POINTS};
use crate::error::GeometryError;

/// Triangulate the polygon `order` (indices into `points`) by ear clipping.
///
/// The polygon is normalized to counter-clockwise first, so callers may pass
/// either winding. Emitted triangles are counter-clockwise in the 2D frame and
/// index into `points`. Fails without partial output when no ear can be found.
pub fn triangulate(points: &[Vec2], order: &[usize]) -> Result<Vec<[u32; 3]>, GeometryError> {
    if order.len() < MIN_POLYGON_POINTS {
        return Err(GeometryError::InsufficientPoints {
            needed: MIN_POLYGON_POINTS,
            got: order.len(),
        });
    }

    let mut polygon = order.to_vec();
    ensure_counter_clockwise(points, &mut polygon);

    let mut triangles = Vec::with_capacity(polygon.len() - 2);
    while polygon.len() > 3 {
        let n = polygon.len();
        let Some(ear) = (0..n).find(|&i| is_ear(points, &polygon, i)) else {
            warn!("triangulate: no ear found, {} vertices remain", n);
            return Err(GeometryError::NoEar { remaining: n });
        };

        let prev = polygon[(ear + n - 1) % n];
        let next = polygon[(ear + 1) % n];
        triangles.push([prev as u32, polygon[ear] as u32, next as u32]);
        polygon.remove(ear);
    }

    let [a, b, c] = [polygon[0], polygon[1], polygon[2]];
    if cross(points[a], points[b], points[c]) <= 0.0 {
        warn!("triangulate: final triangle is degenerate");
        return Err(GeometryError::NoEar { remaining: 3 });
    }
    triangles.push([a as u32, b as u32, c as u32]);

    Ok(triangles)
}

/// Total unsigned area of `triangles` over `points`
pub fn triangles_area(points: &[Vec2], triangles: &[[u32; 3]]) -> f32 {
    triangles
        .iter()
        .map(|[a, b, c]| {
            cross(points[*a as usize], points[*b as usize], points[*c as usize]).abs() * 0.5
        })
        .sum()
}

fn is_ear(points: &[Vec2], polygon: &[usize], i: usize) -> bool {
    let n = polygon.len();
    let prev = (i + n - 1) % n;
    let next = (i + 1) % n;

    let a = points[polygon[prev]];
    let b = points[polygon[i]];
    let c = points[polygon[next]];

    if cross(a, b, c) <= 0.0 {
        return false;
    }

    !polygon
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != prev && j != i && j != next)
        .any(|(_, &idx)| point_in_triangle(points[idx], a, b, c))
}

/// Sub-triangle area identity, normalized by the area of `(a, b, c)`.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let whole = cross(a, b, c).abs();
    if whole == 0.0 {
        return false;
    }
    let parts = cross(p, b, c).abs() + cross(a, p, c).abs() + cross(a, b, p).abs();
    ((parts - whole) / whole).abs() < EAR_CONTAINMENT_TOLERANCE
}
