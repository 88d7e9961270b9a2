//! Vertex-level geometry morphing.
//!
//! Rings are resampled to a shared vertex count by index position rather
//! than arc length. Boundary feeds keep roughly the same vertex ordering
//! between consecutive updates, so index pairing tracks the shape without
//! a correspondence solver.

use crate::{Geometry, Position, Ring};

/// Blends `from` toward `to` at progress `t`.
///
/// `t` is clamped to `[0, 1]`, and at the clamped endpoints the inputs
/// come back verbatim. Mismatched geometry kinds cannot morph and cut
/// from one to the other at the halfway mark; points likewise cut rather
/// than slide.
#[must_use]
pub fn interpolate(from: &Geometry, to: &Geometry, t: f64) -> Geometry {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 {
        return from.clone();
    }
    if t >= 1.0 {
        return to.clone();
    }

    match (from, to) {
        (Geometry::Polygon(from_rings), Geometry::Polygon(to_rings)) => {
            Geometry::Polygon(blend_ring_sets(from_rings, to_rings, t))
        }
        (Geometry::MultiPolygon(from_polygons), Geometry::MultiPolygon(to_polygons)) => {
            let count = from_polygons.len().max(to_polygons.len());
            Geometry::MultiPolygon(
                (0..count)
                    .map(|i| {
                        blend_ring_sets(
                            polygon_or_first(from_polygons, i),
                            polygon_or_first(to_polygons, i),
                            t,
                        )
                    })
                    .collect(),
            )
        }
        _ => {
            if t < 0.5 {
                from.clone()
            } else {
                to.clone()
            }
        }
    }
}

/// Resamples `ring` to exactly `n` vertices by linear interpolation over
/// the vertex index. A ring already at the target length comes back
/// unchanged, so resampling is idempotent.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resample_ring(ring: &[Position], n: usize) -> Vec<Position> {
    if ring.is_empty() || n == 0 {
        return Vec::new();
    }
    if ring.len() == n {
        return ring.to_vec();
    }
    if ring.len() == 1 || n == 1 {
        return vec![ring[0]; n];
    }

    // Both lengths are at least 2 from here on.
    let span = (ring.len() - 1) as f64;
    let mut resampled = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / (n - 1) as f64 * span;
        let index = t.floor() as usize;
        let frac = t - index as f64;
        if index + 1 >= ring.len() {
            resampled.push(ring[ring.len() - 1]);
        } else {
            resampled.push(lerp(ring[index], ring[index + 1], frac));
        }
    }
    resampled
}

fn blend_ring_sets(from: &[Ring], to: &[Ring], t: f64) -> Vec<Ring> {
    let count = from.len().max(to.len());
    (0..count)
        .map(|i| blend_rings(ring_or_first(from, i), ring_or_first(to, i), t))
        .collect()
}

/// Pairs two rings vertex-by-vertex after resampling both to the longer
/// length. An empty ring on either side blends to an empty ring.
fn blend_rings(from: &[Position], to: &[Position], t: f64) -> Ring {
    let target = from.len().max(to.len());
    let from = resample_ring(from, target);
    let to = resample_ring(to, target);
    from.iter().zip(&to).map(|(&a, &b)| lerp(a, b, t)).collect()
}

fn ring_or_first(rings: &[Ring], i: usize) -> &[Position] {
    rings.get(i).or_else(|| rings.first()).map_or(&[], Vec::as_slice)
}

fn polygon_or_first(polygons: &[Vec<Ring>], i: usize) -> &[Ring] {
    polygons
        .get(i)
        .or_else(|| polygons.first())
        .map_or(&[], Vec::as_slice)
}

const fn lerp(from: Position, to: Position, t: f64) -> Position {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
    ]
}
