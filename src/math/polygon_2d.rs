use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Absolute polygon area, independent of winding.
#[must_use]
pub fn polygon_area(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// Even-odd point-in-polygon test.
///
/// Casts a horizontal ray from the point toward +x and counts edge
/// crossings. Points on an edge land on either side depending on the
/// half-open vertex rule; callers needing edge-exact answers must test
/// with tolerance themselves.
#[must_use]
pub fn point_in_polygon(vertices: &[Point2], point: Point2) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        if (vi.y > point.y) != (vj.y > point.y) {
            let dy = vi.y - vj.y;
            if dy.abs() > TOLERANCE {
                let x_cross = vj.x + (point.y - vj.y) * (vi.x - vj.x) / dy;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        j = i;
    }
    inside
}
