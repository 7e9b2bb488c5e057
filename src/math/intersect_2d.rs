use super::{points_approx_equal, Point2, Vector2, TOLERANCE};

/// Rounds an intersection parameter to 4 decimal places.
///
/// Wall endpoints are produced by repeated offset/rotate arithmetic, so the
/// raw parameters sit slightly outside `[0, 1]` at shared joints. Quantizing
/// before the range check absorbs that error.
fn round_param(t: f64) -> f64 {
    (t * 10_000.0).round() / 10_000.0
}

/// Bounded segment-segment intersection.
///
/// Returns `None` if either segment has zero length, or if the segments are
/// parallel without a shared endpoint, or if the intersection parameters
/// (rounded to 4 decimals) fall outside `[0, 1]`.
///
/// Parallel segments that share an endpoint within tolerance return that
/// endpoint as a degenerate intersection: wall centerlines meeting at a
/// joint are routinely collinear and must still be detected.
#[must_use]
pub fn segments_intersection(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    if d1.norm_squared() < TOLERANCE || d2.norm_squared() < TOLERANCE {
        return None;
    }

    let denom = d2.y * d1.x - d2.x * d1.y;
    if denom.abs() < TOLERANCE {
        return shared_endpoint(p1, p2, p3, p4);
    }

    let ua = round_param((d2.x * (p1.y - p3.y) - d2.y * (p1.x - p3.x)) / denom);
    let ub = round_param((d1.x * (p1.y - p3.y) - d1.y * (p1.x - p3.x)) / denom);

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    let t = ua.clamp(0.0, 1.0);
    Some(Point2::new(p1.x + d1.x * t, p1.y + d1.y * t))
}

/// Returns an endpoint shared by the two segments, if any.
fn shared_endpoint(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    for a in [p1, p2] {
        for b in [p3, p4] {
            if points_approx_equal(a, b) {
                return Some(a);
            }
        }
    }
    None
}

/// Bounded intersection for probe rays.
///
/// Same parametric form as [`segments_intersection`] but without the
/// 4-decimal parameter rounding: a probe ray is thousands of units long, so
/// quantizing its parameter would snap hits by whole document units and
/// reorder strikes on the two faces of a thin wall.
#[must_use]
pub fn ray_segment_intersection(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    if d1.norm_squared() < TOLERANCE || d2.norm_squared() < TOLERANCE {
        return None;
    }

    let denom = d2.y * d1.x - d2.x * d1.y;
    if denom.abs() < TOLERANCE {
        return None;
    }

    let ua = (d2.x * (p1.y - p3.y) - d2.y * (p1.x - p3.x)) / denom;
    let ub = (d1.x * (p1.y - p3.y) - d1.y * (p1.x - p3.x)) / denom;

    let eps = 1e-9;
    if ua < -eps || ua > 1.0 + eps || ub < -eps || ub > 1.0 + eps {
        return None;
    }

    let t = ua.clamp(0.0, 1.0);
    Some(Point2::new(p1.x + d1.x * t, p1.y + d1.y * t))
}

/// Unbounded line-line intersection.
///
/// Lines are given as `base + t * dir`. Returns `None` for parallel lines.
#[must_use]
pub fn lines_intersection(b1: Point2, d1: Vector2, b2: Point2, d2: Vector2) -> Option<Point2> {
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < TOLERANCE {
        return None;
    }
    let dx = b2.x - b1.x;
    let dy = b2.y - b1.y;
    let t = (dx * d2.y - dy * d2.x) / denom;
    Some(Point2::new(b1.x + d1.x * t, b1.y + d1.y * t))
}

/// Returns the minimum distance from point `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: Point2, a: Point2, b: Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < TOLERANCE {
        return (p - a).norm();
    }

    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let closest = Point2::new(a.x + t * d.x, a.y + t * d.y);
    (p - closest).norm()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_segments() {
        let hit = segments_intersection(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)).unwrap();
        assert!((hit.x - 1.0).abs() < TOLERANCE);
        assert!((hit.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn non_crossing_segments() {
        assert!(segments_intersection(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)).is_none());
    }

    #[test]
    fn zero_length_segment() {
        assert!(segments_intersection(p(1.0, 1.0), p(1.0, 1.0), p(0.0, 0.0), p(2.0, 2.0)).is_none());
    }

    #[test]
    fn parallel_with_shared_endpoint() {
        // Collinear continuation: the shared joint is a degenerate intersection.
        let hit = segments_intersection(p(0.0, 0.0), p(5.0, 0.0), p(5.0, 0.0), p(9.0, 0.0)).unwrap();
        assert!((hit.x - 5.0).abs() < TOLERANCE);
        assert!((hit.y).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_without_shared_endpoint() {
        assert!(segments_intersection(p(0.0, 0.0), p(5.0, 0.0), p(0.0, 1.0), p(5.0, 1.0)).is_none());
    }

    #[test]
    fn endpoint_touch_within_rounding() {
        // Endpoint sits a hair past the segment; 4-decimal rounding keeps it.
        let hit = segments_intersection(
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.000_000_1, -1.0),
            p(10.000_000_1, 1.0),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn ray_hit_keeps_subunit_ordering() {
        // Two faces 0.5 apart, struck by a 10k-unit ray: the unrounded form
        // must keep their hit distances distinct.
        let from = p(2.0, 2.0);
        let to = p(8002.0, 6002.0);
        let low = ray_segment_intersection(from, to, p(0.0, 7.75), p(20.0, 7.75)).unwrap();
        let high = ray_segment_intersection(from, to, p(0.0, 8.25), p(20.0, 8.25)).unwrap();
        assert!((low.y - 7.75).abs() < 1e-6);
        assert!((high.y - 8.25).abs() < 1e-6);
        assert!(low.x < high.x);
    }

    #[test]
    fn ray_miss_is_none() {
        assert!(ray_segment_intersection(
            p(0.0, 0.0),
            p(0.0, 10_000.0),
            p(1.0, 5.0),
            p(2.0, 5.0)
        )
        .is_none());
    }

    #[test]
    fn lines_cross_outside_segments() {
        let hit = lines_intersection(
            p(0.0, 0.0),
            nalgebra::Vector2::new(1.0, 0.0),
            p(5.0, 3.0),
            nalgebra::Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((hit.x - 5.0).abs() < TOLERANCE);
        assert!((hit.y).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_lines_none() {
        assert!(lines_intersection(
            p(0.0, 0.0),
            nalgebra::Vector2::new(1.0, 0.0),
            p(0.0, 1.0),
            nalgebra::Vector2::new(1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn segment_distance_interior_projection() {
        let d = point_to_segment_dist(p(5.0, 3.0), p(0.0, 0.0), p(10.0, 0.0));
        assert!((d - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn segment_distance_past_endpoint() {
        let d = point_to_segment_dist(p(13.0, 4.0), p(0.0, 0.0), p(10.0, 0.0));
        assert!((d - 5.0).abs() < TOLERANCE);
    }
}
