use crate::error::{Result, TraceError};
use crate::math::{distance, Point2};
use crate::model::{BoundaryPath, PlanStore};

/// Resolves a boundary path into an ordered vertex polygon.
///
/// Each step contributes its mitering side's two endpoints. Continuity is
/// kept by a closest-point rule: the endpoint nearer the previous resolved
/// point continues the polyline, the other becomes the next anchor. The
/// first step is seeded with the joint it shares with the second step (the
/// walls' centerline intersection, or the clockwise endpoint when a dead-end
/// path starts with the same wall twice) and contributes its points in walk
/// order, so closed paths resolve with first and last points coincident
/// within tolerance.
///
/// # Errors
///
/// Returns an error if the path has fewer than 2 steps, if adjacent walls
/// share no joint, or if a referenced wall is missing.
pub fn path_polygon(store: &PlanStore, path: &BoundaryPath) -> Result<Vec<Point2>> {
    let steps = path.steps();
    if steps.len() < 2 {
        return Err(TraceError::PathTooShort(steps.len()).into());
    }

    let first = store.wall(steps[0].wall)?;
    let seed = if steps[0].wall == steps[1].wall {
        first.clockwise_endpoint(steps[0].side)
    } else {
        let second = store.wall(steps[1].wall)?;
        first
            .centerline_intersection(second)
            .ok_or(TraceError::DisjointPathWalls)?
    };

    let mut points = Vec::with_capacity(steps.len() * 2);

    let side0 = first.side(steps[0].side);
    let (near, far) = nearer_farther(seed, side0.start, side0.end);
    points.push(far);
    points.push(near);
    let mut anchor = near;

    for step in &steps[1..] {
        let side = store.wall(step.wall)?.side(step.side);
        let (near, far) = nearer_farther(anchor, side.start, side.end);
        points.push(near);
        points.push(far);
        anchor = far;
    }

    Ok(points)
}

/// Splits `(a, b)` into (nearer to `to`, farther from `to`).
fn nearer_farther(to: Point2, a: Point2, b: Point2) -> (Point2, Point2) {
    if distance(to, a) <= distance(to, b) {
        (a, b)
    } else {
        (b, a)
    }
}
