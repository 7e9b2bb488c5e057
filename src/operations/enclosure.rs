use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::Result;
use crate::math::intersect_2d::{point_to_segment_dist, ray_segment_intersection};
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{distance, Point2, Vector2};
use crate::model::{BoundaryPath, PathStep, PlanStore, Side, WallId};

use super::joints::{next_wall_clockwise, walls_at_point};
use super::polygon::path_polygon;

/// Length of the probe ray cast from a query point.
pub(crate) const RAY_LENGTH: f64 = 10_000.0;

/// Finds the closed counter-clockwise boundary path enclosing a point.
///
/// Casts a ray straight up from the query point, then attempts a
/// counter-clockwise walk from each crossed wall, nearest first, until one
/// walk closes around a polygon that actually contains the point. An
/// unenclosed point is a normal outcome, reported as `Ok(None)`.
#[derive(Debug)]
pub struct TraceEnclosure {
    point: Point2,
}

impl TraceEnclosure {
    /// Creates a trace for the given query point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    /// Executes the trace.
    ///
    /// # Errors
    ///
    /// Returns an error only for store inconsistencies (a wall vanishing
    /// mid-trace); topological dead ends just move on to the next candidate.
    pub fn execute(&self, store: &PlanStore) -> Result<Option<BoundaryPath>> {
        let ray_end = Point2::new(self.point.x, self.point.y + RAY_LENGTH);
        let candidates = ray_hits(store, self.point, ray_end, &HashSet::new());

        for wall_id in candidates {
            let side = side_struck_first(store, wall_id, self.point, ray_end)?;
            let Some(path) = walk_boundary(store, wall_id, side)? else {
                trace!(?wall_id, "candidate walk did not close");
                continue;
            };
            let Ok(polygon) = path_polygon(store, &path) else {
                trace!(?wall_id, "candidate path failed to resolve");
                continue;
            };
            if point_in_polygon(&polygon, self.point) {
                debug!(steps = path.len(), "enclosure found");
                return Ok(Some(path));
            }
            trace!(?wall_id, "closed cycle does not contain query point");
        }

        Ok(None)
    }
}

/// Walks counter-clockwise from a wall/side until the cycle closes.
///
/// At each joint the walk continues onto the next wall in clockwise angular
/// order after the arrival wall, the step rule that keeps the enclosed
/// region on the traverser's left. Dead-end tips turn around onto the wall's
/// other side. The walk closes when it re-enters the starting wall on the
/// starting side; revisiting any other already-seen (wall, side) pair means
/// the cycle cannot close, reported as `Ok(None)`.
///
/// # Errors
///
/// Returns an error if a referenced wall is missing from the store.
pub(crate) fn walk_boundary(
    store: &PlanStore,
    start: WallId,
    start_side: Side,
) -> Result<Option<BoundaryPath>> {
    let start_step = PathStep::new(start, start_side);
    let mut path = vec![start_step];
    let mut seen: HashSet<PathStep> = HashSet::from([start_step]);

    let mut current = start;
    let mut joint = store.wall(start)?.clockwise_endpoint(start_side);

    loop {
        let at_joint = walls_at_point(store, joint);
        let Some(next) = next_wall_clockwise(store, joint, &at_joint, current)? else {
            // The arrival wall is not registered at its own endpoint:
            // inconsistent joint data, treat as a failed attempt.
            return Ok(None);
        };

        let next_data = store.wall(next)?;
        let side = next_data.counter_clockwise_side(joint);
        let step = PathStep::new(next, side);

        if step == start_step {
            return Ok(Some(BoundaryPath::from_steps(path)));
        }
        if !seen.insert(step) {
            return Ok(None);
        }
        path.push(step);

        joint = next_data.other_endpoint(joint);
        current = next;
    }
}

/// Walls whose centerline crosses the segment `from`→`to`, nearest to `from`
/// first, excluding `skip`. Ties resolve by key.
pub(crate) fn ray_hits(
    store: &PlanStore,
    from: Point2,
    to: Point2,
    skip: &HashSet<WallId>,
) -> Vec<WallId> {
    let mut hits: Vec<(f64, WallId)> = store
        .walls()
        .filter(|(id, _)| !skip.contains(id))
        .filter_map(|(id, w)| {
            ray_segment_intersection(from, to, w.start, w.end)
                .map(|hit| (distance(from, hit), id))
        })
        .collect();
    hits.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    hits.into_iter().map(|(_, id)| id).collect()
}

/// Which mitering side of `wall` the ray `from`→`to` strikes first.
///
/// The nearer struck side faces the ray origin. When the ray misses both
/// side segments (clipped by mitering), the side nearer to the origin wins.
pub(crate) fn side_struck_first(
    store: &PlanStore,
    wall: WallId,
    from: Point2,
    to: Point2,
) -> Result<Side> {
    let data = store.wall(wall)?;
    let hit_dist = |side: Side| {
        let s = data.side(side);
        ray_segment_intersection(from, to, s.start, s.end).map(|hit| distance(from, hit))
    };

    let result = match (hit_dist(Side::One), hit_dist(Side::Two)) {
        (Some(d1), Some(d2)) => {
            if d1 <= d2 {
                Side::One
            } else {
                Side::Two
            }
        }
        (Some(_), None) => Side::One,
        (None, Some(_)) => Side::Two,
        (None, None) => {
            let s1 = data.side(Side::One);
            let s2 = data.side(Side::Two);
            if point_to_segment_dist(from, s1.start, s1.end)
                <= point_to_segment_dist(from, s2.start, s2.end)
            {
                Side::One
            } else {
                Side::Two
            }
        }
    };
    Ok(result)
}

/// A unit-ish direction from `from` toward `target`, scaled to ray length.
pub(crate) fn ray_toward(from: Point2, target: Point2) -> Point2 {
    let d = target - from;
    let len = d.norm();
    if len < crate::math::TOLERANCE {
        return Point2::new(from.x, from.y + RAY_LENGTH);
    }
    let dir: Vector2 = d / len;
    from + dir * RAY_LENGTH
}
