use crate::error::Result;
use crate::math::intersect_2d::lines_intersection;
use crate::math::{points_approx_equal, Point2};
use crate::model::{PlanStore, Side, WallData, WallId};

use super::joints::{angular_order, walls_at_point};

/// Recomputes every wall's mitering sides from its centerline and joints.
///
/// Sides are first reset to raw ±thickness/2 offsets, then adjusted at each
/// joint: walls are sorted by angle around the joint and, for each
/// clockwise-adjacent pair, the two side lines facing the wedge between the
/// pair are intersected to form a shared corner. Dead ends keep square caps;
/// collinear continuations (parallel side lines) are left untouched.
///
/// Hosts run this after any wall add/move/delete, before retracing; the
/// tracers assume mitering is consistent and never touch it themselves.
#[derive(Debug, Default)]
pub struct MiterJoints;

impl MiterJoints {
    /// Creates the operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the mitering pass over the whole store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is mutated concurrently (missing wall).
    pub fn execute(&self, store: &mut PlanStore) -> Result<()> {
        let ids = store.wall_ids();

        // Reset to raw offsets so the pass is idempotent.
        for &id in &ids {
            let wall = store.wall_mut(id)?;
            let fresh = WallData::new(wall.start, wall.end, wall.thickness);
            wall.side1 = fresh.side1;
            wall.side2 = fresh.side2;
        }

        for joint in collect_joints(store) {
            let at_joint = walls_at_point(store, joint);
            if at_joint.len() < 2 {
                continue;
            }
            let ordered = angular_order(store, joint, &at_joint)?;
            let n = ordered.len();
            for k in 0..n {
                let a = ordered[k];
                let b = ordered[(k + 1) % n];
                if a == b {
                    continue;
                }
                miter_pair(store, joint, a, b)?;
            }
        }

        Ok(())
    }
}

/// Miters the wedge between `a` and its clockwise neighbor `b` at `joint`:
/// `a`'s clockwise-facing side line meets `b`'s counter-clockwise-facing
/// side line.
fn miter_pair(store: &mut PlanStore, joint: Point2, a: WallId, b: WallId) -> Result<()> {
    let (a_side, a_line) = {
        let wall = store.wall(a)?;
        let side = wall.counter_clockwise_side(joint).other();
        let s = wall.side(side);
        (side, (s.start, s.end - s.start))
    };
    let (b_side, b_line) = {
        let wall = store.wall(b)?;
        let side = wall.counter_clockwise_side(joint);
        let s = wall.side(side);
        (side, (s.start, s.end - s.start))
    };

    let Some(corner) = lines_intersection(a_line.0, a_line.1, b_line.0, b_line.1) else {
        return Ok(());
    };

    set_side_end_at(store.wall_mut(a)?, a_side, joint, corner);
    set_side_end_at(store.wall_mut(b)?, b_side, joint, corner);
    Ok(())
}

/// Moves the side endpoint corresponding to the wall endpoint at `joint`.
fn set_side_end_at(wall: &mut WallData, side: Side, joint: Point2, corner: Point2) {
    let at_start = points_approx_equal(wall.start, joint);
    let s = wall.side_mut(side);
    if at_start {
        s.start = corner;
    } else {
        s.end = corner;
    }
}

/// Unique joint points over all wall endpoints.
fn collect_joints(store: &PlanStore) -> Vec<Point2> {
    let mut joints: Vec<Point2> = Vec::new();
    for (_, wall) in store.walls() {
        add_unique_point(&mut joints, wall.start);
        add_unique_point(&mut joints, wall.end);
    }
    joints
}

/// Adds a point to the list if not already present (within tolerance).
fn add_unique_point(points: &mut Vec<Point2>, p: Point2) {
    if !points.iter().any(|&q| points_approx_equal(q, p)) {
        points.push(p);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn assert_pt(actual: Point2, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-6 && (actual.y - y).abs() < 1e-6,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn square_corner_inner_and_outer() {
        let mut store = PlanStore::new();
        let top = store.add_wall(WallData::new(p(10.0, 10.0), p(0.0, 10.0), 1.0));
        let left = store.add_wall(WallData::new(p(0.0, 10.0), p(0.0, 0.0), 1.0));
        MiterJoints::new().execute(&mut store).unwrap();

        let t = store.wall(top).unwrap();
        let l = store.wall(left).unwrap();
        // Inner corner at (0.5, 9.5), outer at (-0.5, 10.5); the free ends
        // keep square caps.
        assert_pt(t.side1.end, 0.5, 9.5);
        assert_pt(l.side1.start, 0.5, 9.5);
        assert_pt(t.side2.end, -0.5, 10.5);
        assert_pt(l.side2.start, -0.5, 10.5);
        assert_pt(t.side1.start, 10.0, 9.5);
        assert_pt(l.side2.end, -0.5, 0.0);
    }

    #[test]
    fn collinear_continuation_untouched() {
        let mut store = PlanStore::new();
        let a = store.add_wall(WallData::new(p(0.0, 0.0), p(5.0, 0.0), 1.0));
        let b = store.add_wall(WallData::new(p(5.0, 0.0), p(10.0, 0.0), 1.0));
        MiterJoints::new().execute(&mut store).unwrap();

        let wa = store.wall(a).unwrap();
        let wb = store.wall(b).unwrap();
        assert_pt(wa.side1.end, 5.0, 0.5);
        assert_pt(wb.side1.start, 5.0, 0.5);
    }

    #[test]
    fn tee_joint_three_wedges() {
        // A T: split left wall (going up) with a partition heading east.
        let mut store = PlanStore::new();
        let down = store.add_wall(WallData::new(p(0.0, 0.0), p(0.0, 8.0), 1.0));
        let up = store.add_wall(WallData::new(p(0.0, 8.0), p(0.0, 16.0), 1.0));
        let part = store.add_wall(WallData::new(p(0.0, 8.0), p(4.0, 8.0), 1.0));
        MiterJoints::new().execute(&mut store).unwrap();

        let wd = store.wall(down).unwrap();
        let wu = store.wall(up).unwrap();
        let wp = store.wall(part).unwrap();
        // Partition's north side meets the upper wall's east side, its south
        // side meets the lower wall's east side.
        assert_pt(wp.side1.start, 0.5, 8.5);
        assert_pt(wp.side2.start, 0.5, 7.5);
        // East sides of the vertical pieces stop at the partition faces.
        assert_pt(wu.side2.start, 0.5, 8.5);
        assert_pt(wd.side2.end, 0.5, 7.5);
        // West sides run straight through (collinear pair untouched).
        assert_pt(wu.side1.start, -0.5, 8.0);
        assert_pt(wd.side1.end, -0.5, 8.0);
    }

    #[test]
    fn idempotent_under_repeat() {
        let mut store = PlanStore::new();
        store.add_wall(WallData::new(p(10.0, 10.0), p(0.0, 10.0), 1.0));
        let left = store.add_wall(WallData::new(p(0.0, 10.0), p(0.0, 0.0), 1.0));
        MiterJoints::new().execute(&mut store).unwrap();
        let before = store.wall(left).unwrap().clone();
        MiterJoints::new().execute(&mut store).unwrap();
        let after = store.wall(left).unwrap();
        assert!(points_approx_equal(before.side1.start, after.side1.start));
        assert!(points_approx_equal(before.side2.start, after.side2.start));
    }
}
