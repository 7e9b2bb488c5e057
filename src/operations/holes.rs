use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::Result;
use crate::math::polygon_2d::{point_in_polygon, signed_area_2d};
use crate::math::Point2;
use crate::model::{BoundaryPath, PlanStore, WallId};

use super::enclosure::{ray_hits, ray_toward, side_struck_first, walk_boundary};
use super::polygon::path_polygon;

/// Finds interior wall clusters disconnected from a room's boundary.
///
/// Runs after internal walls are spliced: any wall with an endpoint inside
/// the outer polygon that still appears nowhere in the boundary path belongs
/// to a floating cluster. Each cluster is traced as a closed clockwise cycle
/// around its outside, wound opposite to the outer boundary, so
/// polygon-with-holes rendering and area subtraction come out right. Walls
/// enclosed by a traced hole are claimed along with it, so nested clusters
/// are not retraced on their own.
#[derive(Debug)]
pub struct FindHoles {
    path: BoundaryPath,
    origin: Point2,
}

impl FindHoles {
    /// Creates the resolver for an augmented boundary path and the query
    /// point the room was traced from.
    #[must_use]
    pub fn new(path: BoundaryPath, origin: Point2) -> Self {
        Self { path, origin }
    }

    /// Executes the scan, returning one closed clockwise path per hole.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary path is malformed or a wall is
    /// missing from the store.
    pub fn execute(&self, store: &PlanStore) -> Result<Vec<BoundaryPath>> {
        if self.path.len() < 2 {
            return Ok(Vec::new());
        }

        let outer_polygon = path_polygon(store, &self.path)?;
        let mut seen: HashSet<WallId> = self.path.wall_ids().collect();
        let mut holes = Vec::new();

        while let Some(target) = next_offending(store, &outer_polygon, &seen) {
            match self.trace_hole(store, target, &seen)? {
                Some((hole, hole_polygon)) => {
                    seen.extend(hole.wall_ids());
                    // Claim everything the hole swallows, nested clusters
                    // included.
                    for (id, wall) in store.walls() {
                        if point_in_polygon(&hole_polygon, wall.start)
                            || point_in_polygon(&hole_polygon, wall.end)
                        {
                            seen.insert(id);
                        }
                    }
                    debug!(steps = hole.len(), "hole traced");
                    holes.push(hole);
                }
                None => {
                    // No candidate closed around this wall; skip it rather
                    // than wedging the scan.
                    trace!(wall = ?target, "offending wall yielded no hole cycle");
                    seen.insert(target);
                }
            }
        }

        Ok(holes)
    }

    /// Traces a closed clockwise cycle around the cluster containing (or
    /// occluding) `target`, starting from the nearest unclaimed wall crossed
    /// by a ray from the room origin toward the target's midpoint.
    ///
    /// A closed cycle only counts as a hole when it winds clockwise and
    /// shares no wall with the room boundary; anything else is a stray
    /// room-side cycle and the next candidate is tried.
    fn trace_hole(
        &self,
        store: &PlanStore,
        target: WallId,
        seen: &HashSet<WallId>,
    ) -> Result<Option<(BoundaryPath, Vec<Point2>)>> {
        let midpoint = store.wall(target)?.midpoint();
        let ray_end = ray_toward(self.origin, midpoint);
        let candidates = ray_hits(store, self.origin, ray_end, seen);

        for candidate in candidates {
            let side = side_struck_first(store, candidate, self.origin, ray_end)?;
            let Some(cycle) = walk_boundary(store, candidate, side)? else {
                continue;
            };
            if cycle.len() < 2 || cycle.wall_ids().any(|id| self.path.contains_wall(id)) {
                continue;
            }
            let Ok(polygon) = path_polygon(store, &cycle) else {
                continue;
            };
            if signed_area_2d(&polygon) < 0.0 {
                return Ok(Some((cycle, polygon)));
            }
        }
        Ok(None)
    }
}

/// First wall (by key) not yet claimed whose endpoint lies inside the outer
/// polygon.
fn next_offending(
    store: &PlanStore,
    outer_polygon: &[Point2],
    seen: &HashSet<WallId>,
) -> Option<WallId> {
    store.wall_ids().into_iter().find(|&id| {
        !seen.contains(&id)
            && store.wall(id).is_ok_and(|w| {
                point_in_polygon(outer_polygon, w.start)
                    || point_in_polygon(outer_polygon, w.end)
            })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::model::WallData;
    use crate::operations::enclosure::TraceEnclosure;
    use crate::operations::internal::ResolveInternalWalls;
    use crate::operations::miter::MiterJoints;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn add_square(
        store: &mut PlanStore,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f64,
    ) -> Vec<WallId> {
        vec![
            store.add_wall(WallData::new(p(x0, y0), p(x1, y0), thickness)),
            store.add_wall(WallData::new(p(x1, y0), p(x1, y1), thickness)),
            store.add_wall(WallData::new(p(x1, y1), p(x0, y1), thickness)),
            store.add_wall(WallData::new(p(x0, y1), p(x0, y0), thickness)),
        ]
    }

    /// A 20x20 room with a 4x4 island loop near its center.
    fn room_with_island() -> (PlanStore, Vec<WallId>, Vec<WallId>, Point2) {
        let mut store = PlanStore::new();
        let outer = add_square(&mut store, 0.0, 0.0, 20.0, 20.0, 1.0);
        let island = add_square(&mut store, 8.0, 8.0, 12.0, 12.0, 0.5);
        MiterJoints::new().execute(&mut store).unwrap();
        (store, outer, island, p(2.0, 2.0))
    }

    fn boundary_of(store: &PlanStore, origin: Point2) -> BoundaryPath {
        let outer = TraceEnclosure::new(origin).execute(store).unwrap().unwrap();
        ResolveInternalWalls::new(outer).execute(store).unwrap()
    }

    #[test]
    fn island_becomes_one_hole() {
        let (store, outer, island, origin) = room_with_island();
        let boundary = boundary_of(&store, origin);
        assert_eq!(boundary.len(), 4);

        let holes = FindHoles::new(boundary, origin).execute(&store).unwrap();
        assert_eq!(holes.len(), 1);
        let hole = &holes[0];
        assert_eq!(hole.len(), 4);
        for id in &island {
            assert!(hole.contains_wall(*id));
        }
        for id in &outer {
            assert!(!hole.contains_wall(*id));
        }
    }

    #[test]
    fn hole_winds_clockwise() {
        let (store, _, _, origin) = room_with_island();
        let boundary = boundary_of(&store, origin);

        let outer_poly = path_polygon(&store, &boundary).unwrap();
        assert!(signed_area_2d(&outer_poly) > 0.0, "outer winds CCW");

        let holes = FindHoles::new(boundary, origin).execute(&store).unwrap();
        let hole_poly = path_polygon(&store, &holes[0]).unwrap();
        assert!(signed_area_2d(&hole_poly) < 0.0, "hole winds CW");
    }

    #[test]
    fn nested_cluster_is_claimed_by_outer_hole() {
        let (mut store, _, _, origin) = room_with_island();
        // A stray wall inside the island: claimed by the island's hole, not
        // traced separately.
        store.add_wall(WallData::new(p(9.0, 10.0), p(11.0, 10.0), 0.5));
        MiterJoints::new().execute(&mut store).unwrap();

        let boundary = boundary_of(&store, origin);
        let holes = FindHoles::new(boundary, origin).execute(&store).unwrap();
        assert_eq!(holes.len(), 1);
    }

    #[test]
    fn two_islands_two_holes() {
        let mut store = PlanStore::new();
        add_square(&mut store, 0.0, 0.0, 30.0, 20.0, 1.0);
        add_square(&mut store, 5.0, 8.0, 9.0, 12.0, 0.5);
        add_square(&mut store, 20.0, 8.0, 24.0, 12.0, 0.5);
        MiterJoints::new().execute(&mut store).unwrap();

        let origin = p(2.0, 2.0);
        let boundary = boundary_of(&store, origin);
        let holes = FindHoles::new(boundary, origin).execute(&store).unwrap();
        assert_eq!(holes.len(), 2);
    }

    #[test]
    fn no_interior_walls_no_holes() {
        let mut store = PlanStore::new();
        add_square(&mut store, 0.0, 0.0, 10.0, 10.0, 1.0);
        MiterJoints::new().execute(&mut store).unwrap();
        let origin = p(5.0, 5.0);
        let boundary = boundary_of(&store, origin);
        let holes = FindHoles::new(boundary, origin).execute(&store).unwrap();
        assert!(holes.is_empty());
    }
}
