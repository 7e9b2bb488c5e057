use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{distance, Point2, POINT_EPSILON, TOLERANCE};
use crate::model::{PlanStore, RoomData, RoomId, WallId};

use super::area::boundary_area;
use super::enclosure::TraceEnclosure;
use super::holes::FindHoles;
use super::internal::ResolveInternalWalls;
use super::polygon::path_polygon;

/// How far past a boundary corner an anchor point is nudged into the room.
const ANCHOR_OFFSET: f64 = POINT_EPSILON * 2.0;

/// Creates a room at a query point, if the point is enclosed.
///
/// Runs the full pipeline (trace, internal-wall splice, hole scan, area)
/// and stores the result. A point already inside an existing room, or not
/// enclosed by any wall cycle, creates nothing.
#[derive(Debug)]
pub struct AddRoomAt {
    point: Point2,
}

impl AddRoomAt {
    /// Creates the operation.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    /// Executes the operation, returning the new room's ID if one was made.
    ///
    /// # Errors
    ///
    /// Returns an error for store inconsistencies; "no room here" is
    /// `Ok(None)`.
    pub fn execute(&self, store: &mut PlanStore) -> Result<Option<RoomId>> {
        for room_id in store.room_ids() {
            let room = store.room(room_id)?;
            if room.boundary.len() < 2 {
                continue;
            }
            if let Ok(polygon) = path_polygon(store, &room.boundary) {
                if point_in_polygon(&polygon, self.point) {
                    return Ok(None);
                }
            }
        }

        let Some(geometry) = resolve_room(store, self.point)? else {
            return Ok(None);
        };
        Ok(Some(store.add_room(geometry)))
    }
}

/// Retraces every room touched by a set of changed walls.
///
/// The host raises this after wall adds, moves, or deletes; mitering must
/// already be reconciled. Rooms whose enclosure survives are updated in
/// place; rooms that can no longer be closed from any anchor are removed.
/// Failures are per-room: one unresolvable room never aborts the rest.
#[derive(Debug)]
pub struct RetraceRooms {
    changed: HashSet<WallId>,
}

/// What a retrace pass did, per room.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RetraceReport {
    pub updated: Vec<RoomId>,
    pub deleted: Vec<RoomId>,
}

impl RetraceRooms {
    /// Creates the operation from the set of changed wall IDs.
    pub fn new<I: IntoIterator<Item = WallId>>(changed: I) -> Self {
        Self {
            changed: changed.into_iter().collect(),
        }
    }

    /// Executes the retrace pass.
    ///
    /// # Errors
    ///
    /// Returns an error for store inconsistencies only.
    pub fn execute(&self, store: &mut PlanStore) -> Result<RetraceReport> {
        let mut report = RetraceReport::default();

        for room_id in store.room_ids() {
            let touched = {
                let room = store.room(room_id)?;
                self.changed.iter().any(|&w| room.references_wall(w))
            };
            if !touched {
                continue;
            }

            match self.retrace_room(store, room_id)? {
                Some(data) => {
                    *store.room_mut(room_id)? = data;
                    report.updated.push(room_id);
                }
                None => {
                    store.remove_room(room_id);
                    debug!(?room_id, "enclosure lost, room removed");
                    report.deleted.push(room_id);
                }
            }
        }

        Ok(report)
    }

    /// Re-resolves one room from the first anchor that still encloses.
    fn retrace_room(&self, store: &PlanStore, room_id: RoomId) -> Result<Option<RoomData>> {
        for anchor in self.anchor_points(store, room_id)? {
            if let Some(data) = resolve_room(store, anchor)? {
                return Ok(Some(data));
            }
        }
        Ok(None)
    }

    /// Interior points derived from pairs of unchanged adjacent boundary
    /// walls: each pair's joint corner, nudged just inside the room along
    /// the mitering side.
    fn anchor_points(&self, store: &PlanStore, room_id: RoomId) -> Result<Vec<Point2>> {
        let room = store.room(room_id)?;
        let steps = room.boundary.steps();
        let n = steps.len();
        let mut anchors = Vec::new();

        for i in 0..n {
            let a = steps[i];
            let b = steps[(i + 1) % n];
            if a.wall == b.wall
                || self.changed.contains(&a.wall)
                || self.changed.contains(&b.wall)
            {
                continue;
            }
            let (Ok(wall_a), Ok(wall_b)) = (store.wall(a.wall), store.wall(b.wall)) else {
                continue;
            };
            let Some(joint) = wall_a.centerline_intersection(wall_b) else {
                continue;
            };

            let side = wall_a.side(a.side);
            let corner = if distance(side.start, joint) <= distance(side.end, joint) {
                side.start
            } else {
                side.end
            };
            let d = corner - joint;
            let len = d.norm();
            if len < TOLERANCE {
                continue;
            }
            anchors.push(corner + (d / len) * ANCHOR_OFFSET);
        }

        Ok(anchors)
    }
}

/// Runs the trace → splice → holes → area pipeline at a point.
fn resolve_room(store: &PlanStore, point: Point2) -> Result<Option<RoomData>> {
    let Some(outer) = TraceEnclosure::new(point).execute(store)? else {
        return Ok(None);
    };
    let boundary = ResolveInternalWalls::new(outer).execute(store)?;
    let holes = FindHoles::new(boundary.clone(), point).execute(store)?;
    let area = boundary_area(store, &boundary, &holes)?;
    Ok(Some(RoomData::new(boundary, holes, area)))
}
