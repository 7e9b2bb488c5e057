use crate::error::Result;
use crate::math::polygon_2d::polygon_area;
use crate::model::{BoundaryPath, PlanStore, RoomId};

use super::polygon::path_polygon;

/// Computes a room's floor area: outer polygon area minus the area of each
/// hole, in squared document units. Unit conversion is the host's job.
#[derive(Debug)]
pub struct RoomArea {
    room: RoomId,
}

impl RoomArea {
    /// Creates the query.
    #[must_use]
    pub fn new(room: RoomId) -> Self {
        Self { room }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or one of its walls is missing, or if a
    /// stored path is malformed.
    pub fn execute(&self, store: &PlanStore) -> Result<f64> {
        let room = store.room(self.room)?;
        boundary_area(store, &room.boundary, &room.holes)
    }
}

/// Area of a boundary-with-holes before it is stored on a room.
pub(crate) fn boundary_area(
    store: &PlanStore,
    boundary: &BoundaryPath,
    holes: &[BoundaryPath],
) -> Result<f64> {
    let outer = path_polygon(store, boundary)?;
    let mut area = polygon_area(&outer);
    for hole in holes {
        area -= polygon_area(&path_polygon(store, hole)?);
    }
    Ok(area)
}
