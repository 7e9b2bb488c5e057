use super::path::BoundaryPath;

slotmap::new_key_type! {
    /// Unique identifier for a room in the plan store.
    pub struct RoomId;
}

/// A room: an enclosed region bounded by walls.
///
/// `boundary` holds the outer walls plus any spliced-in internal walls;
/// `holes` are clockwise-wound paths around interior wall clusters that do
/// not touch the boundary. `area` is the outer polygon area minus the hole
/// areas, in squared document units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomData {
    pub boundary: BoundaryPath,
    pub holes: Vec<BoundaryPath>,
    pub area: f64,
}

impl RoomData {
    /// Creates a room from its resolved geometry.
    #[must_use]
    pub fn new(boundary: BoundaryPath, holes: Vec<BoundaryPath>, area: f64) -> Self {
        Self { boundary, holes, area }
    }

    /// True if `wall` participates in the boundary or any hole.
    #[must_use]
    pub fn references_wall(&self, wall: super::wall::WallId) -> bool {
        self.boundary.contains_wall(wall) || self.holes.iter().any(|h| h.contains_wall(wall))
    }
}
