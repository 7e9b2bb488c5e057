pub mod path;
pub mod room;
pub mod wall;

pub use path::{BoundaryPath, PathStep};
pub use room::{RoomData, RoomId};
pub use wall::{MiteredSide, Side, WallData, WallId, DIVIDER_THICKNESS};

use crate::error::ModelError;
use slotmap::SlotMap;

/// Central arena that owns all wall and room entities.
///
/// Entities reference each other via typed IDs (generational indices). The
/// tracers hold only shared references to the store; all mutation happens
/// between traces, at the host's transaction boundary.
#[derive(Debug, Default)]
pub struct PlanStore {
    walls: SlotMap<WallId, WallData>,
    rooms: SlotMap<RoomId, RoomData>,
    batch: Option<Snapshot>,
}

/// Pre-batch copy of both arenas, restored on rollback.
#[derive(Debug)]
struct Snapshot {
    walls: SlotMap<WallId, WallData>,
    rooms: SlotMap<RoomId, RoomData>,
}

impl PlanStore {
    /// Creates a new, empty plan store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Wall operations ---

    /// Inserts a wall and returns its ID.
    pub fn add_wall(&mut self, data: WallData) -> WallId {
        self.walls.insert(data)
    }

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wall(&self, id: WallId) -> Result<&WallData, ModelError> {
        self.walls
            .get(id)
            .ok_or_else(|| ModelError::EntityNotFound("wall".into()))
    }

    /// Returns a mutable reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wall_mut(&mut self, id: WallId) -> Result<&mut WallData, ModelError> {
        self.walls
            .get_mut(id)
            .ok_or_else(|| ModelError::EntityNotFound("wall".into()))
    }

    /// Removes a wall, returning its data if it existed.
    pub fn remove_wall(&mut self, id: WallId) -> Option<WallData> {
        self.walls.remove(id)
    }

    /// Iterates over all walls.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallData)> {
        self.walls.iter()
    }

    /// All wall IDs in key order, for deterministic scans.
    #[must_use]
    pub fn wall_ids(&self) -> Vec<WallId> {
        let mut ids: Vec<WallId> = self.walls.keys().collect();
        ids.sort_unstable();
        ids
    }

    // --- Room operations ---

    /// Inserts a room and returns its ID.
    pub fn add_room(&mut self, data: RoomData) -> RoomId {
        self.rooms.insert(data)
    }

    /// Returns a reference to the room data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn room(&self, id: RoomId) -> Result<&RoomData, ModelError> {
        self.rooms
            .get(id)
            .ok_or_else(|| ModelError::EntityNotFound("room".into()))
    }

    /// Returns a mutable reference to the room data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn room_mut(&mut self, id: RoomId) -> Result<&mut RoomData, ModelError> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| ModelError::EntityNotFound("room".into()))
    }

    /// Removes a room, returning its data if it existed.
    pub fn remove_room(&mut self, id: RoomId) -> Option<RoomData> {
        self.rooms.remove(id)
    }

    /// Iterates over all rooms.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &RoomData)> {
        self.rooms.iter()
    }

    /// All room IDs in key order.
    #[must_use]
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.keys().collect();
        ids.sort_unstable();
        ids
    }

    // --- Batch boundary ---

    /// Opens a revertible batch over both arenas.
    ///
    /// One user action's recomputations (room updates, room deletions, wall
    /// edits) are grouped so a rollback restores them as a single unit.
    /// Nested calls keep the outermost snapshot.
    pub fn begin_batch(&mut self) {
        if self.batch.is_none() {
            self.batch = Some(Snapshot {
                walls: self.walls.clone(),
                rooms: self.rooms.clone(),
            });
        }
    }

    /// Commits the current batch, discarding the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if no batch is in progress.
    pub fn commit_batch(&mut self) -> Result<(), ModelError> {
        self.batch.take().map(|_| ()).ok_or(ModelError::NoBatch)
    }

    /// Rolls back to the state at `begin_batch`.
    ///
    /// # Errors
    ///
    /// Returns an error if no batch is in progress.
    pub fn rollback_batch(&mut self) -> Result<(), ModelError> {
        let snapshot = self.batch.take().ok_or(ModelError::NoBatch)?;
        self.walls = snapshot.walls;
        self.rooms = snapshot.rooms;
        Ok(())
    }
}
