//! End-to-end exercise of the host contract: build walls, miter, create a
//! room, edit walls inside a batch, retrace, roll back.
#![allow(clippy::unwrap_used)]

use roomtrace::math::Point2;
use roomtrace::model::{PlanStore, WallData, WallId};
use roomtrace::operations::{AddRoomAt, MiterJoints, RetraceRooms, RoomArea, TraceEnclosure};

/// Pipes engine logs through `RUST_LOG` when a test needs debugging.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

fn add_square(store: &mut PlanStore, x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<WallId> {
    vec![
        store.add_wall(WallData::new(p(x0, y0), p(x1, y0), 1.0)),
        store.add_wall(WallData::new(p(x1, y0), p(x1, y1), 1.0)),
        store.add_wall(WallData::new(p(x1, y1), p(x0, y1), 1.0)),
        store.add_wall(WallData::new(p(x0, y1), p(x0, y0), 1.0)),
    ]
}

#[test]
fn square_room_lifecycle() {
    init_logging();
    let mut store = PlanStore::new();
    let walls = add_square(&mut store, 0.0, 0.0, 10.0, 10.0);
    MiterJoints::new().execute(&mut store).unwrap();

    let room = AddRoomAt::new(p(5.0, 5.0))
        .execute(&mut store)
        .unwrap()
        .expect("enclosed point creates a room");
    assert_eq!(store.room(room).unwrap().boundary.len(), 4);
    assert!((RoomArea::new(room).execute(&store).unwrap() - 81.0).abs() < 1e-6);

    // Deleting a wall inside a batch removes the room...
    store.begin_batch();
    store.remove_wall(walls[2]);
    MiterJoints::new().execute(&mut store).unwrap();
    let report = RetraceRooms::new([walls[2]]).execute(&mut store).unwrap();
    assert_eq!(report.deleted, vec![room]);
    assert!(TraceEnclosure::new(p(5.0, 5.0))
        .execute(&store)
        .unwrap()
        .is_none());

    // ...and rolling the batch back restores wall and room as one unit.
    store.rollback_batch().unwrap();
    assert!(store.wall(walls[2]).is_ok());
    assert!(store.room(room).is_ok());
    assert!(TraceEnclosure::new(p(5.0, 5.0))
        .execute(&store)
        .unwrap()
        .is_some());
}

#[test]
fn partition_edit_updates_room_geometry() {
    init_logging();
    let mut store = PlanStore::new();
    add_square(&mut store, 0.0, 0.0, 12.0, 12.0);
    let part = store.add_wall(WallData::new(p(0.0, 7.0), p(5.0, 7.0), 1.0));
    MiterJoints::new().execute(&mut store).unwrap();

    let room = AddRoomAt::new(p(8.0, 3.0))
        .execute(&mut store)
        .unwrap()
        .unwrap();
    let with_partition = store.room(room).unwrap().area;
    assert!(store.room(room).unwrap().boundary.contains_wall(part));

    store.begin_batch();
    store.remove_wall(part);
    MiterJoints::new().execute(&mut store).unwrap();
    let report = RetraceRooms::new([part]).execute(&mut store).unwrap();
    store.commit_batch().unwrap();

    assert_eq!(report.updated, vec![room]);
    let room_data = store.room(room).unwrap();
    assert!(!room_data.boundary.contains_wall(part));
    // The partition's footprint is returned to the room.
    assert!(room_data.area > with_partition);
}
