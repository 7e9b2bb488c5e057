pub mod area;
pub mod enclosure;
pub mod holes;
pub mod internal;
pub mod joints;
pub mod miter;
pub mod polygon;
pub mod retrace;

pub use area::RoomArea;
pub use enclosure::TraceEnclosure;
pub use holes::FindHoles;
pub use internal::ResolveInternalWalls;
pub use miter::MiterJoints;
pub use polygon::path_polygon;
pub use retrace::{AddRoomAt, RetraceReport, RetraceRooms};
