use thiserror::Error;

/// Top-level error type for the roomtrace engine.
///
/// Degenerate geometry and unenclosed points are not errors: the geometry
/// primitives and tracers report those as `None`. Errors are reserved for
/// broken invariants: missing entities and malformed stored paths.
#[derive(Debug, Error)]
pub enum RoomtraceError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Errors related to the wall/room entity store.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("no batch in progress")]
    NoBatch,
}

/// Errors related to boundary paths.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("boundary path too short: {0} entries")]
    PathTooShort(usize),

    #[error("adjacent path walls share no joint")]
    DisjointPathWalls,
}

/// Convenience type alias for results using [`RoomtraceError`].
pub type Result<T> = std::result::Result<T, RoomtraceError>;
