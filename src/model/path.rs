use super::wall::{Side, WallId};

/// One step of a boundary traversal: walk along mitering side `side` of
/// `wall`, then continue to the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub wall: WallId,
    pub side: Side,
}

impl PathStep {
    /// Creates a step.
    #[must_use]
    pub fn new(wall: WallId, side: Side) -> Self {
        Self { wall, side }
    }
}

/// An ordered sequence of (wall, mitering-side) steps around a room or hole.
///
/// The same wall may appear twice, once per side, when the traversal rounds
/// a dead-end wall tip. Outer boundaries are wound counter-clockwise, hole
/// paths clockwise. Closure is a property of how the path was produced;
/// there is no sentinel step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryPath {
    steps: Vec<PathStep>,
}

impl BoundaryPath {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from the given steps.
    #[must_use]
    pub fn from_steps(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the path has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps in traversal order.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// True if any step references `wall`.
    #[must_use]
    pub fn contains_wall(&self, wall: WallId) -> bool {
        self.steps.iter().any(|s| s.wall == wall)
    }

    /// Index of the first step referencing `wall`.
    #[must_use]
    pub fn position_of_wall(&self, wall: WallId) -> Option<usize> {
        self.steps.iter().position(|s| s.wall == wall)
    }

    /// Appends a step.
    pub fn push(&mut self, step: PathStep) {
        self.steps.push(step);
    }

    /// Splices `steps` into the path immediately after index `index`.
    pub fn insert_after(&mut self, index: usize, steps: Vec<PathStep>) {
        let at = (index + 1).min(self.steps.len());
        self.steps.splice(at..at, steps);
    }

    /// Iterates over wall IDs in step order.
    pub fn wall_ids(&self) -> impl Iterator<Item = WallId> + '_ {
        self.steps.iter().map(|s| s.wall)
    }
}
