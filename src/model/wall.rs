use crate::math::intersect_2d::segments_intersection;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{cross_2d, left_normal, points_approx_equal, Point2, POINT_EPSILON, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a wall in the plan store.
    ///
    /// Keys are `Ord` and double as the stable tiebreak key wherever walls
    /// must be sorted deterministically.
    pub struct WallId;
}

/// Thickness assigned to divider walls.
///
/// Dividers bound rooms without rendering as real walls; their sides sit a
/// hair off the centerline so side classification still works.
pub const DIVIDER_THICKNESS: f64 = 1e-3;

/// One of a wall's two mitering sides.
///
/// Side indices carry no winding convention; callers classify a side as
/// "inside" a region by geometric test, never by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    One,
    Two,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// A mitering side: a 2-point polyline parallel to the centerline, offset by
/// ±thickness/2 and adjusted at joints so adjoining walls form clean corners.
///
/// `start` corresponds to the wall's `start` endpoint, `end` to `end`; the
/// correspondence survives mitering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiteredSide {
    pub start: Point2,
    pub end: Point2,
}

impl MiteredSide {
    /// Midpoint of the side segment.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }
}

/// A thick line segment bounding rooms.
///
/// The mitering points are kept consistent with `start`/`end`/`thickness`
/// and neighboring joins by [`MiterJoints`](crate::operations::MiterJoints);
/// the tracers assume that invariant on entry and never mutate wall data.
#[derive(Debug, Clone, PartialEq)]
pub struct WallData {
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
    pub is_divider: bool,
    pub side1: MiteredSide,
    pub side2: MiteredSide,
}

impl WallData {
    /// Creates a wall with raw (unmitered) parallel sides.
    ///
    /// Side 1 sits on the left of the start→end direction, side 2 on the
    /// right. Joint mitering is applied separately.
    #[must_use]
    pub fn new(start: Point2, end: Point2, thickness: f64) -> Self {
        let d = end - start;
        let len = d.norm();
        let dir = if len > TOLERANCE { d / len } else { nalgebra::Vector2::new(1.0, 0.0) };
        let offset = left_normal(dir) * (thickness * 0.5);

        Self {
            start,
            end,
            thickness,
            is_divider: false,
            side1: MiteredSide { start: start + offset, end: end + offset },
            side2: MiteredSide { start: start - offset, end: end - offset },
        }
    }

    /// Creates a near-zero-thickness divider wall.
    #[must_use]
    pub fn divider(start: Point2, end: Point2) -> Self {
        let mut wall = Self::new(start, end, DIVIDER_THICKNESS);
        wall.is_divider = true;
        wall
    }

    /// Returns the requested mitering side.
    #[must_use]
    pub fn side(&self, side: Side) -> &MiteredSide {
        match side {
            Side::One => &self.side1,
            Side::Two => &self.side2,
        }
    }

    /// Returns the requested mitering side mutably.
    pub fn side_mut(&mut self, side: Side) -> &mut MiteredSide {
        match side {
            Side::One => &mut self.side1,
            Side::Two => &mut self.side2,
        }
    }

    /// Centerline midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    /// True if either endpoint coincides with `p` within tolerance.
    #[must_use]
    pub fn has_endpoint_at(&self, p: Point2) -> bool {
        points_approx_equal(self.start, p) || points_approx_equal(self.end, p)
    }

    /// The endpoint farther from `from`.
    #[must_use]
    pub fn far_endpoint(&self, from: Point2) -> Point2 {
        if (self.start - from).norm_squared() > (self.end - from).norm_squared() {
            self.start
        } else {
            self.end
        }
    }

    /// The endpoint other than `p` (tolerance match, falling back to the
    /// farther endpoint when neither matches).
    #[must_use]
    pub fn other_endpoint(&self, p: Point2) -> Point2 {
        if points_approx_equal(self.start, p) {
            self.end
        } else if points_approx_equal(self.end, p) {
            self.start
        } else {
            self.far_endpoint(p)
        }
    }

    /// The wall's hexagonal outline: start cap, side 1 forward, end cap,
    /// side 2 backward.
    #[must_use]
    pub fn hexagon(&self) -> [Point2; 6] {
        [
            self.start,
            self.side1.start,
            self.side1.end,
            self.end,
            self.side2.end,
            self.side2.start,
        ]
    }

    /// True if `p` lies inside the wall's hexagonal outline.
    #[must_use]
    pub fn contains_point(&self, p: Point2) -> bool {
        point_in_polygon(&self.hexagon(), p)
    }

    /// Intersection of the two walls' centerlines.
    ///
    /// Parallel walls that meet at a shared joint resolve to that joint
    /// rather than `None`.
    #[must_use]
    pub fn centerline_intersection(&self, other: &Self) -> Option<Point2> {
        segments_intersection(self.start, self.end, other.start, other.end)
    }

    /// Which mitering side is counter-clockwise as seen from `at`.
    ///
    /// Compares the two side points on the far end of the wall from `at`:
    /// when the far side-2 point is not counter-clockwise of the far side-1
    /// point (cross product ≤ 0), side 1 is the answer. All traversal
    /// winding in the engine depends on this sign convention.
    #[must_use]
    pub fn counter_clockwise_side(&self, at: Point2) -> Side {
        let far_is_start =
            (self.start - at).norm_squared() > (self.end - at).norm_squared();
        let (far1, far2) = if far_is_start {
            (self.side1.start, self.side2.start)
        } else {
            (self.side1.end, self.side2.end)
        };

        if cross_2d(far1 - at, far2 - at) <= 0.0 {
            Side::One
        } else {
            Side::Two
        }
    }

    /// The endpoint a traverser heads toward when walking the given mitering
    /// side with the wall's body on their right hand.
    ///
    /// Probes ±90° off the side's midpoint to find which offset lands inside
    /// the wall's hexagon; degenerate (divider-thin) hexagons fall back to a
    /// cross test against the centerline midpoint.
    #[must_use]
    pub fn clockwise_endpoint(&self, side: Side) -> Point2 {
        let s = self.side(side);
        let d = s.end - s.start;
        let len = d.norm();
        let dir = if len > TOLERANCE { d / len } else { nalgebra::Vector2::new(1.0, 0.0) };
        let n = left_normal(dir);
        let mid = s.midpoint();

        let delta = (self.thickness * 0.5).max(POINT_EPSILON);
        let body_on_left = if self.contains_point(mid + n * delta) {
            true
        } else if self.contains_point(mid - n * delta) {
            false
        } else {
            cross_2d(dir, self.midpoint() - mid) > 0.0
        };

        // Body on the left while walking side start→end means the clockwise
        // direction is end→start.
        if body_on_left {
            self.start
        } else {
            self.end
        }
    }
}
