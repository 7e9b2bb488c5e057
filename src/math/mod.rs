pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Numeric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for matching joint points, in document units.
///
/// Repeated offset/rotate arithmetic on wall endpoints accumulates error well
/// above machine epsilon, so all point matching in the engine goes through
/// [`points_approx_equal`] with this tolerance, never exact equality.
pub const POINT_EPSILON: f64 = 0.05;

/// Returns true if two points coincide within [`POINT_EPSILON`].
#[must_use]
pub fn points_approx_equal(a: Point2, b: Point2) -> bool {
    distance(a, b) < POINT_EPSILON
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point2, b: Point2) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Cross product of two 2D vectors (z component of the 3D cross).
#[must_use]
pub fn cross_2d(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
