//! Geometry utility functions
//!
//! Shared vector math used by the locator, the connection smoother and the
//! simplify passes. Functions return `None` instead of dividing by zero so
//! callers can skip degenerate adjustments.

use kurbo::{Point, Vec2};

/// Determinants smaller than this mean the two lines are parallel
const PARALLEL_EPSILON: f64 = 1e-12;

/// Intersection of the line through `n1`-`h1` with the line through `n2`-`h2`
pub fn line_intersection(n1: Point, h1: Point, n2: Point, h2: Point) -> Option<Point> {
    let det = (n1.x - h1.x) * (n2.y - h2.y) - (n1.y - h1.y) * (n2.x - h2.x);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let a = n1.x * h1.y - n1.y * h1.x;
    let b = n2.x * h2.y - n2.y * h2.x;
    let x = (a * (n2.x - h2.x) - (n1.x - h1.x) * b) / det;
    let y = (a * (n2.y - h2.y) - (n1.y - h1.y) * b) / det;
    Some(Point::new(x, y))
}

/// Unsigned angle between two vectors in degrees
pub fn angle_between(v1: Vec2, v2: Vec2) -> Option<f64> {
    let magnitude = v1.hypot() * v2.hypot();
    if magnitude == 0.0 {
        return None;
    }
    let cos = (v1.dot(v2) / magnitude).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle at `vertex` between the directions toward `a` and `b`, in degrees
pub fn angle_at(a: Point, vertex: Point, b: Point) -> Option<f64> {
    angle_between(a - vertex, b - vertex)
}

/// Whether `subject` lies behind `start` relative to the `start`-`toward` direction
pub fn is_turned_backward(start: Point, subject: Point, toward: Point) -> bool {
    let segment = toward - start;
    let offset = subject - start;
    let magnitude = segment.hypot() * offset.hypot();
    if magnitude == 0.0 {
        return false;
    }
    segment.dot(offset) / magnitude < 0.0
}

/// Unit vector in the direction of `v`, or `None` for a zero vector
pub fn unit_vector(v: Vec2) -> Option<Vec2> {
    let length = v.hypot();
    if length == 0.0 || !length.is_finite() {
        None
    } else {
        Some(v / length)
    }
}

/// Signed distance of `point` along `unit` measured from `origin`
pub fn projection_length(point: Point, origin: Point, unit: Vec2) -> f64 {
    (point - origin).dot(unit)
}

/// Orthogonal projection of `point` onto the line through `origin` along `unit`
pub fn project_onto_line(point: Point, origin: Point, unit: Vec2) -> Point {
    origin + unit * projection_length(point, origin, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_intersection_crossing() {
        let p = line_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(100.0, 0.0),
            Point::new(90.0, 10.0),
        )
        .expect("Lines should intersect");
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_intersection_parallel() {
        let p = line_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
        );
        assert!(p.is_none(), "Parallel lines have no intersection");
    }

    #[test]
    fn test_angles() {
        let right = angle_at(Point::new(10.0, 0.0), Point::ZERO, Point::new(0.0, 10.0));
        assert!((right.unwrap_or_default() - 90.0).abs() < 1e-9);

        let straight = angle_between(Vec2::new(1.0, 0.0), Vec2::new(-3.0, 0.0));
        assert!((straight.unwrap_or_default() - 180.0).abs() < 1e-9);

        assert!(angle_between(Vec2::ZERO, Vec2::new(1.0, 0.0)).is_none());
    }

    #[test]
    fn test_turned_backward() {
        let start = Point::new(0.0, 0.0);
        let toward = Point::new(100.0, 0.0);
        assert!(is_turned_backward(start, Point::new(-5.0, 2.0), toward));
        assert!(!is_turned_backward(start, Point::new(5.0, 2.0), toward));
        assert!(!is_turned_backward(start, start, toward), "Zero-length subject is not backward");
    }

    #[test]
    fn test_projection() {
        let unit = Vec2::new(1.0, 0.0);
        let projected = project_onto_line(Point::new(30.0, 12.0), Point::new(10.0, 0.0), unit);
        assert_eq!(projected, Point::new(30.0, 0.0));
        assert_eq!(projection_length(Point::new(5.0, 3.0), Point::new(10.0, 0.0), unit), -5.0);
    }
}
