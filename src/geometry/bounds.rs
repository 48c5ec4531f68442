//! Bounding boxes for segments
//!
//! Exact axis-aligned boxes for cubic curves come from the roots of the
//! derivative on each axis. Quadratics are elevated to cubics first.

use super::shape::SegmentShape;
use kurbo::{CubicBez, ParamCurve, Point, QuadBez, Rect};

/// Coefficients below this are treated as zero when solving for extrema
const EXTREMA_EPSILON: f64 = 1e-12;

/// Parameters in (0, 1) where one axis of a cubic has a local extremum.
///
/// The derivative of the cubic on one axis is `A t² + B t + C`; when `A`
/// vanishes the equation degrades to a linear one.
fn cubic_extrema(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    let qa = -a + 3.0 * b - 3.0 * c + d;
    let qb = 2.0 * (a - 2.0 * b + c);
    let qc = b - a;

    let mut roots = Vec::with_capacity(2);
    if qa.abs() < EXTREMA_EPSILON {
        if qb.abs() > EXTREMA_EPSILON {
            roots.push(-qc / qb);
        }
    } else {
        let discriminant = qb * qb - 4.0 * qa * qc;
        if discriminant >= 0.0 {
            let sqrt_d = discriminant.sqrt();
            roots.push((-qb + sqrt_d) / (2.0 * qa));
            roots.push((-qb - sqrt_d) / (2.0 * qa));
        }
    }
    roots.retain(|t| *t > 0.0 && *t < 1.0);
    roots
}

/// Exact axis-aligned bounding box of a cubic Bezier
pub fn cubic_bounding_box(p0: Point, p1: Point, p2: Point, p3: Point) -> Rect {
    let cubic = CubicBez::new(p0, p1, p2, p3);
    let mut rect = Rect::from_points(p0, p3);

    for t in cubic_extrema(p0.x, p1.x, p2.x, p3.x) {
        let x = cubic.eval(t).x;
        rect.x0 = rect.x0.min(x);
        rect.x1 = rect.x1.max(x);
    }
    for t in cubic_extrema(p0.y, p1.y, p2.y, p3.y) {
        let y = cubic.eval(t).y;
        rect.y0 = rect.y0.min(y);
        rect.y1 = rect.y1.max(y);
    }
    rect
}

/// Degree elevation of a quadratic to the equivalent cubic
pub fn quad_to_cubic(p0: Point, p1: Point, p2: Point) -> CubicBez {
    let c1 = p0 + (p1 - p0) * (2.0 / 3.0);
    let c2 = p2 + (p1 - p2) * (2.0 / 3.0);
    CubicBez::new(p0, c1, c2, p2)
}

/// Bounding box of any segment shape
pub fn segment_bounding_box(shape: &SegmentShape) -> Rect {
    match shape {
        SegmentShape::Line(p0, p1) => Rect::from_points(*p0, *p1),
        SegmentShape::Quad(QuadBez { p0, p1, p2 }) => {
            let cubic = quad_to_cubic(*p0, *p1, *p2);
            cubic_bounding_box(cubic.p0, cubic.p1, cubic.p2, cubic.p3)
        }
        SegmentShape::Cubic(c) => cubic_bounding_box(c.p0, c.p1, c.p2, c.p3),
    }
}

/// Euclidean distance from a point to a box, zero when inside
pub fn distance_to_rect(rect: Rect, point: Point) -> f64 {
    let dx = (rect.x0 - point.x).max(0.0).max(point.x - rect.x1);
    let dy = (rect.y0 - point.y).max(0.0).max(point.y - rect.y1);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::sampling::sample_segment;

    fn assert_contains(rect: Rect, points: &[Point]) {
        let inflated = rect.inflate(1e-9, 1e-9);
        for p in points {
            assert!(
                p.x >= inflated.x0 && p.x <= inflated.x1 && p.y >= inflated.y0 && p.y <= inflated.y1,
                "Sample {:?} escapes bounding box {:?}",
                p,
                rect
            );
        }
    }

    #[test]
    fn test_cubic_box_includes_bulge() {
        let rect = cubic_bounding_box(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 0.0),
        );
        assert_eq!(rect.x0, 0.0);
        assert_eq!(rect.x1, 100.0);
        assert!((rect.y1 - 75.0).abs() < 1e-9, "Peak of this arch is at 75, got {}", rect.y1);
        assert_eq!(rect.y0, 0.0);
    }

    #[test]
    fn test_linear_fallback_when_leading_coefficient_vanishes() {
        // Handles placed so the x-derivative is linear
        let roots = cubic_extrema(0.0, 1.0, 2.0, 3.0);
        assert!(roots.is_empty(), "Uniform motion has no extrema");

        let roots = cubic_extrema(0.0, 2.0, 2.0, 0.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_samples_stay_inside_boxes() {
        let shapes = [
            SegmentShape::from_points(
                Point::new(10.0, 10.0),
                &[Point::new(-40.0, 80.0), Point::new(160.0, -50.0)],
                Point::new(120.0, 30.0),
            ),
            SegmentShape::from_points(
                Point::new(0.0, 0.0),
                &[Point::new(50.0, 120.0)],
                Point::new(100.0, -20.0),
            ),
            SegmentShape::from_points(Point::new(5.0, 5.0), &[], Point::new(-30.0, 70.0)),
        ];

        for shape in &shapes {
            let rect = segment_bounding_box(shape);
            let samples = sample_segment(shape, 1.0);
            assert_contains(rect, &samples);
        }
    }

    #[test]
    fn test_distance_to_rect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(distance_to_rect(rect, Point::new(5.0, 5.0)), 0.0);
        assert_eq!(distance_to_rect(rect, Point::new(13.0, 14.0)), 5.0);
        assert_eq!(distance_to_rect(rect, Point::new(-2.0, 5.0)), 2.0);
    }
}
