//! Segment shapes
//!
//! A segment between two on-curve nodes is interpreted by how many handles
//! sit between them: none is a line, one a quadratic, two a cubic. Three or
//! more handles form a broken segment that geometry treats as a straight
//! connector between the on-curve endpoints.

use kurbo::{CubicBez, ParamCurve, Point, QuadBez};

/// The drawable interpretation of one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentShape {
    /// Straight connector (also used for broken segments)
    Line(Point, Point),
    Quad(QuadBez),
    Cubic(CubicBez),
}

impl SegmentShape {
    /// Build a shape from the on-curve endpoints and the handles between them
    pub fn from_points(start: Point, handles: &[Point], end: Point) -> Self {
        match handles {
            [h] => SegmentShape::Quad(QuadBez::new(start, *h, end)),
            [h1, h2] => SegmentShape::Cubic(CubicBez::new(start, *h1, *h2, end)),
            _ => SegmentShape::Line(start, end),
        }
    }

    pub fn start(&self) -> Point {
        match self {
            SegmentShape::Line(p0, _) => *p0,
            SegmentShape::Quad(q) => q.p0,
            SegmentShape::Cubic(c) => c.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            SegmentShape::Line(_, p1) => *p1,
            SegmentShape::Quad(q) => q.p2,
            SegmentShape::Cubic(c) => c.p3,
        }
    }

    /// Straight-line distance between the endpoints
    pub fn chord(&self) -> f64 {
        self.start().distance(self.end())
    }

    /// Evaluate the shape at parameter `t` in [0, 1]
    pub fn eval(&self, t: f64) -> Point {
        match self {
            SegmentShape::Line(p0, p1) => p0.lerp(*p1, t),
            SegmentShape::Quad(q) => q.eval(t),
            SegmentShape::Cubic(c) => c.eval(t),
        }
    }
}
