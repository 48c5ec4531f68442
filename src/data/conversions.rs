//! UFO format conversion utilities
//!
//! Conversion between norad contours and our paths, and from paths to kurbo
//! outlines for drawing. UFO point names and identifiers are not carried
//! through; everything else on a contour point is.

use super::layer::Layer;
use super::node::{NodeData, PointType};
use super::path::Path;
use crate::geometry::quad_to_cubic;
use kurbo::{BezPath, Point};

impl PointType {
    /// Map a norad point type. `Move` becomes `Line`; openness lives on the path.
    pub fn from_norad_point_type(norad_type: &norad::PointType) -> Self {
        match norad_type {
            norad::PointType::Move | norad::PointType::Line => PointType::Line,
            norad::PointType::OffCurve => PointType::OffCurve,
            norad::PointType::Curve => PointType::Curve,
            norad::PointType::QCurve => PointType::QCurve,
        }
    }

    pub fn to_norad_point_type(&self) -> norad::PointType {
        match self {
            PointType::Line => norad::PointType::Line,
            PointType::OffCurve => norad::PointType::OffCurve,
            PointType::Curve => norad::PointType::Curve,
            PointType::QCurve => norad::PointType::QCurve,
        }
    }
}

impl NodeData {
    pub fn from_norad_point(norad_point: &norad::ContourPoint) -> Self {
        NodeData::new(
            norad_point.x,
            norad_point.y,
            PointType::from_norad_point_type(&norad_point.typ),
        )
        .with_smooth(norad_point.smooth)
    }
}

impl Layer {
    /// Build a layer with one path per contour, in contour order
    pub fn from_norad_contours(contours: &[norad::Contour]) -> Self {
        let mut layer = Layer::new();
        for contour in contours {
            let closed = contour
                .points
                .first()
                .is_none_or(|p| p.typ != norad::PointType::Move);
            let mut nodes: Vec<NodeData> = contour.points.iter().map(NodeData::from_norad_point).collect();
            // A closed contour may start on a handle; begin on the first on-curve instead
            if closed {
                if let Some(first_on) = nodes.iter().position(|n| n.typ.is_on_curve()) {
                    nodes.rotate_left(first_on);
                }
            }
            layer.add_path(closed, nodes);
        }
        layer
    }

    /// Contours for every non-empty path, in layer order
    pub fn to_norad_contours(&self) -> Vec<norad::Contour> {
        self.non_empty_paths().map(Path::to_norad_contour).collect()
    }
}

impl Path {
    pub fn to_norad_contour(&self) -> norad::Contour {
        let points = self
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let typ = if index == 0 && !self.is_closed() && node.is_on_curve() {
                    norad::PointType::Move
                } else {
                    node.typ.to_norad_point_type()
                };
                norad::ContourPoint::new(
                    node.position.x,
                    node.position.y,
                    typ,
                    node.smooth,
                    None, // name
                    None, // identifier
                )
            })
            .collect();

        norad::Contour::new(points, None)
    }

    /// Drawable outline of the path
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        let Some(&first) = self.on_curve_indices().first() else {
            return bez;
        };
        bez.move_to(self.nodes()[first].position);

        let segments = self.segments();
        let drawn = if self.is_closed() {
            segments.len()
        } else {
            segments.len().saturating_sub(1)
        };
        for segment in &segments[..drawn] {
            let indices = segment.indices(self.len());
            let handles: Vec<Point> = indices[1..indices.len() - 1]
                .iter()
                .map(|&i| self.nodes()[i].position)
                .collect();
            let end = &self.nodes()[segment.end];
            push_segment(&mut bez, self.nodes()[segment.start].position, &handles, end.position, end.typ);
        }
        if self.is_closed() {
            bez.close_path();
        }
        bez
    }
}

/// Append one segment to an outline whose current point is `start`.
///
/// Quadratic runs with implied on-curve midpoints are elevated to cubics;
/// segments with three or more cubic handles are drawn as a line.
pub(crate) fn push_segment(
    bez: &mut BezPath,
    start: Point,
    handles: &[Point],
    end: Point,
    end_type: PointType,
) {
    match (handles, end_type) {
        ([], _) => bez.line_to(end),
        (_, PointType::QCurve) => {
            let mut from = start;
            for (i, &control) in handles.iter().enumerate() {
                let to = match handles.get(i + 1) {
                    Some(&next) => control.midpoint(next),
                    None => end,
                };
                let cubic = quad_to_cubic(from, control, to);
                bez.curve_to(cubic.p1, cubic.p2, cubic.p3);
                from = to;
            }
        }
        ([h], _) => {
            let cubic = quad_to_cubic(start, *h, end);
            bez.curve_to(cubic.p1, cubic.p2, cubic.p3);
        }
        ([h1, h2], _) => bez.curve_to(*h1, *h2, end),
        _ => bez.line_to(end),
    }
}
