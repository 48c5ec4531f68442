//! Outline node data structures
//!
//! A node is either on the outline (on-curve) or a Bezier control point
//! (off-curve). On-curve nodes carry the type of the segment that ends at
//! them, mirroring the UFO point model.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Stable identity of a node within its path.
///
/// Ids are issued by the owning [`crate::data::Path`] and are never reused,
/// so they stay valid while other nodes are inserted or removed. The current
/// positional index is looked up on demand with `Path::index_of`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Point type, following the UFO vocabulary minus `move`
///
/// An open path is represented by the path's closed flag instead of a
/// leading `move` point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    /// Straight line from the previous on-curve node
    #[serde(rename = "line")]
    Line,
    /// End of a cubic segment
    #[serde(rename = "curve")]
    Curve,
    /// End of a quadratic segment
    #[serde(rename = "qcurve")]
    QCurve,
    /// Control point
    #[serde(rename = "offcurve")]
    OffCurve,
}

impl PointType {
    pub fn is_on_curve(&self) -> bool {
        !matches!(self, PointType::OffCurve)
    }

    pub fn is_off_curve(&self) -> bool {
        matches!(self, PointType::OffCurve)
    }
}

/// The visible role of a node on the outline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    OnCurveCorner,
    OnCurveSmooth,
    OffCurve,
}

/// Node contents without an identity, used to insert nodes into a path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeData {
    pub position: Point,
    pub typ: PointType,
    pub smooth: bool,
}

impl NodeData {
    pub fn new(x: f64, y: f64, typ: PointType) -> Self {
        Self {
            position: Point::new(x, y),
            typ,
            smooth: false,
        }
    }

    pub fn line(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Line)
    }

    pub fn curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::Curve)
    }

    pub fn qcurve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::QCurve)
    }

    pub fn off_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::OffCurve)
    }

    /// Set the smooth flag (ignored for off-curve points)
    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth && self.typ.is_on_curve();
        self
    }
}

/// A node owned by a path
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    id: NodeId,
    pub position: Point,
    pub typ: PointType,
    pub smooth: bool,
}

impl Node {
    pub(crate) fn from_data(id: NodeId, data: NodeData) -> Self {
        Self {
            id,
            position: data.position,
            typ: data.typ,
            smooth: data.smooth && data.typ.is_on_curve(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        match (self.typ, self.smooth) {
            (PointType::OffCurve, _) => NodeKind::OffCurve,
            (_, true) => NodeKind::OnCurveSmooth,
            (_, false) => NodeKind::OnCurveCorner,
        }
    }

    pub fn is_on_curve(&self) -> bool {
        self.typ.is_on_curve()
    }

    pub fn is_off_curve(&self) -> bool {
        self.typ.is_off_curve()
    }

    /// Copy of the contents without the identity
    pub fn data(&self) -> NodeData {
        NodeData {
            position: self.position,
            typ: self.typ,
            smooth: self.smooth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        let corner = Node::from_data(NodeId::new(0), NodeData::line(0.0, 0.0));
        let smooth = Node::from_data(NodeId::new(1), NodeData::curve(0.0, 0.0).with_smooth(true));
        let handle = Node::from_data(NodeId::new(2), NodeData::off_curve(0.0, 0.0));

        assert_eq!(corner.kind(), NodeKind::OnCurveCorner);
        assert_eq!(smooth.kind(), NodeKind::OnCurveSmooth);
        assert_eq!(handle.kind(), NodeKind::OffCurve);
    }

    #[test]
    fn test_off_curve_is_never_smooth() {
        let data = NodeData::off_curve(1.0, 2.0).with_smooth(true);
        assert!(!data.smooth, "Smooth flag is only meaningful on-curve");

        let forced = NodeData {
            position: Point::new(1.0, 2.0),
            typ: PointType::OffCurve,
            smooth: true,
        };
        assert!(!Node::from_data(NodeId::new(0), forced).smooth);
    }

    #[test]
    fn test_point_type_serialization() {
        let json = serde_json::to_string(&PointType::QCurve).unwrap_or_default();
        assert_eq!(json, "\"qcurve\"");
    }
}
