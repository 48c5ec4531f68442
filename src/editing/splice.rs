//! Path splicing
//!
//! Replaces the interior of a closest area with a copy of the drawn path.
//! Afterwards the junctions are re-derived from the inserted run so the
//! connection smoother knows which nodes to work on.

use super::closest_area::ClosestArea;
use crate::data::{Layer, NodeId, Path, PathId, PointType};
use tracing::debug;

/// Node identities around both seams of a splice.
///
/// The `ns*` slots are counted from the start of the inserted run, the
/// `ne*` slots from its end. Slots that do not exist for a short run are
/// `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Junctions {
    /// Path the new nodes now live in
    pub target: PathId,
    /// Existing junction node at the start side
    pub cs1: NodeId,
    /// Existing junction node at the end side
    pub ce1: NodeId,
    pub ns1: NodeId,
    pub ns1h: Option<NodeId>,
    pub ns2h: Option<NodeId>,
    pub ns2: Option<NodeId>,
    pub ne2: Option<NodeId>,
    pub ne2h: Option<NodeId>,
    pub ne1h: Option<NodeId>,
    pub ne1: NodeId,
}

impl Junctions {
    fn from_inserted(target: PathId, cs1: NodeId, ce1: NodeId, inserted: &[NodeId]) -> Option<Self> {
        let len = inserted.len();
        let ns1 = *inserted.first()?;
        let ne1 = *inserted.last()?;
        let from_end = |k: usize| len.checked_sub(k).and_then(|i| inserted.get(i).copied());
        // Next on-curve neighbours only exist past the first segment; a single
        // inserted cubic (four nodes) has none, so its handles stay as drawn
        let long_run = len > 4;

        Some(Self {
            target,
            cs1,
            ce1,
            ns1,
            ns1h: inserted.get(1).copied(),
            ns2h: inserted.get(2).copied(),
            ns2: if long_run { inserted.get(3).copied() } else { None },
            ne2: if long_run { from_end(4) } else { None },
            ne2h: if len > 2 { from_end(3) } else { None },
            ne1h: if len > 1 { from_end(2) } else { None },
            ne1,
        })
    }
}

/// Splice `new_path` into `target` over `area`.
///
/// The area must have been located on `target` and its direction already
/// synchronised with `new_path`. Returns `None` without touching anything
/// when `new_path` is empty or the start junction is gone.
pub fn splice_into(target: &mut Path, area: &ClosestArea, new_path: &Path) -> Option<Junctions> {
    if new_path.is_empty() || target.index_of(area.start_node).is_none() {
        return None;
    }

    let interior = area.interior_ids(target);
    for &id in &interior {
        target.remove_node(id);
    }

    // The junctions are adjacent now; whatever follows the start junction
    // is connected to it by a straight line
    let cs1_index = target.index_of(area.start_node)?;
    if let Some(after) = target.next_index(cs1_index) {
        if let Some(node) = target.node_at_mut(after) {
            if node.is_on_curve() && node.typ != PointType::Line {
                node.typ = PointType::Line;
            }
        }
    }

    let inserted: Vec<NodeId> = new_path
        .nodes()
        .iter()
        .enumerate()
        .map(|(offset, node)| target.insert_node(cs1_index + 1 + offset, node.data()))
        .collect();

    debug!(
        "Spliced {} nodes into path {:?} in place of {} interior nodes",
        inserted.len(),
        target.id(),
        interior.len()
    );

    Junctions::from_inserted(target.id(), area.start_node, area.end_node, &inserted)
}

/// Detach `new_path` from the layer and splice it into the area's path.
///
/// The drawn path is removed from the layer even when it turns out to be
/// empty. Returns `None` when either path is missing.
pub fn splice(layer: &mut Layer, area: &ClosestArea, new_path: PathId) -> Option<Junctions> {
    if new_path == area.path || layer.path(area.path).is_none() {
        return None;
    }
    let detached = layer.remove_path(new_path)?;
    let target = layer.path_mut(area.path)?;
    splice_into(target, area, &detached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::LocateSettings;
    use crate::data::NodeData;
    use crate::editing::closest_area::locate_closest_area;
    use kurbo::Point;

    fn square_layer() -> (Layer, PathId) {
        let mut layer = Layer::new();
        let id = layer.add_path(
            true,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(100.0, 0.0),
                NodeData::line(100.0, 100.0),
                NodeData::line(0.0, 100.0),
            ],
        );
        (layer, id)
    }

    #[test]
    fn test_splice_node_count() {
        let (mut layer, square) = square_layer();
        let stroke = layer.add_path(false, [NodeData::line(5.0, 50.0), NodeData::line(50.0, 5.0)]);

        let area = locate_closest_area(
            &layer,
            Some(stroke),
            Point::new(5.0, 50.0),
            Point::new(50.0, 5.0),
            &LocateSettings::default(),
        )
        .expect("Area should be found");
        assert_eq!(area.indices, vec![3, 0, 1]);

        let interior = area.interior_ids(layer.path(square).expect("square")).len();
        let junctions = splice(&mut layer, &area, stroke).expect("Splice should succeed");

        assert_eq!(layer.len(), 1, "Drawn path is detached from the layer");
        let path = layer.path(square).expect("square");
        assert_eq!(path.len(), 4 - interior + 2);
        assert!(path.is_closed());
        assert_eq!(junctions.target, square);
        assert_eq!(path.position(junctions.ns1), Some(Point::new(5.0, 50.0)));
        assert_eq!(path.position(junctions.ne1), Some(Point::new(50.0, 5.0)));
        assert_eq!(
            path.index_of(junctions.ns1),
            path.index_of(junctions.cs1).map(|i| i + 1),
            "Inserted run follows the start junction"
        );
    }

    #[test]
    fn test_short_run_slots() {
        let (mut layer, square) = square_layer();
        let area = locate_closest_area(
            &layer,
            None,
            Point::new(20.0, 10.0),
            Point::new(80.0, 10.0),
            &LocateSettings::default(),
        )
        .expect("Area should be found");
        let stroke = Path::from_nodes(
            PathId::new(99),
            false,
            [NodeData::line(20.0, 10.0), NodeData::line(80.0, 10.0)],
        );

        let target = layer.path_mut(square).expect("square");
        let junctions = splice_into(target, &area, &stroke).expect("Splice should succeed");
        assert_eq!(target.len(), 6);
        assert!(junctions.ns1h.is_some(), "Two-node runs still expose the neighbour slot");
        assert_eq!(junctions.ns1h, Some(junctions.ne1));
        assert_eq!(junctions.ns2h, None);
        assert_eq!(junctions.ns2, None);
        assert_eq!(junctions.ne2, None);
        assert_eq!(junctions.ne2h, None);
    }

    #[test]
    fn test_single_cubic_run_has_no_next_neighbours() {
        let (mut layer, square) = square_layer();
        let area = locate_closest_area(
            &layer,
            None,
            Point::new(10.0, 5.0),
            Point::new(90.0, 5.0),
            &LocateSettings::default(),
        )
        .expect("Area should be found");
        let stroke = Path::from_nodes(
            PathId::new(99),
            false,
            [
                NodeData::line(10.0, 5.0),
                NodeData::off_curve(30.0, 20.0),
                NodeData::off_curve(70.0, 20.0),
                NodeData::curve(90.0, 5.0),
            ],
        );

        let target = layer.path_mut(square).expect("square");
        let junctions = splice_into(target, &area, &stroke).expect("Splice should succeed");
        let position = |id: Option<NodeId>| id.and_then(|id| target.position(id));

        assert_eq!(position(junctions.ns1h), Some(Point::new(30.0, 20.0)));
        assert_eq!(position(junctions.ns2h), Some(Point::new(70.0, 20.0)));
        assert_eq!(position(junctions.ne2h), Some(Point::new(30.0, 20.0)));
        assert_eq!(position(junctions.ne1h), Some(Point::new(70.0, 20.0)));
        assert_eq!(junctions.ns2, None);
        assert_eq!(junctions.ne2, None);
    }

    #[test]
    fn test_long_run_slots() {
        let (mut layer, square) = square_layer();
        let area = locate_closest_area(
            &layer,
            None,
            Point::new(10.0, 5.0),
            Point::new(90.0, 5.0),
            &LocateSettings::default(),
        )
        .expect("Area should be found");
        let stroke = Path::from_nodes(
            PathId::new(99),
            false,
            [
                NodeData::line(10.0, 5.0),
                NodeData::off_curve(20.0, 5.0),
                NodeData::off_curve(30.0, 20.0),
                NodeData::curve(50.0, 20.0).with_smooth(true),
                NodeData::off_curve(70.0, 20.0),
                NodeData::off_curve(80.0, 5.0),
                NodeData::curve(90.0, 5.0),
            ],
        );

        let target = layer.path_mut(square).expect("square");
        let junctions = splice_into(target, &area, &stroke).expect("Splice should succeed");
        let position = |id: Option<NodeId>| id.and_then(|id| target.position(id));

        assert_eq!(position(junctions.ns1h), Some(Point::new(20.0, 5.0)));
        assert_eq!(position(junctions.ns2h), Some(Point::new(30.0, 20.0)));
        assert_eq!(position(junctions.ns2), Some(Point::new(50.0, 20.0)));
        assert_eq!(position(junctions.ne2), Some(Point::new(50.0, 20.0)));
        assert_eq!(position(junctions.ne2h), Some(Point::new(70.0, 20.0)));
        assert_eq!(position(junctions.ne1h), Some(Point::new(80.0, 5.0)));
        assert!(
            target.node(junctions.ns2.expect("slot")).is_some_and(|n| n.smooth),
            "Smooth flags are copied"
        );
    }

    #[test]
    fn test_empty_new_path_is_ignored() {
        let (mut layer, square) = square_layer();
        let area = locate_closest_area(
            &layer,
            None,
            Point::new(20.0, 10.0),
            Point::new(80.0, 10.0),
            &LocateSettings::default(),
        )
        .expect("Area should be found");
        let empty = Path::new(PathId::new(99), false);
        let target = layer.path_mut(square).expect("square");
        assert!(splice_into(target, &area, &empty).is_none());
        assert_eq!(target.len(), 4, "Nothing is removed");
    }
}
