//! Outline paths
//!
//! A path is an ordered run of nodes plus a closed flag. Nodes are addressed
//! by [`NodeId`]; positional indices shift on every insert and removal and
//! are only meaningful until the next mutation.

use super::node::{Node, NodeData, NodeId, PointType};
use crate::geometry::SegmentShape;
use kurbo::Point;

/// Stable identity of a path within its layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(u32);

impl PathId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A derived view of one segment: the inclusive index run between two
/// consecutive on-curve nodes, wrapping past the end of the node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// All node indices of the segment in path order, endpoints included
    pub fn indices(&self, len: usize) -> Vec<usize> {
        if self.start <= self.end {
            (self.start..=self.end).collect()
        } else {
            (self.start..len).chain(0..=self.end).collect()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Path {
    id: PathId,
    nodes: Vec<Node>,
    closed: bool,
    next_node_id: u32,
}

impl Path {
    pub fn new(id: PathId, closed: bool) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            closed,
            next_node_id: 0,
        }
    }

    pub fn from_nodes(id: PathId, closed: bool, nodes: impl IntoIterator<Item = NodeData>) -> Self {
        let mut path = Self::new(id, closed);
        for data in nodes {
            path.push_node(data);
        }
        path
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub(crate) fn node_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Current positional index of a node
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Node positions in path order
    pub fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    fn issue_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Insert a new node at `index` (clamped to the end) and return its id
    pub fn insert_node(&mut self, index: usize, data: NodeData) -> NodeId {
        let id = self.issue_id();
        let index = index.min(self.nodes.len());
        self.nodes.insert(index, Node::from_data(id, data));
        id
    }

    pub fn push_node(&mut self, data: NodeData) -> NodeId {
        self.insert_node(self.nodes.len(), data)
    }

    /// Structural removal by identity.
    ///
    /// The on-curve node that now ends the affected segment gets its type
    /// normalized: `Line` when no handles precede it, `Curve` when handles
    /// precede a former line.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let index = self.index_of(id)?;
        let removed = self.nodes.remove(index);
        if let Some(next_on) = self.on_curve_at_or_after(index) {
            self.normalize_segment_type(next_on);
        }
        Some(removed)
    }

    /// Remove a node without touching any neighbour
    pub(crate) fn remove_node_raw(&mut self, id: NodeId) -> Option<Node> {
        let index = self.index_of(id)?;
        Some(self.nodes.remove(index))
    }

    /// Reverse the traversal order.
    ///
    /// Segment-end types move with their segments, so every segment keeps
    /// its line/curve kind. For open paths the new first node becomes a
    /// `Line`.
    pub fn reverse(&mut self) {
        let on_curves = self.on_curve_indices();
        let count = on_curves.len();
        if count > 0 {
            let old_types: Vec<PointType> = on_curves.iter().map(|&i| self.nodes[i].typ).collect();
            for k in 0..count {
                let successor = k + 1;
                let typ = if successor < count {
                    old_types[successor]
                } else if self.closed {
                    old_types[0]
                } else {
                    PointType::Line
                };
                self.nodes[on_curves[k]].typ = typ;
            }
        }
        self.nodes.reverse();
    }

    pub fn on_curve_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_on_curve())
            .map(|(i, _)| i)
            .collect()
    }

    /// Segments between consecutive on-curve nodes.
    ///
    /// The last on-curve node pairs with the first one even on open paths;
    /// this closing segment is what lets an open path be recognised as
    /// wrapping around.
    pub fn segments(&self) -> Vec<Segment> {
        let on_curves = self.on_curve_indices();
        if on_curves.len() < 2 {
            return Vec::new();
        }
        (0..on_curves.len())
            .map(|k| Segment {
                start: on_curves[k],
                end: on_curves[(k + 1) % on_curves.len()],
            })
            .collect()
    }

    /// Geometric interpretation of a segment
    pub fn segment_shape(&self, segment: &Segment) -> SegmentShape {
        let indices = segment.indices(self.nodes.len());
        let handles: Vec<Point> = indices[1..indices.len().saturating_sub(1).max(1)]
            .iter()
            .filter(|&&i| self.nodes[i].is_off_curve())
            .map(|&i| self.nodes[i].position)
            .collect();
        SegmentShape::from_points(
            self.nodes[segment.start].position,
            &handles,
            self.nodes[segment.end].position,
        )
    }

    /// Index of the previous node, wrapping on closed paths
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        if index > 0 {
            Some(index - 1)
        } else if self.closed && !self.nodes.is_empty() {
            Some(self.nodes.len() - 1)
        } else {
            None
        }
    }

    /// Index of the next node, wrapping on closed paths
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.nodes.len() {
            Some(index + 1)
        } else if self.closed && !self.nodes.is_empty() {
            Some(0)
        } else {
            None
        }
    }

    /// First on-curve node at or after `index`, wrapping on closed paths
    pub(crate) fn on_curve_at_or_after(&self, index: usize) -> Option<usize> {
        let len = self.nodes.len();
        let span = if self.closed { len } else { len.saturating_sub(index) };
        (0..span)
            .map(|k| (index + k) % len.max(1))
            .find(|&i| i < len && self.nodes[i].is_on_curve())
    }

    /// Off-curve nodes directly preceding `index`, nearest first
    pub(crate) fn handles_before(&self, index: usize) -> Vec<usize> {
        let mut handles = Vec::new();
        let mut cursor = self.prev_index(index);
        while let Some(i) = cursor {
            if i == index || self.nodes[i].is_on_curve() {
                break;
            }
            handles.push(i);
            cursor = self.prev_index(i);
        }
        handles
    }

    /// Off-curve nodes directly following `index`, nearest first
    pub(crate) fn handles_after(&self, index: usize) -> Vec<usize> {
        let mut handles = Vec::new();
        let mut cursor = self.next_index(index);
        while let Some(i) = cursor {
            if i == index || self.nodes[i].is_on_curve() {
                break;
            }
            handles.push(i);
            cursor = self.next_index(i);
        }
        handles
    }

    /// Make the type of the on-curve node at `index` agree with the number
    /// of handles preceding it.
    pub(crate) fn normalize_segment_type(&mut self, index: usize) {
        if !self.closed && self.on_curve_indices().first() == Some(&index) {
            return;
        }
        let handle_count = self.handles_before(index).len();
        let Some(node) = self.nodes.get_mut(index) else {
            return;
        };
        if node.is_off_curve() {
            return;
        }
        if handle_count == 0 {
            node.typ = PointType::Line;
        } else if node.typ == PointType::Line {
            node.typ = PointType::Curve;
        }
    }

    /// Clear the smooth flag of an on-curve node with no handle on either side
    pub(crate) fn clear_smooth_if_cornered(&mut self, index: usize) {
        let has_handle = !self.handles_before(index).is_empty() || !self.handles_after(index).is_empty();
        if let Some(node) = self.nodes.get_mut(index) {
            if node.is_on_curve() && !has_handle {
                node.smooth = false;
            }
        }
    }
}
