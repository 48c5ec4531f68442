//! Closest-area search
//!
//! Finds where on an existing path a freshly drawn stroke (or a pair of
//! cursor positions) belongs: the two segments nearest to the start and end
//! points, and the shortest run of nodes that covers both.

use crate::core::settings::LocateSettings;
use crate::data::{Layer, NodeId, Path, PathId, Segment};
use crate::geometry::{distance_to_rect, sample_segment, segment_bounding_box};
use kurbo::{Point, Vec2};
use std::collections::HashSet;

/// Paths with fewer nodes than this cannot be redrawn
const MIN_TARGET_NODES: usize = 4;

/// The run of nodes on a target path selected for replacement.
///
/// Indices are positional and only valid until the target path is mutated;
/// the junction nodes are also kept by identity.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosestArea {
    pub path: PathId,
    /// Node indices in walk order, starting and ending at the junctions
    pub indices: Vec<usize>,
    pub start_segment: Segment,
    pub end_segment: Segment,
    /// Junction node nearest the query start
    pub start_node: NodeId,
    /// Junction node nearest the query end
    pub end_node: NodeId,
    /// Inward direction at `start_node`
    pub start_vector: Vec2,
    /// Inward direction at `end_node`
    pub end_vector: Vec2,
    /// The area runs across the gap of an open path, which has to be closed
    pub open_wraparound: bool,
}

impl ClosestArea {
    /// Flip the walk order, swapping the start and end sides
    pub fn reverse(&mut self) {
        self.indices.reverse();
        std::mem::swap(&mut self.start_segment, &mut self.end_segment);
        std::mem::swap(&mut self.start_node, &mut self.end_node);
        std::mem::swap(&mut self.start_vector, &mut self.end_vector);
    }

    /// Identities of the area's nodes in walk order
    pub fn node_ids(&self, path: &Path) -> Vec<NodeId> {
        self.indices
            .iter()
            .filter_map(|&i| path.node_at(i).map(|n| n.id()))
            .collect()
    }

    /// Identities of the nodes strictly between the two junctions
    pub fn interior_ids(&self, path: &Path) -> Vec<NodeId> {
        let ids = self.node_ids(path);
        if ids.len() <= 2 {
            return Vec::new();
        }
        ids[1..ids.len() - 1].to_vec()
    }
}

/// Running best distances of one scan
struct Scan {
    best_path: Option<PathId>,
    start_segment: Option<Segment>,
    end_segment: Option<Segment>,
    dist_start: f64,
    dist_end: f64,
}

impl Scan {
    fn new() -> Self {
        Self {
            best_path: None,
            start_segment: None,
            end_segment: None,
            dist_start: f64::INFINITY,
            dist_end: f64::INFINITY,
        }
    }

    /// Measure every segment of `path` against both query points
    fn measure(&mut self, path: &Path, start: Point, end: Point, step: f64) {
        for segment in path.segments() {
            let shape = path.segment_shape(&segment);
            let bbox = segment_bounding_box(&shape);
            if distance_to_rect(bbox, start) >= self.dist_start
                && distance_to_rect(bbox, end) >= self.dist_end
            {
                continue;
            }
            for sample in sample_segment(&shape, step) {
                let d_start = sample.distance(start);
                let d_end = sample.distance(end);
                if d_start < self.dist_start {
                    self.dist_start = d_start;
                    self.start_segment = Some(segment);
                    self.best_path = Some(path.id());
                }
                if d_end < self.dist_end {
                    self.dist_end = d_end;
                    self.end_segment = Some(segment);
                    self.best_path = Some(path.id());
                }
            }
        }
    }
}

/// Locate the closest area for a query between `start` and `end`.
///
/// Every non-empty path of the layer except `exclude` is a candidate.
/// Returns `None` when nothing qualifies, which is an ordinary outcome.
pub fn locate_closest_area(
    layer: &Layer,
    exclude: Option<PathId>,
    start: Point,
    end: Point,
    settings: &LocateSettings,
) -> Option<ClosestArea> {
    let step = settings.sampling_step;
    let candidates = || layer.non_empty_paths().filter(|p| Some(p.id()) != exclude);

    let mut scan = Scan::new();
    for path in candidates() {
        scan.measure(path, start, end, step);
    }
    let path = layer.path(scan.best_path?)?;

    // Both sides are taken from the winning path alone
    let mut scan = Scan::new();
    scan.measure(path, start, end, step);
    let (start_segment, end_segment) = (scan.start_segment?, scan.end_segment?);

    let total = path.len();
    if total < MIN_TARGET_NODES {
        return None;
    }

    let start_indices = start_segment.indices(total);
    let end_indices = end_segment.indices(total);
    let start_set: HashSet<usize> = start_indices.iter().copied().collect();
    let end_set: HashSet<usize> = end_indices.iter().copied().collect();

    let indices = if start_set == end_set {
        orient_single_segment(path, &start_indices, start, end)
    } else {
        let required: HashSet<usize> = start_set.union(&end_set).copied().collect();
        let forward = walk_until_covered(start_segment.start, 1, total, &required);
        let backward = walk_until_covered(start_segment.end, -1, total, &required);
        if forward.len() <= backward.len() {
            forward
        } else {
            backward
        }
    };

    let first = *indices.first()?;
    let last = *indices.last()?;
    let open_wraparound = !path.is_closed() && indices.contains(&0) && indices.contains(&(total - 1));

    let position = |i: usize| path.nodes()[i].position;
    let (start_vector, end_vector) = if indices.len() >= 3 {
        (
            position(indices[1]) - position(first),
            position(indices[indices.len() - 2]) - position(last),
        )
    } else {
        (position(last) - position(first), position(first) - position(last))
    };

    Some(ClosestArea {
        path: path.id(),
        start_node: path.nodes()[first].id(),
        end_node: path.nodes()[last].id(),
        indices,
        start_segment,
        end_segment,
        start_vector,
        end_vector,
        open_wraparound,
    })
}

/// Visit indices from `start` in steps of `step` (with wraparound) until
/// every required index has been seen. Returns the visit order.
fn walk_until_covered(start: usize, step: isize, total: usize, required: &HashSet<usize>) -> Vec<usize> {
    let mut visited = Vec::new();
    let mut seen = HashSet::new();
    let mut i = start;
    for _ in 0..=total * 2 {
        if seen.insert(i) {
            visited.push(i);
        }
        if required.is_subset(&seen) {
            break;
        }
        i = (i as isize + step).rem_euclid(total as isize) as usize;
    }
    visited
}

/// When both query points fall on one segment, pick the orientation of its
/// endpoints that best matches (start, end).
fn orient_single_segment(path: &Path, indices: &[usize], start: Point, end: Point) -> Vec<usize> {
    let (Some(&i1), Some(&i2)) = (indices.first(), indices.last()) else {
        return indices.to_vec();
    };
    let n1 = path.nodes()[i1].position;
    let n2 = path.nodes()[i2].position;
    let as_is = (n1 - start).hypot2() + (n2 - end).hypot2();
    let flipped = (n2 - start).hypot2() + (n1 - end).hypot2();
    if flipped < as_is {
        indices.iter().rev().copied().collect()
    } else {
        indices.to_vec()
    }
}
