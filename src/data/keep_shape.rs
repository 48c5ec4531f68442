//! Shape-preserving node removal
//!
//! Removing an on-curve node that joins two curves merges them into a single
//! cubic. The outer handles keep their identity and tangent direction; their
//! lengths are fitted so the merged curve stays close to the old outline.

use super::node::{NodeData, NodeId, PointType};
use super::path::Path;
use crate::geometry::utilities::unit_vector;
use crate::geometry::SegmentShape;
use kurbo::{CubicBez, ParamCurveNearest, Point, Vec2};
use tracing::debug;

/// Positions closer than this are the same point
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Samples taken from each of the two segments being merged
const SAMPLES_PER_SEGMENT: usize = 8;

/// Resolution of the handle-length search
const COARSE_STEPS: usize = 16;
const REFINE_STEPS: usize = 8;

/// Accuracy of the nearest-point search against a candidate curve
const NEAREST_ACCURACY: f64 = 0.01;

impl Path {
    /// Remove a node while keeping the visible outline in place.
    ///
    /// Returns `false` when the node is unknown or when removing it would
    /// leave a closed path without any on-curve node.
    pub fn remove_node_keep_shape(&mut self, id: NodeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.nodes()[index].is_off_curve() {
            return self.remove_node(id).is_some();
        }

        let on_curves = self.on_curve_indices();
        if on_curves.len() <= 1 {
            if self.is_closed() {
                return false;
            }
            let ids: Vec<NodeId> = self.nodes().iter().map(|n| n.id()).collect();
            for node in ids {
                self.remove_node_raw(node);
            }
            return true;
        }

        if !self.is_closed() {
            if on_curves.first() == Some(&index) {
                self.remove_open_start(id);
                return true;
            }
            if on_curves.last() == Some(&index) {
                self.remove_open_end(id);
                return true;
            }
        }

        self.remove_between(id, index);
        true
    }

    fn remove_open_start(&mut self, id: NodeId) {
        self.remove_node_raw(id);
        while self.nodes().first().is_some_and(|n| n.is_off_curve()) {
            let dangling = self.nodes()[0].id();
            self.remove_node_raw(dangling);
        }
        if let Some(first) = self.node_at_mut(0) {
            first.typ = PointType::Line;
        }
        self.clear_smooth_if_cornered(0);
        debug!("Removed start node {:?} of open path {:?}", id, self.id());
    }

    fn remove_open_end(&mut self, id: NodeId) {
        self.remove_node_raw(id);
        while self.nodes().last().is_some_and(|n| n.is_off_curve()) {
            let dangling = self.nodes()[self.len() - 1].id();
            self.remove_node_raw(dangling);
        }
        if !self.is_empty() {
            self.clear_smooth_if_cornered(self.len() - 1);
        }
        debug!("Removed end node {:?} of open path {:?}", id, self.id());
    }

    /// Remove an on-curve node that has an on-curve neighbour on both sides
    fn remove_between(&mut self, id: NodeId, index: usize) {
        let mut incoming = self.handles_before(index);
        incoming.reverse();
        let outgoing = self.handles_after(index);

        let prev_on = match incoming.first() {
            Some(&first) => self.prev_index(first),
            None => self.prev_index(index),
        };
        let next_on = match outgoing.last() {
            Some(&last) => self.next_index(last),
            None => self.next_index(index),
        };
        let (Some(prev_on), Some(next_on)) = (prev_on, next_on) else {
            self.remove_node(id);
            return;
        };

        let prev_id = self.nodes()[prev_on].id();
        let next_id = self.nodes()[next_on].id();
        let incoming_ids: Vec<NodeId> = incoming.iter().map(|&i| self.nodes()[i].id()).collect();
        let outgoing_ids: Vec<NodeId> = outgoing.iter().map(|&i| self.nodes()[i].id()).collect();

        // Two on-curve nodes on a closed path: the survivor loops onto itself
        if prev_id == next_id {
            for handle in incoming_ids.iter().chain(outgoing_ids.iter()) {
                self.remove_node_raw(*handle);
            }
            self.remove_node_raw(id);
            if let Some(node) = self.node_mut(prev_id) {
                node.typ = PointType::Line;
                node.smooth = false;
            }
            return;
        }

        let p = self.nodes()[prev_on].position;
        let x = self.nodes()[index].position;
        let n = self.nodes()[next_on].position;
        let x_type = self.nodes()[index].typ;
        let incoming_points: Vec<Point> = incoming.iter().map(|&i| self.nodes()[i].position).collect();
        let outgoing_points: Vec<Point> = outgoing.iter().map(|&i| self.nodes()[i].position).collect();

        if incoming.is_empty() && outgoing.is_empty() {
            self.remove_node(id);
        } else if outgoing.is_empty() && x.distance(n) < COINCIDENT_EPSILON {
            // Zero-length line after the node: the incoming curve simply ends at N
            self.remove_node_raw(id);
            if let Some(node) = self.node_mut(next_id) {
                node.typ = x_type;
            }
        } else if incoming.is_empty() && p.distance(x) < COINCIDENT_EPSILON {
            // Zero-length line before the node: the outgoing curve starts at P
            self.remove_node_raw(id);
        } else {
            let first = SegmentShape::from_points(p, &incoming_points, x);
            let second = SegmentShape::from_points(x, &outgoing_points, n);
            let samples = merge_samples(&first, &second);
            let start_dir = incoming_points
                .first()
                .and_then(|h| unit_vector(*h - p))
                .or_else(|| unit_vector(x - p));
            let end_dir = outgoing_points
                .last()
                .and_then(|h| unit_vector(*h - n))
                .or_else(|| unit_vector(x - n));
            let cubic = fit_constrained(p, start_dir, n, end_dir, &samples);

            let keep_first = incoming_ids.first().copied();
            let keep_last = outgoing_ids.last().copied();
            let redundant = incoming_ids
                .iter()
                .skip(1)
                .chain(outgoing_ids.iter().take(outgoing_ids.len().saturating_sub(1)));
            let redundant: Vec<NodeId> = redundant.copied().collect();
            for handle in redundant {
                self.remove_node_raw(handle);
            }
            self.remove_node_raw(id);

            let first_handle = match keep_first {
                Some(handle) => handle,
                None => {
                    let at = self.index_of(prev_id).map_or(self.len(), |i| i + 1);
                    self.insert_node(at, NodeData::off_curve(cubic.p1.x, cubic.p1.y))
                }
            };
            let second_handle = match keep_last {
                Some(handle) => handle,
                None => {
                    let at = self.index_of(next_id).unwrap_or(self.len());
                    self.insert_node(at, NodeData::off_curve(cubic.p2.x, cubic.p2.y))
                }
            };
            self.set_position(first_handle, cubic.p1);
            self.set_position(second_handle, cubic.p2);
            if let Some(node) = self.node_mut(next_id) {
                node.typ = PointType::Curve;
            }
        }

        for neighbour in [prev_id, next_id] {
            if let Some(i) = self.index_of(neighbour) {
                self.clear_smooth_if_cornered(i);
            }
        }
        debug!("Removed node {:?} from path {:?} keeping shape", id, self.id());
    }
}

/// Points along the two original segments, the shared node included
fn merge_samples(first: &SegmentShape, second: &SegmentShape) -> Vec<Point> {
    let steps = SAMPLES_PER_SEGMENT as f64;
    let head = (1..=SAMPLES_PER_SEGMENT).map(|k| first.eval(k as f64 / steps));
    let tail = (1..SAMPLES_PER_SEGMENT).map(|k| second.eval(k as f64 / steps));
    head.chain(tail).collect()
}

/// Fit a cubic from `p0` to `p3` whose handles follow the given directions.
///
/// P1 = p0 + alpha * d0, P2 = p3 + beta * d3. Alpha and beta minimise the
/// largest distance from any sample to the candidate curve, first on a
/// coarse grid and then on a finer one around the best coarse pair.
fn fit_constrained(
    p0: Point,
    d0: Option<Vec2>,
    p3: Point,
    d3: Option<Vec2>,
    samples: &[Point],
) -> CubicBez {
    let chord = p0.distance(p3);
    let fallback = unit_vector(p3 - p0).unwrap_or(Vec2::ZERO);
    let d0 = d0.unwrap_or(fallback);
    let d3 = d3.unwrap_or(-fallback);
    let build = |alpha: f64, beta: f64| CubicBez::new(p0, p0 + d0 * alpha, p3 + d3 * beta, p3);

    if chord < 1.0 || samples.is_empty() {
        return build(chord / 3.0, chord / 3.0);
    }

    let mut best_err = f64::MAX;
    let mut best_alpha = chord / 3.0;
    let mut best_beta = chord / 3.0;

    let step = chord / COARSE_STEPS as f64;
    for ai in 1..=COARSE_STEPS {
        for bi in 1..=COARSE_STEPS {
            let (alpha, beta) = (step * ai as f64, step * bi as f64);
            let err = max_error(&build(alpha, beta), samples);
            if err < best_err {
                best_err = err;
                best_alpha = alpha;
                best_beta = beta;
            }
        }
    }

    let (ra, rb) = (best_alpha, best_beta);
    let fine = 2.0 * step / REFINE_STEPS as f64;
    let floor = chord / 100.0;
    for ai in 0..=REFINE_STEPS {
        let alpha = (ra - step + fine * ai as f64).max(floor);
        for bi in 0..=REFINE_STEPS {
            let beta = (rb - step + fine * bi as f64).max(floor);
            let err = max_error(&build(alpha, beta), samples);
            if err < best_err {
                best_err = err;
                best_alpha = alpha;
                best_beta = beta;
            }
        }
    }

    build(best_alpha, best_beta)
}

/// Largest distance from any sample to the cubic
fn max_error(cubic: &CubicBez, samples: &[Point]) -> f64 {
    samples
        .iter()
        .map(|sample| cubic.nearest(*sample, NEAREST_ACCURACY).distance_sq.sqrt())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::path::PathId;
    use kurbo::ParamCurve;

    #[test]
    fn test_fit_error_measures_to_the_curve() {
        let cubic = CubicBez::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 55.0),
            Point::new(45.0, 100.0),
            Point::new(100.0, 100.0),
        );
        let on_curve: Vec<Point> = (0..=10).map(|k| cubic.eval(k as f64 / 10.0)).collect();
        assert!(max_error(&cubic, &on_curve) < 0.02, "Samples on the curve have no error");

        let straight = CubicBez::new(
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(70.0, 0.0),
            Point::new(100.0, 0.0),
        );
        let samples = [Point::new(25.0, 4.0), Point::new(50.0, -7.0)];
        assert!((max_error(&straight, &samples) - 7.0).abs() < 0.02);
    }

    #[test]
    fn test_removing_collinear_line_node() {
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(50.0, 0.0),
                NodeData::line(100.0, 0.0),
            ],
        );
        let middle = path.nodes()[1].id();
        assert!(path.remove_node_keep_shape(middle));
        assert_eq!(path.len(), 2);
        assert_eq!(path.nodes()[1].typ, PointType::Line);
    }

    #[test]
    fn test_merging_split_cubic_keeps_outline() {
        let original = CubicBez::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 55.0),
            Point::new(45.0, 100.0),
            Point::new(100.0, 100.0),
        );
        let (a, b) = original.subdivide();
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(a.p0.x, a.p0.y),
                NodeData::off_curve(a.p1.x, a.p1.y),
                NodeData::off_curve(a.p2.x, a.p2.y),
                NodeData::curve(a.p3.x, a.p3.y).with_smooth(true),
                NodeData::off_curve(b.p1.x, b.p1.y),
                NodeData::off_curve(b.p2.x, b.p2.y),
                NodeData::curve(b.p3.x, b.p3.y),
            ],
        );
        let outer_first = path.nodes()[1].id();
        let outer_last = path.nodes()[5].id();
        let joint = path.nodes()[3].id();

        assert!(path.remove_node_keep_shape(joint));
        assert_eq!(path.len(), 4);
        assert_eq!(path.index_of(outer_first), Some(1), "Outer handles keep their identity");
        assert_eq!(path.index_of(outer_last), Some(2));
        assert_eq!(path.nodes()[3].typ, PointType::Curve);

        let nodes = path.nodes();
        let merged = CubicBez::new(
            nodes[0].position,
            nodes[1].position,
            nodes[2].position,
            nodes[3].position,
        );
        for k in 0..=20 {
            let target = original.eval(k as f64 / 20.0);
            let err = (0..=200)
                .map(|j| merged.eval(j as f64 / 200.0).distance(target))
                .fold(f64::MAX, f64::min);
            assert!(err < 2.0, "Merged outline drifted {err} units at sample {k}");
        }
    }

    #[test]
    fn test_zero_length_line_transfers_curve() {
        // O at the end of a curve, followed by a node sitting exactly on it
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::off_curve(0.0, 50.0),
                NodeData::off_curve(50.0, 100.0),
                NodeData::curve(100.0, 100.0).with_smooth(true),
                NodeData::line(100.0, 100.0),
                NodeData::line(200.0, 100.0),
            ],
        );
        let o = path.nodes()[3].id();
        let n = path.nodes()[4].id();
        assert!(path.remove_node_keep_shape(o));
        assert_eq!(path.len(), 5);
        let node = path.node(n).cloned();
        assert_eq!(node.as_ref().map(|n| n.typ), Some(PointType::Curve));
        assert_eq!(node.map(|n| n.position), Some(Point::new(100.0, 100.0)));
        assert_eq!(path.nodes()[2].position, Point::new(50.0, 100.0), "Handles are untouched");
    }

    #[test]
    fn test_removing_open_start_drops_dangling_handles() {
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::off_curve(0.0, 50.0),
                NodeData::off_curve(50.0, 100.0),
                NodeData::curve(100.0, 100.0),
                NodeData::line(200.0, 100.0),
            ],
        );
        let start = path.nodes()[0].id();
        assert!(path.remove_node_keep_shape(start));
        assert_eq!(path.len(), 2);
        assert_eq!(path.nodes()[0].typ, PointType::Line);
        assert_eq!(path.nodes()[0].position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_closed_path_keeps_last_on_curve() {
        let mut path = Path::from_nodes(PathId::new(0), true, [NodeData::line(0.0, 0.0)]);
        let only = path.nodes()[0].id();
        assert!(!path.remove_node_keep_shape(only));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_line_and_curve_merge_inserts_missing_handle() {
        let mut path = Path::from_nodes(
            PathId::new(0),
            true,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(100.0, 0.0),
                NodeData::off_curve(150.0, 0.0),
                NodeData::off_curve(200.0, 50.0),
                NodeData::curve(200.0, 100.0),
                NodeData::line(0.0, 100.0),
            ],
        );
        let joint = path.nodes()[1].id();
        assert!(path.remove_node_keep_shape(joint));
        let types: Vec<PointType> = path.nodes().iter().map(|n| n.typ).collect();
        assert_eq!(
            types,
            vec![
                PointType::Line,
                PointType::OffCurve,
                PointType::OffCurve,
                PointType::Curve,
                PointType::Line,
            ]
        );
        let handle = path.nodes()[1].position;
        assert!(handle.y.abs() < 1e-9, "New handle follows the old line direction");
        assert!(handle.x > 0.0);
    }
}
