//! Tight node removal
//!
//! Drops on-curve nodes that crowd their neighbours, except axis extremes
//! and nodes that carry a sharp turn of the outline.

use crate::core::settings::SimplifySettings;
use crate::data::{Node, NodeId, Path};
use crate::geometry::angle_at;
use std::collections::HashSet;
use tracing::debug;

/// Below this distance two nodes count as collapsed and no turn is measured
const COLLAPSED_DISTANCE: f64 = 1.0;

/// On-curve neighbours of the node at `index`: either adjacent or three
/// nodes away across a cubic segment. Linear, no wraparound.
fn on_curve_neighbours(nodes: &[Node], index: usize) -> (Option<usize>, Option<usize>) {
    let len = nodes.len();
    let prev = if index >= 1 && nodes[index - 1].is_on_curve() {
        Some(index - 1)
    } else if index >= 3 && nodes[index - 3].is_on_curve() {
        Some(index - 3)
    } else {
        None
    };
    let next = if index + 1 < len && nodes[index + 1].is_on_curve() {
        Some(index + 1)
    } else if index + 3 < len && nodes[index + 3].is_on_curve() {
        Some(index + 3)
    } else {
        None
    };
    (prev, next)
}

/// Remove tight nodes. Returns the number of nodes removed.
pub fn remove_tight_nodes(path: &mut Path, settings: &SimplifySettings) -> usize {
    let protected = collect_protected_nodes(path, settings);
    let triplets = cleanup_pass(path, settings.tight_node_distance, &protected, true);
    let pairs = cleanup_pass(path, settings.tight_node_distance, &protected, false);
    let removed = triplets + pairs;
    if removed > 0 {
        debug!("Removed {} tight nodes from path {:?}", removed, path.id());
    }
    removed
}

fn collect_protected_nodes(path: &Path, settings: &SimplifySettings) -> HashSet<NodeId> {
    let threshold = settings.tight_node_distance;
    let nodes = path.nodes();
    let len = nodes.len();
    let mut protected = HashSet::new();

    for i in 1..len.saturating_sub(1) {
        let node = &nodes[i];
        if node.is_off_curve() {
            continue;
        }
        let (Some(prev_i), Some(next_i)) = on_curve_neighbours(nodes, i) else {
            continue;
        };
        let (prev, next) = (&nodes[prev_i], &nodes[next_i]);
        let dist_prev = prev.position.distance(node.position);
        let dist_next = next.position.distance(node.position);
        if !(dist_prev < threshold || dist_next < threshold) {
            continue;
        }

        if is_protected_extreme(nodes, i, prev_i, next_i, dist_prev, dist_next, threshold) {
            protected.insert(node.id());
            continue;
        }

        if dist_prev < COLLAPSED_DISTANCE || dist_next < COLLAPSED_DISTANCE {
            continue;
        }
        let Some(angle) = angle_at(prev.position, node.position, next.position) else {
            continue;
        };
        if angle < settings.sharp_turn_angle {
            if dist_prev < threshold {
                protected.insert(prev.id());
            }
            protected.insert(node.id());
            if dist_next < threshold {
                protected.insert(next.id());
            }
        }
    }
    protected
}

/// A smooth extreme: the node and both its handles share an x or y
/// coordinate, it is not just a twist between its neighbours, and it is the
/// first such node in a tight run.
fn is_protected_extreme(
    nodes: &[Node],
    i: usize,
    prev_i: usize,
    next_i: usize,
    dist_prev: f64,
    dist_next: f64,
    threshold: f64,
) -> bool {
    let len = nodes.len();
    let in_handle = nodes.get(i - 1).filter(|n| n.is_off_curve());
    let out_handle = nodes.get(i + 1).filter(|n| n.is_off_curve());
    let (Some(in_handle), Some(out_handle)) = (in_handle, out_handle) else {
        return false;
    };
    let (node, prev, next) = (nodes[i].position, nodes[prev_i].position, nodes[next_i].position);

    let on_x_axis = in_handle.position.y == node.y && node.y == out_handle.position.y;
    let on_y_axis = in_handle.position.x == node.x && node.x == out_handle.position.x;
    if !(on_x_axis || on_y_axis) {
        return false;
    }

    // Handles around the previous on-curve node, when it ends a cubic
    let (prev_in, prev_out) = if prev_i + 3 == i {
        let prev_in = prev_i.checked_sub(1).and_then(|k| nodes.get(k)).filter(|n| n.is_off_curve());
        (prev_in.map(|n| n.position), Some(nodes[i - 2].position))
    } else {
        (None, None)
    };
    let (prev_on_x_axis, prev_on_y_axis) = match (prev_in, prev_out) {
        (Some(a), Some(b)) => (a.y == prev.y && prev.y == b.y, a.x == prev.x && prev.x == b.x),
        _ => (false, false),
    };

    let is_extreme = if on_x_axis {
        !(prev.y.min(next.y) < node.y && node.y < prev.y.max(next.y))
    } else {
        !(prev.x.min(next.x) < node.x && node.x < prev.x.max(next.x))
    };

    let mut first_on_axis = true;
    if dist_prev < threshold {
        first_on_axis = (on_x_axis && !(prev.y == node.y && prev_on_x_axis))
            || (on_y_axis && !(prev.x == node.x && prev_on_y_axis));
    }
    if dist_next < threshold && next_i == len - 1 {
        first_on_axis = false;
    }
    is_extreme && first_on_axis
}

/// Remove unprotected tight nodes, last to first.
///
/// With `triplet` only nodes tight on both sides go; otherwise a node tight
/// on either side does.
fn cleanup_pass(path: &mut Path, threshold: f64, protected: &HashSet<NodeId>, triplet: bool) -> usize {
    let len = path.len();
    if len < 3 {
        return 0;
    }
    let candidates: Vec<NodeId> = path.nodes()[1..len - 1].iter().rev().map(|n| n.id()).collect();

    let mut removed = 0;
    for id in candidates {
        if protected.contains(&id) {
            continue;
        }
        let Some(i) = path.index_of(id) else {
            continue;
        };
        let nodes = path.nodes();
        if i == 0 || i + 1 >= nodes.len() || nodes[i].is_off_curve() {
            continue;
        }
        let (Some(prev_i), Some(next_i)) = on_curve_neighbours(nodes, i) else {
            continue;
        };
        let dist_prev = nodes[prev_i].position.distance(nodes[i].position);
        let dist_next = nodes[next_i].position.distance(nodes[i].position);
        let tight = if triplet {
            dist_prev < threshold && dist_next < threshold
        } else {
            dist_prev < threshold || dist_next < threshold
        };
        if tight && path.remove_node_keep_shape(id) {
            removed += 1;
        }
    }
    removed
}
