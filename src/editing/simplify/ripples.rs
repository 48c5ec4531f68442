//! Ripple smoothing
//!
//! Hand-drawn straight strokes come out slightly wavy. Runs of segments that
//! keep roughly the same heading are projected onto their average line and
//! thinned out.

use crate::data::{NodeId, Path};
use crate::geometry::angle_between;
use tracing::debug;

/// A run needs at least this many on-curve nodes (three segments)
const MIN_RUN_ON_CURVES: usize = 4;

/// Runs with at least this many on-curve nodes lose their inner nodes
const THINNING_ON_CURVES: usize = 5;

#[derive(Debug)]
struct RippleSequence {
    from: NodeId,
    to: NodeId,
    adjust: Vec<NodeId>,
    remove: Vec<NodeId>,
}

/// Smooth out nearly straight runs. Returns the number of runs found.
pub fn smooth_out_ripples(path: &mut Path, angle_tolerance: f64) -> usize {
    if path.len() < 3 {
        return 0;
    }
    let sequences = collect_sequences(path, angle_tolerance);
    if sequences.is_empty() {
        return 0;
    }

    project_onto_runs(path, &sequences);

    let mut removals: Vec<NodeId> = sequences.iter().flat_map(|s| s.remove.iter().copied()).collect();
    removals.reverse();
    for id in removals {
        path.remove_node_keep_shape(id);
    }

    merge_and_center(path, &sequences);
    debug!("Smoothed {} ripple runs on path {:?}", sequences.len(), path.id());
    sequences.len()
}

/// Walk the on-curve nodes in order and group straight-ish runs.
///
/// A segment ends at the next node when that is on-curve, or three nodes
/// ahead for a cubic. The closing segment of a closed path is not visited.
fn collect_sequences(path: &Path, angle_tolerance: f64) -> Vec<RippleSequence> {
    let nodes = path.nodes();
    let count = nodes.len();
    let mut sequences = Vec::new();
    let mut last_vector = None;
    let mut current: Vec<usize> = Vec::new();

    for i in 0..count - 1 {
        if nodes[i].is_off_curve() {
            continue;
        }
        let end = if nodes[i + 1].is_on_curve() {
            i + 1
        } else if i + 3 < count && nodes[i + 3].is_on_curve() {
            i + 3
        } else {
            continue;
        };
        let vector = nodes[end].position - nodes[i].position;

        match last_vector {
            None => current = vec![i, end],
            Some(last) => {
                if angle_between(last, vector).unwrap_or(0.0) <= angle_tolerance {
                    if current.last() != Some(&end) {
                        current.push(end);
                    }
                } else {
                    if current.len() >= MIN_RUN_ON_CURVES {
                        sequences.push(save_sequence(path, &current));
                    }
                    current = vec![i, end];
                }
            }
        }
        last_vector = Some(vector);
    }
    if current.len() >= MIN_RUN_ON_CURVES {
        sequences.push(save_sequence(path, &current));
    }
    sequences
}

fn save_sequence(path: &Path, on_curves: &[usize]) -> RippleSequence {
    let nodes = path.nodes();
    let last = on_curves.len() - 1;
    let mut from = on_curves[1];
    let mut to = on_curves[last - 1];
    if nodes[from - 1].is_off_curve() {
        from -= 1;
    }
    if nodes[to + 1].is_off_curve() {
        to += 1;
    }

    let remove = if on_curves.len() >= THINNING_ON_CURVES {
        on_curves[2..last - 1].iter().map(|&i| nodes[i].id()).collect()
    } else {
        Vec::new()
    };

    RippleSequence {
        from: nodes[from].id(),
        to: nodes[to].id(),
        adjust: (from..=to).map(|i| nodes[i].id()).collect(),
        remove,
    }
}

/// Move the inner nodes of every run onto the line between its ends
fn project_onto_runs(path: &mut Path, sequences: &[RippleSequence]) {
    for sequence in sequences {
        let (Some(a), Some(b)) = (path.position(sequence.from), path.position(sequence.to)) else {
            continue;
        };
        let ab = b - a;
        let length_squared = ab.hypot2();
        if length_squared == 0.0 {
            continue;
        }
        if sequence.adjust.len() <= 2 {
            continue;
        }
        for &id in &sequence.adjust[1..sequence.adjust.len() - 1] {
            if let Some(p) = path.position(id) {
                let t = (p - a).dot(ab) / length_squared;
                path.set_position(id, a + ab * t);
            }
        }
    }
}

/// Collapse what is left of each run into a line or a single centered node
fn merge_and_center(path: &mut Path, sequences: &[RippleSequence]) {
    for sequence in sequences.iter().rev() {
        let (Some(i1), Some(i2)) = (path.index_of(sequence.from), path.index_of(sequence.to)) else {
            continue;
        };
        if i2 < i1 + 3 {
            continue;
        }
        let center = path.nodes()[i1].is_off_curve() && path.nodes()[i2].is_off_curve();
        let remove_from = if center { i1 + 2 } else { i1 + 1 };
        let doomed: Vec<NodeId> = path.nodes()[remove_from..i2].iter().map(|n| n.id()).collect();
        for id in doomed.into_iter().rev() {
            path.remove_node_raw(id);
        }

        if let Some(to_index) = path.index_of(sequence.to) {
            path.normalize_segment_type(to_index);
            let follows_on_curve = path
                .prev_index(to_index)
                .and_then(|i| path.node_at(i))
                .is_some_and(|n| n.is_on_curve());
            if follows_on_curve {
                if let Some(node) = path.node_at_mut(to_index) {
                    if node.is_on_curve() {
                        node.smooth = false;
                    }
                }
            }
        }

        if center {
            let (Some(a), Some(b), Some(from_index)) = (
                path.position(sequence.from),
                path.position(sequence.to),
                path.index_of(sequence.from),
            ) else {
                continue;
            };
            if let Some(node) = path.node_at_mut(from_index + 1) {
                node.position = a.midpoint(b);
            }
        }
    }
}
