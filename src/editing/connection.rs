//! Connection smoothing
//!
//! After a splice the new junction nodes usually sit a little off the
//! outline they join. Each side is pulled onto the existing tangent, or
//! collapsed onto the old junction node when close enough.

use super::simplify::inflection::shorten_inflected_handles_on_segment;
use super::splice::Junctions;
use crate::core::settings::{ConnectionSettings, PencilSettings, ShorteningPreset};
use crate::data::{NodeId, Path};
use crate::geometry::utilities::{project_onto_line, unit_vector};
use kurbo::Vec2;
use tracing::debug;

/// What happened to one junction side
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JunctionAdjustment {
    /// Degenerate direction or missing node; nothing moved
    Skipped,
    /// The new node took the old node's place and the old node was removed
    Collapsed,
    /// The new node was moved halfway onto the existing tangent
    Blended,
}

/// Adjust one junction side.
///
/// `n` is the new junction node, `nh` its neighbour in the inserted run,
/// `o` the existing junction node and `vector` the inward direction at `o`.
pub fn adjust_pair(
    path: &mut Path,
    n: NodeId,
    nh: Option<NodeId>,
    o: NodeId,
    vector: Vec2,
    settings: &ConnectionSettings,
) -> JunctionAdjustment {
    let Some(unit) = unit_vector(vector) else {
        return JunctionAdjustment::Skipped;
    };
    let (Some(n_pos), Some(o_pos)) = (path.position(n), path.position(o)) else {
        return JunctionAdjustment::Skipped;
    };

    let projection = project_onto_line(n_pos, o_pos, unit);
    let offset = o_pos - projection;
    let mut distance = offset.hypot();
    let mut origin = o_pos;
    if distance > settings.max_adjust_distance {
        origin = projection + offset / distance * settings.max_adjust_distance;
        distance = settings.max_adjust_distance;
    }
    let target = projection.midpoint(origin);

    let handle = nh.filter(|&h| path.node(h).is_some_and(|node| node.is_off_curve()));

    let (outcome, final_position) = if distance <= settings.collapse_distance {
        path.set_position(n, o_pos);
        let o_smooth = path.node(o).is_some_and(|node| node.smooth);
        path.remove_node_keep_shape(o);
        if handle.is_some() {
            if let Some(node) = path.node_mut(n) {
                node.smooth = o_smooth;
            }
        }
        debug!("Collapsed junction onto ({:.1}, {:.1})", o_pos.x, o_pos.y);
        (JunctionAdjustment::Collapsed, o_pos)
    } else {
        path.set_position(n, target);
        if handle.is_some() {
            if let Some(node) = path.node_mut(n) {
                node.smooth = true;
            }
        }
        debug!(
            "Moved junction by {:.1} units onto the existing tangent",
            n_pos.distance(target)
        );
        (JunctionAdjustment::Blended, target)
    };

    if let Some(h) = handle {
        if let Some(h_pos) = path.position(h) {
            let along = (project_onto_line(h_pos, o_pos, unit) - final_position).dot(unit);
            let length = along.max(0.0).max(settings.handle_min_length);
            path.set_position(h, final_position + unit * length);
        }
    }

    outcome
}

/// Adjust both junction sides of a splice, start side first
pub fn adjust_connections(
    path: &mut Path,
    junctions: &Junctions,
    start_vector: Vec2,
    end_vector: Vec2,
    settings: &ConnectionSettings,
) -> (JunctionAdjustment, JunctionAdjustment) {
    let start = adjust_pair(path, junctions.ns1, junctions.ns1h, junctions.cs1, start_vector, settings);
    let end = adjust_pair(path, junctions.ne1, junctions.ne1h, junctions.ce1, end_vector, settings);
    (start, end)
}

/// Shorten looped or inflected handles on the first and last inserted
/// segments. Returns the number of segments changed.
pub fn normalize_connection_handles(path: &mut Path, junctions: &Junctions, settings: &PencilSettings) -> usize {
    let preset = ShorteningPreset::connection(settings);
    let sides = [
        (Some(junctions.ns1), junctions.ns1h, junctions.ns2h, junctions.ns2),
        (junctions.ne2, junctions.ne2h, junctions.ne1h, Some(junctions.ne1)),
    ];

    let mut changed = 0;
    for (n1, h1, h2, n2) in sides {
        let (Some(n1), Some(h1), Some(h2), Some(n2)) = (n1, h1, h2, n2) else {
            continue;
        };
        let both_handles = [h1, h2]
            .iter()
            .all(|&id| path.node(id).is_some_and(|node| node.is_off_curve()));
        if !both_handles {
            continue;
        }
        let (Some(p1), Some(q1), Some(q2), Some(p2)) =
            (path.position(n1), path.position(h1), path.position(h2), path.position(n2))
        else {
            continue;
        };
        if let Some((new_h1, new_h2)) = shorten_inflected_handles_on_segment(p1, q1, q2, p2, &preset) {
            path.set_position(h1, new_h1);
            path.set_position(h2, new_h2);
            changed += 1;
        }
    }
    changed
}

/// Make both existing junction nodes corners
pub fn sharpen_junctions(path: &mut Path, junctions: &Junctions) {
    for id in [junctions.cs1, junctions.ce1] {
        if let Some(node) = path.node_mut(id) {
            node.smooth = false;
        }
    }
}
