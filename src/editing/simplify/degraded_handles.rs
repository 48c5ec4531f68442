//! Degraded handle repair
//!
//! Handles that collapsed onto their node, point backward along their
//! segment, or folded onto the opposite handle are pulled back out into the
//! segment.

use crate::core::settings::SimplifySettings;
use crate::data::Path;
use crate::geometry::{angle_at, is_turned_backward};
use kurbo::Point;
use tracing::debug;

/// Handles and nodes closer than this are treated as collapsed
const COLLAPSED_LENGTH: f64 = 1.0;

/// Indices of the nodes around one handle.
///
/// `node` owns `handle`; `partner` is the other handle of the same segment
/// and `next` the far on-curve node. `opposite` is whatever sits on the
/// other side of `node` (a handle or an on-curve node), and `prev` the
/// on-curve node beyond an opposite handle.
#[derive(Clone, Copy, Debug)]
struct HandleSite {
    prev: Option<usize>,
    opposite: Option<usize>,
    node: usize,
    handle: usize,
    partner: usize,
    next: usize,
}

/// Repair degraded handles. Returns the number of handles moved.
pub fn fix_degraded_handles(path: &mut Path, settings: &SimplifySettings) -> usize {
    let len = path.len();
    let mut fixed = 0;
    for i in 0..len {
        let nodes = path.nodes();
        if nodes[i].is_off_curve() {
            continue;
        }

        let incoming = (i >= 3 && nodes[i - 1].is_off_curve()).then(|| {
            let opposite = (i + 1 < len).then_some(i + 1);
            let prev = opposite
                .filter(|&o| nodes[o].is_off_curve() && i + 3 < len && nodes[i + 3].is_on_curve())
                .map(|_| i + 3);
            HandleSite { prev, opposite, node: i, handle: i - 1, partner: i - 2, next: i - 3 }
        });
        let outgoing = (i + 3 < len && nodes[i + 1].is_off_curve()).then(|| {
            let opposite = i.checked_sub(1);
            let prev = opposite
                .filter(|&o| nodes[o].is_off_curve() && i >= 3 && nodes[i - 3].is_on_curve())
                .map(|_| i - 3);
            HandleSite { prev, opposite, node: i, handle: i + 1, partner: i + 2, next: i + 3 }
        });

        for site in [incoming, outgoing].into_iter().flatten() {
            if let Some(target) = repaired_position(path, &site, settings) {
                if let Some(handle) = path.node_at_mut(site.handle) {
                    handle.position = target;
                    fixed += 1;
                }
            }
        }
    }
    if fixed > 0 {
        debug!("Repaired {} degraded handles on path {:?}", fixed, path.id());
    }
    fixed
}

/// Where the handle should go, or `None` when it is fine as it is
fn repaired_position(path: &Path, site: &HandleSite, settings: &SimplifySettings) -> Option<Point> {
    let nodes = path.nodes();
    let tolerance = settings.degraded_handle_angle_tolerance;
    let node = nodes[site.node].position;
    let smooth = nodes[site.node].smooth;
    let handle = nodes[site.handle].position;
    let partner = nodes[site.partner].position;
    let next = nodes[site.next].position;

    let handle_length = handle.distance(node);
    let handle_backward = is_turned_backward(node, handle, next);
    let mut folded_onto_opposite = false;
    let mut handles_opposed = false;
    let mut opposite_length = 0.0;
    let mut opposite_backward = false;
    let mut opposite_off_segment = true;
    let opposite = site.opposite.map(|o| nodes[o].position);

    if let Some(opposite) = opposite {
        opposite_length = node.distance(opposite);
        if opposite_length >= COLLAPSED_LENGTH && handle_length >= COLLAPSED_LENGTH {
            if let Some(angle) = angle_at(opposite, node, handle) {
                handles_opposed = 180.0 - angle < tolerance;
                folded_onto_opposite = angle < tolerance && handle_backward;
            }
        }
        if opposite_length >= COLLAPSED_LENGTH {
            if let Some(prev) = site.prev {
                opposite_backward = is_turned_backward(node, opposite, nodes[prev].position);
            }
        }
        opposite_off_segment = is_turned_backward(node, opposite, next);
    }

    if !(handle_length < COLLAPSED_LENGTH || handle_backward || folded_onto_opposite) {
        return None;
    }
    if smooth && handles_opposed && handle_backward && !opposite_backward {
        return None;
    }

    let partner_length = partner.distance(next);
    let node_partner_length = partner.distance(node);
    let segment_length = next.distance(node);
    let partner_within_segment = partner_length > 0.0 && partner_length < segment_length;

    let target = match opposite {
        Some(opposite) if smooth => {
            let length = if node_partner_length >= 2.0 && partner_within_segment {
                node_partner_length / 2.0
            } else {
                segment_length / 3.0
            }
            .max(settings.degraded_handle_min_length);

            let direction = if opposite_length >= COLLAPSED_LENGTH {
                (node - opposite) / opposite_length
            } else if node_partner_length >= COLLAPSED_LENGTH {
                (partner - node) / node_partner_length
            } else if segment_length >= COLLAPSED_LENGTH {
                (next - node) / segment_length
            } else {
                return None;
            };

            let rotated = handle_backward && !folded_onto_opposite;
            let kink_backward = handle_length < COLLAPSED_LENGTH && !opposite_off_segment;
            let direction = if (rotated || kink_backward) && opposite_backward {
                -direction
            } else {
                direction
            };
            node + direction * length
        }
        _ => {
            if node_partner_length >= 2.0 && partner_within_segment {
                node.midpoint(partner)
            } else if node_partner_length >= 1.0 && partner_within_segment {
                partner
            } else if segment_length >= 3.0 {
                node + (next - node) / 3.0
            } else if segment_length >= 2.0 {
                node.midpoint(next)
            } else {
                next
            }
        }
    };
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{NodeData, PathId};

    #[test]
    fn test_zero_handle_on_corner_is_pulled_out() {
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::off_curve(0.0, 0.0),
                NodeData::off_curve(100.0, 50.0),
                NodeData::curve(100.0, 100.0),
            ],
        );
        assert_eq!(fix_degraded_handles(&mut path, &SimplifySettings::default()), 1);
        assert_eq!(
            path.nodes()[1].position,
            Point::new(50.0, 25.0),
            "Corner handle moves halfway to its partner"
        );
    }

    #[test]
    fn test_folded_handle_on_smooth_node_is_realigned() {
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::off_curve(30.0, 0.0),
                NodeData::off_curve(50.0, 0.0),
                NodeData::curve(100.0, 0.0).with_smooth(true),
                NodeData::off_curve(90.0, 0.0),
                NodeData::off_curve(200.0, 50.0),
                NodeData::curve(200.0, 100.0),
            ],
        );
        assert_eq!(fix_degraded_handles(&mut path, &SimplifySettings::default()), 1);

        let repaired = path.nodes()[4].position;
        let expected_length = Point::new(100.0, 0.0).distance(Point::new(200.0, 50.0)) / 2.0;
        assert!(repaired.y.abs() < 1e-9, "Handle lines up with the opposite handle");
        assert!(repaired.x > 100.0, "Handle points into its own segment");
        assert!((repaired.x - 100.0 - expected_length).abs() < 1e-9);
    }

    #[test]
    fn test_healthy_handles_untouched() {
        let mut path = Path::from_nodes(
            PathId::new(0),
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::off_curve(0.0, 55.0),
                NodeData::off_curve(45.0, 100.0),
                NodeData::curve(100.0, 100.0).with_smooth(true),
                NodeData::off_curve(155.0, 100.0),
                NodeData::off_curve(200.0, 55.0),
                NodeData::curve(200.0, 0.0),
            ],
        );
        let before = path.positions();
        assert_eq!(fix_degraded_handles(&mut path, &SimplifySettings::default()), 0);
        assert_eq!(path.positions(), before);
    }
}
