//! Loop and inflection shortening
//!
//! A cubic whose handles cross each other draws a loop or a kink. Handles
//! that overshoot their crossing point are pulled back to it; handles that
//! run nearly parallel toward each other (an S) are rebalanced around the
//! middle of the segment.

use crate::core::settings::ShorteningPreset;
use crate::data::{Path, PointType};
use crate::geometry::{angle_between, line_intersection};
use kurbo::Point;

/// Slack for the "handle is closer to its own node" test of the S case
const S_CASE_SLACK: f64 = 1.0;

/// New handle positions for one cubic segment, or `None` when it is fine.
///
/// `h1` belongs to `n1` and `h2` to `n2`.
pub fn shorten_inflected_handles_on_segment(
    n1: Point,
    h1: Point,
    h2: Point,
    n2: Point,
    preset: &ShorteningPreset,
) -> Option<(Point, Point)> {
    let seg_len = n1.distance(n2);
    let h1_len = n1.distance(h1);
    let h2_len = n2.distance(h2);
    if seg_len == 0.0 || h1_len == 0.0 || h2_len == 0.0 {
        return None;
    }
    let buffer = preset.buffer;

    let crossing = line_intersection(n1, h1, n2, h2).and_then(|p| {
        if h1 == h2 {
            return Some(((h1_len - buffer).max(0.0), (h2_len - buffer).max(0.0)));
        }
        let d1 = (p.distance(n1) - buffer).max(0.0);
        let d2 = (p.distance(n2) - buffer).max(0.0);
        let in_front = (p - n1).dot(h1 - n1) > 0.0 && (p - n2).dot(h2 - n2) > 0.0;
        let overshoots = d1 + buffer < h1_len || d2 + buffer < h2_len;
        (in_front && overshoots).then_some((d1, d2))
    });

    if let Some((d1, d2)) = crossing {
        let floor = preset.intersection_floor(seg_len);
        let new_h1 = pull_back(n1, h1, h1_len, d1, floor);
        let new_h2 = pull_back(n2, h2, h2_len, d2, floor);
        return (new_h1 != h1 || new_h2 != h2).then_some((new_h1, new_h2));
    }

    // S-shaped: handles pointing toward each other without crossing
    let angle = angle_between(h1 - n1, h2 - n2)?;
    if angle <= preset.s_min_angle {
        return None;
    }
    let h1_near_own = h1_len - S_CASE_SLACK < h2.distance(n1);
    let h2_near_own = h2_len - S_CASE_SLACK < h1.distance(n2);
    if h1_near_own && h2_near_own {
        return None;
    }

    let axis = (n2 - n1) / seg_len;
    let mid_pos = (h1.midpoint(h2) - n1).dot(axis);
    let min = preset.s_min_length;
    let mut l1 = mid_pos - buffer;
    let mut l2 = seg_len - mid_pos - buffer;
    if l1 < min {
        l2 -= min - l1;
        l1 = min;
    }
    if l2 < min {
        l1 -= min - l2;
        l2 = min;
    }
    let l1 = l1.max(min);
    let l2 = l2.max(min);

    Some((n1 + (h1 - n1) / h1_len * l1, n2 + (h2 - n2) / h2_len * l2))
}

fn pull_back(node: Point, handle: Point, length: f64, distance: f64, floor: f64) -> Point {
    if distance < length && length > floor {
        node + (handle - node) / length * distance.max(floor)
    } else {
        handle
    }
}

/// Run the segment routine over every cubic segment of the path.
///
/// Returns the number of segments changed.
pub fn shorten_inflected_handles(path: &mut Path, preset: &ShorteningPreset) -> usize {
    let mut changed = 0;
    for i in 3..path.len() {
        let nodes = path.nodes();
        let is_cubic = nodes[i].typ == PointType::Curve
            && nodes[i - 1].is_off_curve()
            && nodes[i - 2].is_off_curve()
            && nodes[i - 3].is_on_curve();
        if !is_cubic {
            continue;
        }
        let (n1, h1, h2, n2) = (
            nodes[i - 3].position,
            nodes[i - 2].position,
            nodes[i - 1].position,
            nodes[i].position,
        );
        if let Some((new_h1, new_h2)) = shorten_inflected_handles_on_segment(n1, h1, h2, n2, preset) {
            if let Some(node) = path.node_at_mut(i - 2) {
                node.position = new_h1;
            }
            if let Some(node) = path.node_at_mut(i - 1) {
                node.position = new_h2;
            }
            changed += 1;
        }
    }
    changed
}
