//! Path direction handling
//!
//! Two jobs: making a drawn stroke run the same way as the path it is
//! about to be spliced into, and giving closed paths the conventional
//! winding (outer contours counter-clockwise, counters clockwise).

use super::closest_area::ClosestArea;
use crate::data::{Layer, Path};
use kurbo::{PathEl, Point};
use tracing::debug;

/// Flattening tolerance used for area and containment tests
const FLATTEN_TOLERANCE: f64 = 0.25;

/// Whether the area walks the target path in its own node order
pub fn is_area_forward(area: &ClosestArea, path_len: usize) -> bool {
    let (Some(&a0), Some(&a1)) = (area.indices.first(), area.indices.get(1)) else {
        return true;
    };
    let n = path_len.max(1) as isize;
    let forward = (a1 as isize - a0 as isize).rem_euclid(n);
    let backward = (a0 as isize - a1 as isize).rem_euclid(n);
    forward < backward
}

/// Make the new path and the area agree on direction.
///
/// The new path always runs from its first to its last node. When the area
/// walks the target backwards, the new path is reversed and the area is
/// flipped to match. Returns whether anything was reversed.
pub fn sync_directions(area: &mut ClosestArea, new_path: &mut Path, target_len: usize) -> bool {
    if is_area_forward(area, target_len) {
        return false;
    }
    new_path.reverse();
    area.reverse();
    debug!("Reversed new path {:?} to follow target {:?}", new_path.id(), area.path);
    true
}

/// Orient every closed path of the layer by nesting depth.
///
/// Paths inside an even number of other paths wind counter-clockwise,
/// the rest clockwise. Open paths are left alone. Returns the number of
/// paths reversed.
pub fn correct_path_directions(layer: &mut Layer) -> usize {
    let polygons: Vec<Option<Vec<Point>>> = layer
        .paths()
        .iter()
        .map(|path| path.is_closed().then(|| flattened_polygon(path)))
        .collect();

    let mut to_reverse = Vec::new();
    for (i, polygon) in polygons.iter().enumerate() {
        let Some(polygon) = polygon else {
            continue;
        };
        if polygon.len() < 3 {
            continue;
        }
        let depth = polygons
            .iter()
            .enumerate()
            .filter(|&(j, other)| j != i && other.as_ref().is_some_and(|o| is_inside(polygon, o)))
            .count();
        let should_be_ccw = depth % 2 == 0;
        let is_ccw = signed_area(polygon) > 0.0;
        if should_be_ccw != is_ccw {
            to_reverse.push(i);
        }
    }

    let reversed = to_reverse.len();
    for (i, path) in layer.paths_mut().enumerate() {
        if to_reverse.contains(&i) {
            path.reverse();
            debug!("Reversed direction of path {:?}", path.id());
        }
    }
    reversed
}

fn flattened_polygon(path: &Path) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::new();
    kurbo::flatten(path.to_bezpath(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(p),
        _ => {}
    });
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// A polygon is inside another when most of its vertices are.
///
/// Counting vertices instead of testing one point keeps shared extrema
/// (an O's counter touching its outer contour) from deciding the result.
fn is_inside(inner: &[Point], outer: &[Point]) -> bool {
    let contained = inner.iter().filter(|&&p| point_in_polygon(p, outer)).count();
    contained * 2 > inner.len()
}

/// Signed area via shoelace, positive when counter-clockwise
fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Ray-casting point-in-polygon test
fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
