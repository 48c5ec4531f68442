//! Virtual points along a segment

use super::shape::SegmentShape;
use kurbo::Point;

/// Number of evenly parametrized samples for a chord of the given length
fn sample_count(chord: f64, step: f64) -> usize {
    if !(step > 0.0 && step.is_finite()) || !chord.is_finite() {
        return 2;
    }
    ((chord / step).floor() as usize + 1).max(2)
}

/// Place `max(2, floor(chord / step) + 1)` points along the true shape of
/// the segment, evenly spaced in parameter space.
pub fn sample_segment(shape: &SegmentShape, step: f64) -> Vec<Point> {
    let count = sample_count(shape.chord(), step);
    let last = (count - 1) as f64;
    (0..count).map(|k| shape.eval(k as f64 / last)).collect()
}
