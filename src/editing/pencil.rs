//! Stroke finishing
//!
//! What happens when the pencil is lifted: the drawn path is cleaned up and,
//! depending on the held modifier, spliced into an existing path or closed.

use super::direction::correct_path_directions;
use super::redraw::{redraw_path, RedrawReport};
use super::simplify::{simplify_path, SimplifyReport};
use crate::core::settings::PencilSettings;
use crate::data::{Layer, PathId};
use tracing::{debug, error};

/// Modifier keys held when the stroke ended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrokeModifiers {
    /// Splice the stroke into the closest existing path
    pub redraw: bool,
    /// Close the stroke
    pub close: bool,
}

/// Everything `finish_stroke` did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeReport {
    /// The drawn path that was processed
    pub path: Option<PathId>,
    pub simplified: Option<SimplifyReport>,
    pub redraw: Option<RedrawReport>,
    pub closed: bool,
    pub directions_corrected: usize,
    /// Failures that were logged and skipped
    pub errors: Vec<String>,
}

/// Finish the most recently drawn path of the layer.
///
/// Redraw wins over closing when both modifiers are held. Redrawing needs
/// another path with nodes to splice into. Failures are logged and collected in the
/// report; the stroke is left as it is after a failed step.
pub fn finish_stroke(layer: &mut Layer, settings: &PencilSettings, modifiers: StrokeModifiers) -> StrokeReport {
    let mut report = StrokeReport::default();
    let Some(id) = layer.last_drawn_path() else {
        debug!("No drawn path to finish");
        return report;
    };
    report.path = Some(id);

    if settings.simplify_drawn_path {
        if let Some(path) = layer.path_mut(id) {
            report.simplified = Some(simplify_path(path, &settings.simplify));
        }
    }

    if modifiers.redraw && layer.non_empty_paths().count() >= 2 {
        match redraw_path(layer, id, settings) {
            Ok(redraw) => report.redraw = redraw,
            Err(err) => {
                error!("Redraw failed: {}", err);
                report.errors.push(err.to_string());
            }
        }
    } else if modifiers.close {
        if let Some(path) = layer.path_mut(id) {
            path.set_closed(true);
            report.closed = true;
        }
        if settings.correct_path_direction {
            report.directions_corrected = correct_path_directions(layer);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NodeData;

    fn square(layer: &mut Layer) -> PathId {
        layer.add_path(
            true,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(100.0, 0.0),
                NodeData::line(100.0, 100.0),
                NodeData::line(0.0, 100.0),
            ],
        )
    }

    #[test]
    fn test_plain_stroke_is_only_simplified() {
        let mut layer = Layer::new();
        let stroke = layer.add_path(
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(20.0, 0.5),
                NodeData::line(40.0, -0.5),
                NodeData::line(60.0, 0.5),
                NodeData::line(80.0, -0.5),
                NodeData::line(100.0, 0.0),
            ],
        );
        let report = finish_stroke(&mut layer, &PencilSettings::default(), StrokeModifiers::default());
        assert_eq!(report.path, Some(stroke));
        assert_eq!(report.simplified.map(|s| s.ripple_runs), Some(1));
        assert!(!report.closed);
        assert_eq!(layer.path(stroke).map(|p| p.len()), Some(4));
    }

    #[test]
    fn test_close_modifier_closes_and_orients() {
        let mut layer = Layer::new();
        // Clockwise triangle
        let stroke = layer.add_path(
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(0.0, 100.0),
                NodeData::line(100.0, 100.0),
            ],
        );
        let modifiers = StrokeModifiers { redraw: false, close: true };
        let report = finish_stroke(&mut layer, &PencilSettings::default(), modifiers);

        assert!(report.closed);
        assert_eq!(report.directions_corrected, 1, "Lone outer contour turns counter-clockwise");
        assert!(layer.path(stroke).is_some_and(|p| p.is_closed()));
    }

    #[test]
    fn test_redraw_needs_another_path() {
        let mut layer = Layer::new();
        let stroke = layer.add_path(false, [NodeData::line(0.0, 0.0), NodeData::line(100.0, 0.0)]);
        let modifiers = StrokeModifiers { redraw: true, close: true };
        let report = finish_stroke(&mut layer, &PencilSettings::default(), modifiers);
        assert!(report.redraw.is_none());
        assert!(report.closed, "Falls through to closing with a single path");
        assert!(layer.path(stroke).is_some());
    }

    #[test]
    fn test_empty_paths_do_not_count_for_redraw() {
        let mut layer = Layer::new();
        layer.add_path(false, Vec::<NodeData>::new());
        let stroke = layer.add_path(
            false,
            [
                NodeData::line(0.0, 0.0),
                NodeData::line(0.0, 100.0),
                NodeData::line(100.0, 100.0),
            ],
        );
        let modifiers = StrokeModifiers { redraw: true, close: true };
        let report = finish_stroke(&mut layer, &PencilSettings::default(), modifiers);

        assert!(report.redraw.is_none());
        assert!(report.closed, "An empty path is nothing to redraw into");
        assert_eq!(report.directions_corrected, 1);
        assert!(layer.path(stroke).is_some_and(|p| p.is_closed()));
    }

    #[test]
    fn test_redraw_modifier_splices() {
        let mut layer = Layer::new();
        let target = square(&mut layer);
        layer.add_path(false, [NodeData::line(40.0, 10.0), NodeData::line(60.0, 10.0)]);
        let modifiers = StrokeModifiers { redraw: true, close: false };
        let report = finish_stroke(&mut layer, &PencilSettings::default(), modifiers);

        let redraw = report.redraw.expect("Stroke is spliced");
        assert_eq!(redraw.target, target);
        assert_eq!(layer.len(), 1, "Stroke is merged into the square");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_bad_settings_are_reported_not_raised() {
        let mut layer = Layer::new();
        square(&mut layer);
        layer.add_path(false, [NodeData::line(40.0, 10.0), NodeData::line(60.0, 10.0)]);
        let mut settings = PencilSettings::default();
        settings.locate.sampling_step = 0.0;
        let modifiers = StrokeModifiers { redraw: true, close: false };

        let report = finish_stroke(&mut layer, &settings, modifiers);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(layer.len(), 2, "Nothing was spliced");
    }
}
