//! Hover preview
//!
//! While the pencil moves, the area a stroke would replace is looked up and
//! drawn as an outline. Lookups are throttled since they scan every path.

use super::closest_area::{locate_closest_area, ClosestArea};
use super::direction::is_area_forward;
use crate::core::settings::LocateSettings;
use crate::data::conversions::push_segment;
use crate::data::{Layer, Path};
use kurbo::{BezPath, Point};
use std::time::{Duration, Instant};

/// Default minimum time between two lookups
pub const PREVIEW_INTERVAL: Duration = Duration::from_millis(50);

/// Throttled closest-area lookup for the cursor
#[derive(Clone, Debug)]
pub struct HoverPreview {
    interval: Duration,
    last_run: Option<Instant>,
    cached: Option<ClosestArea>,
}

impl Default for HoverPreview {
    fn default() -> Self {
        Self::new(PREVIEW_INTERVAL)
    }
}

impl HoverPreview {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            cached: None,
        }
    }

    /// Look up the area between `start` and `end` unless the last lookup was
    /// less than one interval before `now`, in which case the cached area is
    /// returned as is.
    pub fn update(
        &mut self,
        layer: &Layer,
        start: Point,
        end: Point,
        now: Instant,
        settings: &LocateSettings,
    ) -> Option<&ClosestArea> {
        let due = self
            .last_run
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.cached = locate_closest_area(layer, None, start, end, settings);
            self.last_run = Some(now);
        }
        self.cached.as_ref()
    }

    pub fn cached(&self) -> Option<&ClosestArea> {
        self.cached.as_ref()
    }

    /// Forget the cached area and allow an immediate lookup
    pub fn clear(&mut self) {
        self.cached = None;
        self.last_run = None;
    }
}

/// Outline of the area's segments, in the target path's own direction
pub fn area_outline(path: &Path, area: &ClosestArea) -> BezPath {
    let mut indices = area.indices.clone();
    if !is_area_forward(area, path.len()) {
        indices.reverse();
    }

    let mut bez = BezPath::new();
    let mut current: Option<Point> = None;
    let mut handles: Vec<Point> = Vec::new();
    for index in indices {
        let Some(node) = path.node_at(index) else {
            continue;
        };
        if node.is_off_curve() {
            if current.is_some() {
                handles.push(node.position);
            }
            continue;
        }
        match current {
            None => bez.move_to(node.position),
            Some(start) => push_segment(&mut bez, start, &handles, node.position, node.typ),
        }
        current = Some(node.position);
        handles.clear();
    }
    bez
}
