//! Path simplification
//!
//! Cleans up a hand-drawn or freshly spliced path in a fixed order:
//! ripples, degraded handles, tight nodes, degraded handles again (removal
//! can zero out handles), and finally looped or inflected handles.

pub mod degraded_handles;
pub mod inflection;
pub mod ripples;
pub mod tight_nodes;

pub use degraded_handles::fix_degraded_handles;
pub use inflection::{shorten_inflected_handles, shorten_inflected_handles_on_segment};
pub use ripples::smooth_out_ripples;
pub use tight_nodes::remove_tight_nodes;

use crate::core::settings::{ShorteningPreset, SimplifySettings};
use crate::data::{Layer, Path, PathId};
use tracing::{debug, info};

/// What one simplify pass changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimplifyReport {
    pub ripple_runs: usize,
    pub handles_repaired: usize,
    pub tight_nodes_removed: usize,
    pub inflections_fixed: usize,
}

impl SimplifyReport {
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }

    fn absorb(&mut self, other: SimplifyReport) {
        self.ripple_runs += other.ripple_runs;
        self.handles_repaired += other.handles_repaired;
        self.tight_nodes_removed += other.tight_nodes_removed;
        self.inflections_fixed += other.inflections_fixed;
    }
}

/// Run the full simplify pass on one path
pub fn simplify_path(path: &mut Path, settings: &SimplifySettings) -> SimplifyReport {
    let mut report = SimplifyReport {
        ripple_runs: smooth_out_ripples(path, settings.ripple_angle_tolerance),
        ..Default::default()
    };
    report.handles_repaired += fix_degraded_handles(path, settings);
    report.tight_nodes_removed = remove_tight_nodes(path, settings);
    report.handles_repaired += fix_degraded_handles(path, settings);
    report.inflections_fixed = shorten_inflected_handles(path, &ShorteningPreset::standalone(settings));

    debug!("Simplified path {:?}: {:?}", path.id(), report);
    report
}

/// Simplify the selected paths, or every path when `selection` is `None`.
///
/// Unknown ids in the selection are skipped.
pub fn simplify_layer(layer: &mut Layer, settings: &SimplifySettings, selection: Option<&[PathId]>) -> SimplifyReport {
    let mut total = SimplifyReport::default();
    let mut count = 0;
    for path in layer.paths_mut() {
        if selection.is_some_and(|ids| !ids.contains(&path.id())) {
            continue;
        }
        total.absorb(simplify_path(path, settings));
        count += 1;
    }
    info!(
        "Simplified {} paths: {} ripple runs, {} tight nodes removed, {} handles repaired, {} inflections fixed",
        count, total.ripple_runs, total.tight_nodes_removed, total.handles_repaired, total.inflections_fixed
    );
    total
}
