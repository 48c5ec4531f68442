//! Redraw controller
//!
//! Takes a freshly drawn path and splices it into the nearest existing path
//! in place of the run of nodes it was drawn over.

use super::closest_area::locate_closest_area;
use super::connection::{adjust_connections, normalize_connection_handles, sharpen_junctions, JunctionAdjustment};
use super::direction::sync_directions;
use super::splice::splice_into;
use crate::core::errors::PencilError;
use crate::core::settings::PencilSettings;
use crate::data::{Layer, PathId};
use tracing::{debug, info, warn};

/// Summary of a completed redraw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawReport {
    /// Path that received the drawn nodes
    pub target: PathId,
    /// Nodes of the target replaced by the drawn path
    pub replaced_nodes: usize,
    pub inserted_nodes: usize,
    /// The drawn path was reversed to follow the target
    pub reversed: bool,
    /// An open target was closed because the stroke bridged its gap
    pub closed_target: bool,
    /// Start and end side outcomes, `None` when connection adjustment is off
    pub adjustments: Option<(JunctionAdjustment, JunctionAdjustment)>,
    /// Junction segments whose handles were shortened
    pub handles_normalized: usize,
}

/// Splice `new_path` into the closest other path of the layer.
///
/// Returns `Ok(None)` when no path qualifies; the layer is then unchanged.
/// On success the drawn path is gone from the layer.
pub fn redraw_path(
    layer: &mut Layer,
    new_path: PathId,
    settings: &PencilSettings,
) -> Result<Option<RedrawReport>, PencilError> {
    settings.validate()?;
    let stroke = layer.path(new_path).ok_or(PencilError::UnknownPath(new_path))?;
    let (Some(first), Some(last)) = (stroke.nodes().first(), stroke.nodes().last()) else {
        debug!("Drawn path {:?} is empty, nothing to redraw", new_path);
        return Ok(None);
    };
    let (ns1, ne1) = (first.position, last.position);

    let Some(mut area) = locate_closest_area(layer, Some(new_path), ns1, ne1, &settings.locate) else {
        debug!("No path close enough to redraw with {:?}", new_path);
        return Ok(None);
    };

    let mut stroke = layer.remove_path(new_path).ok_or(PencilError::UnknownPath(new_path))?;
    let drawn = stroke.clone();
    let target_id = area.path;
    let Some(target) = layer.path_mut(target_id) else {
        return Err(PencilError::UnknownPath(target_id));
    };

    if area.open_wraparound {
        target.set_closed(true);
        debug!("Closed path {:?}: the stroke bridges its open ends", target_id);
    }
    let reversed = sync_directions(&mut area, &mut stroke, target.len());
    let replaced_nodes = area.interior_ids(target).len();

    let Some(junctions) = splice_into(target, &area, &stroke) else {
        warn!("Could not splice {:?} into {:?}; keeping it as a separate path", new_path, target_id);
        if area.open_wraparound {
            target.set_closed(false);
        }
        layer.restore_path(drawn);
        return Ok(None);
    };

    let (adjustments, handles_normalized) = if settings.connection.adjust {
        let sides = adjust_connections(target, &junctions, area.start_vector, area.end_vector, &settings.connection);
        let normalized = normalize_connection_handles(target, &junctions, settings);
        (Some(sides), normalized)
    } else {
        sharpen_junctions(target, &junctions);
        (None, 0)
    };

    let report = RedrawReport {
        target: target_id,
        replaced_nodes,
        inserted_nodes: stroke.len(),
        reversed,
        closed_target: area.open_wraparound,
        adjustments,
        handles_normalized,
    };
    info!(
        "Redrew path {:?}: replaced {} nodes with {}",
        target_id, report.replaced_nodes, report.inserted_nodes
    );
    Ok(Some(report))
}
