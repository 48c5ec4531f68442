//! Pencil settings
//!
//! Every tunable the editing operations read, grouped by the stage that uses
//! it. A `PencilSettings` value is passed explicitly into each operation so
//! callers can override anything per call.

use crate::core::errors::PencilError;
use serde::{Deserialize, Serialize};

/// Closest-area search settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocateSettings {
    /// Distance between sampled points along a segment, in font units.
    /// Smaller is more accurate and slower.
    pub sampling_step: f64,
}

impl Default for LocateSettings {
    fn default() -> Self {
        Self { sampling_step: 10.0 }
    }
}

/// How a spliced path is joined onto the path it redraws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Adjust junction nodes and handles after splicing.
    /// When off, the junction nodes of the existing path are made corners.
    pub adjust: bool,
    /// Largest offset a junction node is pulled across
    pub max_adjust_distance: f64,
    /// Offsets at or below this snap the new node onto the old one
    pub collapse_distance: f64,
    /// Shortest junction handle after adjustment
    pub handle_min_length: f64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            adjust: true,
            max_adjust_distance: 50.0,
            collapse_distance: 25.0,
            handle_min_length: 20.0,
        }
    }
}

/// Handle sanitizer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifySettings {
    /// Largest turn, in degrees, still treated as part of a straight run
    pub ripple_angle_tolerance: f64,
    /// On-curve nodes closer than this to a neighbour are candidates for removal
    pub tight_node_distance: f64,
    /// Turns sharper than this angle, in degrees, protect their nodes
    pub sharp_turn_angle: f64,
    pub degraded_handle_min_length: f64,
    /// Tolerance, in degrees, for "opposite" and "folded onto" handle tests
    pub degraded_handle_angle_tolerance: f64,
    pub inflection_handle_min_length: f64,
    /// Gap left between a shortened handle and the intersection it overshot
    pub inflection_buffer: f64,
    /// Handles facing each other at more than this angle form an S-inflection
    pub inflection_s_min_angle: f64,
}

impl Default for SimplifySettings {
    fn default() -> Self {
        Self {
            ripple_angle_tolerance: 10.0,
            tight_node_distance: 10.0,
            sharp_turn_angle: 90.0,
            degraded_handle_min_length: 2.0,
            degraded_handle_angle_tolerance: 30.0,
            inflection_handle_min_length: 1.0,
            inflection_buffer: 1.0,
            inflection_s_min_angle: 135.0,
        }
    }
}

/// All pencil settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PencilSettings {
    pub locate: LocateSettings,
    pub connection: ConnectionSettings,
    pub simplify: SimplifySettings,
    /// Simplify every finished stroke
    pub simplify_drawn_path: bool,
    /// Fix path directions after closing a stroke
    pub correct_path_direction: bool,
}

impl Default for PencilSettings {
    fn default() -> Self {
        Self {
            locate: LocateSettings::default(),
            connection: ConnectionSettings::default(),
            simplify: SimplifySettings::default(),
            simplify_drawn_path: true,
            correct_path_direction: true,
        }
    }
}

impl PencilSettings {
    /// Reject values the operations cannot work with
    pub fn validate(&self) -> Result<(), PencilError> {
        let step = self.locate.sampling_step;
        if !step.is_finite() || step <= 0.0 {
            return Err(PencilError::InvalidSettings(format!(
                "sampling_step must be a positive number, got {step}"
            )));
        }

        let distances = [
            ("max_adjust_distance", self.connection.max_adjust_distance),
            ("collapse_distance", self.connection.collapse_distance),
            ("handle_min_length", self.connection.handle_min_length),
            ("tight_node_distance", self.simplify.tight_node_distance),
            ("degraded_handle_min_length", self.simplify.degraded_handle_min_length),
            ("inflection_handle_min_length", self.simplify.inflection_handle_min_length),
            ("inflection_buffer", self.simplify.inflection_buffer),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(PencilError::InvalidSettings(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        let angles = [
            ("ripple_angle_tolerance", self.simplify.ripple_angle_tolerance),
            ("sharp_turn_angle", self.simplify.sharp_turn_angle),
            ("degraded_handle_angle_tolerance", self.simplify.degraded_handle_angle_tolerance),
            ("inflection_s_min_angle", self.simplify.inflection_s_min_angle),
        ];
        for (name, value) in angles {
            if !(0.0..=180.0).contains(&value) {
                return Err(PencilError::InvalidSettings(format!(
                    "{name} must be between 0 and 180 degrees, got {value}"
                )));
            }
        }

        if self.connection.collapse_distance > self.connection.max_adjust_distance {
            return Err(PencilError::InvalidSettings(format!(
                "collapse_distance ({}) is larger than max_adjust_distance ({})",
                self.connection.collapse_distance, self.connection.max_adjust_distance
            )));
        }
        Ok(())
    }
}

/// Parameters of the loop and inflection shortening routine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShorteningPreset {
    /// Floor for handles shortened at an intersection, as a share of the chord
    pub intersection_chord_fraction: f64,
    /// Absolute floor for handles shortened at an intersection
    pub intersection_min_length: f64,
    /// Floor for handles rebalanced in the S case
    pub s_min_length: f64,
    pub buffer: f64,
    pub s_min_angle: f64,
}

impl ShorteningPreset {
    /// Used by the simplify pass: floor of a fifth of the chord
    pub fn standalone(settings: &SimplifySettings) -> Self {
        Self {
            intersection_chord_fraction: 0.2,
            intersection_min_length: settings.inflection_handle_min_length,
            s_min_length: settings.inflection_handle_min_length,
            buffer: settings.inflection_buffer,
            s_min_angle: settings.inflection_s_min_angle,
        }
    }

    /// Used on spliced junctions: fixed floor of the connection handle length
    pub fn connection(settings: &PencilSettings) -> Self {
        Self {
            intersection_chord_fraction: 0.0,
            intersection_min_length: settings.connection.handle_min_length,
            s_min_length: settings.simplify.inflection_handle_min_length,
            buffer: settings.simplify.inflection_buffer,
            s_min_angle: 135.0,
        }
    }

    /// Floor for intersection shortening on a segment of the given chord
    pub fn intersection_floor(&self, chord: f64) -> f64 {
        (chord * self.intersection_chord_fraction).max(self.intersection_min_length)
    }
}
