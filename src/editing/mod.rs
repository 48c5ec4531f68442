//! Editing Functionality
//!
//! This module contains the pencil editing operations:
//! - Closest-area search and direction handling
//! - Splicing a drawn path into an existing one and smoothing the seams
//! - Simplifying drawn paths and repairing their handles
//! - Stroke finishing and the hover preview

pub mod closest_area;
pub mod connection;
pub mod direction;
pub mod pencil;
pub mod preview;
pub mod redraw;
pub mod simplify;
pub mod splice;

// Re-export commonly used items
pub use closest_area::{locate_closest_area, ClosestArea};
pub use connection::{adjust_connections, adjust_pair, JunctionAdjustment};
pub use direction::{correct_path_directions, sync_directions};
pub use pencil::{finish_stroke, StrokeModifiers, StrokeReport};
pub use preview::{area_outline, HoverPreview};
pub use redraw::{redraw_path, RedrawReport};
pub use simplify::{simplify_layer, simplify_path, SimplifyReport};
pub use splice::{splice, splice_into, Junctions};
