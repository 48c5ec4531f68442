//! Outline data model
//!
//! Nodes, paths and layers as the editing code sees them, plus the adapters
//! to and from norad's UFO types.

pub mod conversions;
pub mod keep_shape;
pub mod layer;
pub mod node;
pub mod path;
pub mod ufo;

// Re-export commonly used items
pub use layer::Layer;
pub use node::{Node, NodeData, NodeId, NodeKind, PointType};
pub use path::{Path, PathId, Segment};
