//! Geometric Primitives and Operations
//!
//! Pure math over kurbo types: segment shapes, bounding boxes, sampling,
//! intersections and angle helpers. Nothing in here knows about paths or
//! mutates anything.

pub mod bounds;
pub mod sampling;
pub mod shape;
pub mod utilities;

// Re-export commonly used items
pub use bounds::{cubic_bounding_box, distance_to_rect, quad_to_cubic, segment_bounding_box};
pub use sampling::sample_segment;
pub use shape::SegmentShape;
pub use utilities::{angle_at, angle_between, is_turned_backward, line_intersection};
