//! Geometric primitives used by the `geopaint` render pipeline.
//!
//! * [`cartesian`] contains points, rectangles and sizes in cartesian coordinates,
//! * [`Path`] is the nested container of geometry path data (points, lines, multi-parts and polygon rings),
//! * [`clip`] contains the algorithms to clip rings and polylines by a rectangle.

pub mod cartesian;
pub mod clip;
pub mod error;
mod path;

pub use path::Path;
