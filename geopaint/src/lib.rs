//! Geopaint is the geometry painting core of a map renderer. It takes vector geometries in model space, projects
//! them through a map camera and draws them with their symbols onto a 2d surface.
//!
//! # Main components
//!
//! * [`Camera`] is the view state of the map: resolution, pitch, bearing and the projection between model points
//!   and container pixels. [`MapView`] is a perspective camera over a planar map.
//! * [`PaintGeometry`] is implemented by the application geometries. It gives the painter the path data, the
//!   altitude and the [symbols](symbol) of a geometry.
//! * [`Surface`] is the drawing target: a canvas, an image or anything that can stroke and fill paths and draw
//!   markers and text.
//! * [`Painter`] connects them: it clips and transforms the geometry path for the current view, caches the results
//!   and runs the [symbolizers](render::symbolizer) of the geometry.
//!
//! ```no_run
//! use geopaint::geopaint_types::cartesian::{Point2d, Size};
//! use geopaint::{MapView, PaintGeometry, Painter, PainterOptions, Surface};
//!
//! fn draw(geometry: impl PaintGeometry, surface: &mut dyn Surface) {
//!     let view = MapView::new(Point2d::new(0.0, 0.0), 10.0).with_size(Size::new(800.0, 600.0));
//!     let mut painter = Painter::new(geometry, PainterOptions::default());
//!     painter.paint(&view, Some(surface), None, None);
//! }
//! ```

pub mod camera;
mod color;
pub mod error;
pub mod geometry;
pub mod painter;
pub mod render;
pub mod symbol;
mod view;

#[cfg(test)]
mod tests;

pub use camera::Camera;
pub use color::Color;
pub use geometry::PaintGeometry;
pub use geopaint_types;
pub use painter::{PaintOutcome, Painter, PainterOptions};
pub use render::Surface;
pub use view::{MapView, WEB_MERCATOR_BASE_RESOLUTION};
