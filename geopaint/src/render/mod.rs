//! Drawing surfaces and the symbolizers that draw geometries onto them.

use crate::color::Color;
use crate::symbol::{MarkerType, Shadow};
use geopaint_types::cartesian::{Point2d, Rect, Size};
use geopaint_types::Path;
use nalgebra::Vector2;

pub mod symbolizer;

/// 2d drawing target, e.g. a canvas context or a raster image.
///
/// All coordinates are in surface pixels.
pub trait Surface {
    /// Sets the shadow for the following draw calls. `None` resets it.
    fn set_shadow(&mut self, shadow: Option<&Shadow>);
    /// Strokes every line (or ring) of the path.
    fn stroke(&mut self, path: &Path<Point2d>, paint: &LinePaint);
    /// Fills the area of the path using even-odd rule for holes.
    fn fill(&mut self, path: &Path<Point2d>, paint: &PolygonPaint);
    /// Draws a marker at the anchor point.
    fn draw_marker(&mut self, anchor: Point2d, paint: &MarkerPaint);
    /// Draws a text label at the anchor point.
    fn draw_text(&mut self, anchor: Point2d, text: &str, paint: &TextPaint);
    /// Strokes a one pixel outline of the rectangle.
    fn stroke_rect(&mut self, rect: &Rect, color: Color);
}

/// Stroke style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePaint {
    pub color: Color,
    pub width: f64,
    pub line_cap: LineCap,
}

/// Fill style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonPaint {
    pub color: Color,
}

/// Line ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
    Butt,
}

/// What a marker looks like.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerShape {
    /// Image loaded from the given source.
    Image(String),
    /// Vector shape.
    Vector(MarkerType),
}

/// Marker style.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPaint {
    pub shape: MarkerShape,
    pub size: Size,
    /// Offset of the marker from its anchor in pixels.
    pub offset: Vector2<f64>,
    pub fill: Option<Color>,
    pub stroke: Option<LinePaint>,
    pub opacity: f64,
    /// Stacking order of the marker relative to other markers.
    pub z_index: i32,
}

/// Label style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPaint {
    pub color: Color,
    /// Font size in pixels.
    pub size: f64,
    /// Offset of the label center from its anchor in pixels.
    pub offset: Vector2<f64>,
    pub z_index: i32,
}
