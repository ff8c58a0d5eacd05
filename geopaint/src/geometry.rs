//! The contract between the painter and the geometries it paints.

use crate::symbol::{Placement, SymbolSet};
use geopaint_types::cartesian::{Point2d, Rect, Size};
use geopaint_types::Path;
use serde::{Deserialize, Serialize};

/// Type of a geometry. Decides which symbolizers apply to it and how its path is clipped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Single point.
    Point,
    /// Set of points.
    MultiPoint,
    /// Line.
    LineString,
    /// Set of lines.
    MultiLineString,
    /// Polygon with optional holes.
    Polygon,
    /// Set of polygons.
    MultiPolygon,
}

impl GeometryKind {
    /// Point or multipoint.
    pub fn is_point(&self) -> bool {
        matches!(self, GeometryKind::Point | GeometryKind::MultiPoint)
    }

    /// Line or multiline.
    pub fn is_line(&self) -> bool {
        matches!(self, GeometryKind::LineString | GeometryKind::MultiLineString)
    }

    /// Polygon or multipolygon.
    pub fn is_polygon(&self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }
}

/// Additional parameter of a paint operation, e.g. a radius of a circle or the size of an ellipse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PaintParam {
    /// Length in model units.
    Number(f64),
    /// Size in model units.
    Size(Size),
    /// Angle in radians.
    Angle(f64),
    /// Boolean switch.
    Flag(bool),
}

impl PaintParam {
    /// Converts a model-space parameter into surface pixels. Only lengths and sizes are scaled.
    pub fn to_surface(&self, gl_scale: f64) -> Self {
        match self {
            PaintParam::Number(v) => PaintParam::Number(v / gl_scale),
            PaintParam::Size(size) => PaintParam::Size(size.scale(1.0 / gl_scale)),
            other => *other,
        }
    }
}

/// Data the geometry is painted from.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintParams {
    /// Path data in model points.
    pub path: Path<Point2d>,
    /// Additional parameters.
    pub extras: Vec<PaintParam>,
    /// True if the path was simplified for the resolution it was requested at.
    pub simplified: bool,
}

impl PaintParams {
    /// Unsimplified paint params with no extras.
    pub fn new(path: Path<Point2d>) -> Self {
        Self {
            path,
            extras: vec![],
            simplified: false,
        }
    }

    /// Adds the parameters.
    pub fn with_extras(self, extras: Vec<PaintParam>) -> Self {
        Self { extras, ..self }
    }

    /// Sets the simplification flag.
    pub fn with_simplified(self, simplified: bool) -> Self {
        Self { simplified, ..self }
    }
}

/// Altitude a geometry is raised to, in meters.
#[derive(Debug, Clone, PartialEq)]
pub enum AltitudeProperty {
    /// Same altitude for every vertex.
    Length(f64),
    /// Altitude of every vertex. The structure must mirror the geometry path.
    PerVertex(Path<f64>),
}

/// Geometry that can be drawn by a [`Painter`](crate::painter::Painter).
///
/// A painter caches everything it derives from the geometry. The caches are dropped when
/// [`revision`](PaintGeometry::revision) changes, so an implementation must increment it on every change of
/// coordinates or properties.
pub trait PaintGeometry {
    /// Type of the geometry.
    fn kind(&self) -> GeometryKind;

    /// Paint params at the given resolution, or `None` if there is nothing to paint.
    ///
    /// The geometry may return a simplified path for coarse resolutions, setting
    /// [`PaintParams::simplified`].
    fn paint_params(&self, resolution: f64) -> Option<PaintParams>;

    /// Bounding rectangle of the geometry in model points.
    fn extent(&self) -> Option<Rect>;

    /// Center of the geometry in projected coordinates.
    fn center(&self) -> Point2d;

    /// Altitude property of the geometry.
    fn altitude(&self) -> Option<&AltitudeProperty> {
        None
    }

    /// Symbols of the geometry.
    fn symbols(&self) -> &SymbolSet;

    /// Revision of coordinates and properties.
    fn revision(&self) -> u64;

    /// Revision of the symbols.
    fn symbol_revision(&self) -> u64;

    /// Anchor points for markers with the given placement, in model points.
    ///
    /// Vertex placements give the vertices in path order, [`Placement::Line`] gives the middle of every segment of
    /// every part and [`Placement::Center`] gives the center of the geometry. Per-vertex altitudes of the anchors
    /// are resolved in the same order.
    fn render_points(&self, placement: Placement) -> Vec<Point2d>;

    /// Returns false if the geometry is drawn only with markers, without a path.
    fn paint_as_path(&self) -> bool {
        !self.kind().is_point()
    }

    /// Smoothing factor of curved lines. Smoothed geometries are not clipped.
    fn smoothness(&self) -> Option<f64> {
        None
    }

    /// Returns true if paint params depend on the pitch of the view.
    fn redraw_when_pitch(&self) -> bool {
        false
    }

    /// Returns true if paint params depend on the bearing of the view.
    fn redraw_when_rotate(&self) -> bool {
        false
    }
}
