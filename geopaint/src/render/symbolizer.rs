//! Symbolizers turn a [`Symbol`] into draw calls on a [`Surface`].

use crate::color::Color;
use crate::geometry::{GeometryKind, PaintParam};
use crate::render::{LineCap, LinePaint, MarkerPaint, MarkerShape, PolygonPaint, Surface, TextPaint};
use crate::symbol::{MarkerType, Placement, Symbol};
use geopaint_types::cartesian::{Point2d, Rect, Size};
use geopaint_types::Path;
use nalgebra::Vector2;

const DEFAULT_LINE_WIDTH: f64 = 1.0;
const DEFAULT_IMAGE_SIZE: f64 = 16.0;
const DEFAULT_MARKER_SIZE: f64 = 10.0;
const DEFAULT_TEXT_SIZE: f64 = 14.0;
/// Approximate width of a glyph relative to the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.6;
const DEBUG_VERTEX_SIZE: f64 = 4.0;

/// Kind of a symbolizer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SymbolizerKind {
    /// Strokes lines and fills polygons.
    StrokeAndFill,
    /// Draws images at the anchor points.
    ImageMarker,
    /// Draws vector shapes at the anchor points.
    VectorMarker,
    /// Draws text labels at the anchor points.
    TextMarker,
}

impl SymbolizerKind {
    /// All kinds in drawing order: paths first, labels last.
    pub const PRIORITY: [SymbolizerKind; 4] = [
        SymbolizerKind::StrokeAndFill,
        SymbolizerKind::ImageMarker,
        SymbolizerKind::VectorMarker,
        SymbolizerKind::TextMarker,
    ];

    /// Returns true if a symbolizer of this kind draws something for the symbol on a geometry of the given kind.
    pub fn matches(&self, symbol: &Symbol, geometry_kind: GeometryKind) -> bool {
        match self {
            SymbolizerKind::StrokeAndFill => {
                !geometry_kind.is_point()
                    && (symbol.line_color.is_some()
                        || symbol.line_width.is_some()
                        || symbol.polygon_fill.is_some())
            }
            SymbolizerKind::ImageMarker => symbol.marker_file.is_some(),
            SymbolizerKind::VectorMarker => {
                symbol.marker_file.is_none() && symbol.marker_type.is_some()
            }
            SymbolizerKind::TextMarker => symbol
                .text_name
                .as_ref()
                .is_some_and(|text| !text.is_empty()),
        }
    }

    /// Markers are drawn at anchor points with a fixed pixel size.
    pub fn is_marker(&self) -> bool {
        !matches!(self, SymbolizerKind::StrokeAndFill)
    }
}

/// Paint params converted to surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedParams {
    /// Path in surface pixels.
    pub points: Path<Point2d>,
    /// Extra parameters in surface pixels.
    pub extras: Vec<PaintParam>,
}

/// Input of a single symbolizer draw.
#[derive(Debug, Clone, Copy)]
pub struct SymbolizeInput<'a> {
    /// Transformed path of the geometry, if it is drawn as a path.
    pub params: Option<&'a TransformedParams>,
    /// Marker anchors in surface pixels.
    pub anchors: &'a [Point2d],
}

/// Draws one aspect of a symbol.
#[derive(Debug, Clone)]
pub struct Symbolizer {
    kind: SymbolizerKind,
    symbol: Symbol,
    geometry_kind: GeometryKind,
    z_index: i32,
}

impl Symbolizer {
    /// Creates a new symbolizer.
    pub fn new(kind: SymbolizerKind, symbol: Symbol, geometry_kind: GeometryKind) -> Self {
        Self {
            kind,
            symbol,
            geometry_kind,
            z_index: 0,
        }
    }

    /// Kind of the symbolizer.
    pub fn kind(&self) -> SymbolizerKind {
        self.kind
    }

    /// Symbol the symbolizer draws.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Z-index of the markers drawn by the symbolizer.
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Changes the z-index of the markers drawn by the symbolizer.
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    /// Placement of the markers.
    pub fn placement(&self) -> Placement {
        self.symbol.marker_placement.unwrap_or(match self.geometry_kind {
            GeometryKind::Point | GeometryKind::MultiPoint => Placement::Point,
            _ => Placement::Center,
        })
    }

    /// Width of the stroke in pixels, if the symbolizer strokes a path.
    pub fn line_width(&self) -> Option<f64> {
        if self.kind != SymbolizerKind::StrokeAndFill || !self.has_stroke() {
            return None;
        }

        Some(self.symbol.line_width.unwrap_or(DEFAULT_LINE_WIDTH))
    }

    fn has_stroke(&self) -> bool {
        self.symbol.line_color.is_some() || self.symbol.line_width.is_some()
    }

    /// Footprint of a marker relative to its anchor, in pixels. `None` for non-marker symbolizers.
    pub fn fixed_extent(&self) -> Option<Rect> {
        let symbol = &self.symbol;
        let (rect, offset) = match self.kind {
            SymbolizerKind::StrokeAndFill => return None,
            SymbolizerKind::ImageMarker => {
                let size = self.marker_size(DEFAULT_IMAGE_SIZE);
                (
                    bottom_anchored(size),
                    Vector2::new(
                        symbol.marker_dx.unwrap_or_default(),
                        symbol.marker_dy.unwrap_or_default(),
                    ),
                )
            }
            SymbolizerKind::VectorMarker => {
                let size = self.marker_size(DEFAULT_MARKER_SIZE);
                let rect = if symbol.marker_type.is_some_and(|t| t.is_bottom_anchored()) {
                    bottom_anchored(size)
                } else {
                    centered(size)
                };
                let outline = symbol.marker_line_width.unwrap_or_default() / 2.0;
                (
                    rect.expand(outline),
                    Vector2::new(
                        symbol.marker_dx.unwrap_or_default(),
                        symbol.marker_dy.unwrap_or_default(),
                    ),
                )
            }
            SymbolizerKind::TextMarker => (
                centered(self.text_size()),
                Vector2::new(
                    symbol.text_dx.unwrap_or_default(),
                    symbol.text_dy.unwrap_or_default(),
                ),
            ),
        };

        Some(rect.translate(offset))
    }

    fn marker_size(&self, default: f64) -> Size {
        Size::new(
            self.symbol.marker_width.unwrap_or(default),
            self.symbol.marker_height.unwrap_or(default),
        )
    }

    fn text_size(&self) -> Size {
        let font_size = self.symbol.text_size.unwrap_or(DEFAULT_TEXT_SIZE);
        let chars = self
            .symbol
            .text_name
            .as_ref()
            .map(|text| text.chars().count())
            .unwrap_or_default();
        Size::new(chars as f64 * font_size * GLYPH_WIDTH_RATIO, font_size)
    }

    /// Draws the symbol.
    pub fn symbolize(&self, surface: &mut dyn Surface, input: &SymbolizeInput) {
        match self.kind {
            SymbolizerKind::StrokeAndFill => {
                if let Some(params) = input.params {
                    self.stroke_and_fill(surface, &params.points);
                }
            }
            SymbolizerKind::ImageMarker | SymbolizerKind::VectorMarker => {
                let Some(paint) = self.marker_paint() else {
                    return;
                };
                for anchor in input.anchors {
                    surface.draw_marker(*anchor, &paint);
                }
            }
            SymbolizerKind::TextMarker => {
                let Some(text) = &self.symbol.text_name else {
                    return;
                };
                let paint = TextPaint {
                    color: self
                        .symbol
                        .text_fill
                        .unwrap_or(Color::BLACK)
                        .with_opacity(self.symbol.opacity()),
                    size: self.text_size().height(),
                    offset: Vector2::new(
                        self.symbol.text_dx.unwrap_or_default(),
                        self.symbol.text_dy.unwrap_or_default(),
                    ),
                    z_index: self.z_index,
                };
                for anchor in input.anchors {
                    surface.draw_text(*anchor, text, &paint);
                }
            }
        }
    }

    fn stroke_and_fill(&self, surface: &mut dyn Surface, path: &Path<Point2d>) {
        let symbol = &self.symbol;
        let opacity = symbol.opacity();
        if self.geometry_kind.is_polygon() {
            if let Some(fill) = symbol.polygon_fill {
                let paint = PolygonPaint {
                    color: fill.with_opacity(opacity * symbol.polygon_opacity.unwrap_or(1.0)),
                };
                surface.fill(path, &paint);
            }
        }

        if let Some(width) = self.line_width().filter(|w| *w > 0.0) {
            let paint = LinePaint {
                color: symbol
                    .line_color
                    .unwrap_or(Color::BLACK)
                    .with_opacity(opacity * symbol.line_opacity.unwrap_or(1.0)),
                width,
                line_cap: LineCap::Butt,
            };
            surface.stroke(path, &paint);
        }
    }

    fn marker_paint(&self) -> Option<MarkerPaint> {
        let symbol = &self.symbol;
        let (shape, size) = match self.kind {
            SymbolizerKind::ImageMarker => (
                MarkerShape::Image(symbol.marker_file.clone()?),
                self.marker_size(DEFAULT_IMAGE_SIZE),
            ),
            SymbolizerKind::VectorMarker => (
                MarkerShape::Vector(symbol.marker_type?),
                self.marker_size(DEFAULT_MARKER_SIZE),
            ),
            _ => return None,
        };

        let stroke = symbol
            .marker_line_width
            .filter(|w| *w > 0.0)
            .map(|width| LinePaint {
                color: symbol.marker_line_color.unwrap_or(Color::BLACK),
                width,
                line_cap: LineCap::Round,
            });

        Some(MarkerPaint {
            shape,
            size,
            offset: Vector2::new(
                symbol.marker_dx.unwrap_or_default(),
                symbol.marker_dy.unwrap_or_default(),
            ),
            fill: symbol.marker_fill,
            stroke,
            opacity: symbol.opacity() * symbol.marker_opacity.unwrap_or(1.0),
            z_index: self.z_index,
        })
    }
}

fn centered(size: Size) -> Rect {
    Rect::new(
        -size.half_width(),
        -size.half_height(),
        size.half_width(),
        size.half_height(),
    )
}

fn bottom_anchored(size: Size) -> Rect {
    Rect::new(-size.half_width(), -size.height(), size.half_width(), 0.0)
}

/// Draws the container extent of a geometry and its vertices. Used to debug rendering.
#[derive(Debug, Default, Clone)]
pub struct DebugSymbolizer;

impl DebugSymbolizer {
    /// Outlines the extent and marks every vertex of the transformed path.
    pub fn symbolize(
        &self,
        surface: &mut dyn Surface,
        extent: Option<&Rect>,
        params: Option<&TransformedParams>,
    ) {
        surface.set_shadow(None);
        if let Some(extent) = extent {
            surface.stroke_rect(extent, Color::RED);
        }

        let Some(params) = params else {
            return;
        };

        let paint = MarkerPaint {
            shape: MarkerShape::Vector(MarkerType::Cross),
            size: Size::new(DEBUG_VERTEX_SIZE, DEBUG_VERTEX_SIZE),
            offset: Vector2::zeros(),
            fill: None,
            stroke: Some(LinePaint {
                color: Color::RED,
                width: 1.0,
                line_cap: LineCap::Butt,
            }),
            opacity: 1.0,
            z_index: i32::MAX,
        };
        for vertex in params.points.iter() {
            surface.draw_marker(*vertex, &paint);
        }
    }
}
