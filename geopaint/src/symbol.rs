//! Symbols describe how a geometry is drawn: stroke and fill of its path, markers at its anchor points and text
//! labels.
//!
//! Symbols are plain data, usually deserialized from JSON:
//!
//! ```json
//! { "lineColor": "#FF0000", "lineWidth": 4, "markerFile": "pin.png", "markerPlacement": "vertex-last" }
//! ```

use crate::color::Color;
use crate::error::GeopaintError;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Where markers of a symbol are placed on a geometry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// At the geometry coordinates (every point of a multipoint).
    #[default]
    Point,
    /// At the center of the geometry.
    Center,
    /// At every vertex.
    Vertex,
    /// At the first vertex.
    VertexFirst,
    /// At the last vertex.
    VertexLast,
    /// Along the line, in the middle of every segment.
    Line,
}

/// Shape of a vector marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    /// Ellipse inscribed into the marker box.
    Ellipse,
    /// Axis-aligned cross.
    Cross,
    /// Diagonal cross.
    X,
    /// Diamond.
    Diamond,
    /// Vertical bar anchored at its bottom.
    Bar,
    /// Square.
    Square,
    /// Rectangle.
    Rectangle,
    /// Triangle.
    Triangle,
    /// Pin anchored at its bottom tip.
    Pin,
}

impl MarkerType {
    /// Returns true if the anchor of the marker is in the middle of its bottom edge instead of its center.
    pub fn is_bottom_anchored(&self) -> bool {
        matches!(self, MarkerType::Bar | MarkerType::Pin)
    }
}

/// Styling of a single rendering pass over a geometry.
///
/// Every property is optional. Which properties are set decides which symbolizers are built for the symbol (see
/// [`SymbolizerKind`](crate::render::symbolizer::SymbolizerKind)).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Symbol {
    /// Stroke color of lines and polygon outlines.
    pub line_color: Option<Color>,
    /// Stroke width in pixels.
    pub line_width: Option<f64>,
    /// Stroke opacity.
    pub line_opacity: Option<f64>,
    /// Fill color of polygons.
    pub polygon_fill: Option<Color>,
    /// Fill opacity.
    pub polygon_opacity: Option<f64>,

    /// Image of an image marker.
    pub marker_file: Option<String>,
    /// Shape of a vector marker.
    pub marker_type: Option<MarkerType>,
    /// Fill color of a vector marker.
    pub marker_fill: Option<Color>,
    /// Outline color of a vector marker.
    pub marker_line_color: Option<Color>,
    /// Outline width of a vector marker.
    pub marker_line_width: Option<f64>,
    /// Marker width in pixels.
    pub marker_width: Option<f64>,
    /// Marker height in pixels.
    pub marker_height: Option<f64>,
    /// Horizontal offset of the marker in pixels.
    pub marker_dx: Option<f64>,
    /// Vertical offset of the marker in pixels.
    pub marker_dy: Option<f64>,
    /// Marker opacity.
    pub marker_opacity: Option<f64>,
    /// Anchors of the markers and labels.
    pub marker_placement: Option<Placement>,

    /// Label text.
    pub text_name: Option<String>,
    /// Font size in pixels.
    pub text_size: Option<f64>,
    /// Text color.
    pub text_fill: Option<Color>,
    /// Horizontal offset of the label in pixels.
    pub text_dx: Option<f64>,
    /// Vertical offset of the label in pixels.
    pub text_dy: Option<f64>,

    /// Blur radius of the shadow. Shadow is drawn only if it is positive.
    pub shadow_blur: Option<f64>,
    /// Color of the shadow.
    pub shadow_color: Option<Color>,
    /// Horizontal offset of the shadow.
    pub shadow_offset_x: Option<f64>,
    /// Vertical offset of the shadow.
    pub shadow_offset_y: Option<f64>,

    /// Opacity multiplier of everything drawn with the symbol.
    pub opacity: Option<f64>,
}

impl Symbol {
    /// Parses a symbol from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, GeopaintError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Shadow settings of the symbol, if the symbol has a shadow.
    pub fn shadow(&self) -> Option<Shadow> {
        let blur = self.shadow_blur.filter(|blur| *blur > 0.0)?;
        Some(Shadow {
            blur,
            color: self.shadow_color.unwrap_or(Color::BLACK),
            offset: Vector2::new(
                self.shadow_offset_x.unwrap_or_default(),
                self.shadow_offset_y.unwrap_or_default(),
            ),
        })
    }

    /// Opacity multiplier of the symbol.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }
}

/// One or more symbols of a geometry.
///
/// Symbols are drawn in order, so the last one ends up on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolSet {
    /// Single symbol.
    Single(Symbol),
    /// Composite symbol.
    Multiple(Vec<Symbol>),
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::Multiple(vec![])
    }
}

impl SymbolSet {
    /// Parses a symbol or an array of symbols from JSON.
    pub fn from_json(json: &str) -> Result<Self, GeopaintError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Symbols of the set in drawing order.
    pub fn symbols(&self) -> &[Symbol] {
        match self {
            SymbolSet::Single(symbol) => std::slice::from_ref(symbol),
            SymbolSet::Multiple(symbols) => symbols,
        }
    }
}

impl From<Symbol> for SymbolSet {
    fn from(value: Symbol) -> Self {
        Self::Single(value)
    }
}

/// Drop shadow applied to everything drawn with a symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Blur radius in pixels.
    pub blur: f64,
    /// Shadow color.
    pub color: Color,
    /// Offset of the shadow in pixels.
    pub offset: Vector2<f64>,
}
