//! Fixtures shared by the unit tests.

use crate::color::Color;
use crate::geometry::{AltitudeProperty, GeometryKind, PaintGeometry, PaintParam, PaintParams};
use crate::render::{LinePaint, MarkerPaint, PolygonPaint, Surface, TextPaint};
use crate::symbol::{Placement, Shadow, SymbolSet};
use crate::view::MapView;
use geopaint_types::cartesian::{Point2d, Rect, Size};
use geopaint_types::Path;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Routes `log` output of the code under test to the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Unpitched square view centered at the origin.
pub fn camera(size: f64, resolution: f64) -> MapView {
    MapView::new(Point2d::new(0.0, 0.0), resolution).with_size(Size::new(size, size))
}

/// Geometry with configurable data. Coordinates are used both as projected coordinates and model points, so
/// cameras in tests must use the default gl resolution of `1`.
pub struct TestGeometry {
    kind: GeometryKind,
    path: Path<Point2d>,
    extras: Vec<PaintParam>,
    simplification: Option<(f64, Path<Point2d>)>,
    altitude: Option<AltitudeProperty>,
    symbols: SymbolSet,
    revision: u64,
    symbol_revision: u64,
    smoothness: Option<f64>,
    redraw_when_pitch: bool,
    redraw_when_rotate: bool,
    paint_params_calls: Cell<usize>,
    render_points_calls: Cell<usize>,
}

impl TestGeometry {
    pub fn new(kind: GeometryKind, path: Path<Point2d>) -> Self {
        Self {
            kind,
            path,
            extras: vec![],
            simplification: None,
            altitude: None,
            symbols: SymbolSet::default(),
            revision: 0,
            symbol_revision: 0,
            smoothness: None,
            redraw_when_pitch: false,
            redraw_when_rotate: false,
            paint_params_calls: Cell::new(0),
            render_points_calls: Cell::new(0),
        }
    }

    pub fn point(point: Point2d) -> Self {
        Self::new(GeometryKind::Point, Path::Point(point))
    }

    pub fn line(points: Vec<Point2d>) -> Self {
        Self::new(GeometryKind::LineString, Path::Leaf(points))
    }

    pub fn polygon(rings: Vec<Vec<Point2d>>) -> Self {
        Self::new(GeometryKind::Polygon, Path::from_parts(rings))
    }

    pub fn with_symbols(mut self, json: &str) -> Self {
        self.symbols = SymbolSet::from_json(json).expect("valid symbol json");
        self
    }

    pub fn with_extras(mut self, extras: Vec<PaintParam>) -> Self {
        self.extras = extras;
        self
    }

    /// Returns `simplified` as the path for resolutions coarser than `threshold`.
    pub fn with_simplification(mut self, threshold: f64, simplified: Path<Point2d>) -> Self {
        self.simplification = Some((threshold, simplified));
        self
    }

    pub fn with_altitude(mut self, altitude: AltitudeProperty) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_smoothness(mut self, smoothness: f64) -> Self {
        self.smoothness = Some(smoothness);
        self
    }

    pub fn with_redraw_when_pitch(mut self) -> Self {
        self.redraw_when_pitch = true;
        self
    }

    pub fn with_redraw_when_rotate(mut self) -> Self {
        self.redraw_when_rotate = true;
        self
    }

    pub fn set_path(&mut self, path: Path<Point2d>) {
        self.path = path;
        self.revision += 1;
    }

    pub fn set_symbols(&mut self, json: &str) {
        self.symbols = SymbolSet::from_json(json).expect("valid symbol json");
        self.symbol_revision += 1;
    }

    pub fn paint_params_calls(&self) -> usize {
        self.paint_params_calls.get()
    }

    pub fn render_points_calls(&self) -> usize {
        self.render_points_calls.get()
    }

    fn vertices(&self) -> Vec<Point2d> {
        self.path.iter().copied().collect()
    }
}

impl PaintGeometry for TestGeometry {
    fn kind(&self) -> GeometryKind {
        self.kind
    }

    fn paint_params(&self, resolution: f64) -> Option<PaintParams> {
        self.paint_params_calls.set(self.paint_params_calls.get() + 1);
        if self.path.is_empty() {
            return None;
        }

        let params = match &self.simplification {
            Some((threshold, simplified)) if resolution > *threshold => {
                PaintParams::new(simplified.clone()).with_simplified(true)
            }
            _ => PaintParams::new(self.path.clone()),
        };
        Some(params.with_extras(self.extras.clone()))
    }

    fn extent(&self) -> Option<Rect> {
        self.path.bounding_rect()
    }

    fn center(&self) -> Point2d {
        self.extent()
            .map(|extent| extent.center())
            .unwrap_or_else(Point2d::origin)
    }

    fn altitude(&self) -> Option<&AltitudeProperty> {
        self.altitude.as_ref()
    }

    fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn symbol_revision(&self) -> u64 {
        self.symbol_revision
    }

    fn render_points(&self, placement: Placement) -> Vec<Point2d> {
        self.render_points_calls
            .set(self.render_points_calls.get() + 1);
        let vertices = self.vertices();
        match placement {
            Placement::Point | Placement::Vertex => vertices,
            Placement::Center => vec![self.center()],
            Placement::VertexFirst => vertices.first().copied().into_iter().collect(),
            Placement::VertexLast => vertices.last().copied().into_iter().collect(),
            Placement::Line => self
                .path
                .leaves()
                .iter()
                .flat_map(|part| {
                    part.windows(2)
                        .map(|w| Point2d::new((w[0].x + w[1].x) / 2.0, (w[0].y + w[1].y) / 2.0))
                })
                .collect(),
        }
    }

    fn smoothness(&self) -> Option<f64> {
        self.smoothness
    }

    fn redraw_when_pitch(&self) -> bool {
        self.redraw_when_pitch
    }

    fn redraw_when_rotate(&self) -> bool {
        self.redraw_when_rotate
    }
}

/// A call made to a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Shadow(Option<Shadow>),
    Stroke(Path<Point2d>, LinePaint),
    Fill(Path<Point2d>, PolygonPaint),
    Marker(Point2d, MarkerPaint),
    Text(Point2d, String, TextPaint),
    Rect(Rect, Color),
}

/// Surface that records the calls made to it. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Rc<RefCell<Vec<DrawCall>>>,
    size: Option<Size>,
}

impl RecordingSurface {
    pub fn with_size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.borrow().clone()
    }

    /// Recorded calls without the shadow changes.
    pub fn draws(&self) -> Vec<DrawCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, DrawCall::Shadow(_)))
            .collect()
    }

    fn record(&mut self, call: DrawCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Surface for RecordingSurface {
    fn set_shadow(&mut self, shadow: Option<&Shadow>) {
        self.record(DrawCall::Shadow(shadow.copied()));
    }

    fn stroke(&mut self, path: &Path<Point2d>, paint: &LinePaint) {
        self.record(DrawCall::Stroke(path.clone(), *paint));
    }

    fn fill(&mut self, path: &Path<Point2d>, paint: &PolygonPaint) {
        self.record(DrawCall::Fill(path.clone(), *paint));
    }

    fn draw_marker(&mut self, anchor: Point2d, paint: &MarkerPaint) {
        self.record(DrawCall::Marker(anchor, paint.clone()));
    }

    fn draw_text(&mut self, anchor: Point2d, text: &str, paint: &TextPaint) {
        self.record(DrawCall::Text(anchor, text.to_string(), paint.clone()));
    }

    fn stroke_rect(&mut self, rect: &Rect, color: Color) {
        self.record(DrawCall::Rect(*rect, color));
    }
}
