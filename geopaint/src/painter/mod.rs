//! [`Painter`] draws a single geometry with its symbols onto a [`Surface`].
//!
//! For every paint the painter
//! 1. takes the paint params of the geometry from the [cache](params_cache) (or asks the geometry for new ones),
//! 2. converts the altitude of the geometry to model units ([`altitude`]),
//! 3. clips the path by the visible part of the map ([`viewport_clip`]) and by the altitude ceiling of the view
//!    ([`altitude_clip`]),
//! 4. transforms the clipped path into surface pixels ([`transform`]),
//! 5. runs the symbolizers of the geometry in order.
//!
//! Everything derived from the geometry is cached until the geometry revision, the symbol revision or the map
//! projection changes.

use crate::camera::Camera;
use crate::geometry::{GeometryKind, PaintGeometry};
use crate::render::symbolizer::{
    DebugSymbolizer, SymbolizeInput, Symbolizer, SymbolizerKind, TransformedParams,
};
use crate::render::Surface;
use crate::symbol::Placement;
use ahash::{HashMap, HashMapExt};
use geopaint_types::cartesian::{Point2d, Rect, Size};
use geopaint_types::Path;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub mod altitude;
pub mod altitude_clip;
mod extent_cache;
pub mod params_cache;
pub mod transform;
pub mod viewport_clip;

use altitude::{Altitude, AltitudeProjector};
use extent_cache::ExtentCache;
use params_cache::{CacheState, ParamsCache};
use transform::PointTransformer;
use viewport_clip::{ClipResult, ViewportClipper};

/// Line margin used when no symbol of the geometry sets the line width.
pub const DEFAULT_LINE_MARGIN: f64 = 4.0;

/// Settings of a painter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PainterOptions {
    /// Clip paths by the visible part of the map before transforming them.
    pub enable_clip: bool,
    /// Draw the extent and vertices of the geometry after its symbols.
    pub debug: bool,
    /// Pixels the clipping area is expanded by when no symbol sets the line width.
    pub default_line_margin: f64,
}

impl Default for PainterOptions {
    fn default() -> Self {
        Self {
            enable_clip: true,
            debug: false,
            default_line_margin: DEFAULT_LINE_MARGIN,
        }
    }
}

impl PainterOptions {
    /// Enables or disables clipping.
    pub fn with_clip(self, enable_clip: bool) -> Self {
        Self {
            enable_clip,
            ..self
        }
    }

    /// Enables or disables debug drawing.
    pub fn with_debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    /// Sets the default line margin.
    pub fn with_default_line_margin(self, default_line_margin: f64) -> Self {
        Self {
            default_line_margin,
            ..self
        }
    }
}

/// Result of [`Painter::paint`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PaintOutcome {
    /// The symbolizers were run.
    Painted,
    /// Nothing was drawn.
    Skipped(SkipReason),
}

/// Reason a paint was skipped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The painter is hidden.
    Hidden,
    /// No symbol of the geometry can be drawn.
    NoSymbolizers,
    /// No surface was given.
    NoSurface,
    /// The geometry is outside the visible extent.
    OutsideExtent,
    /// The whole geometry is above the view frustum.
    AboveFrustum,
}

/// Pre-rendered markers of a point geometry.
pub struct Sprite {
    /// Surface with the markers drawn on it.
    pub surface: Box<dyn Surface>,
    /// Size of the surface in pixels.
    pub size: Size,
    /// Offset of the surface center from the anchor point in pixels.
    pub offset: Vector2<f64>,
}

#[derive(Debug, Default)]
struct CacheTags {
    revision: u64,
    symbol_revision: u64,
    projection_code: Option<String>,
}

/// Draws a geometry.
///
/// The painter owns the geometry it paints. Changes made through [`Painter::geometry_mut`] are picked up on the
/// next call as long as the geometry increments its revisions.
pub struct Painter<G> {
    geometry: G,
    options: PainterOptions,
    symbolizers: Vec<Symbolizer>,
    debug_symbolizer: DebugSymbolizer,
    has_point_symbolizer: bool,
    visible: bool,
    z_index: i32,
    origin: Vector2<f64>,
    tags: CacheTags,
    params: ParamsCache,
    altitude: AltitudeProjector,
    extents: ExtentCache,
    render_points: HashMap<Placement, Vec<Point2d>>,
    sprite: Option<Sprite>,
}

impl<G: PaintGeometry> Painter<G> {
    /// Creates a painter for the geometry.
    pub fn new(geometry: G, options: PainterOptions) -> Self {
        let mut painter = Self {
            tags: CacheTags {
                revision: geometry.revision(),
                symbol_revision: geometry.symbol_revision(),
                projection_code: None,
            },
            geometry,
            options,
            symbolizers: vec![],
            debug_symbolizer: DebugSymbolizer,
            has_point_symbolizer: false,
            visible: true,
            z_index: 0,
            origin: Vector2::zeros(),
            params: ParamsCache::default(),
            altitude: AltitudeProjector::default(),
            extents: ExtentCache::default(),
            render_points: HashMap::new(),
            sprite: None,
        };
        painter.refresh_symbol();
        painter
    }

    /// The painted geometry.
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable access to the painted geometry.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// Consumes the painter, returning the geometry.
    pub fn into_geometry(self) -> G {
        self.geometry
    }

    /// Painter settings.
    pub fn options(&self) -> &PainterOptions {
        &self.options
    }

    /// Symbolizers in the order they are stored. They are run in the reverse order.
    pub fn symbolizers(&self) -> &[Symbolizer] {
        &self.symbolizers
    }

    /// Returns true if any symbolizer draws markers.
    pub fn has_point_symbolizer(&self) -> bool {
        self.has_point_symbolizer
    }

    /// Which paint params snapshot the last paint used.
    pub fn params_cache_state(&self) -> CacheState {
        self.params.state()
    }

    /// Rebuilds the symbolizers from the current symbols of the geometry.
    pub fn refresh_symbol(&mut self) {
        self.symbolizers = create_symbolizers(&self.geometry);
        for symbolizer in &mut self.symbolizers {
            symbolizer.set_z_index(self.z_index);
        }
        self.has_point_symbolizer = self.symbolizers.iter().any(|s| s.kind().is_marker());
        log::debug!("Created {} symbolizers", self.symbolizers.len());
        self.extents.clear_marker_extent();
        self.sprite = None;
        self.tags.symbol_revision = self.geometry.symbol_revision();
    }

    /// Drops caches that were computed for a previous state of the geometry or the map.
    fn validate(&mut self, camera: Option<&dyn Camera>) {
        if self.geometry.symbol_revision() != self.tags.symbol_revision {
            self.refresh_symbol();
        }

        let revision = self.geometry.revision();
        let projection = camera.map(|c| c.projection_code());
        let projection_changed = match (&self.tags.projection_code, projection) {
            (Some(last), Some(current)) => last != current,
            _ => false,
        };

        if revision != self.tags.revision || projection_changed {
            log::trace!("Geometry revision or projection changed, dropping painter caches");
            self.remove_cache();
            self.tags.revision = revision;
        }

        if let Some(current) = projection {
            if self.tags.projection_code.as_deref() != Some(current) {
                self.tags.projection_code = Some(current.to_string());
            }
        }
    }

    /// Paint params of the geometry transformed into surface pixels.
    ///
    /// Returns `None` if the geometry has nothing to paint or the map container has no size.
    pub fn paint_params(
        &mut self,
        camera: &dyn Camera,
        dx: f64,
        dy: f64,
        ignore_altitude: bool,
    ) -> Option<TransformedParams> {
        self.validate(Some(camera));
        self.transformed_params(camera, dx, dy, ignore_altitude)
    }

    fn transformed_params(
        &mut self,
        camera: &dyn Camera,
        dx: f64,
        dy: f64,
        ignore_altitude: bool,
    ) -> Option<TransformedParams> {
        let params = self.params.select(
            &self.geometry,
            camera.resolution(),
            camera.pitch(),
            camera.bearing(),
        )?;
        let container_extent = camera.container_extent()?;
        let extent_2d = self.cached_extent_2d(camera);
        self.project_altitude(Some(camera));

        let zero = Altitude::default();
        let altitude = if ignore_altitude {
            &zero
        } else {
            self.altitude.value()
        };

        let transformer = PointTransformer::new(camera, self.origin).with_offset(dx, dy);
        let points = match &params.path {
            Path::Point(point) => Path::Point(transformer.transform(point, altitude.first())),
            path => match self.clip(camera, path, altitude, extent_2d.as_ref(), &container_extent) {
                Some(clipped) => transformer.transform_path(&clipped.points, &clipped.altitude),
                None => transformer.transform_path(path, altitude),
            },
        };

        let gl_scale = camera.gl_scale();
        Some(TransformedParams {
            points,
            extras: params
                .extras
                .iter()
                .map(|param| param.to_surface(gl_scale))
                .collect(),
        })
    }

    fn clip(
        &self,
        camera: &dyn Camera,
        path: &Path<Point2d>,
        altitude: &Altitude,
        extent_2d: Option<&Rect>,
        container_extent: &Rect,
    ) -> Option<ClipResult> {
        if !self.options.enable_clip || self.geometry.smoothness().is_some() {
            return None;
        }

        let clipper = ViewportClipper::new(camera, self.line_margin());
        let view_extent = clipper.expanded_extent(container_extent, altitude)?;
        let frustum_altitude = camera.frustum_altitude();
        let ceiling = (altitude.is_per_vertex() && self.altitude.max() > frustum_altitude)
            .then_some(frustum_altitude);

        Some(clipper.clip(
            self.geometry.kind(),
            extent_2d,
            path,
            altitude,
            &view_extent,
            ceiling,
        ))
    }

    /// Clip margin in pixels: the widest line width set by a symbol, or the default margin.
    fn line_margin(&self) -> f64 {
        self.symbolizers
            .iter()
            .filter(|s| s.kind() == SymbolizerKind::StrokeAndFill)
            .filter_map(|s| s.symbol().line_width)
            .reduce(f64::max)
            .unwrap_or(self.options.default_line_margin)
    }

    fn max_line_width(&self) -> Option<f64> {
        self.symbolizers
            .iter()
            .filter_map(|s| s.line_width())
            .reduce(f64::max)
    }

    /// Anchor points of the markers with the given placement, in model points.
    pub fn render_points(&mut self, placement: Placement) -> &[Point2d] {
        self.validate(None);
        let geometry = &self.geometry;
        self.render_points
            .entry(placement)
            .or_insert_with(|| geometry.render_points(placement))
    }

    fn project_altitude(&mut self, camera: Option<&dyn Camera>) {
        let center = self.geometry.center();
        self.altitude
            .project(camera, &center, self.geometry.altitude());
    }

    /// Altitude of the geometry in model units. Without a camera the altitude is `0`.
    pub fn altitude(&mut self, camera: Option<&dyn Camera>) -> &Altitude {
        self.validate(camera);
        self.project_altitude(camera);
        self.altitude.value()
    }

    /// Minimum altitude of the geometry in model units.
    pub fn min_altitude(&mut self, camera: Option<&dyn Camera>) -> f64 {
        self.validate(camera);
        self.project_altitude(camera);
        self.altitude.min()
    }

    /// Maximum altitude of the geometry in model units.
    pub fn max_altitude(&mut self, camera: Option<&dyn Camera>) -> f64 {
        self.validate(camera);
        self.project_altitude(camera);
        self.altitude.max()
    }

    /// Extent of the geometry in model points.
    pub fn extent_2d(&mut self, camera: &dyn Camera) -> Option<Rect> {
        self.validate(Some(camera));
        self.cached_extent_2d(camera)
    }

    fn cached_extent_2d(&mut self, camera: &dyn Camera) -> Option<Rect> {
        let geometry = &self.geometry;
        self.extents
            .extent_2d(camera.zoom(), camera.projection_code(), || geometry.extent())
    }

    /// Union of the marker footprints relative to the anchor, in pixels.
    pub fn marker_extent(&mut self) -> Option<Rect> {
        self.validate(None);
        self.cached_marker_extent()
    }

    fn cached_marker_extent(&mut self) -> Option<Rect> {
        let symbolizers = &self.symbolizers;
        self.extents
            .marker_extent(|| Rect::merge_all(symbolizers.iter().filter_map(|s| s.fixed_extent())))
    }

    /// Extent of everything the painter draws, in container pixels.
    ///
    /// Includes the altitude of the geometry, the width of its strokes and the footprint of its markers.
    pub fn container_extent(&mut self, camera: &dyn Camera) -> Option<Rect> {
        self.validate(Some(camera));
        self.compute_container_extent(camera)
    }

    fn compute_container_extent(&mut self, camera: &dyn Camera) -> Option<Rect> {
        let extent_2d = self.cached_extent_2d(camera)?;
        self.project_altitude(Some(camera));
        let (min, max) = (self.altitude.min(), self.altitude.max());

        let transformer = PointTransformer::new(camera, Vector2::zeros());
        let corners: Vec<Point2d> = extent_2d
            .into_quadrangle()
            .iter()
            .flat_map(|corner| [transformer.transform(corner, min), transformer.transform(corner, max)])
            .collect();
        let mut extent = Rect::from_points(corners.iter())?;

        if let Some(width) = self.max_line_width() {
            extent = extent.expand(width / 2.0);
        }
        if let Some(marker_extent) = self.cached_marker_extent() {
            extent = extent.merge(extent.outset_by(&marker_extent));
        }

        Some(extent)
    }

    fn marker_anchors(&mut self, camera: &dyn Camera, placement: Placement) -> Vec<Point2d> {
        self.project_altitude(Some(camera));
        let geometry = &self.geometry;
        let points = self
            .render_points
            .entry(placement)
            .or_insert_with(|| geometry.render_points(placement));
        let altitudes = self
            .altitude
            .value()
            .anchor_altitudes(placement, points.len());
        let transformer = PointTransformer::new(camera, self.origin);
        points
            .iter()
            .zip(altitudes)
            .map(|(point, altitude)| transformer.transform(point, altitude))
            .collect()
    }

    /// Paints the geometry onto the surface.
    ///
    /// * `visible_extent` - container extent of the visible area. Geometries outside of it are not painted.
    /// * `origin` - position of the surface in container pixels. Kept for following calls if given.
    pub fn paint(
        &mut self,
        camera: &dyn Camera,
        surface: Option<&mut dyn Surface>,
        visible_extent: Option<&Rect>,
        origin: Option<Vector2<f64>>,
    ) -> PaintOutcome {
        self.validate(Some(camera));
        match self.paint_inner(camera, surface, visible_extent, origin) {
            Ok(()) => PaintOutcome::Painted,
            Err(reason) => {
                log::trace!("Geometry is not painted: {reason:?}");
                PaintOutcome::Skipped(reason)
            }
        }
    }

    fn paint_inner(
        &mut self,
        camera: &dyn Camera,
        surface: Option<&mut dyn Surface>,
        visible_extent: Option<&Rect>,
        origin: Option<Vector2<f64>>,
    ) -> Result<(), SkipReason> {
        if !self.visible {
            return Err(SkipReason::Hidden);
        }
        if self.symbolizers.is_empty() {
            return Err(SkipReason::NoSymbolizers);
        }
        let surface = surface.ok_or(SkipReason::NoSurface)?;

        if let Some(visible_extent) = visible_extent {
            let extent = self.compute_container_extent(camera);
            if !extent.is_some_and(|extent| extent.intersects(visible_extent)) {
                return Err(SkipReason::OutsideExtent);
            }
        }

        self.project_altitude(Some(camera));
        let min_altitude = self.altitude.min();
        if min_altitude != 0.0 && camera.frustum_altitude() < min_altitude {
            return Err(SkipReason::AboveFrustum);
        }

        if let Some(origin) = origin {
            self.origin = origin;
        }

        let params = if self.geometry.paint_as_path() {
            self.transformed_params(camera, 0.0, 0.0, false)
        } else {
            None
        };

        let placements: Vec<Option<Placement>> = self
            .symbolizers
            .iter()
            .map(|s| s.kind().is_marker().then(|| s.placement()))
            .collect();
        let anchors: Vec<Vec<Point2d>> = placements
            .into_iter()
            .map(|placement| match placement {
                Some(placement) => self.marker_anchors(camera, placement),
                None => vec![],
            })
            .collect();

        surface.set_shadow(None);
        for (symbolizer, anchors) in self.symbolizers.iter().zip(anchors.iter()).rev() {
            let shadow = symbolizer.symbol().shadow();
            surface.set_shadow(shadow.as_ref());
            symbolizer.symbolize(
                surface,
                &SymbolizeInput {
                    params: params.as_ref(),
                    anchors,
                },
            );
        }
        surface.set_shadow(None);

        if self.options.debug {
            let extent = self.compute_container_extent(camera);
            self.debug_symbolizer
                .symbolize(surface, extent.as_ref(), params.as_ref());
        }

        Ok(())
    }

    /// Returns the markers of a point geometry drawn onto a separate surface, creating it on the first call.
    ///
    /// Returns `None` for other geometries and for geometries without markers.
    pub fn sprite(
        &mut self,
        create_surface: impl FnOnce(Size) -> Box<dyn Surface>,
    ) -> Option<&Sprite> {
        self.validate(None);
        if self.geometry.kind() != GeometryKind::Point {
            return None;
        }

        if self.sprite.is_none() {
            let extent = self.cached_marker_extent()?;
            let size = Size::new(extent.width(), extent.height());
            let anchor = [Point2d::new(-extent.x_min, -extent.y_min)];

            let mut surface = create_surface(size);
            for symbolizer in self.symbolizers.iter().rev() {
                if !symbolizer.kind().is_marker() {
                    continue;
                }

                let shadow = symbolizer.symbol().shadow();
                surface.set_shadow(shadow.as_ref());
                symbolizer.symbolize(
                    surface.as_mut(),
                    &SymbolizeInput {
                        params: None,
                        anchors: &anchor,
                    },
                );
            }
            surface.set_shadow(None);

            log::debug!(
                "Created sprite of size {}x{}",
                size.width(),
                size.height()
            );
            let center = extent.center();
            self.sprite = Some(Sprite {
                surface,
                size,
                offset: Vector2::new(center.x, center.y),
            });
        }

        self.sprite.as_ref()
    }

    /// Makes the painter draw on the following paints.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Makes the painter skip the following paints.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Returns false if the painter is hidden.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sets the z-index of the markers drawn by the painter.
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
        for symbolizer in &mut self.symbolizers {
            symbolizer.set_z_index(z_index);
        }
    }

    /// Drops everything cached for the geometry.
    pub fn remove_cache(&mut self) {
        self.render_points.clear();
        self.params.clear();
        self.altitude.reset();
        self.extents.clear();
        self.sprite = None;
    }

    /// Drops the caches and the symbolizers. The painter draws nothing until
    /// [`refresh_symbol`](Painter::refresh_symbol) is called.
    pub fn remove(&mut self) {
        self.remove_cache();
        self.symbolizers.clear();
        self.has_point_symbolizer = false;
    }
}

fn create_symbolizers<G: PaintGeometry + ?Sized>(geometry: &G) -> Vec<Symbolizer> {
    let kind = geometry.kind();
    let symbols = geometry.symbols().symbols();

    // Stored in reverse: symbolizers are run from the last one, so the first symbol is drawn first and labels end
    // up on top.
    let mut symbolizers = vec![];
    for symbol in symbols.iter().rev() {
        for symbolizer_kind in SymbolizerKind::PRIORITY.iter().rev() {
            if symbolizer_kind.matches(symbol, kind) {
                symbolizers.push(Symbolizer::new(*symbolizer_kind, symbol.clone(), kind));
            }
        }
    }

    if symbolizers.is_empty() && !symbols.is_empty() {
        log::warn!(
            "Invalid symbol for {kind:?} geometry: {}",
            serde_json::to_string(geometry.symbols()).unwrap_or_default()
        );
    }

    symbolizers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AltitudeProperty, PaintParam};
    use crate::render::MarkerShape;
    use crate::tests::{camera, init_logger, DrawCall, RecordingSurface, TestGeometry};
    use crate::Color;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn p(x: f64, y: f64) -> Point2d {
        Point2d::new(x, y)
    }

    fn corner_line() -> TestGeometry {
        TestGeometry::line(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)])
            .with_symbols(r##"{"lineColor": "#0000FF", "lineWidth": 4}"##)
            .with_extras(vec![PaintParam::Number(4.0), PaintParam::Angle(1.0)])
    }

    fn painter(geometry: TestGeometry) -> Painter<TestGeometry> {
        Painter::new(geometry, PainterOptions::default())
    }

    #[test]
    fn line_inside_viewport_is_not_clipped() {
        // 400 px at 0.5 units per pixel: the view covers (-100, -100)-(100, 100)
        let camera = camera(400.0, 0.5);
        let mut painter = painter(corner_line());

        let params = painter.paint_params(&camera, 0.0, 0.0, false).unwrap();
        assert_eq!(params.points.vertex_count(), 3);
        assert_eq!(
            params.points,
            Path::Leaf(vec![p(200.0, 200.0), p(220.0, 200.0), p(220.0, 180.0)])
        );
        assert_eq!(
            params.extras,
            vec![PaintParam::Number(8.0), PaintParam::Angle(1.0)]
        );
    }

    #[test]
    fn line_crossing_viewport_is_clipped() {
        // 20 px at 0.5 units per pixel: the view covers (-5, -5)-(5, 5)
        let camera = camera(20.0, 0.5);
        let mut painter = painter(corner_line());

        let params = painter.paint_params(&camera, 0.0, 0.0, false).unwrap();
        let Path::Group(parts) = &params.points else {
            panic!("clipped line must be a group of parts");
        };
        assert_eq!(parts.len(), 1);

        let originals = [p(10.0, 10.0), p(30.0, 10.0), p(30.0, -10.0)];
        let last = params.points.last().unwrap();
        assert!(originals.iter().all(|o| (o - last).norm() > 1e-6));
        // 4 px line margin is 2 units beyond the view border
        assert_abs_diff_eq!(*last, p(24.0, 10.0), epsilon = 1e-6);
        assert_eq!(params.points.first(), Some(&p(10.0, 10.0)));
    }

    #[test]
    fn margin_comes_from_numeric_line_width() {
        let camera = camera(20.0, 0.5);
        let last_clipped = |symbols: &str| {
            let geometry =
                TestGeometry::line(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]).with_symbols(symbols);
            let params = painter(geometry)
                .paint_params(&camera, 0.0, 0.0, false)
                .unwrap();
            *params.points.last().unwrap()
        };

        // a symbol without line width keeps the default 4 px margin
        assert_abs_diff_eq!(
            last_clipped(r##"{"lineColor": "#0000FF"}"##),
            p(24.0, 10.0),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            last_clipped(r##"[{"lineColor": "#0000FF"}, {"lineWidth": 8}]"##),
            p(28.0, 10.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn clipping_can_be_disabled() {
        let camera = camera(20.0, 0.5);
        let mut unclipped = Painter::new(corner_line(), PainterOptions::default().with_clip(false));
        let params = unclipped.paint_params(&camera, 0.0, 0.0, false).unwrap();
        assert_eq!(params.points.vertex_count(), 3);

        let mut smooth = painter(corner_line().with_smoothness(0.5));
        let params = smooth.paint_params(&camera, 0.0, 0.0, false).unwrap();
        assert_matches!(params.points, Path::Leaf(_));
    }

    #[test]
    fn paint_params_are_cached() {
        let camera = camera(400.0, 0.5);
        let mut painter = painter(corner_line());

        let first = painter.paint_params(&camera, 1.0, 2.0, false);
        let second = painter.paint_params(&camera, 1.0, 2.0, false);
        assert_eq!(first, second);
        assert_eq!(painter.geometry().paint_params_calls(), 1);
        assert_eq!(painter.params_cache_state(), CacheState::Complete);
    }

    #[test]
    fn geometry_change_drops_caches() {
        let camera = camera(400.0, 0.5);
        let mut painter = painter(corner_line());
        painter.paint_params(&camera, 0.0, 0.0, false);

        painter
            .geometry_mut()
            .set_path(Path::Leaf(vec![p(0.0, 0.0), p(-10.0, 0.0)]));
        let params = painter.paint_params(&camera, 0.0, 0.0, false).unwrap();
        assert_eq!(
            params.points,
            Path::Leaf(vec![p(200.0, 200.0), p(180.0, 200.0)])
        );
        assert_eq!(painter.geometry().paint_params_calls(), 2);
        assert_eq!(
            painter.extent_2d(&camera),
            Some(Rect::new(-10.0, 0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn projection_change_drops_caches() {
        let camera = camera(400.0, 0.5);
        let mut painter = painter(corner_line());
        painter.paint_params(&camera, 0.0, 0.0, false);
        painter.paint_params(&camera.with_projection_code("EPSG:4326"), 0.0, 0.0, false);
        assert_eq!(painter.geometry().paint_params_calls(), 2);
    }

    #[test]
    fn zooming_in_uses_complete_params() {
        let simplified = Path::Leaf(vec![p(0.0, 0.0), p(10.0, 10.0)]);
        let mut painter = painter(corner_line().with_simplification(1.0, simplified));

        let detailed = painter
            .paint_params(&camera(400.0, 0.5), 0.0, 0.0, false)
            .unwrap();
        assert_eq!(detailed.points.vertex_count(), 3);

        let coarse = painter
            .paint_params(&camera(400.0, 2.0), 0.0, 0.0, false)
            .unwrap();
        assert_eq!(coarse.points.vertex_count(), 2);

        let zoomed_in = painter
            .paint_params(&camera(400.0, 0.25), 0.0, 0.0, false)
            .unwrap();
        assert_eq!(zoomed_in.points.vertex_count(), 3);
        assert_eq!(painter.params_cache_state(), CacheState::Complete);
        assert_eq!(painter.geometry().paint_params_calls(), 2);
    }

    #[test]
    fn altitude_above_ceiling_is_flattened() {
        // unpitched 100 px view has the frustum ceiling at 50 units
        let camera = camera(100.0, 1.0);
        let geometry = TestGeometry::line(vec![p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0)])
            .with_symbols(r##"{"lineColor": "#0000FF"}"##)
            .with_altitude(AltitudeProperty::PerVertex(Path::Leaf(vec![0.0, 100.0, 0.0])));
        let mut painter = painter(geometry);

        assert_eq!(painter.max_altitude(Some(&camera)), 100.0);
        assert_eq!(painter.min_altitude(Some(&camera)), 0.0);

        let params = painter.paint_params(&camera, 0.0, 0.0, false).unwrap();
        assert_eq!(params.points.vertex_count(), 5);

        let flat = painter.paint_params(&camera, 0.0, 0.0, true).unwrap();
        assert_eq!(
            flat.points,
            Path::Leaf(vec![p(50.0, 50.0), p(60.0, 50.0), p(70.0, 50.0)])
        );
    }

    #[test]
    fn altitude_without_camera_is_zero() {
        let geometry = corner_line().with_altitude(AltitudeProperty::Length(10.0));
        let mut painter = painter(geometry);
        assert_matches!(painter.altitude(None), Altitude::Scalar(v) if *v == 0.0);
        assert_matches!(painter.altitude(Some(&camera(100.0, 1.0))), Altitude::Scalar(v) if *v == 10.0);
    }

    #[test]
    fn mismatched_altitude_is_ignored() {
        init_logger();
        let camera = camera(400.0, 0.5);
        let geometry = corner_line()
            .with_altitude(AltitudeProperty::PerVertex(Path::Leaf(vec![1.0, 2.0])));
        let mut painter = painter(geometry);

        let params = painter.paint_params(&camera, 0.0, 0.0, false).unwrap();
        let flat = painter.paint_params(&camera, 0.0, 0.0, true).unwrap();
        assert_eq!(params, flat);
    }

    #[test]
    fn symbolizers_run_in_symbol_order() {
        let geometry = corner_line().with_symbols(
            r##"[{"lineColor": "#FF0000", "markerType": "ellipse", "textName": "a"}, {"textName": "b"}]"##,
        );
        let mut painter = painter(geometry);
        assert_eq!(painter.symbolizers().len(), 4);
        assert!(painter.has_point_symbolizer());

        let mut surface = RecordingSurface::default();
        let outcome = painter.paint(&camera(400.0, 0.5), Some(&mut surface), None, None);
        assert_eq!(outcome, PaintOutcome::Painted);

        let draws = surface.draws();
        assert_eq!(draws.len(), 4);
        assert_matches!(&draws[0], DrawCall::Stroke(_, paint) if paint.color == Color::RED);
        assert_matches!(&draws[1], DrawCall::Marker(_, _));
        assert_matches!(&draws[2], DrawCall::Text(_, text, _) if text == "a");
        assert_matches!(&draws[3], DrawCall::Text(anchor, text, _) if text == "b" && *anchor == p(210.0, 190.0));
    }

    #[test]
    fn invalid_symbol_has_no_symbolizers() {
        init_logger();
        let geometry = TestGeometry::point(p(0.0, 0.0)).with_symbols(r##"{"lineColor": "#FF0000"}"##);
        let mut painter = painter(geometry);
        assert!(painter.symbolizers().is_empty());

        let mut surface = RecordingSurface::default();
        assert_eq!(
            painter.paint(&camera(100.0, 1.0), Some(&mut surface), None, None),
            PaintOutcome::Skipped(SkipReason::NoSymbolizers)
        );
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn paint_skip_reasons() {
        let camera = camera(100.0, 1.0);
        let mut painter = painter(corner_line());
        assert_eq!(
            painter.paint(&camera, None, None, None),
            PaintOutcome::Skipped(SkipReason::NoSurface)
        );

        let mut surface = RecordingSurface::default();
        let far_away = Rect::new(1000.0, 1000.0, 1100.0, 1100.0);
        assert_eq!(
            painter.paint(&camera, Some(&mut surface), Some(&far_away), None),
            PaintOutcome::Skipped(SkipReason::OutsideExtent)
        );

        let visible = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            painter.paint(&camera, Some(&mut surface), Some(&visible), None),
            PaintOutcome::Painted
        );

        painter.hide();
        assert!(!painter.is_visible());
        assert_eq!(
            painter.paint(&camera, Some(&mut surface), None, None),
            PaintOutcome::Skipped(SkipReason::Hidden)
        );
        painter.show();
        assert_eq!(
            painter.paint(&camera, Some(&mut surface), None, None),
            PaintOutcome::Painted
        );
    }

    #[test]
    fn geometry_above_frustum_is_skipped() {
        let camera = camera(100.0, 1.0);
        let geometry = corner_line().with_altitude(AltitudeProperty::Length(1000.0));
        let mut painter = painter(geometry);
        let mut surface = RecordingSurface::default();

        assert_eq!(
            painter.paint(&camera, Some(&mut surface), None, None),
            PaintOutcome::Skipped(SkipReason::AboveFrustum)
        );
    }

    #[test]
    fn shadow_is_set_for_each_symbolizer() {
        let geometry = corner_line().with_symbols(
            r##"[{"lineWidth": 2, "shadowBlur": 3, "shadowColor": "#FF0000"}, {"lineWidth": 1}]"##,
        );
        let mut painter = painter(geometry);
        let mut surface = RecordingSurface::default();
        painter.paint(&camera(100.0, 1.0), Some(&mut surface), None, None);

        let calls = surface.calls();
        assert_eq!(calls.len(), 6);
        assert_matches!(&calls[0], DrawCall::Shadow(None));
        assert_matches!(&calls[1], DrawCall::Shadow(Some(shadow)) if shadow.blur == 3.0 && shadow.color == Color::RED);
        assert_matches!(&calls[2], DrawCall::Stroke(_, paint) if paint.width == 2.0);
        assert_matches!(&calls[3], DrawCall::Shadow(None));
        assert_matches!(&calls[4], DrawCall::Stroke(_, paint) if paint.width == 1.0);
        assert_matches!(&calls[5], DrawCall::Shadow(None));
    }

    #[test]
    fn debug_overlay_is_drawn_last() {
        let mut painter = Painter::new(corner_line(), PainterOptions::default().with_debug(true));
        let mut surface = RecordingSurface::default();
        painter.paint(&camera(400.0, 0.5), Some(&mut surface), None, None);

        let draws = surface.draws();
        assert_matches!(&draws[0], DrawCall::Stroke(..));
        assert_matches!(&draws[1], DrawCall::Rect(_, color) if *color == Color::RED);
        assert_eq!(draws.len(), 5);
    }

    #[test]
    fn origin_moves_surface_points() {
        let camera = camera(400.0, 0.5);
        let mut painter = painter(corner_line());
        let mut surface = RecordingSurface::default();
        painter.paint(&camera, Some(&mut surface), None, Some(Vector2::new(200.0, 100.0)));

        assert_matches!(
            &surface.draws()[0],
            DrawCall::Stroke(path, _) if path.first() == Some(&p(0.0, 100.0))
        );

        let params = painter.paint_params(&camera, 0.0, 0.0, false).unwrap();
        assert_eq!(params.points.first(), Some(&p(0.0, 100.0)));
    }

    #[test]
    fn container_extent_includes_stroke_and_markers() {
        let camera = camera(400.0, 0.5);
        let mut line = painter(corner_line());
        assert_eq!(
            line.container_extent(&camera),
            Some(Rect::new(198.0, 178.0, 222.0, 202.0))
        );

        let marker = TestGeometry::point(p(0.0, 0.0))
            .with_symbols(r#"{"markerFile": "pin.png", "markerWidth": 20, "markerHeight": 30}"#);
        let mut marker = painter(marker);
        assert_eq!(
            marker.marker_extent(),
            Some(Rect::new(-10.0, -30.0, 10.0, 0.0))
        );
        assert_eq!(
            marker.container_extent(&camera),
            Some(Rect::new(190.0, 170.0, 210.0, 200.0))
        );
    }

    #[test]
    fn markers_are_drawn_at_render_points() {
        let geometry = corner_line()
            .with_symbols(r#"{"markerType": "square", "markerPlacement": "vertex"}"#);
        let mut painter = painter(geometry);
        let camera = camera(400.0, 0.5);
        let mut surface = RecordingSurface::default();
        painter.paint(&camera, Some(&mut surface), None, None);
        painter.paint(&camera, Some(&mut surface), None, None);

        let anchors: Vec<Point2d> = surface
            .draws()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Marker(anchor, _) => Some(*anchor),
                _ => None,
            })
            .collect();
        assert_eq!(anchors.len(), 6);
        assert_eq!(anchors[2], p(220.0, 180.0));
        assert_eq!(painter.geometry().render_points_calls(), 1);
        assert_eq!(painter.render_points(Placement::Vertex).len(), 3);
        assert_eq!(painter.geometry().render_points_calls(), 1);
    }

    #[test]
    fn marker_anchors_follow_vertex_altitudes() {
        let camera = camera(100.0, 1.0).with_rotation_x(0.5);
        let cases = [
            ("vertex", vec![(p(0.0, 0.0), 0.0), (p(10.0, 0.0), 10.0), (p(10.0, 10.0), 30.0)]),
            ("vertex-first", vec![(p(0.0, 0.0), 0.0)]),
            ("vertex-last", vec![(p(10.0, 10.0), 30.0)]),
            ("line", vec![(p(5.0, 0.0), 5.0), (p(10.0, 5.0), 20.0)]),
            ("center", vec![(p(5.0, 5.0), 40.0 / 3.0)]),
        ];

        for (placement, expected) in cases {
            let geometry = TestGeometry::line(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)])
                .with_symbols(&format!(
                    r#"{{"markerType": "square", "markerPlacement": "{placement}"}}"#
                ))
                .with_altitude(AltitudeProperty::PerVertex(Path::Leaf(vec![0.0, 10.0, 30.0])));
            let mut painter = painter(geometry);
            let mut surface = RecordingSurface::default();
            painter.paint(&camera, Some(&mut surface), None, None);

            let anchors: Vec<Point2d> = surface
                .draws()
                .into_iter()
                .filter_map(|call| match call {
                    DrawCall::Marker(anchor, _) => Some(anchor),
                    _ => None,
                })
                .collect();
            assert_eq!(anchors.len(), expected.len(), "{placement}");
            for (anchor, (point, altitude)) in anchors.iter().zip(&expected) {
                assert_abs_diff_eq!(
                    *anchor,
                    camera.point_to_container(point, *altitude),
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn sprite_of_point_markers() {
        let geometry = TestGeometry::point(p(5.0, 5.0)).with_symbols(
            r#"[{"markerFile": "pin.png", "markerWidth": 20, "markerHeight": 30}, {"lineWidth": 3}]"#,
        );
        let mut painter = painter(geometry);

        let mut record = None;
        let sprite = painter
            .sprite(|size| {
                let surface = RecordingSurface::with_size(size);
                record = Some(surface.clone());
                Box::new(surface)
            })
            .unwrap();
        assert_eq!(sprite.size, Size::new(20.0, 30.0));
        assert_eq!(sprite.offset, Vector2::new(0.0, -15.0));

        let record = record.unwrap();
        assert_eq!(record.size(), Some(Size::new(20.0, 30.0)));

        let draws = record.draws();
        assert_eq!(draws.len(), 1);
        assert_matches!(
            &draws[0],
            DrawCall::Marker(anchor, paint)
                if *anchor == p(10.0, 30.0) && paint.shape == MarkerShape::Image("pin.png".to_string())
        );
        assert_eq!(painter.geometry().render_points_calls(), 0);

        assert!(painter
            .sprite(|_| panic!("sprite must be reused"))
            .is_some());
    }

    #[test]
    fn polygon_is_clipped_and_filled() {
        let camera = camera(400.0, 0.5);
        let geometry = TestGeometry::polygon(vec![
            vec![p(-200.0, -50.0), p(50.0, -50.0), p(50.0, 50.0), p(-200.0, 50.0)],
            vec![p(-190.0, -10.0), p(-180.0, -10.0), p(-180.0, 10.0)],
        ])
        .with_symbols(r##"{"polygonFill": "#00FF00"}"##);
        let mut painter = painter(geometry);

        let mut surface = RecordingSurface::default();
        painter.paint(&camera, Some(&mut surface), None, None);

        let draws = surface.draws();
        assert_eq!(draws.len(), 1);
        let DrawCall::Fill(Path::Group(rings), _) = &draws[0] else {
            panic!("polygon must be filled as a group of rings");
        };
        assert_eq!(rings.len(), 1);

        // default line margin of 4 px expands the clip area to x = -102
        let bbox = rings[0].bounding_rect().unwrap();
        assert_abs_diff_eq!(bbox.x_min, -4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.x_max, 300.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.y_min, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.y_max, 300.0, epsilon = 1e-6);
    }

    #[test]
    fn sprite_requires_point_geometry() {
        let geometry = corner_line().with_symbols(r#"{"markerFile": "pin.png"}"#);
        let mut painter = painter(geometry);
        assert!(painter
            .sprite(|_| Box::new(RecordingSurface::default()))
            .is_none());
    }

    #[test]
    fn symbol_change_rebuilds_symbolizers() {
        let mut painter = painter(corner_line());
        painter.set_z_index(3);
        assert_eq!(painter.symbolizers().len(), 1);

        painter
            .geometry_mut()
            .set_symbols(r#"[{"lineWidth": 1}, {"markerType": "x", "textName": "label"}]"#);
        let camera = camera(400.0, 0.5);
        let mut surface = RecordingSurface::default();
        painter.paint(&camera, Some(&mut surface), None, None);

        assert_eq!(painter.symbolizers().len(), 3);
        assert!(painter.symbolizers().iter().all(|s| s.z_index() == 3));
        let draws = surface.draws();
        assert_matches!(&draws[2], DrawCall::Text(_, _, paint) if paint.z_index == 3);
    }

    #[test]
    fn removed_painter_draws_nothing() {
        let mut painter = painter(corner_line());
        painter.remove();
        let mut surface = RecordingSurface::default();
        assert_eq!(
            painter.paint(&camera(100.0, 1.0), Some(&mut surface), None, None),
            PaintOutcome::Skipped(SkipReason::NoSymbolizers)
        );

        painter.refresh_symbol();
        assert_eq!(
            painter.paint(&camera(100.0, 1.0), Some(&mut surface), None, None),
            PaintOutcome::Painted
        );
    }

    #[test]
    fn options_from_json() {
        let options: PainterOptions = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        assert_eq!(options, PainterOptions::default().with_debug(true));
        assert_eq!(options.default_line_margin, DEFAULT_LINE_MARGIN);
    }
}
