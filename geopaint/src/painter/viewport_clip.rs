//! Clipping of geometry paths by the visible part of the map.

use crate::camera::Camera;
use crate::geometry::GeometryKind;
use crate::painter::altitude::{Altitude, ElevatedPoint};
use crate::painter::altitude_clip::clip_by_altitude;
use geopaint_types::cartesian::{Point2d, Rect};
use geopaint_types::clip::{clip_line, clip_ring};
use geopaint_types::Path;

/// Clipped path with its altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipResult {
    /// Clipped path in model points.
    pub points: Path<Point2d>,
    /// Altitude of the clipped path. Per-vertex altitude mirrors `points`.
    pub altitude: Altitude,
}

/// Clips paths by the container extent of the map.
pub struct ViewportClipper<'a> {
    camera: &'a dyn Camera,
    line_margin: f64,
}

impl<'a> ViewportClipper<'a> {
    /// Creates a clipper. The container extent is expanded by `line_margin` pixels, so thick strokes at the edge
    /// are not cut.
    pub fn new(camera: &'a dyn Camera, line_margin: f64) -> Self {
        Self {
            camera,
            line_margin,
        }
    }

    /// Model space area of the container extent that paths are clipped by.
    ///
    /// With a pitched view, raised geometries can be visible when their ground footprint is not, so the area is
    /// extended to the ground position of the camera.
    pub fn expanded_extent(&self, container_extent: &Rect, altitude: &Altitude) -> Option<Rect> {
        let pixel_extent = container_extent.expand(self.line_margin);
        let mut extent = self.camera.container_extent_to_model(&pixel_extent)?;

        if self.camera.pitch() > 0.0 && !altitude.is_zero() {
            let position = self.camera.camera_ground_position();
            let look_at = self.camera.camera_look_at();
            let nudged = Point2d::new(
                position.x + sign(look_at.x - position.x),
                position.y + sign(look_at.y - position.y),
            );
            extent = extent.merge(Rect::from_point(&nudged));
        }

        Some(extent)
    }

    /// Clips the path of a geometry by `view_extent`.
    ///
    /// Polygon rings lose the parts outside the extent, rings left without vertices are dropped. Lines are split
    /// into the parts inside the extent, the result is always a group of parts. Other geometries are returned
    /// unchanged.
    ///
    /// If the whole `geometry_extent` is inside the view, the path is not clipped. Lines with per-vertex altitude
    /// are then limited by the `ceiling` altitude.
    pub fn clip(
        &self,
        kind: GeometryKind,
        geometry_extent: Option<&Rect>,
        path: &Path<Point2d>,
        altitude: &Altitude,
        view_extent: &Rect,
        ceiling: Option<f64>,
    ) -> ClipResult {
        let (elevated, altitude) = match altitude.elevate(path) {
            Ok(elevated) => (elevated, altitude.clone()),
            Err(err) => {
                log::warn!("Altitude of the geometry is ignored: {err}");
                (path.map(|p| (*p, 0.0)), Altitude::default())
            }
        };

        let inside = geometry_extent.is_some_and(|extent| view_extent.contains_rect(extent));
        let clipped = if inside {
            elevated
        } else if kind.is_polygon() {
            clip_polygon(&elevated, view_extent)
        } else if kind.is_line() {
            clip_lines(&elevated, view_extent)
        } else {
            elevated
        };

        let clipped = match ceiling {
            Some(ceiling) if kind.is_line() && altitude.is_per_vertex() => {
                clip_by_altitude(&clipped, ceiling)
            }
            _ => clipped,
        };

        let points = clipped.map(|(p, _)| *p);
        let altitude = match altitude {
            Altitude::Scalar(v) => Altitude::Scalar(v),
            Altitude::PerVertex(_) => Altitude::PerVertex(clipped.map(|(_, a)| *a)),
        };

        ClipResult { points, altitude }
    }
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn clip_polygon(path: &Path<ElevatedPoint>, bounds: &Rect) -> Path<ElevatedPoint> {
    match path {
        Path::Point(_) => path.clone(),
        Path::Leaf(ring) => Path::Leaf(clip_ring(ring, bounds)),
        Path::Group(parts) => Path::Group(
            parts
                .iter()
                .map(|part| clip_polygon(part, bounds))
                .filter(|part| !part.is_empty())
                .collect(),
        ),
    }
}

fn clip_lines(path: &Path<ElevatedPoint>, bounds: &Rect) -> Path<ElevatedPoint> {
    let mut parts = vec![];
    collect_line_parts(path, bounds, &mut parts);
    Path::from_parts(parts)
}

fn collect_line_parts(
    path: &Path<ElevatedPoint>,
    bounds: &Rect,
    parts: &mut Vec<Vec<ElevatedPoint>>,
) {
    match path {
        Path::Point(vertex) => {
            if bounds.contains(&vertex.0) {
                parts.push(vec![*vertex]);
            }
        }
        Path::Leaf(vertices) => {
            let points: Vec<Point2d> = vertices.iter().map(|v| v.0).collect();
            let altitudes: Vec<f64> = vertices.iter().map(|v| v.1).collect();
            for part in clip_line(&points, bounds) {
                parts.push(
                    part.into_iter()
                        .map(|v| {
                            let altitude = v.source.interpolate(&altitudes).unwrap_or_default();
                            (v.point, altitude)
                        })
                        .collect(),
                );
            }
        }
        Path::Group(lines) => {
            for line in lines {
                collect_line_parts(line, bounds, parts);
            }
        }
    }
}
