//! Projection of model points onto the drawing surface.

use crate::camera::Camera;
use crate::painter::altitude::Altitude;
use geopaint_types::cartesian::Point2d;
use geopaint_types::Path;
use nalgebra::Vector2;

/// Converts model points into surface pixels.
///
/// Surface pixels are container pixels relative to the `origin` of the surface, moved by a constant `offset`.
pub struct PointTransformer<'a> {
    camera: &'a dyn Camera,
    origin: Vector2<f64>,
    offset: Vector2<f64>,
}

impl<'a> PointTransformer<'a> {
    /// Creates a transformer for a surface with the given origin in container pixels.
    pub fn new(camera: &'a dyn Camera, origin: Vector2<f64>) -> Self {
        Self {
            camera,
            origin,
            offset: Vector2::zeros(),
        }
    }

    /// Moves every transformed point by `dx`, `dy` pixels.
    pub fn with_offset(self, dx: f64, dy: f64) -> Self {
        Self {
            offset: Vector2::new(dx, dy),
            ..self
        }
    }

    /// Transforms a single point.
    pub fn transform(&self, point: &Point2d, altitude: f64) -> Point2d {
        self.camera.point_to_container(point, altitude) - self.origin + self.offset
    }

    /// Transforms every vertex of the path. A per-vertex altitude that does not match the path is ignored.
    pub fn transform_path(&self, path: &Path<Point2d>, altitude: &Altitude) -> Path<Point2d> {
        match altitude {
            Altitude::Scalar(v) => path.map(|p| self.transform(p, *v)),
            Altitude::PerVertex(values) => match path.zip_map(values, |p, a| self.transform(p, *a)) {
                Ok(transformed) => transformed,
                Err(err) => {
                    log::warn!("Altitude of the geometry is ignored: {err}");
                    path.map(|p| self.transform(p, 0.0))
                }
            },
        }
    }
}
