//! [`Camera`] is the read-only view state the painter projects geometries with.

use geopaint_types::cartesian::{Point2d, Rect};

/// View state of the map: resolution, orientation and the projection between model points and container pixels.
///
/// *Model points* are projected coordinates divided by the [`gl_resolution`](Camera::gl_resolution), i.e. the
/// values stay the same at any zoom level. Altitudes passed to the camera are given in the same units.
///
/// *Container pixels* have their origin at the top left corner of the map container, with `y` axis pointing down.
pub trait Camera {
    /// Current resolution in projected units per pixel.
    fn resolution(&self) -> f64;

    /// Zoom level of the current resolution.
    fn zoom(&self) -> f64;

    /// Tilt of the view in radians. `0` looks straight down.
    fn pitch(&self) -> f64;

    /// Rotation of the view around the vertical axis in radians.
    fn bearing(&self) -> f64;

    /// Fixed reference resolution model points are stored at.
    fn gl_resolution(&self) -> f64;

    /// Ratio between the current resolution and the reference one.
    ///
    /// A length of `l` model units is `l / gl_scale()` pixels long on the screen.
    fn gl_scale(&self) -> f64 {
        self.resolution() / self.gl_resolution()
    }

    /// Identifier of the map projection. Cached values are dropped when it changes.
    fn projection_code(&self) -> &str;

    /// Extent of the map container in container pixels, or `None` if the container has no size.
    fn container_extent(&self) -> Option<Rect>;

    /// Altitude (in model units) above which nothing can be visible at the current orientation.
    fn frustum_altitude(&self) -> f64;

    /// Projects a model point at the given altitude to container pixels.
    ///
    /// A point with altitude `0` must be projected exactly as a point without altitude.
    fn point_to_container(&self, point: &Point2d, altitude: f64) -> Point2d;

    /// Projects a container pixel onto the ground plane in model points.
    ///
    /// Pixels above the horizon are projected to infinitely far points.
    fn container_to_point(&self, pixel: &Point2d) -> Point2d;

    /// Converts a projected coordinate to a point at the given resolution.
    fn coord_to_point(&self, coord: &Point2d, resolution: f64) -> Point2d;

    /// Projected coordinate at the distance `dx`, `dy` (in meters) from the given one.
    fn locate(&self, coord: &Point2d, dx: f64, dy: f64) -> Point2d;

    /// Position of the camera projected onto the ground, in model points.
    fn camera_ground_position(&self) -> Point2d;

    /// Ground point the camera is looking at, in model points.
    fn camera_look_at(&self) -> Point2d;

    /// Model space area covered by the given container pixel extent.
    fn container_extent_to_model(&self, extent: &Rect) -> Option<Rect> {
        let corners = extent.into_quadrangle().map(|p| self.container_to_point(&p));
        Rect::from_points(corners.iter())
    }
}
