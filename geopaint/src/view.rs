use crate::camera::Camera;
use geopaint_types::cartesian::{CartesianPoint2d, Point2d, Rect, Size};
use nalgebra::{Point2, Point3, Rotation3, Translation3, Vector3};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Resolution of the zoom level `0` of the Web Mercator tile pyramid.
pub const WEB_MERCATOR_BASE_RESOLUTION: f64 = 156543.03392800014;

/// Half of the vertical field of view of the camera.
const HALF_FOV: f64 = FRAC_PI_4;

/// Perspective camera over a planar projected map.
///
/// The camera is placed above the `position` at the distance of half of the container height (in pixels), which
/// gives 90 degrees vertical field of view.
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    position: Point3<f64>,
    resolution: f64,
    rotation_x: f64,
    rotation_z: f64,
    size: Size,
    gl_resolution: f64,
    zoom_base_resolution: f64,
    projection_code: &'static str,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            position: Default::default(),
            resolution: 1.0,
            rotation_x: 0.0,
            rotation_z: 0.0,
            size: Size::new(0.0, 0.0),
            gl_resolution: 1.0,
            zoom_base_resolution: WEB_MERCATOR_BASE_RESOLUTION,
            projection_code: "EPSG:3857",
        }
    }
}

impl MapView {
    /// Creates a view centered at the given projected coordinate.
    pub fn new(position: impl CartesianPoint2d<Num = f64>, resolution: f64) -> Self {
        Self {
            position: Point3::new(position.x(), position.y(), 0.0),
            resolution,
            ..Default::default()
        }
    }

    /// Projected coordinate of the view center.
    pub fn position(&self) -> Point2d {
        Point2::new(self.position.x, self.position.y)
    }

    /// Size of the map container in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Sets the container size.
    pub fn with_size(&self, new_size: Size) -> Self {
        Self {
            size: new_size,
            ..*self
        }
    }

    /// Sets the resolution.
    pub fn with_resolution(&self, resolution: f64) -> Self {
        Self {
            resolution,
            ..*self
        }
    }

    /// Sets the tilt of the view.
    pub fn with_rotation_x(&self, rotation_x: f64) -> Self {
        Self {
            rotation_x,
            ..*self
        }
    }

    /// Sets the rotation around the vertical axis.
    pub fn with_rotation_z(&self, rotation_z: f64) -> Self {
        Self {
            rotation_z,
            ..*self
        }
    }

    /// Sets the reference resolution model points are stored at.
    pub fn with_gl_resolution(&self, gl_resolution: f64) -> Self {
        Self {
            gl_resolution,
            ..*self
        }
    }

    /// Sets the resolution of zoom level `0`.
    pub fn with_zoom_base_resolution(&self, zoom_base_resolution: f64) -> Self {
        Self {
            zoom_base_resolution,
            ..*self
        }
    }

    /// Sets the projection identifier.
    pub fn with_projection_code(&self, projection_code: &'static str) -> Self {
        Self {
            projection_code,
            ..*self
        }
    }

    fn view_rotation(&self) -> Rotation3<f64> {
        Rotation3::new(Vector3::new(-self.rotation_x, 0.0, 0.0))
            * Rotation3::new(Vector3::new(0.0, 0.0, self.rotation_z))
    }

    /// Distance from the camera to the view center in projected units.
    fn camera_distance(&self) -> f64 {
        self.size.half_height() * self.resolution
    }

    fn camera_position(&self) -> Point3<f64> {
        self.position
            + self.view_rotation().inverse() * Vector3::new(0.0, 0.0, self.camera_distance())
    }

    fn map_to_screen(&self, world: Point3<f64>) -> Point2d {
        let view = self.view_rotation() * (world - self.position) / self.resolution;
        let distance = self.size.half_height();
        let k = if view.z == 0.0 {
            1.0
        } else {
            distance / (distance - view.z)
        };

        Point2::new(
            self.size.half_width() + view.x * k,
            self.size.half_height() - view.y * k,
        )
    }

    /// Projects a pixel onto the ground plane in projected coordinates.
    pub fn screen_to_map(&self, px_position: Point2d) -> Point2d {
        let x = px_position.x;
        let y = px_position.y;
        let a = (self.size.half_height() - y) * FRAC_PI_4.tan() / self.size.half_height();

        let s = 1.0 / ((FRAC_PI_2 - self.rotation_x).tan() / a - 1.0) + 1.0;

        let x0 = (x - self.size.half_width()) * self.resolution;
        let y0 = (self.size.half_height() - y) * self.resolution;

        if s.is_infinite() || s <= 0.0 {
            let x = if x0 >= 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
            let y = if y0 >= 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
            return Point2d::new(x, y);
        }

        let y0_ang = y0 / self.rotation_x.cos();

        let x0_scaled = x0 * s;
        let y0_scaled = y0_ang * s;

        let rotation_z = Rotation3::new(Vector3::new(0.0, 0.0, -self.rotation_z));
        let translation = Translation3::new(self.position.x, self.position.y, self.position.z);

        let p = Point3::new(x0_scaled, y0_scaled, 0.0);
        let transformed = translation * rotation_z * p;

        Point2::new(transformed.x, transformed.y)
    }

    /// Ground area visible in the view, limited to four view sizes around the center.
    fn max_bbox(&self) -> Rect {
        Rect::new(
            self.position.x - self.size.half_width() * self.resolution,
            self.position.y - self.size.half_height() * self.resolution,
            self.position.x + self.size.half_width() * self.resolution,
            self.position.y + self.size.half_height() * self.resolution,
        )
        .magnify(4.0)
    }
}

impl Camera for MapView {
    fn resolution(&self) -> f64 {
        self.resolution
    }

    fn zoom(&self) -> f64 {
        (self.zoom_base_resolution / self.resolution).log2()
    }

    fn pitch(&self) -> f64 {
        self.rotation_x
    }

    fn bearing(&self) -> f64 {
        self.rotation_z
    }

    fn gl_resolution(&self) -> f64 {
        self.gl_resolution
    }

    fn projection_code(&self) -> &str {
        self.projection_code
    }

    fn container_extent(&self) -> Option<Rect> {
        if self.size.is_zero() {
            return None;
        }

        Some(Rect::new(0.0, 0.0, self.size.width(), self.size.height()))
    }

    fn frustum_altitude(&self) -> f64 {
        let distance = self.camera_distance() / self.gl_resolution;
        let camera_altitude = distance * self.rotation_x.cos();
        let top_ray = self.rotation_x + HALF_FOV;
        if top_ray <= FRAC_PI_2 {
            return camera_altitude;
        }

        // altitude of the upper frustum plane above the view center
        let ground_distance = distance * self.rotation_x.sin();
        camera_altitude + ground_distance * (top_ray - FRAC_PI_2).tan()
    }

    fn point_to_container(&self, point: &Point2d, altitude: f64) -> Point2d {
        let world = Point3::new(point.x, point.y, altitude) * self.gl_resolution;
        self.map_to_screen(world)
    }

    fn container_to_point(&self, pixel: &Point2d) -> Point2d {
        self.screen_to_map(*pixel) / self.gl_resolution
    }

    fn coord_to_point(&self, coord: &Point2d, resolution: f64) -> Point2d {
        *coord / resolution
    }

    fn locate(&self, coord: &Point2d, dx: f64, dy: f64) -> Point2d {
        Point2::new(coord.x + dx, coord.y + dy)
    }

    fn camera_ground_position(&self) -> Point2d {
        let camera = self.camera_position();
        Point2::new(camera.x, camera.y) / self.gl_resolution
    }

    fn camera_look_at(&self) -> Point2d {
        self.position() / self.gl_resolution
    }

    fn container_extent_to_model(&self, extent: &Rect) -> Option<Rect> {
        let points = extent.into_quadrangle().map(|p| self.screen_to_map(p));
        let bbox = Rect::from_points(points.iter())?.limit(self.max_bbox());
        Some(Rect::new(
            bbox.x_min / self.gl_resolution,
            bbox.y_min / self.gl_resolution,
            bbox.x_max / self.gl_resolution,
            bbox.y_max / self.gl_resolution,
        ))
    }
}
