//! Conversion of geometry altitudes from meters into model units.

use crate::camera::Camera;
use crate::error::GeopaintError;
use crate::geometry::AltitudeProperty;
use crate::symbol::Placement;
use geopaint_types::cartesian::Point2d;
use geopaint_types::Path;

/// Vertex together with its altitude in model units.
pub type ElevatedPoint = (Point2d, f64);

/// Altitude of a geometry in model units.
#[derive(Debug, Clone, PartialEq)]
pub enum Altitude {
    /// Same altitude for every vertex.
    Scalar(f64),
    /// Altitude of every vertex, mirroring the structure of the geometry path.
    PerVertex(Path<f64>),
}

impl Default for Altitude {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl Altitude {
    /// Returns true for the scalar zero altitude.
    pub fn is_zero(&self) -> bool {
        matches!(self, Altitude::Scalar(v) if *v == 0.0)
    }

    /// Returns true if the altitude is given per vertex.
    pub fn is_per_vertex(&self) -> bool {
        matches!(self, Altitude::PerVertex(_))
    }

    /// Altitude of the first vertex.
    pub fn first(&self) -> f64 {
        match self {
            Altitude::Scalar(v) => *v,
            Altitude::PerVertex(values) => values.first().copied().unwrap_or_default(),
        }
    }

    /// Altitudes of the `count` marker anchors a geometry gives for the `placement`.
    ///
    /// Per-vertex values are resolved the same way the anchors are placed: the vertex altitude for vertex
    /// placements, the mean of the segment ends for [`Placement::Line`] and the mean of all vertices for
    /// [`Placement::Center`]. Anchors without a matching value get altitude `0`.
    pub fn anchor_altitudes(&self, placement: Placement, count: usize) -> Vec<f64> {
        let values = match self {
            Altitude::Scalar(v) => return vec![*v; count],
            Altitude::PerVertex(values) => values,
        };

        let mut altitudes: Vec<f64> = match placement {
            Placement::Point | Placement::Vertex => values.iter().copied().collect(),
            Placement::VertexFirst => values.first().copied().into_iter().collect(),
            Placement::VertexLast => values.last().copied().into_iter().collect(),
            Placement::Line => values
                .leaves()
                .iter()
                .flat_map(|part| part.windows(2).map(|w| (w[0] + w[1]) / 2.0))
                .collect(),
            Placement::Center => {
                let vertex_count = values.vertex_count();
                let mean = if vertex_count == 0 {
                    0.0
                } else {
                    values.iter().sum::<f64>() / vertex_count as f64
                };
                vec![mean; count]
            }
        };

        if altitudes.len() != count {
            log::warn!(
                "Geometry has {count} anchors for {placement:?} placement, but {} altitude values",
                altitudes.len()
            );
            altitudes.resize(count, 0.0);
        }

        altitudes
    }

    /// Pairs every vertex of the path with its altitude.
    ///
    /// Fails if a per-vertex altitude does not have the same structure as the path.
    pub fn elevate(&self, path: &Path<Point2d>) -> Result<Path<ElevatedPoint>, GeopaintError> {
        Ok(match self {
            Altitude::Scalar(v) => path.map(|p| (*p, *v)),
            Altitude::PerVertex(values) => path.zip_map(values, |p, a| (*p, *a))?,
        })
    }
}

/// Converts a length in meters at the given coordinate to model units.
///
/// The length is measured along the `x` axis, so the result does not depend on the pitch of the view.
pub fn length_to_model(camera: &dyn Camera, center: &Point2d, length: f64) -> f64 {
    if length == 0.0 {
        return 0.0;
    }

    let target = camera.locate(center, length, 0.0);
    let from = camera.coord_to_point(center, camera.gl_resolution());
    let to = camera.coord_to_point(&target, camera.gl_resolution());
    (to.x - from.x).abs() * length.signum()
}

/// Projects the altitude property of a geometry and keeps the result until the property or the projection changes.
#[derive(Debug, Default)]
pub struct AltitudeProjector {
    key: Option<(Option<AltitudeProperty>, String)>,
    value: Altitude,
    min: f64,
    max: f64,
}

impl AltitudeProjector {
    /// Updates the projected altitude. Without a camera the altitude is `0`.
    pub fn project(
        &mut self,
        camera: Option<&dyn Camera>,
        center: &Point2d,
        property: Option<&AltitudeProperty>,
    ) {
        let Some(camera) = camera else {
            self.reset();
            return;
        };

        if let Some((last_property, last_code)) = &self.key {
            if last_property.as_ref() == property && last_code == camera.projection_code() {
                return;
            }
        }

        let (value, min, max) = match property {
            None => (Altitude::default(), 0.0, 0.0),
            Some(AltitudeProperty::Length(length)) => {
                let v = length_to_model(camera, center, *length);
                (Altitude::Scalar(v), v, v)
            }
            Some(AltitudeProperty::PerVertex(lengths)) => {
                let values = lengths.map(|length| length_to_model(camera, center, *length));
                let (min, max) = if values.is_empty() {
                    (0.0, 0.0)
                } else {
                    values
                        .iter()
                        .fold((f64::MAX, f64::MIN), |(min, max), v| (min.min(*v), max.max(*v)))
                };
                (Altitude::PerVertex(values), min, max)
            }
        };

        self.key = Some((property.cloned(), camera.projection_code().to_string()));
        self.value = value;
        self.min = min;
        self.max = max;
    }

    /// Last projected altitude.
    pub fn value(&self) -> &Altitude {
        &self.value
    }

    /// Minimum of the last projected altitude.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum of the last projected altitude.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Drops the projected value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
