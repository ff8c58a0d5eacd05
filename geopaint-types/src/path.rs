//! [`Path`] is the nested container used for geometry path data and everything that mirrors its shape
//! (per-vertex altitudes, clipped and transformed points).

use crate::cartesian::{CartesianPoint2d, Rect};
use crate::error::GeopaintTypesError;
use nalgebra::Scalar;
use num_traits::{FromPrimitive, Num};

/// Path data of a geometry.
///
/// * a single point for point geometries,
/// * a leaf with a sequence of vertices for a line or a polygon ring,
/// * a group of parts for multi-geometries and polygons with holes.
///
/// All parts of a group have the same nesting depth. Use [`Path::group`] to build a group from parts of unknown
/// shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Path<T> {
    /// Single point.
    Point(T),
    /// Sequence of vertices.
    Leaf(Vec<T>),
    /// Sequence of parts.
    Group(Vec<Path<T>>),
}

impl<T> Path<T> {
    /// Creates a group from the given parts, checking that all of them have the same nesting depth.
    pub fn group(parts: Vec<Path<T>>) -> Result<Self, GeopaintTypesError> {
        if let Some(first) = parts.first() {
            let depth = first.depth();
            if let Some(part) = parts.iter().find(|p| p.depth() != depth) {
                return Err(GeopaintTypesError::Conversion(format!(
                    "group parts must have the same nesting depth, found {} and {}",
                    depth,
                    part.depth()
                )));
            }
        }

        Ok(Self::Group(parts))
    }

    /// Creates a group of leaves. All parts have depth `1`, so no check is required.
    pub fn from_parts(parts: Vec<Vec<T>>) -> Self {
        Self::Group(parts.into_iter().map(Path::Leaf).collect())
    }

    /// Nesting depth: `0` for a point, `1` for a leaf, one more than its parts for a group.
    pub fn depth(&self) -> usize {
        match self {
            Path::Point(_) => 0,
            Path::Leaf(_) => 1,
            Path::Group(parts) => 1 + parts.first().map(|p| p.depth()).unwrap_or(1),
        }
    }

    /// Total number of vertices in the path.
    pub fn vertex_count(&self) -> usize {
        match self {
            Path::Point(_) => 1,
            Path::Leaf(vertices) => vertices.len(),
            Path::Group(parts) => parts.iter().map(|p| p.vertex_count()).sum(),
        }
    }

    /// Returns true if the path has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Iterates over all vertices of the path in order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        match self {
            Path::Point(v) => Box::new(std::iter::once(v)),
            Path::Leaf(vertices) => Box::new(vertices.iter()),
            Path::Group(parts) => Box::new(parts.iter().flat_map(|p| p.iter())),
        }
    }

    /// First vertex of the path.
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Last vertex of the path.
    pub fn last(&self) -> Option<&T> {
        match self {
            Path::Point(v) => Some(v),
            Path::Leaf(vertices) => vertices.last(),
            Path::Group(parts) => parts.iter().rev().find_map(|p| p.last()),
        }
    }

    /// Vertex sequences of the path in order. A point is a sequence of one vertex.
    pub fn leaves(&self) -> Vec<&[T]> {
        let mut leaves = vec![];
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a [T]>) {
        match self {
            Path::Point(v) => leaves.push(std::slice::from_ref(v)),
            Path::Leaf(vertices) => leaves.push(vertices),
            Path::Group(parts) => {
                for part in parts {
                    part.collect_leaves(leaves);
                }
            }
        }
    }

    /// Creates a path of the same shape with every vertex converted by `f`.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Path<U> {
        self.map_inner(&mut f)
    }

    fn map_inner<U, F: FnMut(&T) -> U>(&self, f: &mut F) -> Path<U> {
        match self {
            Path::Point(v) => Path::Point(f(v)),
            Path::Leaf(vertices) => Path::Leaf(vertices.iter().map(&mut *f).collect()),
            Path::Group(parts) => Path::Group(parts.iter().map(|p| p.map_inner(f)).collect()),
        }
    }

    /// Combines two paths of the same shape vertex by vertex.
    ///
    /// Returns an error if the shapes of the paths differ (different variants or different number of elements at
    /// any level).
    pub fn zip_map<U, V>(
        &self,
        other: &Path<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<Path<V>, GeopaintTypesError> {
        self.zip_inner(other, &mut f)
    }

    fn zip_inner<U, V, F: FnMut(&T, &U) -> V>(
        &self,
        other: &Path<U>,
        f: &mut F,
    ) -> Result<Path<V>, GeopaintTypesError> {
        match (self, other) {
            (Path::Point(a), Path::Point(b)) => Ok(Path::Point(f(a, b))),
            (Path::Leaf(a), Path::Leaf(b)) if a.len() == b.len() => Ok(Path::Leaf(
                a.iter().zip(b.iter()).map(|(a, b)| f(a, b)).collect(),
            )),
            (Path::Group(a), Path::Group(b)) if a.len() == b.len() => Ok(Path::Group(
                a.iter()
                    .zip(b.iter())
                    .map(|(a, b)| a.zip_inner(b, f))
                    .collect::<Result<_, _>>()?,
            )),
            _ => Err(GeopaintTypesError::StructureMismatch {
                expected: self.shape(),
                found: other.shape(),
            }),
        }
    }

    fn shape(&self) -> String {
        match self {
            Path::Point(_) => "point".to_string(),
            Path::Leaf(vertices) => format!("leaf of {}", vertices.len()),
            Path::Group(parts) => format!("group of {}", parts.len()),
        }
    }
}

impl<P> Path<P>
where
    P: CartesianPoint2d,
    P::Num: Num + Copy + PartialOrd + Scalar + FromPrimitive,
{
    /// Bounding rectangle of all vertices. Returns `None` for an empty path.
    pub fn bounding_rect(&self) -> Option<Rect<P::Num>> {
        Rect::from_points(self.iter())
    }
}

impl<T> From<Vec<T>> for Path<T> {
    fn from(value: Vec<T>) -> Self {
        Self::Leaf(value)
    }
}
