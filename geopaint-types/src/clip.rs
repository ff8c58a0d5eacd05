//! Clipping of polygon rings and polylines by an axis aligned rectangle.
//!
//! Rings are clipped with the Sutherland–Hodgman algorithm. Any vertex type implementing [`ClipVertex`] can be
//! clipped, which allows carrying additional values (e.g. altitude) that are interpolated together with the
//! position.
//!
//! Polylines are clipped segment by segment with the Liang–Barsky algorithm. Every output vertex remembers where
//! it came from (see [`VertexSource`]), so values attached to the original vertices can be interpolated afterward.

use crate::cartesian::{Point2d, Rect};

/// Vertex that can be clipped by [`clip_ring`].
pub trait ClipVertex: Clone {
    /// 2d position of the vertex.
    fn position(&self) -> Point2d;
    /// Vertex at the parameter `t` of the segment from `self` to `other`.
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

impl ClipVertex for Point2d {
    fn position(&self) -> Point2d {
        *self
    }

    fn interpolate(&self, other: &Self, t: f64) -> Self {
        self.lerp(other, t)
    }
}

/// Position with a scalar value that is linearly interpolated along with it.
impl ClipVertex for (Point2d, f64) {
    fn position(&self) -> Point2d {
        self.0
    }

    fn interpolate(&self, other: &Self, t: f64) -> Self {
        (self.0.lerp(&other.0, t), self.1 + (other.1 - self.1) * t)
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left(f64),
    Right(f64),
    Bottom(f64),
    Top(f64),
}

impl Edge {
    fn is_inside(&self, p: &Point2d) -> bool {
        match *self {
            Edge::Left(x) => p.x >= x,
            Edge::Right(x) => p.x <= x,
            Edge::Bottom(y) => p.y >= y,
            Edge::Top(y) => p.y <= y,
        }
    }

    fn intersect<V: ClipVertex>(&self, from: &V, to: &V) -> V {
        let a = from.position();
        let b = to.position();
        let t = match *self {
            Edge::Left(x) | Edge::Right(x) => (x - a.x) / (b.x - a.x),
            Edge::Bottom(y) | Edge::Top(y) => (y - a.y) / (b.y - a.y),
        };

        from.interpolate(to, t)
    }
}

/// Clips a polygon ring by the rectangle.
///
/// The ring is treated as closed whether or not its last vertex repeats the first one. A ring fully inside the
/// rectangle is returned unchanged, a ring fully outside of it (or a rectangle with `NaN` bounds) produces an empty
/// vector.
pub fn clip_ring<V: ClipVertex>(ring: &[V], bounds: &Rect) -> Vec<V> {
    let edges = [
        Edge::Left(bounds.x_min),
        Edge::Right(bounds.x_max),
        Edge::Bottom(bounds.y_min),
        Edge::Top(bounds.y_max),
    ];

    let mut output = ring.to_vec();
    for edge in edges {
        let input = std::mem::take(&mut output);
        let Some(mut prev) = input.last() else {
            break;
        };

        for curr in &input {
            let curr_inside = edge.is_inside(&curr.position());
            let prev_inside = edge.is_inside(&prev.position());

            if curr_inside {
                if !prev_inside {
                    output.push(edge.intersect(prev, curr));
                }
                output.push(curr.clone());
            } else if prev_inside {
                output.push(edge.intersect(prev, curr));
            }

            prev = curr;
        }
    }

    output
}

/// Origin of a vertex produced by [`clip_line`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexSource {
    /// The vertex is the original vertex with the given index.
    Original(usize),
    /// The vertex lies on the segment between two original vertices at the parameter `t` from `from` to `to`.
    Interpolated {
        /// Index of the segment start.
        from: usize,
        /// Index of the segment end.
        to: usize,
        /// Interpolation parameter in the range `(0, 1)`.
        t: f64,
    },
}

impl VertexSource {
    /// Interpolates a value attached to the original vertices for this vertex. Returns `None` if the index is
    /// out of the bounds of `values`.
    pub fn interpolate(&self, values: &[f64]) -> Option<f64> {
        match *self {
            VertexSource::Original(index) => values.get(index).copied(),
            VertexSource::Interpolated { from, to, t } => {
                let a = values.get(from)?;
                let b = values.get(to)?;
                Some(a + (b - a) * t)
            }
        }
    }
}

/// Vertex of a clipped polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedVertex {
    /// Position of the vertex.
    pub point: Point2d,
    /// Where the vertex came from.
    pub source: VertexSource,
}

/// Clips a polyline by the rectangle.
///
/// Returns the parts of the line that are inside the rectangle. A line leaving and reentering the rectangle
/// produces several parts. A line fully outside produces no parts.
pub fn clip_line(points: &[Point2d], bounds: &Rect) -> Vec<Vec<ClippedVertex>> {
    if points.len() == 1 {
        return if bounds.contains(&points[0]) {
            vec![vec![ClippedVertex {
                point: points[0],
                source: VertexSource::Original(0),
            }]]
        } else {
            vec![]
        };
    }

    let mut parts = vec![];
    let mut current = vec![];
    let last_segment = points.len().saturating_sub(2);

    for (index, segment) in points.windows(2).enumerate() {
        let (a, b) = (&segment[0], &segment[1]);
        let Some((t0, t1)) = clip_segment(a, b, bounds) else {
            continue;
        };

        current.push(vertex_at(a, b, index, t0));

        // A part ends when the line leaves the rectangle or when the line itself ends.
        if t1 < 1.0 || index == last_segment {
            current.push(vertex_at(a, b, index, t1));
            parts.push(std::mem::take(&mut current));
        }
    }

    parts
}

fn vertex_at(a: &Point2d, b: &Point2d, index: usize, t: f64) -> ClippedVertex {
    if t <= 0.0 {
        ClippedVertex {
            point: *a,
            source: VertexSource::Original(index),
        }
    } else if t >= 1.0 {
        ClippedVertex {
            point: *b,
            source: VertexSource::Original(index + 1),
        }
    } else {
        ClippedVertex {
            point: a.lerp(b, t),
            source: VertexSource::Interpolated {
                from: index,
                to: index + 1,
                t,
            },
        }
    }
}

/// Liang–Barsky: parameters of the part of the segment inside the rectangle.
fn clip_segment(a: &Point2d, b: &Point2d, bounds: &Rect) -> Option<(f64, f64)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0;
    let mut t1 = 1.0;

    let checks = [
        (-dx, a.x - bounds.x_min),
        (dx, bounds.x_max - a.x),
        (-dy, a.y - bounds.y_min),
        (dy, bounds.y_max - a.y),
    ];

    for (p, q) in checks {
        // NaN bounds must reject the segment, so the checks are written to fail on NaN.
        if p == 0.0 {
            if !(q >= 0.0) {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if !(r <= t1) {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if !(r >= t0) {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
    }

    Some((t0, t1))
}
