use crate::cartesian::point::CartesianPoint2d;
use nalgebra::{Point2, Scalar, Vector2};
use num_traits::{FromPrimitive, Num};
use serde::{Deserialize, Serialize};

/// Axis aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Minimum x coordinate.
    pub x_min: N,
    /// Minimum y coordinate.
    pub y_min: N,
    /// Maximum x coordinate.
    pub x_max: N,
    /// Maximum y coordinate.
    pub y_max: N,
}

impl<N: Num + Copy + PartialOrd + Scalar + FromPrimitive> Rect<N> {
    /// Creates a new rectangle. The caller is responsible for `min <= max` ordering.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Minimum x coordinate.
    pub fn x_min(&self) -> N {
        self.x_min
    }

    /// Maximum x coordinate.
    pub fn x_max(&self) -> N {
        self.x_max
    }

    /// Minimum y coordinate.
    pub fn y_min(&self) -> N {
        self.y_min
    }

    /// Maximum y coordinate.
    pub fn y_max(&self) -> N {
        self.y_max
    }

    /// Width of the rectangle.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }

    /// Returns false if the rectangle has negative width or height, or some of its coordinates are `NaN`.
    pub fn is_valid(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }

    /// Rectangle grown by `amount` in every direction. Negative amount shrinks it.
    pub fn expand(&self, amount: N) -> Self {
        Self {
            x_min: self.x_min - amount,
            x_max: self.x_max + amount,
            y_min: self.y_min - amount,
            y_max: self.y_max + amount,
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: if self.x_min < other.x_min {
                self.x_min
            } else {
                other.x_min
            },
            y_min: if self.y_min < other.y_min {
                self.y_min
            } else {
                other.y_min
            },
            x_max: if self.x_max > other.x_max {
                self.x_max
            } else {
                other.x_max
            },
            y_max: if self.y_max > other.y_max {
                self.y_max
            } else {
                other.y_max
            },
        }
    }

    /// Intersection of the rectangles. The result is not valid if they don't intersect.
    pub fn limit(&self, other: Self) -> Self {
        Self {
            x_min: if self.x_min > other.x_min {
                self.x_min
            } else {
                other.x_min
            },
            y_min: if self.y_min > other.y_min {
                self.y_min
            } else {
                other.y_min
            },
            x_max: if self.x_max < other.x_max {
                self.x_max
            } else {
                other.x_max
            },
            y_max: if self.y_max < other.y_max {
                self.y_max
            } else {
                other.y_max
            },
        }
    }

    /// Rectangle of zero size at the given point.
    pub fn from_point(p: &impl CartesianPoint2d<Num = N>) -> Self {
        Self {
            x_min: p.x(),
            x_max: p.x(),
            y_min: p.y(),
            y_max: p.y(),
        }
    }

    /// Bounding rectangle of the points. Returns `None` for an empty iterator.
    pub fn from_points<'a, P: CartesianPoint2d<Num = N> + 'a>(
        mut points: impl Iterator<Item = &'a P>,
    ) -> Option<Self> {
        let first = points.next()?;
        let mut rect = Self::from_point(first);
        for p in points {
            rect.extend_to(p);
        }

        Some(rect)
    }

    /// Grows the rectangle to include the given point.
    pub fn extend_to(&mut self, p: &impl CartesianPoint2d<Num = N>) {
        if self.x_min > p.x() {
            self.x_min = p.x();
        }
        if self.y_min > p.y() {
            self.y_min = p.y();
        }
        if self.x_max < p.x() {
            self.x_max = p.x();
        }
        if self.y_max < p.y() {
            self.y_max = p.y();
        }
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &impl CartesianPoint2d<Num = N>) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Returns true if the `other` rectangle lies fully inside this one.
    pub fn contains_rect(&self, other: &Self) -> bool {
        self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    /// Returns true if the rectangles have at least one common point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    /// Rectangle moved by the given vector.
    pub fn translate(&self, delta: Vector2<N>) -> Self {
        Self {
            x_min: self.x_min + delta.x,
            x_max: self.x_max + delta.x,
            y_min: self.y_min + delta.y,
            y_max: self.y_max + delta.y,
        }
    }

    /// Minkowski sum of the rectangles: every point of `self` extended by the offsets of `other`.
    ///
    /// This is how a fixed-size footprint (e.g. an icon given relative to its anchor) is added around an extent.
    pub fn outset_by(&self, other: &Self) -> Self {
        Self {
            x_min: self.x_min + other.x_min,
            x_max: self.x_max + other.x_max,
            y_min: self.y_min + other.y_min,
            y_max: self.y_max + other.y_max,
        }
    }

    /// Rectangle with the same center scaled by the `factor`.
    pub fn magnify(&self, factor: N) -> Self {
        let two = Self::two();
        let cx = (self.x_min + self.x_max) / two;
        let cy = (self.y_min + self.y_max) / two;
        let half_width = self.width() / two * factor;
        let half_height = self.height() / two * factor;
        Self {
            x_min: cx - half_width,
            x_max: cx + half_width,
            y_min: cy - half_height,
            y_max: cy + half_height,
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Point2<N> {
        let two = Self::two();
        Point2::new(
            (self.x_min + self.x_max) / two,
            (self.y_min + self.y_max) / two,
        )
    }

    /// Minimum corner of the rectangle.
    pub fn min(&self) -> Point2<N> {
        Point2::new(self.x_min, self.y_min)
    }

    /// Corners of the rectangle in counterclockwise order starting from the minimum one.
    pub fn into_quadrangle(self) -> [Point2<N>; 4] {
        [
            Point2::new(self.x_min, self.y_min),
            Point2::new(self.x_max, self.y_min),
            Point2::new(self.x_max, self.y_max),
            Point2::new(self.x_min, self.y_max),
        ]
    }

    /// Smallest rectangle containing all the given ones. Returns `None` for an empty iterator.
    pub fn merge_all(rects: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut iter = rects.into_iter();
        let first = iter.next()?;
        Some(iter.fold(first, |acc, rect| acc.merge(rect)))
    }

    fn two() -> N {
        N::one() + N::one()
    }
}
