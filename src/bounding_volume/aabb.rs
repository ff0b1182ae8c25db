//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector, DIM};
use nalgebra as na;
use num_traits::Bounded;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is the simplest bounding volume, defined by its minimum and
/// maximum corners. Its edges are always parallel to the coordinate axes,
/// which makes intersection and merge tests very cheap. It is the bounding
/// volume used by every node of the [`Bvh`](crate::partitioning::Bvh).
///
/// # Example
///
/// ```rust
/// use riposte::bounding_volume::Aabb;
/// use riposte::na::Point3;
///
/// let aabb = Aabb::new(
///     Point3::new(-1.0, -1.0, -1.0),
///     Point3::new(1.0, 1.0, 1.0)
/// );
///
/// assert_eq!(aabb.center(), Point3::origin());
/// assert_eq!(aabb.extents().x, 2.0);
/// ```
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates of this AABB.
    pub mins: Point<Real>,
    /// The point with the highest coordinates of this AABB.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB from its minimum and maximum corners.
    ///
    /// Each component of `mins` should be smaller than or equal to the
    /// corresponding component of `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// The resulting AABB has `mins` set to maximum values and `maxs` set to
    /// minimum values. This is the identity element for [`BoundingVolume::merge`],
    /// similar to starting a min operation with infinity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use riposte::bounding_volume::{Aabb, BoundingVolume};
    /// use riposte::na::Point3;
    ///
    /// let mut aabb = Aabb::new_invalid();
    /// aabb.merge(&Aabb::new(Point3::new(1.0, 2.0, 3.0), Point3::new(1.0, 2.0, 3.0)));
    /// aabb.merge(&Aabb::new(Point3::new(-1.0, 0.0, 2.0), Point3::new(-1.0, 0.0, 2.0)));
    ///
    /// assert_eq!(aabb.mins, Point3::new(-1.0, 0.0, 2.0));
    /// assert_eq!(aabb.maxs, Point3::new(1.0, 2.0, 3.0));
    /// ```
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Creates a new AABB from its center and half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB that tightly encloses a set of points.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Aabb::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half-extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// The total area of the six faces of this AABB.
    #[inline]
    pub fn surface_area(&self) -> Real {
        let extents = self.extents();
        2.0 * (extents.x * extents.y + extents.y * extents.z + extents.z * extents.x)
    }

    /// The index of the axis along which this AABB is the largest.
    #[inline]
    pub fn largest_axis(&self) -> usize {
        self.extents().imax()
    }

    /// The position of `pt` relative to the corners of this AABB.
    ///
    /// Each component of the result is 0.0 at `self.mins`, 1.0 at
    /// `self.maxs`, and interpolated linearly in-between. Components with a
    /// zero extent are left as the absolute offset from `self.mins`.
    #[inline]
    pub fn offset(&self, pt: &Point<Real>) -> Vector<Real> {
        let mut offset = pt - self.mins;
        for i in 0..DIM {
            let extent = self.maxs[i] - self.mins[i];
            if extent > 0.0 {
                offset[i] /= extent;
            }
        }
        offset
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Does this AABB contain a point expressed in the same coordinate frame as `self`?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }
}
