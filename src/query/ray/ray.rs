//! Structures needed to cast rays.

use crate::math::{Point, Real, Vector};

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at an origin point and extending
/// in a direction. The direction does **not** need to be normalized: if it
/// is, times of impact represent actual distances, otherwise they are
/// expressed in units of the direction's length.
///
/// # Example
///
/// ```rust
/// use riposte::query::Ray;
/// use riposte::na::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(5.0), Point3::new(5.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray from an origin point and a direction vector.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Computes the point along the ray at parameter `t`, i.e., `origin + dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// The result of a successful closest-hit query.
///
/// This carries everything the shading stages of a renderer need about the
/// point a ray hit: where the hit happened, how far along the ray it is,
/// and the surface normal there.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceInteraction {
    /// The time of impact of the ray on the surface.
    ///
    /// The hit point can be recovered with `ray.point_at(time_of_impact)`.
    pub time_of_impact: Real,
    /// The world-space hit point.
    pub point: Point<Real>,
    /// The surface normal at the hit point.
    ///
    /// May be unreliable, or zero, when the ray started inside of a solid
    /// shape and the hit was reported at time 0.
    pub normal: Vector<Real>,
}

impl SurfaceInteraction {
    /// Creates a new `SurfaceInteraction`.
    #[inline]
    pub fn new(time_of_impact: Real, point: Point<Real>, normal: Vector<Real>) -> Self {
        Self {
            time_of_impact,
            point,
            normal,
        }
    }
}
