use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::ray::ray_toi_and_normal_with_aabb;
use crate::query::{Ray, SurfaceInteraction};
use crate::shape::Primitive;

/// An axis-aligned box shape, positioned in world-space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cuboid {
    /// The region of space occupied by this cuboid.
    pub aabb: Aabb,
}

impl Cuboid {
    /// Creates a new cuboid from its minimum and maximum corners.
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Self {
        Self {
            aabb: Aabb::new(mins, maxs),
        }
    }

    /// Creates a new cuboid from its center and half-extents.
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self {
            aabb: Aabb::from_half_extents(center, half_extents),
        }
    }
}

impl Primitive for Cuboid {
    #[inline]
    fn world_bound(&self) -> Aabb {
        self.aabb
    }

    #[inline]
    fn intersect(&self, ray: &Ray, max_toi: Real) -> Option<SurfaceInteraction> {
        let (toi, normal) = ray_toi_and_normal_with_aabb(&self.aabb, ray, max_toi)?;
        Some(SurfaceInteraction::new(toi, ray.point_at(toi), normal))
    }
}
