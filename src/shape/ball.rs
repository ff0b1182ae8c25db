use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::ray::ray_toi_and_normal_with_ball;
use crate::query::{Ray, SurfaceInteraction};
use crate::shape::Primitive;

/// A ball shape, positioned in world-space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ball {
    /// The center of the ball.
    pub center: Point<Real>,
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball from its center and radius.
    pub fn new(center: Point<Real>, radius: Real) -> Self {
        Self { center, radius }
    }
}

impl Primitive for Ball {
    #[inline]
    fn world_bound(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }

    #[inline]
    fn intersect(&self, ray: &Ray, max_toi: Real) -> Option<SurfaceInteraction> {
        let (toi, normal) = ray_toi_and_normal_with_ball(&self.center, self.radius, ray)?;
        (toi <= max_toi).then(|| SurfaceInteraction::new(toi, ray.point_at(toi), normal))
    }
}
