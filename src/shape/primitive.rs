use std::sync::Arc;

use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::{Ray, SurfaceInteraction};

/// Trait of objects that can be inserted into a [`Bvh`](crate::partitioning::Bvh).
///
/// A primitive only needs to expose its world-space bounding box and a ray
/// hit test. The `Send + Sync` bounds let the acceleration structure be
/// shared across rendering threads.
pub trait Primitive: Send + Sync {
    /// The world-space AABB enclosing this primitive.
    fn world_bound(&self) -> Aabb;

    /// Computes the closest intersection of `ray` with this primitive, if
    /// there is one before `max_toi`.
    fn intersect(&self, ray: &Ray, max_toi: Real) -> Option<SurfaceInteraction>;

    /// Tests whether `ray` hits this primitive before `max_toi`.
    ///
    /// The default implementation forwards to [`Primitive::intersect`];
    /// shapes with a cheaper boolean test should override it.
    #[inline]
    fn intersect_p(&self, ray: &Ray, max_toi: Real) -> bool {
        self.intersect(ray, max_toi).is_some()
    }
}

impl<P: Primitive + ?Sized> Primitive for Box<P> {
    #[inline]
    fn world_bound(&self) -> Aabb {
        (**self).world_bound()
    }

    #[inline]
    fn intersect(&self, ray: &Ray, max_toi: Real) -> Option<SurfaceInteraction> {
        (**self).intersect(ray, max_toi)
    }

    #[inline]
    fn intersect_p(&self, ray: &Ray, max_toi: Real) -> bool {
        (**self).intersect_p(ray, max_toi)
    }
}

impl<P: Primitive + ?Sized> Primitive for Arc<P> {
    #[inline]
    fn world_bound(&self) -> Aabb {
        (**self).world_bound()
    }

    #[inline]
    fn intersect(&self, ray: &Ray, max_toi: Real) -> Option<SurfaceInteraction> {
        (**self).intersect(ray, max_toi)
    }

    #[inline]
    fn intersect_p(&self, ray: &Ray, max_toi: Real) -> bool {
        (**self).intersect_p(ray, max_toi)
    }
}
