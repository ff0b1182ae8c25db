use core::mem;

use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector, DIM};
use crate::query::Ray;

impl Aabb {
    /// Tests whether a ray with precomputed inverse direction hits this AABB
    /// before `max_toi`.
    ///
    /// `inv_dir` must contain the componentwise inverse of the ray direction
    /// and `dir_is_neg` the per-axis sign of the direction (1 for negative,
    /// 0 otherwise). Both are computed once per ray by the BVH traversal and
    /// reused for every node of the tree, which keeps divisions out of the
    /// hot loop.
    #[inline]
    pub fn intersects_inv_ray(
        &self,
        ray: &Ray,
        max_toi: Real,
        inv_dir: &Vector<Real>,
        dir_is_neg: [usize; 3],
    ) -> bool {
        let bounds = [&self.mins, &self.maxs];
        let mut tmin: Real = 0.0;
        let mut tmax: Real = max_toi;

        for i in 0..DIM {
            let t_near = (bounds[dir_is_neg[i]][i] - ray.origin[i]) * inv_dir[i];
            let t_far = (bounds[1 - dir_is_neg[i]][i] - ray.origin[i]) * inv_dir[i];

            tmin = tmin.max(t_near);
            tmax = tmax.min(t_far);

            if tmin > tmax {
                return false;
            }
        }

        true
    }
}

/// Computes the time of impact and contact normal of a ray on an AABB.
///
/// The AABB is treated as solid: a ray starting inside of it hits at time 0
/// with a zero normal.
pub fn ray_toi_and_normal_with_aabb(
    aabb: &Aabb,
    ray: &Ray,
    max_toi: Real,
) -> Option<(Real, Vector<Real>)> {
    let mut tmin: Real = 0.0;
    let mut tmax: Real = max_toi;
    let mut near_axis = usize::MAX;
    let mut near_sign: Real = 0.0;

    for i in 0..DIM {
        if ray.dir[i] == 0.0 {
            if ray.origin[i] < aabb.mins[i] || ray.origin[i] > aabb.maxs[i] {
                return None;
            }
        } else {
            let denom = 1.0 / ray.dir[i];
            let mut t1 = (aabb.mins[i] - ray.origin[i]) * denom;
            let mut t2 = (aabb.maxs[i] - ray.origin[i]) * denom;
            let mut sign: Real = -1.0;

            if t1 > t2 {
                mem::swap(&mut t1, &mut t2);
                sign = 1.0;
            }

            if t1 > tmin {
                tmin = t1;
                near_axis = i;
                near_sign = sign;
            }

            tmax = tmax.min(t2);

            if tmin > tmax {
                return None;
            }
        }
    }

    if near_axis == usize::MAX {
        // The ray origin is inside of the AABB.
        return Some((0.0, Vector::zeros()));
    }

    let mut normal = Vector::zeros();
    normal[near_axis] = near_sign;
    Some((tmin, normal))
}
