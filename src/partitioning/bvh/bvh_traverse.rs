use smallvec::SmallVec;

use super::Bvh;
use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector};
use crate::query::{Ray, SurfaceInteraction};
use crate::shape::Primitive;

/// Inline capacity of the traversal stack. Deeper trees spill to the heap
/// instead of overflowing.
const TRAVERSAL_STACK_SIZE: usize = 64;

/// The componentwise inverse of a ray direction, with near-zero components
/// replaced by a large finite value of the same sign so that slab tests
/// never produce NaNs.
fn inv_dir(ray: &Ray) -> Vector<Real> {
    ray.dir.map(|d| {
        if d.abs() < Real::EPSILON {
            d.signum() / Real::EPSILON
        } else {
            1.0 / d
        }
    })
}

impl<P: Primitive> Bvh<P> {
    /// Computes the closest intersection of `ray` with the primitives of
    /// this BVH, if there is one before `max_toi`.
    ///
    /// Returns the index of the hit primitive (in the ordering originally
    /// passed to [`Bvh::new`]) along with the interaction data.
    pub fn cast_ray(&self, ray: &Ray, max_toi: Real) -> Option<(u32, SurfaceInteraction)> {
        assert!(
            ray.dir.norm_squared() > 0.0,
            "ray direction must be non-zero"
        );

        let inv_dir = inv_dir(ray);
        let dir_is_neg = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];

        let mut stack: SmallVec<[u32; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        let mut curr = 0;
        let mut best = None;
        let mut best_toi = max_toi;

        loop {
            let node = &self.nodes[curr];

            if node.aabb().intersects_inv_ray(ray, best_toi, &inv_dir, dir_is_neg) {
                if node.is_leaf() {
                    // Hits found here shrink `best_toi`, which prunes the
                    // rest of the traversal.
                    let first = node.offset as usize;
                    for i in first..first + node.prim_count as usize {
                        if let Some(interaction) = self.primitives[i].intersect(ray, best_toi) {
                            best_toi = interaction.time_of_impact;
                            best = Some((self.source_indices[i], interaction));
                        }
                    }

                    match stack.pop() {
                        Some(next) => curr = next as usize,
                        None => break,
                    }
                } else if dir_is_neg[node.axis as usize] != 0 {
                    // The second child is the nearer one; visit it first.
                    stack.push(curr as u32 + 1);
                    curr = node.offset as usize;
                } else {
                    stack.push(node.offset);
                    curr += 1;
                }
            } else {
                match stack.pop() {
                    Some(next) => curr = next as usize,
                    None => break,
                }
            }
        }

        best
    }

    /// Tests whether `ray` hits any primitive of this BVH before `max_toi`.
    ///
    /// This is the cheaper query for shadow and visibility tests: it stops
    /// at the very first hit found, which is not necessarily the closest.
    pub fn intersects_ray(&self, ray: &Ray, max_toi: Real) -> bool {
        assert!(
            ray.dir.norm_squared() > 0.0,
            "ray direction must be non-zero"
        );

        let inv_dir = inv_dir(ray);
        let dir_is_neg = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];

        let mut stack: SmallVec<[u32; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        let mut curr = 0;

        loop {
            let node = &self.nodes[curr];

            if node.aabb().intersects_inv_ray(ray, max_toi, &inv_dir, dir_is_neg) {
                if node.is_leaf() {
                    let first = node.offset as usize;
                    for i in first..first + node.prim_count as usize {
                        if self.primitives[i].intersect_p(ray, max_toi) {
                            return true;
                        }
                    }

                    match stack.pop() {
                        Some(next) => curr = next as usize,
                        None => break,
                    }
                } else if dir_is_neg[node.axis as usize] != 0 {
                    stack.push(curr as u32 + 1);
                    curr = node.offset as usize;
                } else {
                    stack.push(node.offset);
                    curr += 1;
                }
            } else {
                match stack.pop() {
                    Some(next) => curr = next as usize,
                    None => break,
                }
            }
        }

        false
    }
}

impl<P: Primitive> Primitive for Bvh<P> {
    #[inline]
    fn world_bound(&self) -> Aabb {
        self.root_aabb()
    }

    #[inline]
    fn intersect(&self, ray: &Ray, max_toi: Real) -> Option<SurfaceInteraction> {
        self.cast_ray(ray, max_toi)
            .map(|(_, interaction)| interaction)
    }

    #[inline]
    fn intersect_p(&self, ray: &Ray, max_toi: Real) -> bool {
        self.intersects_ray(ray, max_toi)
    }
}
