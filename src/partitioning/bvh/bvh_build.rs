use core::cmp::Ordering;
use core::mem::size_of;
use std::sync::Mutex;

use log::{debug, info};
use rayon::prelude::*;

use super::bvh_flatten::flatten;
use super::{Bvh, BvhNode, BvhOptions, SplitMethod};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::shape::Primitive;

/// The number of buckets candidate SAH split planes are drawn from.
const NUM_SAH_BUCKETS: usize = 12;

/// Per-primitive build-time record. Consumed by the builder, never visible
/// after construction completes.
#[derive(Copy, Clone)]
pub(super) struct PrimitiveInfo {
    index: u32,
    aabb: Aabb,
    centroid: Point<Real>,
}

impl PrimitiveInfo {
    fn new(index: u32, aabb: Aabb) -> Self {
        Self {
            index,
            aabb,
            centroid: aabb.center(),
        }
    }
}

impl Default for PrimitiveInfo {
    fn default() -> Self {
        Self {
            index: 0,
            aabb: Aabb::new_invalid(),
            centroid: Point::origin(),
        }
    }
}

pub(super) enum BuildNodeKind {
    Leaf { first_prim: u32, prim_count: u32 },
    Interior { axis: u8, left: u32, right: u32 },
}

/// A node of the intermediate build tree. Children are indices into the
/// build arena; the whole arena is dropped once the tree is flattened.
pub(super) struct BuildNode {
    pub(super) aabb: Aabb,
    pub(super) kind: BuildNodeKind,
}

#[derive(Copy, Clone)]
struct SahBucket {
    count: usize,
    aabb: Aabb,
}

impl Default for SahBucket {
    fn default() -> Self {
        Self {
            count: 0,
            aabb: Aabb::new_invalid(),
        }
    }
}

impl<P: Primitive> Bvh<P> {
    /// Builds a new BVH containing the given primitives.
    ///
    /// The primitives are permuted so that the ones referenced by a same
    /// leaf end up contiguous in memory; [`Bvh::source_indices`] maps the
    /// permuted order back to the order given here.
    ///
    /// # Panics
    ///
    /// Panics if `primitives` is empty or if `options.max_leaf_prims` is 0.
    pub fn new(primitives: Vec<P>, options: &BvhOptions) -> Self {
        assert!(
            !primitives.is_empty(),
            "cannot build a BVH from an empty primitive set"
        );
        assert!(options.max_leaf_prims >= 1, "max_leaf_prims must be >= 1");

        debug!(
            "building BVH over {} primitives with {:?} splits",
            primitives.len(),
            options.split_method,
        );

        let (mut infos, world_aabb) = compute_primitive_infos(&primitives);

        let mut builder = BvhBuilder::new(options, primitives.len());
        let num_prims = infos.len();
        let root = builder.build(&mut infos, 0, num_prims);
        debug_assert_eq!(root, 0);

        let nodes = flatten(&builder.arena, root);
        assert_eq!(
            nodes.len(),
            builder.arena.len(),
            "flattening must visit every build node exactly once"
        );
        debug_assert_eq!(nodes[0].aabb(), world_aabb);

        // Apply the permutation computed during the build.
        let mut slots: Vec<Option<P>> = primitives.into_iter().map(Some).collect();
        let primitives: Vec<P> = builder
            .ordered
            .iter()
            .map(|&i| slots[i as usize].take().unwrap())
            .collect();

        info!(
            "BVH built: {} nodes for {} primitives ({} bytes of linear nodes)",
            nodes.len(),
            primitives.len(),
            nodes.len() * size_of::<BvhNode>(),
        );

        Self {
            nodes,
            primitives,
            source_indices: builder.ordered,
        }
    }
}

/// Computes one build record per primitive along with the AABB of the whole
/// set, using all the threads of the global rayon pool.
///
/// The records are filled by contiguous chunks, one chunk per worker, so no
/// two workers ever write the same slot. Each worker accumulates a local
/// AABB and merges it into the shared one exactly once at the end of its
/// chunk.
fn compute_primitive_infos<P: Primitive>(primitives: &[P]) -> (Vec<PrimitiveInfo>, Aabb) {
    let num_threads = rayon::current_num_threads().max(1);
    let chunk_len = primitives.len().div_ceil(num_threads).max(1);

    let world_aabb = Mutex::new(Aabb::new_invalid());
    let mut infos = vec![PrimitiveInfo::default(); primitives.len()];

    infos
        .par_chunks_mut(chunk_len)
        .zip(primitives.par_chunks(chunk_len))
        .enumerate()
        .for_each(|(chunk_id, (info_chunk, prim_chunk))| {
            let mut local_aabb = Aabb::new_invalid();

            for (i, (info, prim)) in info_chunk.iter_mut().zip(prim_chunk.iter()).enumerate() {
                let aabb = prim.world_bound();
                *info = PrimitiveInfo::new((chunk_id * chunk_len + i) as u32, aabb);
                local_aabb.merge(&aabb);
            }

            world_aabb.lock().unwrap().merge(&local_aabb);
        });

    let world_aabb = world_aabb.into_inner().unwrap();
    (infos, world_aabb)
}

pub(super) struct BvhBuilder {
    split_method: SplitMethod,
    max_leaf_prims: usize,
    /// The build arena. Nodes are appended in depth-first order and never
    /// removed individually.
    pub(super) arena: Vec<BuildNode>,
    /// The permutation of primitive indices, grown leaf by leaf.
    pub(super) ordered: Vec<u32>,
}

impl BvhBuilder {
    pub(super) fn new(options: &BvhOptions, num_prims: usize) -> Self {
        Self {
            split_method: options.split_method,
            max_leaf_prims: options.max_leaf_prims.min(255),
            arena: Vec::with_capacity(2 * num_prims),
            ordered: Vec::with_capacity(num_prims),
        }
    }

    /// Recursively builds the subtree covering `infos[start..end]` and
    /// returns the index of its root in the arena.
    pub(super) fn build(&mut self, infos: &mut [PrimitiveInfo], start: usize, end: usize) -> u32 {
        assert!(start < end);

        let mut aabb = Aabb::new_invalid();
        for info in &infos[start..end] {
            aabb.merge(&info.aabb);
        }

        let num_prims = end - start;
        if num_prims == 1 {
            return self.push_leaf(aabb, &infos[start..end]);
        }

        let centroid_aabb = Aabb::from_points(infos[start..end].iter().map(|info| info.centroid));
        let dim = centroid_aabb.largest_axis();

        if centroid_aabb.maxs[dim] == centroid_aabb.mins[dim] {
            // All centroids coincide so no split plane can separate them.
            return self.push_leaf(aabb, &infos[start..end]);
        }

        let mid = match self.split_method {
            SplitMethod::Middle => {
                let mid = Self::split_middle(infos, start, end, dim, &centroid_aabb);
                if mid == start || mid == end {
                    Self::split_equal(infos, start, end, dim)
                } else {
                    mid
                }
            }
            SplitMethod::EqualCounts => Self::split_equal(infos, start, end, dim),
            SplitMethod::Sah => {
                match self.split_sah(&aabb, &centroid_aabb, dim, infos, start, end) {
                    Some(mid) => mid,
                    // Intersecting the primitives directly is estimated
                    // cheaper than any of the candidate splits.
                    None => return self.push_leaf(aabb, &infos[start..end]),
                }
            }
        };

        let id = self.arena.len() as u32;
        self.arena.push(BuildNode {
            aabb,
            kind: BuildNodeKind::Interior {
                axis: dim as u8,
                left: 0,
                right: 0,
            },
        });

        let left = self.build(infos, start, mid);
        let right = self.build(infos, mid, end);
        self.arena[id as usize].kind = BuildNodeKind::Interior {
            axis: dim as u8,
            left,
            right,
        };

        id
    }

    fn push_leaf(&mut self, aabb: Aabb, infos: &[PrimitiveInfo]) -> u32 {
        let first_prim = self.ordered.len() as u32;
        for info in infos {
            self.ordered.push(info.index);
        }

        let id = self.arena.len() as u32;
        self.arena.push(BuildNode {
            aabb,
            kind: BuildNodeKind::Leaf {
                first_prim,
                prim_count: infos.len() as u32,
            },
        });
        id
    }

    /// Partitions by centroid position relative to the spatial midpoint of
    /// the centroid AABB. May return an empty side if the centroids are
    /// very unevenly distributed; the caller falls back to `split_equal`.
    fn split_middle(
        infos: &mut [PrimitiveInfo],
        start: usize,
        end: usize,
        dim: usize,
        centroid_aabb: &Aabb,
    ) -> usize {
        let pmid = (centroid_aabb.mins[dim] + centroid_aabb.maxs[dim]) / 2.0;
        start + partition_in_place(&mut infos[start..end], |info| info.centroid[dim] < pmid)
    }

    /// Moves the median-centroid primitive to the middle of the range with
    /// smaller centroids on its left, without fully sorting the range.
    fn split_equal(infos: &mut [PrimitiveInfo], start: usize, end: usize, dim: usize) -> usize {
        let mid = (start + end) / 2;
        let _ = infos[start..end].select_nth_unstable_by(mid - start, |a, b| {
            a.centroid[dim]
                .partial_cmp(&b.centroid[dim])
                .unwrap_or(Ordering::Equal)
        });
        mid
    }

    /// Selects a split plane with the bucketed Surface Area Heuristic and
    /// partitions the range accordingly.
    ///
    /// Returns `None` when creating a leaf is estimated cheaper than the
    /// best candidate split and the range is small enough to become one.
    fn split_sah(
        &self,
        aabb: &Aabb,
        centroid_aabb: &Aabb,
        dim: usize,
        infos: &mut [PrimitiveInfo],
        start: usize,
        end: usize,
    ) -> Option<usize> {
        let num_prims = end - start;
        if num_prims <= 2 {
            // Too few primitives for bucketing to be meaningful.
            return Some(Self::split_equal(infos, start, end, dim));
        }

        let bucket_of = |info: &PrimitiveInfo| -> usize {
            let b = (NUM_SAH_BUCKETS as Real * centroid_aabb.offset(&info.centroid)[dim]) as usize;
            // A centroid exactly on the upper bound lands one past the end.
            b.min(NUM_SAH_BUCKETS - 1)
        };

        let mut buckets = [SahBucket::default(); NUM_SAH_BUCKETS];
        for info in &infos[start..end] {
            let bucket = &mut buckets[bucket_of(info)];
            bucket.count += 1;
            bucket.aabb.merge(&info.aabb);
        }

        // Suffix-merge so that right_merges[i] covers buckets[i..].
        let mut right_merges = buckets;
        for i in (0..NUM_SAH_BUCKETS - 1).rev() {
            let next = right_merges[i + 1];
            right_merges[i].count += next.count;
            right_merges[i].aabb.merge(&next.aabb);
        }

        // Sweep the candidate planes left to right, accumulating the left
        // side incrementally.
        let total_area = aabb.surface_area();
        let mut left_merge = SahBucket::default();
        let mut best_cost = Real::MAX;
        let mut best_bucket = 0;

        for i in 0..NUM_SAH_BUCKETS - 1 {
            left_merge.count += buckets[i].count;
            left_merge.aabb.merge(&buckets[i].aabb);
            let right = &right_merges[i + 1];

            let cost = 1.0
                + (left_merge.count as Real * left_merge.aabb.surface_area()
                    + right.count as Real * right.aabb.surface_area())
                    / total_area;
            if cost < best_cost {
                best_cost = cost;
                best_bucket = i;
            }
        }

        let leaf_cost = num_prims as Real;
        if num_prims > self.max_leaf_prims || best_cost < leaf_cost {
            let mid = start
                + partition_in_place(&mut infos[start..end], |info| {
                    bucket_of(info) <= best_bucket
                });
            Some(mid)
        } else {
            None
        }
    }
}

fn partition_in_place<T>(slice: &mut [T], mut pred: impl FnMut(&T) -> bool) -> usize {
    let mut first = 0;
    for i in 0..slice.len() {
        if pred(&slice[i]) {
            slice.swap(first, i);
            first += 1;
        }
    }
    first
}
