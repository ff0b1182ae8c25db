//! A bounding-volume-hierarchy optimized for ray-tracing workloads.

pub use self::bvh_tree::{Bvh, BvhNode, BvhOptions, SplitMethod, UnknownSplitMethod};

mod bvh_build;
mod bvh_flatten;
mod bvh_traverse;
mod bvh_tree;

#[cfg(test)]
mod bvh_tests;
