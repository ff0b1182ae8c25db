//! Spatial partitioning tools.

pub use self::bvh::{Bvh, BvhNode, BvhOptions, SplitMethod, UnknownSplitMethod};

pub mod bvh;
