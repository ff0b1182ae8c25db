//! Compilation-flags dependent aliases for mathematical types.

/// The scalar type used throughout this crate.
#[cfg(feature = "f64")]
pub type Real = f64;

/// The scalar type used throughout this crate.
#[cfg(not(feature = "f64"))]
pub type Real = f32;

/// The dimension of the space.
pub const DIM: usize = 3;

/// The point type.
pub type Point<N> = nalgebra::Point3<N>;

/// The vector type.
pub type Vector<N> = nalgebra::Vector3<N>;
