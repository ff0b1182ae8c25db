//! Intersectable scene primitives.

pub use self::ball::Ball;
pub use self::cuboid::Cuboid;
pub use self::primitive::Primitive;

mod ball;
mod cuboid;
mod primitive;
