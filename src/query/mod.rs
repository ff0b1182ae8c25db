//! Non-persistent geometric queries.
//!
//! Everything in this module is about casting rays: the [`Ray`] type itself,
//! the [`SurfaceInteraction`] payload reported by closest-hit queries, and
//! the per-shape intersection routines used by the
//! [`Primitive`](crate::shape::Primitive) implementations of this crate.

pub use self::ray::{Ray, SurfaceInteraction};

pub mod ray;
