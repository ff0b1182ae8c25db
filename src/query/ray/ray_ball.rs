use crate::math::{Point, Real, Vector};
use crate::query::Ray;

/// Computes the time of impact of a ray on a ball.
///
/// The ball is treated as solid: a ray starting inside of it hits at time 0.
#[inline]
pub fn ray_toi_with_ball(center: &Point<Real>, radius: Real, ray: &Ray) -> Option<Real> {
    let dcenter = ray.origin - *center;

    let a = ray.dir.norm_squared();
    let b = dcenter.dot(&ray.dir);
    let c = dcenter.norm_squared() - radius * radius;

    if c > 0.0 && b > 0.0 {
        return None;
    }

    let delta = b * b - a * c;
    if delta < 0.0 {
        return None;
    }

    let t = (-b - delta.sqrt()) / a;
    if t <= 0.0 {
        // The origin is inside of the ball.
        Some(0.0)
    } else {
        Some(t)
    }
}

/// Computes the time of impact and contact normal of a ray on a ball.
#[inline]
pub fn ray_toi_and_normal_with_ball(
    center: &Point<Real>,
    radius: Real,
    ray: &Ray,
) -> Option<(Real, Vector<Real>)> {
    let toi = ray_toi_with_ball(center, radius, ray)?;
    let normal = (ray.point_at(toi) - *center)
        .try_normalize(0.0)
        .unwrap_or_else(Vector::zeros);
    Some((toi, normal))
}
