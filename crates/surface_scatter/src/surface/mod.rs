//! Scene query abstraction used for every ray the tool casts.
//!
//! The cursor ray, each disc-sample ray and each ring-outline ray all go through
//! [`SurfaceQuery::raycast_first`]. Hosts implement the trait over their collision
//! world; the analytic surfaces in this module cover headless use and tests.
use glam::Vec3;

use crate::error::{Error, Result};

pub mod group;
pub mod heightfield;
pub mod plane;
pub mod sphere;

pub use group::SurfaceGroup;
pub use heightfield::HeightField;
pub use plane::Plane;
pub use sphere::Sphere;

/// A half-line with a unit direction and an optional length limit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
    /// Hits further than this are ignored. `f32::INFINITY` for unbounded rays.
    pub max_distance: f32,
}

impl Ray {
    /// Creates an unbounded ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self> {
        let Some(direction) = direction.try_normalize() else {
            return Err(Error::InvalidRay(format!(
                "direction {direction} cannot be normalized"
            )));
        };
        if !origin.is_finite() {
            return Err(Error::InvalidRay(format!("origin {origin} is not finite")));
        }
        Ok(Self {
            origin,
            direction,
            max_distance: f32::INFINITY,
        })
    }

    /// Builds a ray from an already normalized direction without checks.
    #[inline]
    pub(crate) fn from_unit(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        debug_assert!(direction.is_normalized(), "ray direction must be unit length");
        Self {
            origin,
            direction,
            max_distance,
        }
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    #[inline]
    pub(crate) fn accepts(&self, distance: f32) -> bool {
        distance >= 0.0 && distance <= self.max_distance
    }
}

/// Closest intersection of a ray with scene geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceHit {
    pub point: Vec3,
    /// Unit surface normal at `point`.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

impl SurfaceHit {
    pub fn new(point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            point,
            normal,
            distance,
        }
    }
}

/// Scene query service: closest hit of a ray against collidable geometry.
pub trait SurfaceQuery {
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit>;
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for &T {
    #[inline]
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        (**self).raycast_first(ray)
    }
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for Box<T> {
    #[inline]
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        (**self).raycast_first(ray)
    }
}

/// A [`SurfaceQuery`] that forwards to a user-provided closure.
pub struct FnSurface<F>
where
    F: Fn(&Ray) -> Option<SurfaceHit>,
{
    f: F,
}

impl<F> FnSurface<F>
where
    F: Fn(&Ray) -> Option<SurfaceHit>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SurfaceQuery for FnSurface<F>
where
    F: Fn(&Ray) -> Option<SurfaceHit>,
{
    #[inline]
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        (self.f)(ray)
    }
}

/// A scene with nothing to hit.
impl SurfaceQuery for () {
    #[inline]
    fn raycast_first(&self, _ray: &Ray) -> Option<SurfaceHit> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_new_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -3.0, 0.0)).expect("valid ray");
        assert_eq!(ray.direction, Vec3::NEG_Y);
        assert_eq!(ray.max_distance, f32::INFINITY);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn ray_new_rejects_zero_and_non_finite_input() {
        assert!(matches!(
            Ray::new(Vec3::ZERO, Vec3::ZERO),
            Err(Error::InvalidRay(_))
        ));
        assert!(matches!(
            Ray::new(Vec3::splat(f32::NAN), Vec3::Y),
            Err(Error::InvalidRay(_))
        ));
    }

    #[test]
    fn accepts_respects_max_distance() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X)
            .expect("valid ray")
            .with_max_distance(5.0);
        assert!(ray.accepts(0.0));
        assert!(ray.accepts(5.0));
        assert!(!ray.accepts(5.1));
        assert!(!ray.accepts(-0.1));
    }

    #[test]
    fn fn_surface_and_unit_forward_queries() {
        let hit = SurfaceHit::new(Vec3::ONE, Vec3::Y, 1.0);
        let surface = FnSurface::new(move |_ray: &Ray| Some(hit));
        let ray = Ray::new(Vec3::ZERO, Vec3::Y).expect("valid ray");
        assert_eq!(surface.raycast_first(&ray), Some(hit));
        assert_eq!(().raycast_first(&ray), None);

        let boxed: Box<dyn SurfaceQuery> = Box::new(surface);
        assert_eq!((&boxed).raycast_first(&ray), Some(hit));
    }
}
