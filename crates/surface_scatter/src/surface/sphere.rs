//! Solid sphere.
use glam::Vec3;

use crate::surface::{Ray, SurfaceHit, SurfaceQuery};

/// A sphere hit from outside only; rays starting inside report no hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

impl SurfaceQuery for Sphere {
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        let oc = ray.origin - self.center;
        let c = oc.length_squared() - self.radius * self.radius;
        if c < 0.0 {
            return None;
        }
        let b = oc.dot(ray.direction);
        if b > 0.0 {
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        if !ray.accepts(t) {
            return None;
        }
        let point = ray.at(t);
        let normal = (point - self.center).normalize_or(Vec3::Y);
        Some(SurfaceHit::new(point, normal, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_near_side() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y).expect("valid ray");
        let hit = sphere.raycast_first(&ray).expect("hit");
        assert!((hit.point - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);
        assert!((hit.distance - 8.0).abs() < 1e-5);
    }

    #[test]
    fn misses_when_inside_or_beside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let inside = Ray::new(Vec3::ZERO, Vec3::X).expect("valid ray");
        let beside = Ray::new(Vec3::new(2.0, 5.0, 0.0), Vec3::NEG_Y).expect("valid ray");
        assert!(sphere.raycast_first(&inside).is_none());
        assert!(sphere.raycast_first(&beside).is_none());
    }
}
