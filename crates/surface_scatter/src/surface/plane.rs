//! Infinite one-sided plane.
use glam::Vec3;

use crate::surface::{Ray, SurfaceHit, SurfaceQuery};

/// An infinite plane that is only hit from the side its normal points to,
/// the way collision meshes ignore back faces.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    pub point: Vec3,
    /// Unit length.
    pub normal: Vec3,
}

impl Plane {
    /// Creates a plane through `point`; `normal` is normalized and falls back to `+Y`.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or(Vec3::Y),
        }
    }

    /// The `y = 0` ground plane facing up.
    pub fn ground() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y)
    }

    /// Signed distance of `p` above the plane.
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }
}

impl SurfaceQuery for Plane {
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        let denom = ray.direction.dot(self.normal);
        if denom >= -f32::EPSILON {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if !ray.accepts(t) {
            return None;
        }
        Some(SurfaceHit::new(ray.at(t), self.normal, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_ground_from_above() {
        let ray = Ray::new(Vec3::new(1.0, 3.0, -2.0), Vec3::NEG_Y).expect("valid ray");
        let hit = Plane::ground().raycast_first(&ray).expect("hit");
        assert!((hit.point - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-6);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.distance - 3.0).abs() < 1e-6);
    }

    #[test]
    fn misses_back_face_parallel_and_behind() {
        let plane = Plane::ground();
        let from_below = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y).expect("valid ray");
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X).expect("valid ray");
        let pointing_away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y).expect("valid ray");
        assert!(plane.raycast_first(&from_below).is_none());
        assert!(plane.raycast_first(&parallel).is_none());
        assert!(plane.raycast_first(&pointing_away).is_none());
    }

    #[test]
    fn respects_max_distance() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y)
            .expect("valid ray")
            .with_max_distance(5.0);
        assert!(Plane::ground().raycast_first(&ray).is_none());
    }

    #[test]
    fn tilted_plane_reports_its_normal() {
        let plane = Plane::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        let ray = Ray::new(Vec3::new(2.0, 2.0, 0.0), -plane.normal).expect("valid ray");
        let hit = plane.raycast_first(&ray).expect("hit");
        assert!(plane.signed_distance(hit.point).abs() < 1e-5);
        assert!((hit.normal.length() - 1.0).abs() < 1e-6);
    }
}
