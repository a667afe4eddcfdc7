//! Union of several surfaces.
use crate::surface::{Ray, SurfaceHit, SurfaceQuery};

/// Returns the closest hit over all contained surfaces.
#[derive(Default)]
pub struct SurfaceGroup {
    surfaces: Vec<Box<dyn SurfaceQuery + Send + Sync>>,
}

impl SurfaceGroup {
    pub fn new() -> Self {
        Self {
            surfaces: Vec::new(),
        }
    }

    pub fn with<S: SurfaceQuery + Send + Sync + 'static>(mut self, surface: S) -> Self {
        self.push(surface);
        self
    }

    pub fn push<S: SurfaceQuery + Send + Sync + 'static>(&mut self, surface: S) {
        self.surfaces.push(Box::new(surface));
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl SurfaceQuery for SurfaceGroup {
    fn raycast_first(&self, ray: &Ray) -> Option<SurfaceHit> {
        self.surfaces
            .iter()
            .filter_map(|s| s.raycast_first(ray))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::surface::{Plane, Sphere};

    #[test]
    fn closest_surface_wins() {
        let group = SurfaceGroup::new()
            .with(Plane::ground())
            .with(Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.5));
        assert_eq!(group.len(), 2);

        let over_sphere = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y).expect("valid ray");
        let hit = group.raycast_first(&over_sphere).expect("hit");
        assert!((hit.point.y - 1.5).abs() < 1e-5);

        let over_ground = Ray::new(Vec3::new(4.0, 5.0, 0.0), Vec3::NEG_Y).expect("valid ray");
        let hit = group.raycast_first(&over_ground).expect("hit");
        assert!(hit.point.y.abs() < 1e-5);
    }

    #[test]
    fn empty_group_never_hits() {
        let group = SurfaceGroup::new();
        assert!(group.is_empty());
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y).expect("valid ray");
        assert!(group.raycast_first(&ray).is_none());
    }
}
