use avian3d::prelude::{SpatialQuery, SpatialQueryFilter};
use bevy::prelude::*;
use surface_scatter::surface::{Ray as ScatterRay, SurfaceHit, SurfaceQuery};

/// [`SurfaceQuery`] over the avian3d collision world.
///
/// Every collider counts as a scatter surface unless the filter excludes it.
pub struct AvianSurface<'a, 'w, 's> {
    query: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
}

impl<'a, 'w, 's> AvianSurface<'a, 'w, 's> {
    pub fn new(query: &'a SpatialQuery<'w, 's>) -> Self {
        Self {
            query,
            filter: SpatialQueryFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: SpatialQueryFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl SurfaceQuery for AvianSurface<'_, '_, '_> {
    fn raycast_first(&self, ray: &ScatterRay) -> Option<SurfaceHit> {
        let direction = Dir3::new(ray.direction).ok()?;
        let max_distance = if ray.max_distance.is_finite() {
            ray.max_distance
        } else {
            f32::MAX
        };
        let hit = self
            .query
            .cast_ray(ray.origin, direction, max_distance, true, &self.filter)?;
        surface_hit(ray, hit.distance, hit.normal)
    }
}

/// Converts a solid-mode avian hit. A ray starting inside a collider reports
/// distance 0 and a zero normal; that is no hit.
fn surface_hit(ray: &ScatterRay, distance: f32, normal: Vec3) -> Option<SurfaceHit> {
    if distance <= 0.0 {
        return None;
    }
    let normal = normal.try_normalize()?;
    Some(SurfaceHit::new(ray.at(distance), normal, distance))
}

/// Converts a camera ray into a core ray.
pub fn scatter_ray(ray: Ray3d) -> Option<ScatterRay> {
    ScatterRay::new(ray.origin, *ray.direction).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_ray() -> ScatterRay {
        ScatterRay::new(Vec3::new(1.0, 3.0, 0.0), Vec3::NEG_Y).expect("valid ray")
    }

    #[test]
    fn origin_inside_collider_is_no_hit() {
        assert!(surface_hit(&down_ray(), 0.0, Vec3::ZERO).is_none());
        assert!(surface_hit(&down_ray(), 0.0, Vec3::Y).is_none());
        assert!(surface_hit(&down_ray(), 1.5, Vec3::ZERO).is_none());
    }

    #[test]
    fn regular_hit_lands_on_the_ray() {
        let hit = surface_hit(&down_ray(), 3.0, Vec3::new(0.0, 2.0, 0.0)).expect("hit");
        assert_eq!(hit.point, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hit.normal, Vec3::Y);
        assert_eq!(hit.distance, 3.0);
    }
}
